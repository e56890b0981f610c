//! Pure song-text algorithms: parsing the flat delimited format, re-chunking
//! base slides for display, and the search normalizer. Everything in here is
//! total and synchronous; malformed input degrades to something renderable
//! instead of failing, because these functions sit on the live-presentation
//! hot path.

mod parser;
mod search;
mod slides;

pub use parser::{parse, serialize_body};
pub use search::{matches, normalize, search_key};
pub use slides::rechunk;
