//! Persistence module split across logical submodules.

mod connection;
mod service;
mod songs;

pub use connection::{data_dir, ensure_schema, open_database};
pub use service::{
    add_to_service, clear_service, fetch_service, move_service_item, remove_from_service,
};
pub use songs::{create_song, delete_song, fetch_songs, update_song};
