//! Core library surface for the Cantica worship-presentation TUI.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces: the pure song-text algorithms live in [`song`] and
//! [`presentation`], the SQLite-backed library and service list in [`db`],
//! and the Ratatui front-end in [`ui`].
pub mod config;
pub mod db;
pub mod models;
pub mod presentation;
pub mod song;
pub mod ui;

/// Convenience re-exports for the persistence layer. These functions are
/// typically used by `main.rs` to initialize the embedded SQLite store and
/// preload data.
pub use db::{data_dir, fetch_service, fetch_songs, open_database};

/// The primary domain types that other layers manipulate.
pub use models::{Part, ServiceItem, Slide, SlideSize, Song, SongRecord};

/// The derived presentation space and its cursor.
pub use presentation::{SlideRef, SongPlan};

/// The pure song-text operations.
pub use song::{normalize, parse, rechunk, serialize_body};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
