//! Ratatui front-end: the screen/mode state machines, modal forms, and the
//! terminal event loop.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
