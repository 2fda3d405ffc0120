/// Terminal view layer: screen state machine plus per-screen rendering
pub mod app;
pub mod auth;
pub mod chat;
pub mod form;

pub use app::App;
