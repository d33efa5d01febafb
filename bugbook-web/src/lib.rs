pub mod error;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod router;
pub mod state;
pub mod templates;
