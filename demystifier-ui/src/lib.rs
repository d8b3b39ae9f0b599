pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod interop;
pub mod render;
pub mod session;

pub use api::*;
pub use app::DemystifierApp;
pub use components::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use session::*;
