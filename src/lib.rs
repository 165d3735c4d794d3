pub mod app;
pub mod backend;
pub mod model;
pub mod ui;

pub use app::RevisionApp;
