pub mod app;
pub mod effects;
pub mod location;
pub mod logging;
pub mod settings;
