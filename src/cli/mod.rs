pub mod list;
pub mod session;
pub mod setup;
pub mod ui;
