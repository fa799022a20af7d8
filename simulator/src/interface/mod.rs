pub mod config;
pub mod history;
pub mod input;
pub mod log;
pub mod ui;
