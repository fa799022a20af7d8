pub(crate) mod r#async;
pub(crate) mod config;
pub(crate) mod core;
