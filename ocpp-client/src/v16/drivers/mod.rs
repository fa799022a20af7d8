pub(crate) mod history;
pub(crate) mod timers;
#[cfg(feature = "tokio_ws")]
pub(crate) mod websocket;
