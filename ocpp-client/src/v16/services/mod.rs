pub(crate) mod timeout;
pub(crate) mod websocket;
