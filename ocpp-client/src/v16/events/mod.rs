pub(crate) mod inbound;
pub(crate) mod ocpp;
pub(crate) mod operator;
pub(crate) mod timeouts;
pub(crate) mod websocket;
