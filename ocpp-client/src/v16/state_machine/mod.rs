pub(crate) mod actions;
pub(crate) mod boot;
pub(crate) mod call;
pub(crate) mod connection;
pub(crate) mod connector;
pub(crate) mod heartbeat;
pub(crate) mod meter;
pub(crate) mod profile;
pub(crate) mod session;
pub(crate) mod status;
pub(crate) mod supervision;
pub(crate) mod ticker;
