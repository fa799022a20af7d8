//! An emulated OCPP 1.6J charge point.
//!
//! [`v16::ChargePointCore`] is a synchronous engine: every input (transport
//! event, inbound frame, timer expiry, operator command) is a method call,
//! and every effect is queued as a [`v16::CoreActions`] value. The async
//! [`v16::ChargePoint`] driver executes those actions against a websocket,
//! a timer service, an event sink and a session history store.

pub mod v16;
