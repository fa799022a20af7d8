//! Wire-level building blocks for OCPP 1.6J: the JSON-array frame codec and
//! the typed message payloads exchanged between a charge point and a CSMS.

pub mod format;
pub mod v16;
