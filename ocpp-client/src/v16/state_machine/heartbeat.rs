use ocppsim_core::v16::messages::heart_beat::HeartbeatRequest;

use crate::v16::cp::core::ChargePointCore;

use super::{call::CallAction, ticker::Periodic};

pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 60;
/// Upper bound for any interval the CSMS hands out.
pub const MAX_INTERVAL_SECS: u64 = 86_400;

/// 0 means the default; anything above a day is capped.
pub(crate) fn bounded_interval_secs(interval_secs: u64, default_secs: u64) -> u64 {
    if interval_secs == 0 {
        default_secs
    } else {
        interval_secs.min(MAX_INTERVAL_SECS)
    }
}

impl ChargePointCore {
    pub(crate) fn start_heartbeat(&mut self, interval_secs: u64) {
        let interval_secs = bounded_interval_secs(interval_secs, DEFAULT_HEARTBEAT_INTERVAL_SECS);
        self.start_ticker(Periodic::Heartbeat, interval_secs.saturating_mul(1000));
    }

    pub(crate) fn stop_heartbeat(&mut self) {
        self.stop_ticker(Periodic::Heartbeat);
    }

    pub(crate) fn send_heartbeat(&mut self) {
        self.enqueue_call(CallAction::Heartbeat, HeartbeatRequest {});
    }
}
