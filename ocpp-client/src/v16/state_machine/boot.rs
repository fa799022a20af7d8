use crate::v16::{cp::core::ChargePointCore, interface::TimerId};

use super::{
    call::CallAction,
    heartbeat::{bounded_interval_secs, DEFAULT_HEARTBEAT_INTERVAL_SECS},
    session::SessionState,
    ticker::Periodic,
};

/// Retry delay after a BootNotification that failed at transport level.
pub const BOOT_RETRY_SECS: u64 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BootState {
    Idle,
    WaitingForResponse,
    Sleeping,
}

impl ChargePointCore {
    pub(crate) fn send_boot_notification(&mut self) {
        self.enqueue_call(CallAction::BootNotification, self.config.boot_info.clone());
        self.boot_state = BootState::WaitingForResponse;
    }

    /// Every fresh transport registers again.
    pub(crate) fn on_boot_connected(&mut self) {
        self.registration_status = None;
        self.send_boot_notification();
    }

    pub(crate) fn on_boot_disconnected(&mut self) {
        if self.boot_state == BootState::Sleeping {
            self.remove_timeout(TimerId::Boot);
        }
        self.notify_offline();
        self.registration_status = None;
        self.boot_state = BootState::Idle;
    }

    pub(crate) fn sleep_before_boot(&mut self, secs: u64) {
        self.add_timeout(TimerId::Boot, secs.saturating_mul(1000));
        self.boot_state = BootState::Sleeping;
    }

    pub(crate) fn on_boot_timer(&mut self) {
        if self.boot_state == BootState::Sleeping && self.ws_connected {
            self.send_boot_notification();
        }
    }

    pub(crate) fn notify_online(&mut self, interval_secs: u64) {
        let interval_secs = bounded_interval_secs(interval_secs, DEFAULT_HEARTBEAT_INTERVAL_SECS);
        self.heartbeat_interval_secs = interval_secs;
        self.start_heartbeat(interval_secs);
        let status = self.connector.state().status();
        self.send_status_notification(status);
        if self.session == SessionState::Active && !self.is_ticking(Periodic::MeterValues) {
            self.start_meter_ticker();
        }
    }

    pub(crate) fn notify_offline(&mut self) {
        self.stop_heartbeat();
        self.stop_ticker(Periodic::MeterValues);
    }
}
