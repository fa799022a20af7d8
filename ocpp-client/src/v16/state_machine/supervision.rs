use ocppsim_core::v16::types::Reason;

use crate::v16::{cp::core::ChargePointCore, interface::SimEvent};

use super::{connector::Trigger, session::SessionState};

/// Below this the vehicle is considered to draw nothing.
pub const ZERO_POWER_THRESHOLD_KW: f64 = 0.05;
pub const SUSPEND_AFTER_TICKS: u32 = 5;

impl ChargePointCore {
    /// One-second tick: advances telemetry, publishes it, and applies the
    /// auto-stop and suspend rules.
    pub(crate) fn on_tick(&mut self) {
        let snapshot = self.telemetry.update(1.0);
        self.emit(SimEvent::Metrics(snapshot.clone()));

        if self.session != SessionState::Active {
            return;
        }
        let target_soc = self.telemetry.config().target_soc;
        if snapshot.soc >= target_soc {
            self.log_info(format!("Target SoC {:.0}% reached", target_soc));
            self.stop_session(Reason::UserDefinedLimit);
            return;
        }

        let state = self.connector.state();
        if snapshot.power_kw < ZERO_POWER_THRESHOLD_KW {
            self.zero_power_ticks = self.zero_power_ticks.saturating_add(1);
            if self.zero_power_ticks >= SUSPEND_AFTER_TICKS && self.transition(Trigger::SuspendEV) {
                self.log_info("No power drawn, EV suspended");
            }
        } else {
            self.zero_power_ticks = 0;
            if state.is_suspended() && self.transition(Trigger::Resume) {
                self.log_info("Power restored, charging resumed");
            }
        }
    }
}
