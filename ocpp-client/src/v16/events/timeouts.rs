use crate::v16::{
    cp::core::ChargePointCore, interface::TimerId, state_machine::ticker::Periodic,
};

impl ChargePointCore {
    /// Fired timers are already disarmed by the timer service; periodic
    /// tasks re-arm themselves before running.
    pub(crate) fn handle_timeout_helper(&mut self, id: TimerId) {
        log::trace!("timer fired: {:?}", id);
        match id {
            TimerId::Boot => self.on_boot_timer(),
            TimerId::Call(seq) => self.on_call_timeout(seq),
            TimerId::Heartbeat => {
                if self.rearm_ticker(Periodic::Heartbeat) {
                    self.send_heartbeat();
                }
            }
            TimerId::MeterValues => {
                if self.rearm_ticker(Periodic::MeterValues) {
                    self.on_meter_values_timer();
                }
            }
            TimerId::Tick => {
                if self.rearm_ticker(Periodic::Tick) {
                    self.on_tick();
                }
            }
            TimerId::StartRetry => self.on_start_retry_timer(),
            TimerId::Finishing => self.on_finishing_timer(),
            TimerId::Reconnect => self.on_reconnect_timer(),
        }
    }
}
