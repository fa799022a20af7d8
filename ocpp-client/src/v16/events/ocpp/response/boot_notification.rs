use ocppsim_core::v16::{
    messages::boot_notification::BootNotificationResponse, types::RegistrationStatus,
};

use crate::v16::{
    cp::core::{ChargePointCore, OcppError},
    state_machine::{
        boot::{BootState, BOOT_RETRY_SECS},
        heartbeat::bounded_interval_secs,
    },
};

impl ChargePointCore {
    pub(crate) fn boot_notification_response(
        &mut self,
        res: Result<BootNotificationResponse, OcppError>,
    ) {
        if self.boot_state != BootState::WaitingForResponse {
            log::debug!("boot response while {:?}", self.boot_state);
            return;
        }
        self.boot_state = BootState::Idle;
        match res {
            Ok(t) => {
                self.log_info(format!(
                    "BootNotification {:?}, interval {} s",
                    t.status, t.interval
                ));
                self.registration_status = Some(t.status.clone());
                match t.status {
                    RegistrationStatus::Accepted => self.notify_online(t.interval),
                    RegistrationStatus::Pending | RegistrationStatus::Rejected => {
                        let secs = bounded_interval_secs(t.interval, BOOT_RETRY_SECS);
                        self.sleep_before_boot(secs);
                    }
                }
            }
            Err(e) => {
                self.log_err(format!("BootNotification failed: {}", e));
                if self.ws_connected {
                    self.sleep_before_boot(BOOT_RETRY_SECS);
                }
            }
        }
    }
}
