use ocppsim_core::v16::messages::status_notification::StatusNotificationResponse;

use crate::v16::cp::core::{ChargePointCore, OcppError};

impl ChargePointCore {
    pub(crate) fn status_notification_response(
        &mut self,
        res: Result<StatusNotificationResponse, OcppError>,
    ) {
        if let Err(e) = res {
            log::warn!("StatusNotification failed: {}", e);
        }
    }
}
