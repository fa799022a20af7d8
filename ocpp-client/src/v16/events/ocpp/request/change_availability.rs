use ocppsim_core::v16::{
    messages::change_availability::{ChangeAvailabilityRequest, ChangeAvailabilityResponse},
    types::AvailabilityStatus,
};

use crate::v16::cp::core::ChargePointCore;

impl ChargePointCore {
    pub(crate) fn change_availability_ocpp(
        &mut self,
        unique_id: String,
        req: ChangeAvailabilityRequest,
    ) {
        let payload = ChangeAvailabilityResponse {
            status: AvailabilityStatus::Accepted,
        };
        self.send_result(unique_id, payload);
        self.log_info(format!(
            "ChangeAvailability {:?} on connector {} acknowledged",
            req.kind, req.connector_id
        ));
    }
}
