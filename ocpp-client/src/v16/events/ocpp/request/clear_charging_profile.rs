use ocppsim_core::v16::{
    messages::clear_charging_profile::{ClearChargingProfileRequest, ClearChargingProfileResponse},
    types::ClearChargingProfileStatus,
};

use crate::v16::cp::core::ChargePointCore;

impl ChargePointCore {
    pub(crate) fn clear_charging_profile_ocpp(
        &mut self,
        unique_id: String,
        _req: ClearChargingProfileRequest,
    ) {
        let payload = ClearChargingProfileResponse {
            status: ClearChargingProfileStatus::Accepted,
        };
        self.send_result(unique_id, payload);
        self.restore_session_limits();
    }
}
