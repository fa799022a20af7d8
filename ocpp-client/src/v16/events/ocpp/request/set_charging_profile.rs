use ocppsim_core::v16::{
    messages::set_charging_profile::{SetChargingProfileRequest, SetChargingProfileResponse},
    types::ChargingProfileStatus,
};

use crate::v16::cp::core::ChargePointCore;

impl ChargePointCore {
    pub(crate) fn set_charging_profile_ocpp(
        &mut self,
        unique_id: String,
        req: SetChargingProfileRequest,
    ) {
        let payload = SetChargingProfileResponse {
            status: ChargingProfileStatus::Accepted,
        };
        self.send_result(unique_id, payload);
        match req.cs_charging_profiles {
            Some(profile) => self.apply_charging_profile(&profile),
            None => self.log_err("SetChargingProfile without a profile"),
        }
    }
}
