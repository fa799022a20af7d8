use ocppsim_core::v16::{
    messages::change_configuration::{ChangeConfigurationRequest, ChangeConfigurationResponse},
    types::ConfigurationStatus,
};

use crate::v16::cp::core::ChargePointCore;

impl ChargePointCore {
    pub(crate) fn change_configuration_ocpp(
        &mut self,
        unique_id: String,
        req: ChangeConfigurationRequest,
    ) {
        let payload = ChangeConfigurationResponse {
            status: ConfigurationStatus::Accepted,
        };
        self.send_result(unique_id, payload);
        self.log_info(format!("ChangeConfiguration {}={} acknowledged", req.key, req.value));
    }
}
