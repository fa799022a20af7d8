use ocppsim_core::v16::{
    messages::unlock_connector::{UnlockConnectorRequest, UnlockConnectorResponse},
    types::UnlockStatus,
};

use crate::v16::cp::core::ChargePointCore;

impl ChargePointCore {
    pub(crate) fn unlock_connector_ocpp(&mut self, unique_id: String, req: UnlockConnectorRequest) {
        let payload = UnlockConnectorResponse {
            status: UnlockStatus::Unlocked,
        };
        self.send_result(unique_id, payload);
        self.log_info(format!("Connector {} unlocked", req.connector_id));
    }
}
