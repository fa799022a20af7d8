use ocppsim_core::v16::{
    messages::reset::{ResetRequest, ResetResponse},
    types::ResetStatus,
};

use crate::v16::{cp::core::ChargePointCore, state_machine::connector::ConnectorState};

impl ChargePointCore {
    pub(crate) fn reset_ocpp(&mut self, unique_id: String, req: ResetRequest) {
        let payload = ResetResponse {
            status: ResetStatus::Accepted,
        };
        self.send_result(unique_id, payload);
        self.log_info(format!("{:?} reset requested", req.kind));
        self.force_state(ConnectorState::Available);
    }
}
