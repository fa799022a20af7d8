use ocppsim_core::v16::messages::stop_transaction::StopTransactionResponse;

use crate::v16::cp::core::{ChargePointCore, OcppError};

impl ChargePointCore {
    pub(crate) fn stop_transaction_response(
        &mut self,
        res: Result<StopTransactionResponse, OcppError>,
    ) {
        let confirmed = match res {
            Ok(_) => {
                self.log_info("StopTransaction confirmed");
                true
            }
            Err(e) => {
                self.log_err(format!("StopTransaction failed: {}", e));
                false
            }
        };
        self.finish_session(confirmed);
    }
}
