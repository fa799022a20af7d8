use ocppsim_core::v16::messages::start_transaction::StartTransactionResponse;

use crate::v16::cp::core::{ChargePointCore, OcppError};

impl ChargePointCore {
    pub(crate) fn start_transaction_response(
        &mut self,
        attempt: u8,
        res: Result<StartTransactionResponse, OcppError>,
    ) {
        let transaction_id = match res {
            Ok(t) => {
                if let Some(info) = t.id_tag_info.as_ref().filter(|info| !info.is_accepted()) {
                    self.log_err(format!("StartTransaction idTagInfo {:?}", info.status));
                }
                t.transaction_id
            }
            Err(e) => {
                self.log_err(format!("StartTransaction attempt {} failed: {}", attempt, e));
                None
            }
        };
        self.on_start_attempt(attempt, transaction_id);
    }
}
