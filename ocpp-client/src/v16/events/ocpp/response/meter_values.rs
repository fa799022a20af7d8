use ocppsim_core::v16::messages::meter_values::MeterValuesResponse;

use crate::v16::cp::core::{ChargePointCore, OcppError};

impl ChargePointCore {
    pub(crate) fn meter_values_response(&mut self, res: Result<MeterValuesResponse, OcppError>) {
        if let Err(e) = res {
            self.log_err(format!("MeterValues failed: {}", e));
        }
    }
}
