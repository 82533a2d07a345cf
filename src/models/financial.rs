use serde::{Deserialize, Serialize};

use crate::errors::PortalError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financial {
    pub id: i64,
    pub report_id: i64,
    pub original_contract_amt: f64,
    pub paid_to_date: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialInput {
    pub id: Option<i64>,
    pub original_contract_amt: f64,
    pub paid_to_date: f64,
}

impl FinancialInput {
    pub fn validate(&self) -> Result<(), PortalError> {
        for (field, amount) in [
            ("original contract amount", self.original_contract_amt),
            ("paid to date", self.paid_to_date),
        ] {
            if !amount.is_finite() || amount < 0.0 {
                return Err(PortalError::Validation(format!(
                    "{field} must be a non-negative amount"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_amounts_rejected() {
        let input = FinancialInput { id: None, original_contract_amt: 1000.0, paid_to_date: -5.0 };
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("paid to date"));

        let ok = FinancialInput { id: None, original_contract_amt: 0.0, paid_to_date: 0.0 };
        assert!(ok.validate().is_ok());
    }
}
