use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::report::require_text;
use crate::errors::PortalError;

/// A schedule/scope milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub id: i64,
    pub report_id: i64,
    pub task: String,
    pub target_date: NaiveDate,
    pub completion_percent: f64,
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    pub id: Option<i64>,
    pub task: String,
    /// `YYYY-MM-DD`; blank or missing falls back to the submission day.
    pub target_date: Option<String>,
    pub completion_percent: Option<f64>,
    pub notes: Option<String>,
}

impl ScheduleInput {
    pub fn validate(&self) -> Result<(), PortalError> {
        require_text("task", &self.task)?;
        let percent = self.completion_percent();
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(PortalError::Validation(format!(
                "completion percent must be between 0 and 100, got {percent}"
            )));
        }
        Ok(())
    }

    pub fn completion_percent(&self) -> f64 {
        self.completion_percent.unwrap_or(0.0)
    }

    pub fn notes(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }

    pub fn resolve_target_date(&self, today: NaiveDate) -> Result<NaiveDate, PortalError> {
        match self.target_date.as_deref().map(str::trim) {
            None | Some("") => Ok(today),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                PortalError::Validation(format!("invalid target date '{raw}', expected YYYY-MM-DD"))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(percent: Option<f64>, target: Option<&str>) -> ScheduleInput {
        ScheduleInput {
            id: None,
            task: "Requirements baseline".into(),
            target_date: target.map(String::from),
            completion_percent: percent,
            notes: None,
        }
    }

    #[test]
    fn test_percent_bounds() {
        assert!(input(Some(0.0), None).validate().is_ok());
        assert!(input(Some(100.0), None).validate().is_ok());
        assert!(input(Some(-1.0), None).validate().is_err());
        assert!(input(Some(100.5), None).validate().is_err());
        assert!(input(Some(f64::NAN), None).validate().is_err());
    }

    #[test]
    fn test_missing_percent_defaults_to_zero() {
        let item = input(None, None);
        assert!(item.validate().is_ok());
        assert_eq!(item.completion_percent(), 0.0);
        assert_eq!(item.notes(), "");
    }

    #[test]
    fn test_blank_target_date_falls_back_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        assert_eq!(input(None, Some("  ")).resolve_target_date(today).unwrap(), today);
        assert_eq!(input(None, None).resolve_target_date(today).unwrap(), today);
        assert_eq!(
            input(None, Some("2025-09-15")).resolve_target_date(today).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
        );
        assert!(input(None, Some("09/15/2025")).resolve_target_date(today).is_err());
    }
}
