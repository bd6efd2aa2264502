// Control values fed into widget callbacks
use super::error::DashboardError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of one named control, e.g. `date-picker.start_date`.
///
/// On the wire a value is an ISO date, an integer, any other string or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Empty,
    Date(NaiveDate),
    Integer(i64),
    Text(String),
}

impl From<NaiveDate> for ControlValue {
    fn from(date: NaiveDate) -> Self {
        ControlValue::Date(date)
    }
}

impl From<i64> for ControlValue {
    fn from(value: i64) -> Self {
        ControlValue::Integer(value)
    }
}

/// Current values of every control a widget declares.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ControlValues(BTreeMap<String, ControlValue>);

impl ControlValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, control: impl Into<String>, value: ControlValue) {
        self.0.insert(control.into(), value);
    }

    pub fn contains(&self, control: &str) -> bool {
        self.0.contains_key(control)
    }

    /// Date held by `control`; `None` when the control is cleared.
    pub fn date(&self, control: &str) -> Result<Option<NaiveDate>, DashboardError> {
        match self.0.get(control) {
            Some(ControlValue::Date(date)) => Ok(Some(*date)),
            Some(ControlValue::Empty) | None => Ok(None),
            Some(_) => Err(DashboardError::InvalidControlValue {
                control: control.to_string(),
                expected: "an ISO date (YYYY-MM-DD) or null",
            }),
        }
    }

    pub fn integer(&self, control: &str) -> Result<Option<i64>, DashboardError> {
        match self.0.get(control) {
            Some(ControlValue::Integer(value)) => Ok(Some(*value)),
            Some(ControlValue::Empty) | None => Ok(None),
            Some(_) => Err(DashboardError::InvalidControlValue {
                control: control.to_string(),
                expected: "an integer or null",
            }),
        }
    }
}
