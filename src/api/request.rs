//! Request types for the rank engine API.
//!
//! Employees arrive as raw JSON in any historical record shape and are
//! normalized one at a time, so a malformed record fails alone.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, LegacyEmployeeRecord};

/// Request body for `POST /rank`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankRequest {
    /// The employee record.
    pub employee: Value,
    /// Reference date (`YYYY-MM-DD`); today when omitted.
    #[serde(default, alias = "targetDate")]
    pub target_date: Option<String>,
}

/// Request body for `POST /rank/batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRankRequest {
    /// The employee records.
    pub employees: Vec<Value>,
    /// Shared reference date (`YYYY-MM-DD`); today when omitted.
    #[serde(default, alias = "targetDate")]
    pub target_date: Option<String>,
}

/// Normalizes one raw employee record.
pub(crate) fn normalize_employee(value: Value) -> EngineResult<Employee> {
    let record: LegacyEmployeeRecord =
        serde_json::from_value(value).map_err(|e| EngineError::InvalidEmployee {
            field: "employee".to_string(),
            message: e.to_string(),
        })?;
    record.into_employee()
}

/// The key a record's outcome is reported under: its ID when one can be
/// read, otherwise `#<index>`.
pub(crate) fn record_key(value: &Value, index: usize) -> String {
    match value.get("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => format!("#{}", index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_batch_request_accepts_camel_case_date() {
        let request: BatchRankRequest = serde_json::from_value(json!({
            "employees": [],
            "targetDate": "2024-05-01"
        }))
        .unwrap();
        assert_eq!(request.target_date.as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn test_target_date_is_optional() {
        let request: RankRequest = serde_json::from_value(json!({ "employee": {} })).unwrap();
        assert!(request.target_date.is_none());
    }

    #[test]
    fn test_record_key() {
        assert_eq!(record_key(&json!({"id": "emp_001"}), 0), "emp_001");
        assert_eq!(record_key(&json!({"id": 7}), 0), "7");
        assert_eq!(record_key(&json!({"id": ""}), 3), "#3");
        assert_eq!(record_key(&json!("not an object"), 4), "#4");
    }

    #[test]
    fn test_normalize_rejects_wrong_types() {
        let result = normalize_employee(json!({"id": "e", "entryDate": 20200110}));
        assert!(matches!(result, Err(EngineError::InvalidEmployee { .. })));
    }
}
