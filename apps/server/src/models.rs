use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use depotbook_core::depot::{CellUpdate, InvestmentVariant, LedgerField, NewDepotEntry};
use depotbook_core::errors::Error as CoreError;
use depotbook_core::DepotError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::core_status;

/// Envelope of the commands that only report whether they worked.
///
/// A failure carries `success: false` and the reason, with the status code
/// the error would have had on any other route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            id: None,
            message: None,
        }
    }

    pub fn created(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::ok()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            message: Some(message.into()),
        }
    }

    pub fn respond(result: Result<CommandResult, CoreError>) -> Response {
        match result {
            Ok(done) => (StatusCode::OK, Json(done)).into_response(),
            Err(e) => {
                let status = core_status(&e);
                tracing::warn!("Command failed ({}): {}", status, e);
                (status, Json(CommandResult::failed(e.to_string()))).into_response()
            }
        }
    }
}

/// Request body of the add entry command.
///
/// The variant stays a plain string so an unknown tag is reported through the
/// command envelope instead of a body rejection.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewEntryRequest {
    pub name: String,
    pub variant: String,
    #[serde(default)]
    pub start_year: Option<i32>,
}

impl TryFrom<NewEntryRequest> for NewDepotEntry {
    type Error = CoreError;

    fn try_from(request: NewEntryRequest) -> Result<Self, Self::Error> {
        let variant = request
            .variant
            .parse::<InvestmentVariant>()
            .map_err(|reason| DepotError::invalid_value("variant", reason))?;
        Ok(NewDepotEntry {
            name: request.name,
            variant,
            start_year: request.start_year,
        })
    }
}

/// Request body of the set cell command.
///
/// Every field is taken as loose JSON so a wrong tag or a malformed number
/// ends up in the command envelope.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SetCellRequest {
    pub field: Value,
    pub year: Value,
    pub month: Value,
    pub value: Value,
}

fn text_field(name: &str, raw: &Value) -> Result<String, DepotError> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(DepotError::invalid_value(
            name,
            format!("{} is not a cell value", other),
        )),
    }
}

fn integer_field<T: TryFrom<i64>>(name: &str, raw: &Value) -> Result<T, DepotError> {
    let number = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    number
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| DepotError::invalid_value(name, format!("{} is not a valid {}", raw, name)))
}

impl TryFrom<SetCellRequest> for CellUpdate {
    type Error = CoreError;

    fn try_from(request: SetCellRequest) -> Result<Self, Self::Error> {
        let field = match &request.field {
            Value::String(tag) => tag.parse::<LedgerField>().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            DepotError::invalid_value("field", format!("{} is not a ledger field", request.field))
        })?;
        Ok(CellUpdate {
            field,
            year: integer_field("year", &request.year)?,
            month: integer_field("month", &request.month)?,
            value: text_field("value", &request.value)?,
        })
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CellQuery {
    pub field: String,
    pub year: i32,
    pub month: u32,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PrognosisQuery {
    /// `0.05` or `5%`
    pub growth_rate: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ComparisonActionRequest {
    pub action: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ComparisonUpdateRequest {
    pub value: String,
}
