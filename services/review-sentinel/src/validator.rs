//! Shape checks for status API responses

use serde_json::Value;

use crate::status::Cursor;

/// A response that passed shape validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedResponse<'a> {
    /// Items in API order, most recent first. May be empty.
    pub homeworks: &'a [Value],
    /// Cursor to use for the next fetch
    pub current_date: Cursor,
}

/// Check that `response` is an object carrying a `homeworks` array and an
/// integer `current_date`. The input is not modified.
pub fn validate_response(response: &Value) -> crate::Result<ValidatedResponse<'_>> {
    let object = response.as_object().ok_or_else(|| {
        crate::ReviewError::MalformedResponse(format!(
            "expected an object, got {}",
            json_kind(response)
        ))
    })?;

    let homeworks = match object.get("homeworks") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => {
            return Err(crate::ReviewError::MalformedResponse(format!(
                "'homeworks' must be an array, got {}",
                json_kind(other)
            )))
        }
        None => {
            return Err(crate::ReviewError::MalformedResponse(
                "'homeworks' is missing".to_string(),
            ))
        }
    };

    let current_date = object
        .get("current_date")
        .and_then(Value::as_i64)
        .map(Cursor)
        .ok_or_else(|| crate::ReviewError::MissingField("current_date".to_string()))?;

    tracing::debug!(
        "Response valid: {} homework item(s), current_date={}",
        homeworks.len(),
        current_date
    );

    Ok(ValidatedResponse {
        homeworks,
        current_date,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
