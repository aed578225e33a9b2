//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `invalid_request` error whose details carry the
//! offending `field` and a stable `code`, so clients can attach messages to
//! form inputs.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, IdParseError, ImageInput, ImageInputError, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldCode {
    Invalid,
    Empty,
    TooLong,
    InvalidId,
    InvalidFlag,
    InvalidImage,
}

impl FieldCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Empty => "empty",
            Self::TooLong => "too_long",
            Self::InvalidId => "invalid_id",
            Self::InvalidFlag => "invalid_flag",
            Self::InvalidImage => "invalid_image",
        }
    }
}

pub(crate) fn field_error(field: &str, code: FieldCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    let code = match err {
        UserValidationError::InvalidEmail | UserValidationError::InvalidUsername => {
            FieldCode::Invalid
        }
        UserValidationError::EmptyUsername
        | UserValidationError::EmptyName { .. }
        | UserValidationError::EmptyPassword => FieldCode::Empty,
        UserValidationError::NameTooLong { .. } => FieldCode::TooLong,
    };
    field_error(err.field(), code, err.to_string())
}

pub(crate) fn parse_image(field: &str, raw: &str) -> Result<ImageInput, Error> {
    ImageInput::parse(raw).map_err(|err: ImageInputError| {
        let code = match err {
            ImageInputError::Empty => FieldCode::Empty,
            _ => FieldCode::InvalidImage,
        };
        field_error(field, code, format!("{field}: {err}"))
    })
}

/// Parse a positive integer identifier supplied in a query string.
pub(crate) fn parse_id<T>(field: &str, raw: &str) -> Result<T, Error>
where
    T: FromStr<Err = IdParseError>,
{
    raw.parse::<T>()
        .map_err(|err| field_error(field, FieldCode::InvalidId, format!("{field}: {err}")))
}

/// Parse a boolean filter flag: `1`/`true` or `0`/`false`.
pub(crate) fn parse_flag(field: &str, raw: &str) -> Result<bool, Error> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(field_error(
            field,
            FieldCode::InvalidFlag,
            format!("{field} must be one of 1, true, 0, false"),
        )),
    }
}
