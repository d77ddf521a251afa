use ogs_compat_core::{CoreError, TransformError};
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum BindingError {
    #[error("Unknown rank table: {0}")]
    UnknownRankTable(String),
    #[error("Invalid {what}: {reason}")]
    InvalidInput { what: &'static str, reason: String },
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl BindingError {
    pub(crate) fn invalid(what: &'static str, reason: impl ToString) -> Self {
        BindingError::InvalidInput {
            what,
            reason: reason.to_string(),
        }
    }
}

impl From<BindingError> for JsValue {
    fn from(error: BindingError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

/// Plain JS objects rather than `Map`s on the way out
pub(crate) fn to_js(value: &serde_json::Value) -> Result<JsValue, BindingError> {
    use serde::Serialize;

    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| BindingError::invalid("result", e))
}

pub(crate) fn from_js(what: &'static str, value: JsValue) -> Result<serde_json::Value, BindingError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| BindingError::invalid(what, e))
}
