use ogs_compat_core::{EndpointKey, SchemaTranslator};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::error::{from_js, to_js};
use crate::ranks::codec_for;
use crate::BindingError;

/// REST body translator handed to the API layer.
///
/// Each instance owns its tables; nothing is shared between instances.
#[wasm_bindgen]
pub struct Translator {
    inner: SchemaTranslator,
}

impl Translator {
    pub fn with_table(table: Option<&str>) -> Result<Self, BindingError> {
        Ok(Self {
            inner: SchemaTranslator::standard(codec_for(table)?),
        })
    }

    pub fn inbound(&self, endpoint: &str, body: Value) -> Result<Value, BindingError> {
        Ok(self
            .inner
            .translate_inbound(&EndpointKey::parse(endpoint), body)?)
    }

    pub fn outbound(&self, endpoint: &str, body: Value) -> Result<Value, BindingError> {
        Ok(self
            .inner
            .translate_outbound(&EndpointKey::parse(endpoint), body)?)
    }
}

#[wasm_bindgen]
impl Translator {
    #[wasm_bindgen(constructor)]
    pub fn new(table: Option<String>) -> Result<Translator, JsValue> {
        Ok(Self::with_table(table.as_deref())?)
    }

    #[wasm_bindgen(js_name = "translateInbound")]
    pub fn translate_inbound(&self, endpoint: &str, body: JsValue) -> Result<JsValue, JsValue> {
        let translated = self.inbound(endpoint, from_js("response body", body)?)?;
        Ok(to_js(&translated)?)
    }

    #[wasm_bindgen(js_name = "translateOutbound")]
    pub fn translate_outbound(&self, endpoint: &str, body: JsValue) -> Result<JsValue, JsValue> {
        let translated = self.outbound(endpoint, from_js("request body", body)?)?;
        Ok(to_js(&translated)?)
    }
}
