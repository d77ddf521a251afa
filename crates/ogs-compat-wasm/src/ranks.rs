//! Rank labels for the UI
//!
//! Labels never fail: anything that does not resolve to a rank shows as "?".

use ogs_compat_core::{all_ranks, amateur_ranks, LegacyRankTable, RankCodec, RankSource};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::error::{from_js, to_js};
use crate::BindingError;

/// `"professional_flag"` (default) or `"pro_thresholds"`
pub fn codec_for(table: Option<&str>) -> Result<RankCodec, BindingError> {
    let table = match table {
        None => LegacyRankTable::default(),
        Some(name) => serde_json::from_value(Value::String(name.to_string()))
            .map_err(|_| BindingError::UnknownRankTable(name.to_string()))?,
    };
    Ok(RankCodec::new(table))
}

pub fn rank_string(value: &Value, codec: &RankCodec) -> String {
    codec.short_label(&RankSource::from_value(value))
}

/// Bare numbers keep their fraction (`32.5` reads "3.5 Dan").
pub fn long_rank_string(value: &Value, codec: &RankCodec) -> String {
    match RankSource::from_value(value) {
        RankSource::Number(raw) => codec.precise_long_label(raw, false),
        source => codec.long_label(&source),
    }
}

#[wasm_bindgen(js_name = "rankString")]
pub fn rank_string_wasm(value: JsValue, table: Option<String>) -> Result<String, JsValue> {
    let codec = codec_for(table.as_deref())?;
    let value = from_js("rank", value).unwrap_or(Value::Null);
    Ok(rank_string(&value, &codec))
}

#[wasm_bindgen(js_name = "longRankString")]
pub fn long_rank_string_wasm(value: JsValue, table: Option<String>) -> Result<String, JsValue> {
    let codec = codec_for(table.as_deref())?;
    let value = from_js("rank", value).unwrap_or(Value::Null);
    Ok(long_rank_string(&value, &codec))
}

#[wasm_bindgen(js_name = "allRanks")]
pub fn all_ranks_wasm() -> Result<JsValue, JsValue> {
    let ranks = serde_json::to_value(all_ranks()).map_err(|e| BindingError::invalid("ranks", e))?;
    Ok(to_js(&ranks)?)
}

#[wasm_bindgen(js_name = "amateurRanks")]
pub fn amateur_ranks_wasm() -> Result<JsValue, JsValue> {
    let ranks =
        serde_json::to_value(amateur_ranks()).map_err(|e| BindingError::invalid("ranks", e))?;
    Ok(to_js(&ranks)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_codec_for_known_tables() {
        assert_eq!(
            codec_for(None).unwrap().table(),
            LegacyRankTable::ProfessionalFlag
        );
        assert_eq!(
            codec_for(Some("pro_thresholds")).unwrap().table(),
            LegacyRankTable::ProThresholds
        );
        assert!(matches!(
            codec_for(Some("newest")),
            Err(BindingError::UnknownRankTable(_))
        ));
    }

    #[test]
    fn test_labels_for_user_records() {
        let codec = codec_for(None).unwrap();
        assert_eq!(rank_string(&json!({ "pro": true, "ranking": 45 }), &codec), "9p");
        assert_eq!(rank_string(&json!({ "ranking": 23.7 }), &codec), "7k");
        assert_eq!(long_rank_string(&json!(32.5), &codec), "3.5 Dan");
        assert_eq!(long_rank_string(&json!("23.7"), &codec), "6.3 Kyu");
        assert_eq!(long_rank_string(&json!({ "ranking": 32.5 }), &codec), "3 Dan");
        assert_eq!(rank_string(&json!(32.5), &codec), "3d");
        assert_eq!(rank_string(&json!({ "username": "nobody" }), &codec), "?");
    }

    #[test]
    fn test_threshold_table_reads_big_ranks() {
        let codec = codec_for(Some("pro_thresholds")).unwrap();
        assert_eq!(rank_string(&json!(1039), &codec), "3p");
        assert_eq!(long_rank_string(&json!(1039), &codec), "3 Pro");
    }
}
