//! Seek graph helpers for the play page

use ogs_compat_core::{
    priority_cmp, should_display, Challenge, ChallengeFilter, RankCodec, SeekGraphChallenge,
    Viewer,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::error::{from_js, to_js};
use crate::ranks::codec_for;
use crate::BindingError;

fn decode<T: DeserializeOwned>(what: &'static str, value: Value) -> Result<T, BindingError> {
    serde_json::from_value(value).map_err(|e| BindingError::invalid(what, e))
}

fn encode<T: serde::Serialize>(what: &'static str, value: &T) -> Result<Value, BindingError> {
    serde_json::to_value(value).map_err(|e| BindingError::invalid(what, e))
}

/// Turn a raw seek graph entry into the client challenge for `viewer`.
pub fn annotate_challenge(
    message: Value,
    viewer: Value,
    codec: &RankCodec,
) -> Result<Value, BindingError> {
    let message: SeekGraphChallenge = decode("seek graph challenge", message)?;
    let viewer: Viewer = decode("viewer", viewer)?;
    encode("challenge", &Challenge::from_seek(&message, &viewer, codec))
}

pub fn display_challenge(challenge: Value, filter: Value) -> Result<bool, BindingError> {
    let challenge: Challenge = decode("challenge", challenge)?;
    let filter: ChallengeFilter = decode("challenge filter", filter)?;
    Ok(should_display(&challenge, &filter))
}

/// Visible challenges, most relevant first
pub fn visible_challenges(challenges: Value, filter: Value) -> Result<Value, BindingError> {
    let mut challenges: Vec<Challenge> = decode("challenge list", challenges)?;
    let filter: ChallengeFilter = decode("challenge filter", filter)?;
    challenges.retain(|challenge| should_display(challenge, &filter));
    challenges.sort_by(priority_cmp);
    encode("challenge list", &challenges)
}

#[wasm_bindgen(js_name = "annotateChallenge")]
pub fn annotate_challenge_wasm(
    message: JsValue,
    viewer: JsValue,
    table: Option<String>,
) -> Result<JsValue, JsValue> {
    let codec = codec_for(table.as_deref())?;
    let challenge = annotate_challenge(
        from_js("seek graph challenge", message)?,
        from_js("viewer", viewer)?,
        &codec,
    )?;
    Ok(to_js(&challenge)?)
}

#[wasm_bindgen(js_name = "shouldDisplayChallenge")]
pub fn should_display_challenge_wasm(challenge: JsValue, filter: JsValue) -> Result<bool, JsValue> {
    Ok(display_challenge(
        from_js("challenge", challenge)?,
        from_js("challenge filter", filter)?,
    )?)
}

#[wasm_bindgen(js_name = "visibleChallenges")]
pub fn visible_challenges_wasm(challenges: JsValue, filter: JsValue) -> Result<JsValue, JsValue> {
    let visible = visible_challenges(
        from_js("challenge list", challenges)?,
        from_js("challenge filter", filter)?,
    )?;
    Ok(to_js(&visible)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seek_entry(challenge_id: u64, user_id: u64, width: u32) -> Value {
        json!({
            "challenge_id": challenge_id,
            "user_id": user_id,
            "username": "host",
            "ranking": 20,
            "min_rank": 0,
            "max_rank": 38,
            "width": width,
            "height": width,
            "handicap": 0,
            "ranked": true,
            "time_per_move": 30
        })
    }

    #[test]
    fn test_annotate_then_filter() {
        let codec = RankCodec::default();
        let viewer = json!({ "id": 3, "anonymous": false, "rank": { "type": "Kyu", "level": 8 } });

        let challenge = annotate_challenge(seek_entry(1, 9, 19), viewer.clone(), &codec).unwrap();
        assert_eq!(challenge["eligible"], json!(true));
        assert_eq!(challenge["rank"], json!({ "type": "Kyu", "level": 10 }));

        let only_9x9 = json!({ "show19x19": false, "show13x13": false, "showOtherSizes": false });
        assert!(!display_challenge(challenge.clone(), only_9x9.clone()).unwrap());
        assert!(display_challenge(challenge, json!({})).unwrap());

        let own = annotate_challenge(seek_entry(2, 3, 19), viewer, &codec).unwrap();
        assert!(display_challenge(own, only_9x9).unwrap());
    }

    #[test]
    fn test_visible_challenges_are_ordered() {
        let codec = RankCodec::default();
        let viewer = json!({ "id": 3, "anonymous": false, "rank": { "type": "Kyu", "level": 8 } });
        let list: Vec<Value> = [(5, 9, 19), (4, 9, 13), (6, 3, 9), (7, 9, 7)]
            .into_iter()
            .map(|(id, user, size)| {
                annotate_challenge(seek_entry(id, user, size), viewer.clone(), &codec).unwrap()
            })
            .collect();

        let visible = visible_challenges(
            Value::Array(list),
            json!({ "show9x9": false, "showOtherSizes": false }),
        )
        .unwrap();
        let ids: Vec<u64> = visible
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["challenge_id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![6, 4, 5]);
    }

    #[test]
    fn test_bad_input_is_reported() {
        let err = display_challenge(json!({ "challenge_id": "x" }), json!({})).unwrap_err();
        assert!(err.to_string().starts_with("Invalid challenge:"));
    }
}
