//! Built-in body transforms registered by `SchemaTranslator::standard`

use serde::Deserialize;
use serde_json::{Map, Number, Value};

use crate::{ChallengeFilter, ChallengeFilterKey, Rank, RankCodec, TransformError};

const RANK_FIELDS: [(&str, &str); 2] = [("min_rank", "min_ranking"), ("max_rank", "max_ranking")];

fn unexpected(field: &str, reason: impl ToString) -> TransformError {
    TransformError::UnexpectedShape {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn as_object<'a>(
    value: &'a mut Value,
    field: &str,
) -> Result<&'a mut Map<String, Value>, TransformError> {
    value
        .as_object_mut()
        .ok_or_else(|| unexpected(field, "expected an object"))
}

fn rank_value(rank: Rank) -> Result<Value, TransformError> {
    serde_json::to_value(rank).map_err(|e| unexpected("rank", e))
}

/// Whole numbers come back as integers so `handicap` still decodes as one.
fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        Value::from(number as i64)
    } else {
        Number::from_f64(number)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Locally stored challenge settings may carry `handicap` and `komi` as
/// strings. An empty komi means "not set".
fn sanitize_game(game: &mut Value) -> Result<(), TransformError> {
    let game = as_object(game, "game")?;
    for field in ["handicap", "komi"] {
        let Some(Value::String(text)) = game.get(field) else {
            continue;
        };
        let text = text.trim();
        let value = if text.is_empty() {
            Value::Null
        } else {
            let number: f64 = text
                .parse()
                .map_err(|_| unexpected(field, format!("`{text}` is not a number")))?;
            number_value(number)
        };
        game.insert(field.to_string(), value);
    }
    Ok(())
}

/// Structured rank bounds become legacy `min_ranking` / `max_ranking`.
pub(crate) fn challenge_to_server(mut body: Value) -> Result<Value, TransformError> {
    let map = as_object(&mut body, "body")?;
    for (structured, legacy) in RANK_FIELDS {
        let Some(value) = map.remove(structured) else {
            continue;
        };
        let encoded = if value.is_number() {
            value
        } else {
            let rank = Rank::deserialize(&value).map_err(|e| unexpected(structured, e))?;
            let ranking = rank.encode().ok_or(TransformError::UnencodableRank(rank))?;
            Value::from(ranking)
        };
        map.insert(legacy.to_string(), encoded);
    }
    if let Some(game) = map.get_mut("game") {
        sanitize_game(game)?;
    }
    Ok(body)
}

fn challenge_from_server(codec: &RankCodec, challenge: &mut Value) -> Result<(), TransformError> {
    let map = as_object(challenge, "challenge")?;
    for (structured, legacy) in RANK_FIELDS {
        let Some(value) = map.remove(legacy) else {
            continue;
        };
        let raw = value
            .as_f64()
            .ok_or_else(|| unexpected(legacy, "expected a number"))?;
        map.insert(structured.to_string(), rank_value(codec.decode(raw, false))?);
    }
    if let Some(game) = map.get_mut("game") {
        sanitize_game(game)?;
    }
    Ok(())
}

/// Accepts a bare list or a paginated `{"results": [...]}` page.
pub(crate) fn challenges_from_server(
    codec: &RankCodec,
    mut body: Value,
) -> Result<Value, TransformError> {
    let list = match &mut body {
        Value::Array(list) => list,
        Value::Object(page) => match page.get_mut("results") {
            Some(Value::Array(list)) => list,
            _ => return Err(unexpected("results", "expected a list of challenges")),
        },
        _ => return Err(unexpected("body", "expected a list or a page")),
    };
    for challenge in list.iter_mut() {
        challenge_from_server(codec, challenge)?;
    }
    Ok(body)
}

/// Adds a structured `rank` resolved from `ranking` and the pro flags.
pub(crate) fn player_from_server(codec: &RankCodec, mut body: Value) -> Result<Value, TransformError> {
    let rank = codec.resolve_value(&body);
    let map = as_object(&mut body, "body")?;
    match rank {
        Some(rank) => {
            map.insert(String::from("rank"), rank_value(rank)?);
        }
        None => {
            map.remove("rank");
        }
    }
    Ok(body)
}

/// Flat `show-*-challenges` preferences move into a nested `challenge_filter`.
pub(crate) fn settings_from_server(mut body: Value) -> Result<Value, TransformError> {
    let map = as_object(&mut body, "body")?;
    let mut flat = Map::new();
    for key in ChallengeFilterKey::ALL {
        if let Some(value) = map.remove(key.preference_name()) {
            flat.insert(key.preference_name().to_string(), value);
        }
    }
    if flat.is_empty() || map.contains_key("challenge_filter") {
        return Ok(body);
    }
    let filter = ChallengeFilter::from_preferences(|name| flat.get(name).and_then(Value::as_bool));
    let filter = serde_json::to_value(filter).map_err(|e| unexpected("challenge_filter", e))?;
    map.insert(String::from("challenge_filter"), filter);
    Ok(body)
}
