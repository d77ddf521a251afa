//! Per-endpoint translation between server payloads and client records
//!
//! The REST layer sends and receives JSON. Some endpoints still use the old
//! field layout (legacy ranking numbers, flat preference names, numbers
//! stored as strings), and the translator maps those bodies to the shapes
//! the client records expect and back. An endpoint without a registered
//! transform passes through untouched.

use std::collections::HashMap;
use std::fmt;

use log::trace;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::transforms::{
    challenge_to_server, challenges_from_server, player_from_server, settings_from_server,
};
use crate::{ChallengeFilter, CoreError, Rank, RankCodec, RuleSet, TransformError};

/// Stands in for a path parameter inside an endpoint key. It is never
/// expanded; register and look up with the same literal.
pub const PATH_PLACEHOLDER: &str = "%%";

/// Endpoints whose payloads the client translates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Challenges,
    PlayerChallenge,
    MeChallenges,
    Players,
    MeSettings,
}

impl Endpoint {
    pub const ALL: [Endpoint; 5] = [
        Endpoint::Challenges,
        Endpoint::PlayerChallenge,
        Endpoint::MeChallenges,
        Endpoint::Players,
        Endpoint::MeSettings,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Challenges => "challenges",
            Endpoint::PlayerChallenge => "players/%%/challenge",
            Endpoint::MeChallenges => "me/challenges",
            Endpoint::Players => "players/%%",
            Endpoint::MeSettings => "me/settings",
        }
    }
}

/// Lookup key for the translation tables. Matching is exact.
///
/// A known path always becomes `Known`; `Path` keys only come out of
/// [`EndpointKey::parse`], so one endpoint never has two keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EndpointKey {
    Known(Endpoint),
    Path(OtherPath),
}

/// Endpoint path that matches none of the known endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OtherPath(String);

impl OtherPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl EndpointKey {
    /// Known endpoints are recognised by their literal path.
    pub fn parse(path: &str) -> Self {
        Endpoint::ALL
            .into_iter()
            .find(|endpoint| endpoint.path() == path)
            .map(EndpointKey::Known)
            .unwrap_or_else(|| EndpointKey::Path(OtherPath(path.to_string())))
    }
}

impl From<Endpoint> for EndpointKey {
    fn from(endpoint: Endpoint) -> Self {
        EndpointKey::Known(endpoint)
    }
}

impl From<&str> for EndpointKey {
    fn from(path: &str) -> Self {
        EndpointKey::parse(path)
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointKey::Known(endpoint) => f.write_str(endpoint.path()),
            EndpointKey::Path(path) => f.write_str(path.as_str()),
        }
    }
}

pub type Transform = Box<dyn Fn(Value) -> Result<Value, TransformError> + Send + Sync>;

/// Immutable outbound and inbound transform tables.
pub struct SchemaTranslator {
    outbound: HashMap<EndpointKey, Transform>,
    inbound: HashMap<EndpointKey, Transform>,
}

impl fmt::Debug for SchemaTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaTranslator")
            .field("outbound", &self.outbound.keys().collect::<Vec<_>>())
            .field("inbound", &self.inbound.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Default)]
pub struct SchemaTranslatorBuilder {
    outbound: HashMap<EndpointKey, Transform>,
    inbound: HashMap<EndpointKey, Transform>,
}

impl SchemaTranslatorBuilder {
    pub fn outbound<K, F>(mut self, key: K, transform: F) -> Self
    where
        K: Into<EndpointKey>,
        F: Fn(Value) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        self.outbound.insert(key.into(), Box::new(transform));
        self
    }

    pub fn inbound<K, F>(mut self, key: K, transform: F) -> Self
    where
        K: Into<EndpointKey>,
        F: Fn(Value) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        self.inbound.insert(key.into(), Box::new(transform));
        self
    }

    pub fn build(self) -> SchemaTranslator {
        SchemaTranslator {
            outbound: self.outbound,
            inbound: self.inbound,
        }
    }
}

impl SchemaTranslator {
    pub fn builder() -> SchemaTranslatorBuilder {
        SchemaTranslatorBuilder::default()
    }

    /// Tables for the endpoints the client talks to today.
    pub fn standard(codec: RankCodec) -> Self {
        Self::builder()
            .outbound(Endpoint::Challenges, challenge_to_server)
            .outbound(Endpoint::PlayerChallenge, challenge_to_server)
            .inbound(Endpoint::MeChallenges, move |body| {
                challenges_from_server(&codec, body)
            })
            .inbound(Endpoint::Players, move |body| player_from_server(&codec, body))
            .inbound(Endpoint::MeSettings, settings_from_server)
            .build()
    }

    /// Client body to server body; identity when nothing is registered.
    pub fn translate_outbound(
        &self,
        key: &EndpointKey,
        data: Value,
    ) -> Result<Value, TransformError> {
        match self.outbound.get(key) {
            Some(transform) => {
                trace!("translating outbound body for {key}");
                transform(data)
            }
            None => Ok(data),
        }
    }

    /// Server body to client body; identity when nothing is registered.
    pub fn translate_inbound(
        &self,
        key: &EndpointKey,
        data: Value,
    ) -> Result<Value, TransformError> {
        match self.inbound.get(key) {
            Some(transform) => {
                trace!("translating inbound body for {key}");
                transform(data)
            }
            None => Ok(data),
        }
    }

    /// Translate an inbound body and decode it into a client record.
    pub fn translate_inbound_as<T: DeserializeOwned>(
        &self,
        key: &EndpointKey,
        data: Value,
    ) -> Result<T, CoreError> {
        let translated = self.translate_inbound(key, data)?;
        Ok(serde_json::from_value(translated)?)
    }

    /// Encode a client record and translate it for the server.
    pub fn translate_outbound_from<T: Serialize>(
        &self,
        key: &EndpointKey,
        record: &T,
    ) -> Result<Value, CoreError> {
        let body = serde_json::to_value(record)?;
        Ok(self.translate_outbound(key, body)?)
    }
}

/// Player as the client uses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub rank: Option<Rank>,
}

/// Game part of a challenge the player creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rules: Option<RuleSet>,
    #[serde(default)]
    pub ranked: bool,
    pub width: u32,
    pub height: u32,
    /// Negative means automatic
    #[serde(default)]
    pub handicap: i32,
    #[serde(default)]
    pub komi: Option<f64>,
    #[serde(default)]
    pub rengo: bool,
}

/// A challenge the player created or is about to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeDetails {
    #[serde(default)]
    pub id: Option<u64>,
    pub min_rank: Rank,
    pub max_rank: Rank,
    #[serde(default)]
    pub challenger_color: Option<String>,
    pub game: GameDetails,
}

/// Account settings fields the client cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub challenge_filter: ChallengeFilter,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn translator() -> SchemaTranslator {
        SchemaTranslator::standard(RankCodec::default())
    }

    #[test]
    fn test_unregistered_endpoint_is_identity() {
        let body = json!({ "anything": [1, 2, 3], "ranking": 12 });
        let key = EndpointKey::from("unregistered-endpoint");
        assert_eq!(
            translator().translate_inbound(&key, body.clone()).unwrap(),
            body
        );
        assert_eq!(
            translator().translate_outbound(&key, body.clone()).unwrap(),
            body
        );
    }

    #[test]
    fn test_known_paths_parse_to_endpoints() {
        assert_eq!(
            EndpointKey::parse("players/%%"),
            EndpointKey::Known(Endpoint::Players)
        );
        // Placeholders are literal; a concrete id is a different key
        assert!(matches!(
            EndpointKey::parse("players/123"),
            EndpointKey::Path(path) if path.as_str() == "players/123"
        ));
        assert_eq!(EndpointKey::from(Endpoint::MeSettings).to_string(), "me/settings");
    }

    #[test]
    fn test_known_path_has_one_key() {
        let translator = SchemaTranslator::builder()
            .inbound("me/settings", |_| Ok(json!({ "registered": true })))
            .build();
        let translated = translator
            .translate_inbound(&Endpoint::MeSettings.into(), json!({}))
            .unwrap();
        assert_eq!(translated, json!({ "registered": true }));
        assert_eq!(
            EndpointKey::from("me/settings"),
            EndpointKey::Known(Endpoint::MeSettings)
        );
    }

    #[test]
    fn test_player_gets_structured_rank() {
        let player: Player = translator()
            .translate_inbound_as(
                &Endpoint::Players.into(),
                json!({ "id": 5, "username": "pro", "ranking": 45, "pro": true }),
            )
            .unwrap();
        assert_eq!(player.rank, Some(Rank::Pro(9)));

        let unranked: Player = translator()
            .translate_inbound_as(
                &Endpoint::Players.into(),
                json!({ "id": 6, "username": "new", "rank": "unknown" }),
            )
            .unwrap();
        assert_eq!(unranked.rank, None);
    }

    #[test]
    fn test_outbound_challenge_uses_legacy_numbers() {
        let details = ChallengeDetails {
            id: None,
            min_rank: Rank::Kyu(10),
            max_rank: Rank::Dan(2),
            challenger_color: Some(String::from("automatic")),
            game: GameDetails {
                name: String::from("Friendly Match"),
                rules: Some(RuleSet::Japanese),
                ranked: true,
                width: 19,
                height: 19,
                handicap: 0,
                komi: Some(6.5),
                rengo: false,
            },
        };
        let body = translator()
            .translate_outbound_from(&Endpoint::Challenges.into(), &details)
            .unwrap();
        assert_eq!(body["min_ranking"], json!(20));
        assert_eq!(body["max_ranking"], json!(31));
        assert!(body.get("min_rank").is_none());
        assert_eq!(body["game"]["rules"], json!("japanese"));
    }

    #[test]
    fn test_outbound_sanitizes_string_numbers() {
        let body = json!({
            "min_rank": 5,
            "max_rank": { "type": "Pro", "level": 1 },
            "game": { "width": 9, "height": 9, "handicap": "2", "komi": "0.5" }
        });
        let body = translator()
            .translate_outbound(&Endpoint::PlayerChallenge.into(), body)
            .unwrap();
        assert_eq!(body["min_ranking"], json!(5));
        assert_eq!(body["max_ranking"], json!(37));
        assert_eq!(body["game"]["handicap"], json!(2));
        assert_eq!(body["game"]["komi"], json!(0.5));
    }

    #[test]
    fn test_transform_errors_reach_the_caller() {
        let body = json!({ "min_rank": { "type": "Dan", "level": 0 }, "game": {} });
        let err = translator()
            .translate_outbound(&Endpoint::Challenges.into(), body)
            .unwrap_err();
        assert_eq!(err, TransformError::UnencodableRank(Rank::Dan(0)));

        let failing = SchemaTranslator::builder()
            .inbound("custom/%%", |_| {
                Err(TransformError::UnexpectedShape {
                    field: String::from("body"),
                    reason: String::from("boom"),
                })
            })
            .build();
        let err = failing
            .translate_inbound(&EndpointKey::from("custom/%%"), json!({}))
            .unwrap_err();
        assert!(matches!(err, TransformError::UnexpectedShape { .. }));
    }

    #[test]
    fn test_inbound_challenge_list() {
        let body = json!({
            "count": 1,
            "results": [{
                "id": 77,
                "min_ranking": 0,
                "max_ranking": 36,
                "game": { "width": 13, "height": 13, "handicap": "1", "komi": "" }
            }]
        });
        let body = translator()
            .translate_inbound(&Endpoint::MeChallenges.into(), body)
            .unwrap();
        let challenges: Vec<ChallengeDetails> =
            serde_json::from_value(body["results"].clone()).unwrap();
        assert_eq!(challenges[0].min_rank, Rank::Kyu(30));
        assert_eq!(challenges[0].max_rank, Rank::Dan(7));
        assert_eq!(challenges[0].game.handicap, 1);
        assert_eq!(challenges[0].game.komi, None);
    }

    #[test]
    fn test_old_style_settings_are_nested() {
        let settings: Settings = translator()
            .translate_inbound_as(
                &Endpoint::MeSettings.into(),
                json!({ "show-all-challenges": true, "show-rengo-challenges": false }),
            )
            .unwrap();
        assert!(settings.challenge_filter.show_ineligible);
        assert!(!settings.challenge_filter.show_rengo);
        assert!(settings.challenge_filter.show_19x19);
    }
}
