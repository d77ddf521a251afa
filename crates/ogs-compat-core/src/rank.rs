//! Conversion between legacy ranking numbers and structured ranks
//!
//! The server still speaks the historical single-number encoding:
//! `0..=29` are kyu ranks counted down from 30k, `30..` are dan ranks and the
//! professional band sits above 36. Two incompatible decoders for the
//! professional band exist in the wild, so a [`RankCodec`] is always built
//! for one [`LegacyRankTable`] and call sites pick the one they need.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Legacy value of 30 kyu's "one weaker" reference point.
pub const KYU_REFERENCE: i32 = 30;
/// Legacy value of 1 dan minus one.
pub const DAN_OFFSET: i32 = 29;
/// Legacy value of 1 pro minus one.
pub const PRO_OFFSET: i32 = 36;
/// Offset used by the "big rank" professional encoding.
pub const BIG_PRO_OFFSET: i32 = 1036;
/// Strongest amateur value offered by rank selectors (9 dan).
pub const MAX_SELECTOR_RANK: i32 = 38;

/// A player's strength.
///
/// Serialized as `{"type": "Dan", "level": 3}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "level")]
pub enum Rank {
    Kyu(u32),
    Dan(u32),
    Pro(u32),
}

impl Rank {
    pub fn level(&self) -> u32 {
        match self {
            Rank::Kyu(level) | Rank::Dan(level) | Rank::Pro(level) => *level,
        }
    }

    pub fn is_professional(&self) -> bool {
        matches!(self, Rank::Pro(_))
    }

    /// Levels start at 1 in every band
    pub fn is_valid(&self) -> bool {
        self.level() >= 1
    }

    /// Legacy ranking number for this rank.
    ///
    /// Amateur ranks are measured against the 30 kyu reference, professional
    /// ranks sit on top of [`PRO_OFFSET`]. A level of zero belongs to no band
    /// and yields `None`; callers must treat that as a domain error.
    pub fn encode(&self) -> Option<i32> {
        if !self.is_valid() {
            return None;
        }
        let level = i32::try_from(self.level()).ok()?;
        match self {
            Rank::Kyu(_) => KYU_REFERENCE.checked_sub(level),
            Rank::Dan(_) => KYU_REFERENCE.checked_sub(1 - level),
            Rank::Pro(_) => level.checked_add(PRO_OFFSET),
        }
    }

    pub fn long_label(&self) -> String {
        match self {
            Rank::Kyu(level) => format!("{level} Kyu"),
            Rank::Dan(level) => format!("{level} Dan"),
            Rank::Pro(level) => format!("{level} Pro"),
        }
    }

    fn strength_key(&self) -> (u8, i64) {
        match self {
            Rank::Kyu(level) => (0, -i64::from(*level)),
            Rank::Dan(level) => (1, i64::from(*level)),
            Rank::Pro(level) => (2, i64::from(*level)),
        }
    }
}

/// Ordered by playing strength, weakest first.
impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.strength_key().cmp(&other.strength_key())
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Kyu(level) => write!(f, "{level}k"),
            Rank::Dan(level) => write!(f, "{level}d"),
            Rank::Pro(level) => write!(f, "{level}p"),
        }
    }
}

/// The two legacy decoders for the professional band.
///
/// They disagree for large raw values: `1039` is `1003p` under
/// `ProfessionalFlag` (when flagged) and `3p` under `ProThresholds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyRankTable {
    /// Professional only when the caller says so; pro level is `raw - 36`.
    #[default]
    ProfessionalFlag,
    /// Flag ignored; anything above 36 is professional, and values above
    /// 1036 use the big-rank offset.
    ProThresholds,
}

/// Every shape a rank can arrive in, in resolution priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum RankSource {
    /// An object carrying a structured rank under `rank`
    Wrapped(Rank),
    /// A structured rank on its own
    Structured(Rank),
    /// An object with numeric `ranking` / `rank` fields
    Fields(RankFields),
    /// A bare number
    Number(f64),
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankFields {
    pub ranking: Option<f64>,
    pub rank: Option<f64>,
    pub pro: Option<bool>,
    pub professional: Option<bool>,
}

impl RankFields {
    fn is_professional(&self) -> bool {
        self.pro.unwrap_or(false) || self.professional.unwrap_or(false)
    }

    fn raw(&self) -> Option<f64> {
        self.ranking
            .filter(|v| v.is_finite())
            .or_else(|| self.rank.filter(|v| v.is_finite()))
    }
}

impl RankSource {
    /// Classify an arbitrary JSON payload.
    ///
    /// The first matching shape wins: nested structured rank, structured
    /// rank, numeric `ranking`/`rank` fields, then the value as a number.
    pub fn from_value(value: &Value) -> RankSource {
        if let Some(rank) = value
            .get("rank")
            .and_then(|nested| Rank::deserialize(nested).ok())
        {
            return RankSource::Wrapped(rank);
        }
        if let Ok(rank) = Rank::deserialize(value) {
            return RankSource::Structured(rank);
        }
        if let Value::Object(map) = value {
            let fields = RankFields {
                ranking: map.get("ranking").and_then(number_like),
                rank: map.get("rank").and_then(number_like),
                pro: map.get("pro").and_then(flag_like),
                professional: map.get("professional").and_then(flag_like),
            };
            if fields.ranking.is_some() || fields.rank.is_some() {
                return RankSource::Fields(fields);
            }
            return RankSource::Unknown;
        }
        match number_like(value) {
            Some(number) => RankSource::Number(number),
            None => RankSource::Unknown,
        }
    }
}

impl From<f64> for RankSource {
    fn from(value: f64) -> Self {
        RankSource::Number(value)
    }
}

impl From<Rank> for RankSource {
    fn from(rank: Rank) -> Self {
        RankSource::Structured(rank)
    }
}

impl From<&Value> for RankSource {
    fn from(value: &Value) -> Self {
        RankSource::from_value(value)
    }
}

fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn flag_like(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        _ => None,
    }
}

/// Clamp a computed band level so the `level >= 1` invariant always holds.
fn band_level(value: f64) -> u32 {
    if value >= 1.0 {
        value.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

fn decode_amateur(raw: f64) -> Rank {
    if raw < f64::from(KYU_REFERENCE) {
        Rank::Kyu(band_level((f64::from(KYU_REFERENCE) - raw).ceil()))
    } else {
        Rank::Dan(band_level((raw - f64::from(DAN_OFFSET)).floor()))
    }
}

/// Legacy rank decoding and display bound to one [`LegacyRankTable`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankCodec {
    table: LegacyRankTable,
}

impl RankCodec {
    pub fn new(table: LegacyRankTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> LegacyRankTable {
        self.table
    }

    /// Decode a legacy ranking number. Never fails.
    ///
    /// Fractions truncate per band: kyu levels round the remainder up, dan
    /// and pro levels round down.
    pub fn decode(&self, raw: f64, professional: bool) -> Rank {
        match self.table {
            LegacyRankTable::ProfessionalFlag => {
                if professional {
                    Rank::Pro(band_level((raw - f64::from(PRO_OFFSET)).floor()))
                } else {
                    decode_amateur(raw)
                }
            }
            LegacyRankTable::ProThresholds => {
                if raw > f64::from(BIG_PRO_OFFSET) {
                    Rank::Pro(band_level((raw - f64::from(BIG_PRO_OFFSET)).floor()))
                } else if raw > f64::from(PRO_OFFSET) {
                    Rank::Pro(band_level((raw - f64::from(PRO_OFFSET)).floor()))
                } else {
                    decode_amateur(raw)
                }
            }
        }
    }

    pub fn resolve(&self, source: &RankSource) -> Option<Rank> {
        match source {
            RankSource::Wrapped(rank) | RankSource::Structured(rank) => {
                Some(*rank).filter(Rank::is_valid)
            }
            RankSource::Fields(fields) => fields
                .raw()
                .map(|raw| self.decode(raw, fields.is_professional())),
            RankSource::Number(raw) if raw.is_finite() => Some(self.decode(*raw, false)),
            RankSource::Number(_) | RankSource::Unknown => None,
        }
    }

    pub fn resolve_value(&self, value: &Value) -> Option<Rank> {
        self.resolve(&RankSource::from_value(value))
    }

    /// `"5k"`, `"3d"`, `"1p"`, or `"?"` when nothing resolves
    pub fn short_label(&self, source: &RankSource) -> String {
        self.resolve(source)
            .map(|rank| rank.to_string())
            .unwrap_or_else(|| String::from("?"))
    }

    /// `"5 Kyu"`, `"3 Dan"`, `"1 Pro"`, or `"?"` when nothing resolves
    pub fn long_label(&self, source: &RankSource) -> String {
        self.resolve(source)
            .map(|rank| rank.long_label())
            .unwrap_or_else(|| String::from("?"))
    }

    /// Amateur label with one decimal, e.g. `"3.5d"` or `"6.3k"`.
    pub fn precise_label(&self, raw: f64, professional: bool) -> String {
        if !raw.is_finite() {
            return String::from("?");
        }
        match self.decode(raw, professional) {
            rank @ Rank::Pro(_) => rank.to_string(),
            Rank::Kyu(_) => format!("{:.1}k", f64::from(KYU_REFERENCE) - raw),
            Rank::Dan(_) => format!("{:.1}d", raw - f64::from(DAN_OFFSET)),
        }
    }

    /// Long label keeping the fraction of a raw value, e.g. `"3.5 Dan"`.
    /// Whole values read like [`Rank::long_label`].
    pub fn precise_long_label(&self, raw: f64, professional: bool) -> String {
        if !raw.is_finite() {
            return String::from("?");
        }
        match self.decode(raw, professional) {
            rank @ Rank::Pro(_) => rank.long_label(),
            Rank::Kyu(_) => format!("{} Kyu", one_decimal(f64::from(KYU_REFERENCE) - raw)),
            Rank::Dan(_) => format!("{} Dan", one_decimal(raw - f64::from(DAN_OFFSET))),
        }
    }
}

fn one_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

/// One option of a rank selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub rank: i32,
    pub label: String,
}

/// Amateur selector entries for legacy values `min..=max`.
///
/// With `with_plus` the strongest entry reads as open ended ("2 Dan+").
pub fn rank_list(min: i32, max: i32, with_plus: bool) -> Vec<RankEntry> {
    let codec = RankCodec::default();
    let mut entries: Vec<RankEntry> = (min..=max)
        .map(|rank| RankEntry {
            rank,
            label: codec.decode(f64::from(rank), false).long_label(),
        })
        .collect();
    if with_plus {
        if let Some(last) = entries.last_mut() {
            last.label.push('+');
        }
    }
    entries
}

/// `1 Pro` through `9 Pro`, valued from 37 or, with `big_ranks`, from 1037.
pub fn pro_rank_list(big_ranks: bool) -> Vec<RankEntry> {
    let offset = if big_ranks { BIG_PRO_OFFSET } else { PRO_OFFSET };
    (1..=9)
        .map(|level| RankEntry {
            rank: offset + level,
            label: format!("{level} Pro"),
        })
        .collect()
}

/// Ranks a player may pick for themselves: 25 kyu to "9 Dan+".
pub fn amateur_ranks() -> Vec<RankEntry> {
    rank_list(5, MAX_SELECTOR_RANK, true)
}

pub fn all_ranks() -> Vec<RankEntry> {
    let mut ranks = rank_list(0, MAX_SELECTOR_RANK, false);
    ranks.extend(pro_rank_list(true));
    ranks
}

/// Label of a raw selector value as shown in challenge descriptions.
pub fn rank_selector_label(value: i32) -> Option<String> {
    all_ranks()
        .into_iter()
        .find(|entry| entry.rank == value)
        .map(|entry| entry.label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kyu_band_round_trips() {
        let codec = RankCodec::default();
        for v in 1..=29 {
            let rank = codec.decode(f64::from(v), false);
            assert_eq!(rank, Rank::Kyu((30 - v) as u32));
            assert_eq!(rank.encode(), Some(v));
        }
    }

    #[test]
    fn test_dan_band_round_trips() {
        let codec = RankCodec::default();
        for v in 30..=36 {
            let rank = codec.decode(f64::from(v), false);
            assert_eq!(rank, Rank::Dan((v - 29) as u32));
            assert_eq!(rank.encode(), Some(v));
        }
    }

    #[test]
    fn test_professional_flag_decodes_pro_band() {
        let codec = RankCodec::new(LegacyRankTable::ProfessionalFlag);
        for v in 37..=60 {
            let rank = codec.decode(f64::from(v), true);
            assert_eq!(rank, Rank::Pro((v - 36) as u32));
            assert_eq!(rank.encode(), Some(v));
        }
        // Without the flag high values stay amateur
        assert_eq!(codec.decode(40.0, false), Rank::Dan(11));
    }

    #[test]
    fn test_threshold_table_ignores_flag() {
        let codec = RankCodec::new(LegacyRankTable::ProThresholds);
        assert_eq!(codec.decode(45.0, false), Rank::Pro(9));
        assert_eq!(codec.decode(1039.0, false), Rank::Pro(3));
        assert_eq!(codec.decode(1039.0, true), Rank::Pro(3));
        assert_eq!(codec.decode(36.0, true), Rank::Dan(7));

        // The two tables disagree on big ranks
        let flagged = RankCodec::new(LegacyRankTable::ProfessionalFlag);
        assert_eq!(flagged.decode(1039.0, true), Rank::Pro(1003));
    }

    #[test]
    fn test_fractional_values_truncate_per_band() {
        let codec = RankCodec::default();
        assert_eq!(codec.decode(23.7, false), Rank::Kyu(7));
        assert_eq!(codec.decode(29.5, false), Rank::Kyu(1));
        assert_eq!(codec.decode(32.5, false), Rank::Dan(3));
        assert_eq!(codec.decode(37.9, true), Rank::Pro(1));
    }

    #[test]
    fn test_levels_never_drop_below_one() {
        let codec = RankCodec::default();
        assert_eq!(codec.decode(30.0, true), Rank::Pro(1));
        assert_eq!(codec.decode(f64::NAN, true), Rank::Pro(1));
    }

    #[test]
    fn test_encode_rejects_level_zero() {
        assert_eq!(Rank::Dan(0).encode(), None);
        assert_eq!(Rank::Pro(0).encode(), None);
        assert_eq!(Rank::Pro(1).encode(), Some(37));
    }

    #[test]
    fn test_nested_rank_takes_precedence() {
        let codec = RankCodec::default();
        let value = json!({ "rank": { "type": "Dan", "level": 3 }, "ranking": 10 });
        assert_eq!(
            RankSource::from_value(&value),
            RankSource::Wrapped(Rank::Dan(3))
        );
        assert_eq!(codec.resolve_value(&value), Some(Rank::Dan(3)));
    }

    #[test]
    fn test_resolution_order_for_numeric_fields() {
        let codec = RankCodec::default();
        assert_eq!(
            codec.resolve_value(&json!({ "type": "Kyu", "level": 4 })),
            Some(Rank::Kyu(4))
        );
        assert_eq!(
            codec.resolve_value(&json!({ "ranking": 23.7, "rank": 31 })),
            Some(Rank::Kyu(7))
        );
        assert_eq!(
            codec.resolve_value(&json!({ "ranking": "n/a", "rank": 31 })),
            Some(Rank::Dan(2))
        );
        assert_eq!(
            codec.resolve_value(&json!({ "pro": true, "ranking": 45 })),
            Some(Rank::Pro(9))
        );
        assert_eq!(
            codec.resolve_value(&json!({ "professional": 1, "rank": 38 })),
            Some(Rank::Pro(2))
        );
        assert_eq!(codec.resolve_value(&json!("32.5")), Some(Rank::Dan(3)));
        assert_eq!(codec.resolve_value(&json!(12)), Some(Rank::Kyu(18)));
    }

    #[test]
    fn test_unresolvable_input_degrades_to_question_mark() {
        let codec = RankCodec::default();
        for value in [
            json!(null),
            json!({}),
            json!({ "username": "someone" }),
            json!("strong"),
            json!([1, 2, 3]),
            json!({ "rank": { "type": "Dan", "level": 0 } }),
        ] {
            let source = RankSource::from_value(&value);
            assert_eq!(codec.short_label(&source), "?");
            assert_eq!(codec.long_label(&source), "?");
        }
        assert_eq!(codec.short_label(&RankSource::Number(f64::INFINITY)), "?");
    }

    #[test]
    fn test_labels() {
        let codec = RankCodec::new(LegacyRankTable::ProThresholds);
        assert_eq!(codec.short_label(&25.0.into()), "5k");
        assert_eq!(codec.short_label(&1039.0.into()), "3p");
        assert_eq!(codec.long_label(&1039.0.into()), "3 Pro");
        assert_eq!(codec.long_label(&Rank::Dan(3).into()), "3 Dan");
        assert_eq!(codec.precise_label(32.5, false), "3.5d");
        assert_eq!(codec.precise_label(23.7, false), "6.3k");
        assert_eq!(codec.precise_label(40.0, false), "4p");
    }

    #[test]
    fn test_precise_long_labels() {
        let codec = RankCodec::new(LegacyRankTable::ProThresholds);
        assert_eq!(codec.precise_long_label(32.5, false), "3.5 Dan");
        assert_eq!(codec.precise_long_label(32.0, false), "3 Dan");
        assert_eq!(codec.precise_long_label(23.7, false), "6.3 Kyu");
        assert_eq!(codec.precise_long_label(1039.0, false), "3 Pro");
        assert_eq!(codec.precise_long_label(f64::NAN, false), "?");
    }

    #[test]
    fn test_ordering_follows_strength() {
        let mut ranks = vec![Rank::Dan(2), Rank::Pro(1), Rank::Kyu(1), Rank::Kyu(12)];
        ranks.sort();
        assert_eq!(
            ranks,
            vec![Rank::Kyu(12), Rank::Kyu(1), Rank::Dan(2), Rank::Pro(1)]
        );
    }

    #[test]
    fn test_serde_shape() {
        let value = serde_json::to_value(Rank::Pro(4)).unwrap();
        assert_eq!(value, json!({ "type": "Pro", "level": 4 }));
    }

    #[test]
    fn test_rank_lists() {
        assert_eq!(
            rank_list(27, 31, true),
            vec![
                RankEntry { rank: 27, label: "3 Kyu".into() },
                RankEntry { rank: 28, label: "2 Kyu".into() },
                RankEntry { rank: 29, label: "1 Kyu".into() },
                RankEntry { rank: 30, label: "1 Dan".into() },
                RankEntry { rank: 31, label: "2 Dan+".into() },
            ]
        );
        assert_eq!(rank_list(0, MAX_SELECTOR_RANK, false).len(), 39);

        let pros = pro_rank_list(false);
        assert_eq!(pros.len(), 9);
        assert_eq!(pros[0], RankEntry { rank: 37, label: "1 Pro".into() });
        assert_eq!(pro_rank_list(true)[8].rank, 1045);

        let amateur = amateur_ranks();
        assert_eq!(amateur.len(), 34);
        assert_eq!(amateur[0].label, "25 Kyu");
        assert_eq!(amateur[33].label, "9 Dan+");

        let all = all_ranks();
        assert_eq!(all.len(), 48);
        assert_eq!(all[0].label, "30 Kyu");
        assert_eq!(all[30].label, "1 Dan");
        assert_eq!(all[47].label, "9 Pro");

        assert_eq!(rank_selector_label(1040).as_deref(), Some("4 Pro"));
        assert_eq!(rank_selector_label(-1000), None);
    }
}
