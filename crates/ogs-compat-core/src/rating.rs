//! Glicko rating to rank conversions used next to the rank codec

use serde::{Deserialize, Serialize};

use crate::{Rank, RankCodec, RankFields, RankSource};

/// Weakest legacy rank the ladder distinguishes (25 kyu).
pub const MIN_RANK: f64 = 5.0;
/// Strongest amateur legacy rank the ladder distinguishes (9 dan).
pub const MAX_RANK: f64 = 38.0;
/// Deviation at or above which a rating is still provisional.
pub const PROVISIONAL_RATING_CUTOFF: f64 = 160.0;

const RATING_BASE: f64 = 525.0;
const RATING_SCALE: f64 = 23.15;

pub fn rank_to_rating(rank: f64) -> f64 {
    RATING_BASE * (rank / RATING_SCALE).exp()
}

pub fn rating_to_rank(rating: f64) -> f64 {
    (rating / RATING_BASE).ln() * RATING_SCALE
}

/// Width of one deviation expressed in ranks
pub fn rank_deviation(rating: f64, deviation: f64) -> f64 {
    rating_to_rank(rating + deviation) - rating_to_rank(rating)
}

pub fn humble_rating(rating: f64, deviation: f64) -> f64 {
    rating - deviation
}

pub fn is_rank_bounded(rank: f64) -> bool {
    !(MIN_RANK..=MAX_RANK).contains(&rank)
}

pub fn bounded_rank(rank: f64) -> f64 {
    rank.clamp(MIN_RANK, MAX_RANK)
}

/// [`bounded_rank`] for structured ranks: 25 kyu to 9 dan.
pub fn bounded(rank: Rank) -> Rank {
    let codec = RankCodec::default();
    rank.clamp(codec.decode(MIN_RANK, false), codec.decode(MAX_RANK, false))
}

pub fn is_novice(rank: f64) -> bool {
    rank < MIN_RANK
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlickoEntry {
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
}

impl Default for GlickoEntry {
    fn default() -> Self {
        Self {
            rating: 1500.0,
            deviation: 350.0,
            volatility: 0.06,
        }
    }
}

impl GlickoEntry {
    pub fn is_provisional(&self) -> bool {
        self.deviation >= PROVISIONAL_RATING_CUTOFF
    }

    pub fn rank(&self) -> f64 {
        rating_to_rank(self.rating)
    }

    /// Rank interval one deviation either side of the rating
    pub fn rank_interval(&self) -> (f64, f64) {
        let rank = self.rank();
        let spread = rank_deviation(self.rating, self.deviation);
        (rank - spread, rank + spread)
    }
}

/// The parts of a user record that decide how their rank is shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRanking {
    #[serde(default)]
    pub ranking: Option<f64>,
    #[serde(default)]
    pub pro: bool,
    #[serde(default)]
    pub overall: Option<GlickoEntry>,
}

impl UserRanking {
    /// No overall rating yet counts as provisional.
    pub fn is_provisional(&self) -> bool {
        self.overall.map_or(true, |entry| entry.is_provisional())
    }

    /// Rank derived from the overall rating; professionals use `ranking`.
    pub fn rank(&self, codec: &RankCodec) -> Option<Rank> {
        if self.pro {
            let fields = RankFields {
                ranking: self.ranking,
                pro: Some(true),
                ..Default::default()
            };
            return codec.resolve(&RankSource::Fields(fields));
        }
        match self.overall {
            Some(entry) if !entry.is_provisional() => {
                codec.resolve(&RankSource::Number(entry.rank()))
            }
            _ => None,
        }
    }

    /// Short rank label, `"?"` while the rating is provisional.
    pub fn label(&self, codec: &RankCodec) -> String {
        self.rank(codec)
            .map(|rank| rank.to_string())
            .unwrap_or_else(|| String::from("?"))
    }
}
