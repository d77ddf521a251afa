//! Seek graph challenges and the visibility filter applied to them

use std::cmp::Ordering;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{bounded, GameSpeed, Rank, RankCodec, RankFields, RankSource};

/// Challenge as published on the seek graph, legacy numbers and all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeekGraphChallenge {
    pub challenge_id: u64,
    pub user_id: u64,
    pub username: String,
    #[serde(default)]
    pub rank: Option<f64>,
    #[serde(default)]
    pub ranking: Option<f64>,
    #[serde(default)]
    pub pro: Option<bool>,
    #[serde(default)]
    pub professional: Option<bool>,
    pub min_rank: f64,
    pub max_rank: f64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub handicap: i32,
    #[serde(default)]
    pub ranked: bool,
    #[serde(default)]
    pub rengo: bool,
    #[serde(default)]
    pub rengo_participants: Vec<u64>,
    /// Average seconds per move, 0 for no time limit
    #[serde(default)]
    pub time_per_move: f64,
}

/// The player looking at the seek graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewer {
    pub id: u64,
    pub anonymous: bool,
    pub rank: Rank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "rank", rename_all = "snake_case")]
pub enum IneligibleReason {
    NotLoggedIn,
    OwnChallenge,
    MinRank(Rank),
    MaxRank(Rank),
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IneligibleReason::NotLoggedIn => write!(f, "Not logged in"),
            IneligibleReason::OwnChallenge => write!(f, "This is your challenge"),
            IneligibleReason::MinRank(rank) => write!(f, "min. rank: {rank}"),
            IneligibleReason::MaxRank(rank) => write!(f, "max. rank: {rank}"),
        }
    }
}

/// Read-only client projection of an open challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub challenge_id: u64,
    pub user_id: u64,
    pub username: String,
    /// Host rank, when the server sent one
    pub rank: Option<Rank>,
    pub min_rank: Rank,
    pub max_rank: Rank,
    pub width: u32,
    pub height: u32,
    pub handicap: i32,
    pub ranked: bool,
    pub rengo: bool,
    #[serde(default)]
    pub time_per_move: f64,
    pub eligible: bool,
    /// Posted by the viewer
    pub user_challenge: bool,
    #[serde(default)]
    pub joined_rengo: bool,
    #[serde(default)]
    pub ineligible_reason: Option<IneligibleReason>,
}

impl Challenge {
    /// Project a seek graph message for `viewer`, deciding eligibility.
    pub fn from_seek(message: &SeekGraphChallenge, viewer: &Viewer, codec: &RankCodec) -> Self {
        // `rank` and `pro` are the newer field names and win when both are sent
        let host = RankFields {
            ranking: message.rank.or(message.ranking),
            rank: None,
            pro: message.pro.or(message.professional),
            professional: None,
        };
        let rank = codec.resolve(&RankSource::Fields(host));
        let min_rank = codec.decode(message.min_rank, false);
        let max_rank = codec.decode(message.max_rank, false);
        // Players outside the ladder are matched as 25k or 9d
        let viewer_rank = bounded(viewer.rank);

        let (eligible, user_challenge, ineligible_reason) = if viewer.anonymous {
            (false, false, Some(IneligibleReason::NotLoggedIn))
        } else if message.user_id == viewer.id {
            (false, true, Some(IneligibleReason::OwnChallenge))
        } else if min_rank <= viewer_rank && viewer_rank <= max_rank {
            (true, false, None)
        } else if min_rank > viewer_rank {
            (false, false, Some(IneligibleReason::MinRank(min_rank)))
        } else {
            (false, false, Some(IneligibleReason::MaxRank(max_rank)))
        };

        if let Some(reason) = &ineligible_reason {
            debug!(
                "challenge {} not open to viewer {}: {}",
                message.challenge_id, viewer.id, reason
            );
        }

        Challenge {
            challenge_id: message.challenge_id,
            user_id: message.user_id,
            username: message.username.clone(),
            rank,
            min_rank,
            max_rank,
            width: message.width,
            height: message.height,
            handicap: message.handicap,
            ranked: message.ranked,
            rengo: message.rengo,
            time_per_move: message.time_per_move,
            eligible,
            user_challenge,
            joined_rengo: message.rengo && message.rengo_participants.contains(&viewer.id),
            ineligible_reason,
        }
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    pub fn speed(&self) -> GameSpeed {
        GameSpeed::from_time_per_move(self.time_per_move)
    }
}

/// Most relevant challenges first: own, eligible, ranked, then oldest id.
pub fn priority_cmp(a: &Challenge, b: &Challenge) -> Ordering {
    b.user_challenge
        .cmp(&a.user_challenge)
        .then_with(|| b.eligible.cmp(&a.eligible))
        .then_with(|| b.ranked.cmp(&a.ranked))
        .then_with(|| a.challenge_id.cmp(&b.challenge_id))
}

/// Order of the live and correspondence lists: eligible, own, host name,
/// ranked, then oldest id.
pub fn list_cmp(a: &Challenge, b: &Challenge) -> Ordering {
    b.eligible
        .cmp(&a.eligible)
        .then_with(|| b.user_challenge.cmp(&a.user_challenge))
        .then_with(|| a.username.to_lowercase().cmp(&b.username.to_lowercase()))
        .then_with(|| b.ranked.cmp(&a.ranked))
        .then_with(|| a.challenge_id.cmp(&b.challenge_id))
}

/// Order of the rengo list: fastest first, then eligible, own, oldest id.
pub fn time_per_move_cmp(a: &Challenge, b: &Challenge) -> Ordering {
    a.time_per_move
        .total_cmp(&b.time_per_move)
        .then_with(|| b.eligible.cmp(&a.eligible))
        .then_with(|| b.user_challenge.cmp(&a.user_challenge))
        .then_with(|| a.challenge_id.cmp(&b.challenge_id))
}

/// Which challenges the player wants to see.
///
/// Field names on the wire match the preference form (`show19x19`,
/// `showOtherSizes`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeFilter {
    pub show_19x19: bool,
    pub show_13x13: bool,
    pub show_9x9: bool,
    pub show_other_sizes: bool,
    pub show_ranked: bool,
    pub show_unranked: bool,
    pub show_rengo: bool,
    pub show_handicap: bool,
    pub show_ineligible: bool,
}

/// Same values as the stored preference defaults: everything except
/// ineligible challenges.
impl Default for ChallengeFilter {
    fn default() -> Self {
        Self {
            show_ineligible: false,
            ..Self::show_all()
        }
    }
}

impl ChallengeFilter {
    /// Anonymous visitors see everything
    pub fn show_all() -> Self {
        Self {
            show_19x19: true,
            show_13x13: true,
            show_9x9: true,
            show_other_sizes: true,
            show_ranked: true,
            show_unranked: true,
            show_rengo: true,
            show_handicap: true,
            show_ineligible: true,
        }
    }

    /// Build from stored preferences; missing names keep their default.
    pub fn from_preferences<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<bool>,
    {
        let mut filter = Self::default();
        for key in ChallengeFilterKey::ALL {
            if let Some(value) = lookup(key.preference_name()) {
                filter.set(key, value);
            }
        }
        filter
    }

    pub fn get(&self, key: ChallengeFilterKey) -> bool {
        match key {
            ChallengeFilterKey::Show19x19 => self.show_19x19,
            ChallengeFilterKey::Show13x13 => self.show_13x13,
            ChallengeFilterKey::Show9x9 => self.show_9x9,
            ChallengeFilterKey::ShowOtherSizes => self.show_other_sizes,
            ChallengeFilterKey::ShowRanked => self.show_ranked,
            ChallengeFilterKey::ShowUnranked => self.show_unranked,
            ChallengeFilterKey::ShowRengo => self.show_rengo,
            ChallengeFilterKey::ShowHandicap => self.show_handicap,
            ChallengeFilterKey::ShowIneligible => self.show_ineligible,
        }
    }

    pub fn set(&mut self, key: ChallengeFilterKey, value: bool) {
        let slot = match key {
            ChallengeFilterKey::Show19x19 => &mut self.show_19x19,
            ChallengeFilterKey::Show13x13 => &mut self.show_13x13,
            ChallengeFilterKey::Show9x9 => &mut self.show_9x9,
            ChallengeFilterKey::ShowOtherSizes => &mut self.show_other_sizes,
            ChallengeFilterKey::ShowRanked => &mut self.show_ranked,
            ChallengeFilterKey::ShowUnranked => &mut self.show_unranked,
            ChallengeFilterKey::ShowRengo => &mut self.show_rengo,
            ChallengeFilterKey::ShowHandicap => &mut self.show_handicap,
            ChallengeFilterKey::ShowIneligible => &mut self.show_ineligible,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChallengeFilterKey {
    Show19x19,
    Show13x13,
    Show9x9,
    ShowOtherSizes,
    ShowRanked,
    ShowUnranked,
    ShowRengo,
    ShowHandicap,
    ShowIneligible,
}

impl ChallengeFilterKey {
    pub const ALL: [ChallengeFilterKey; 9] = [
        ChallengeFilterKey::ShowIneligible,
        ChallengeFilterKey::ShowRanked,
        ChallengeFilterKey::ShowUnranked,
        ChallengeFilterKey::Show19x19,
        ChallengeFilterKey::Show13x13,
        ChallengeFilterKey::Show9x9,
        ChallengeFilterKey::ShowOtherSizes,
        ChallengeFilterKey::ShowRengo,
        ChallengeFilterKey::ShowHandicap,
    ];

    /// Name of the persisted preference backing this toggle
    pub fn preference_name(&self) -> &'static str {
        match self {
            ChallengeFilterKey::ShowIneligible => "show-all-challenges",
            ChallengeFilterKey::ShowRanked => "show-ranked-challenges",
            ChallengeFilterKey::ShowUnranked => "show-unranked-challenges",
            ChallengeFilterKey::Show19x19 => "show-19x19-challenges",
            ChallengeFilterKey::Show13x13 => "show-13x13-challenges",
            ChallengeFilterKey::Show9x9 => "show-9x9-challenges",
            ChallengeFilterKey::ShowOtherSizes => "show-other-boardsize-challenges",
            ChallengeFilterKey::ShowRengo => "show-rengo-challenges",
            ChallengeFilterKey::ShowHandicap => "show-handicap-challenges",
        }
    }

    pub fn from_preference_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.preference_name() == name)
    }
}

/// Whether `challenge` belongs in the lists and graph under `filter`.
///
/// Own challenges are always shown. Everything else must pass the size,
/// ranked status, handicap and eligibility tests.
pub fn should_display(challenge: &Challenge, filter: &ChallengeFilter) -> bool {
    if challenge.user_challenge {
        return true;
    }

    let common_square = challenge.is_square() && matches!(challenge.width, 9 | 13 | 19);
    let size_match = (challenge.is_square() && challenge.width == 19 && filter.show_19x19)
        || (challenge.is_square() && challenge.width == 13 && filter.show_13x13)
        || (challenge.is_square() && challenge.width == 9 && filter.show_9x9)
        || (filter.show_other_sizes && !common_square);

    // A ranked rengo challenge passes through either of the last two arms
    let ranked_match = (!challenge.ranked && !challenge.rengo && filter.show_unranked)
        || (challenge.ranked && filter.show_ranked)
        || (challenge.rengo && filter.show_rengo);

    let handicap_match = filter.show_handicap || challenge.handicap == 0;
    let eligibility_match = challenge.eligible || filter.show_ineligible;

    size_match && ranked_match && handicap_match && eligibility_match
}
