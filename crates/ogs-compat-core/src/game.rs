//! Game settings helpers: speed classes, rule sets and bot rejections

use serde::{Deserialize, Serialize};

/// Seconds per move above which a game counts as correspondence
pub const CORRESPONDENCE_THRESHOLD_SECS: f64 = 3600.0;
/// Seconds per move below which a game counts as blitz
pub const BLITZ_THRESHOLD_SECS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameSpeed {
    Blitz,
    Live,
    Correspondence,
}

impl GameSpeed {
    /// Classify by average time per move; zero means no time limit.
    pub fn from_time_per_move(seconds: f64) -> Self {
        if seconds == 0.0 || seconds > CORRESPONDENCE_THRESHOLD_SECS {
            GameSpeed::Correspondence
        } else if seconds < BLITZ_THRESHOLD_SECS {
            GameSpeed::Blitz
        } else {
            GameSpeed::Live
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, GameSpeed::Blitz | GameSpeed::Live)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSet {
    Japanese,
    Chinese,
    Aga,
    Korean,
    Nz,
    Ing,
}

impl RuleSet {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "japanese" => Some(RuleSet::Japanese),
            "chinese" => Some(RuleSet::Chinese),
            "aga" => Some(RuleSet::Aga),
            "korean" => Some(RuleSet::Korean),
            "nz" => Some(RuleSet::Nz),
            "ing" => Some(RuleSet::Ing),
            _ => None,
        }
    }
}

pub fn default_komi(rules: RuleSet, has_handicap: bool) -> f64 {
    match (rules, has_handicap) {
        (RuleSet::Japanese | RuleSet::Korean, false) => 6.5,
        (RuleSet::Chinese | RuleSet::Aga | RuleSet::Ing, false) => 7.5,
        (RuleSet::Nz, false) => 7.0,
        (RuleSet::Nz, true) => 0.0,
        (_, true) => 0.5,
    }
}

/// Reasons a bot may give for turning a challenge down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionCode {
    Blacklisted,
    BoardSizeNotSquare,
    BoardSizeNotAllowed,
    HandicapNotAllowed,
    UnrankedNotAllowed,
    RankedNotAllowed,
    BlitzNotAllowed,
    TooManyBlitzGames,
    LiveNotAllowed,
    TooManyLiveGames,
    CorrespondenceNotAllowed,
    TooManyCorrespondenceGames,
    TimeControlSystemNotAllowed,
    TimeIncrementOutOfRange,
    PeriodTimeOutOfRange,
    PeriodsOutOfRange,
    MainTimeOutOfRange,
    MaxTimeOutOfRange,
    PerMoveTimeOutOfRange,
    PlayerRankOutOfRange,
    NotAcceptingNewChallenges,
    TooManyGamesForPlayer,
    KomiOutOfRange,
    #[serde(other)]
    Unknown,
}

impl RejectionCode {
    /// Message shown to the challenger, `None` for codes we don't know.
    pub fn message(&self) -> Option<&'static str> {
        let message = match self {
            RejectionCode::Blacklisted => {
                "The operator of this bot will not let you play against it."
            }
            RejectionCode::BoardSizeNotSquare => "This bot only plays on square boards",
            RejectionCode::BoardSizeNotAllowed => {
                "The selected board size is not supported by this bot"
            }
            RejectionCode::HandicapNotAllowed => "Handicap games are not allowed against this bot",
            RejectionCode::UnrankedNotAllowed => "Unranked games are not allowed against this bot",
            RejectionCode::RankedNotAllowed => "Ranked games are not allowed against this bot",
            RejectionCode::BlitzNotAllowed => "Blitz games are not allowed against this bot",
            RejectionCode::TooManyBlitzGames => {
                "Too many blitz games are being played by this bot right now, please try again later."
            }
            RejectionCode::LiveNotAllowed => "Live games are not allowed against this bot",
            RejectionCode::TooManyLiveGames => {
                "Too many live games are being played by this bot right now, please try again later."
            }
            RejectionCode::CorrespondenceNotAllowed => {
                "Correspondence games are not allowed against this bot"
            }
            RejectionCode::TooManyCorrespondenceGames => {
                "Too many correspondence games are being played by this bot right now, please try again later."
            }
            RejectionCode::TimeControlSystemNotAllowed => {
                "The provided time control system is not supported by this bot"
            }
            RejectionCode::TimeIncrementOutOfRange => {
                "The time increment is out of the acceptable range allowed by this bot"
            }
            RejectionCode::PeriodTimeOutOfRange => {
                "The period time is out of the acceptable range allowed by this bot"
            }
            RejectionCode::PeriodsOutOfRange => {
                "The number of periods is out of the acceptable range allowed by this bot"
            }
            RejectionCode::MainTimeOutOfRange => {
                "The main time is out of the acceptable range allowed by this bot"
            }
            RejectionCode::MaxTimeOutOfRange => {
                "The max time is out of the acceptable range allowed by this bot"
            }
            RejectionCode::PerMoveTimeOutOfRange => {
                "The per move time is out the acceptable range allowed by this bot"
            }
            RejectionCode::PlayerRankOutOfRange => {
                "Your rank is too high or low to play against this bot"
            }
            RejectionCode::NotAcceptingNewChallenges => {
                "This bot is not accepting new games at this time"
            }
            RejectionCode::TooManyGamesForPlayer => {
                "You are already playing against this bot, please end your other game before starting a new one"
            }
            RejectionCode::KomiOutOfRange => {
                "Komi is out of the acceptable range allowed by this bot"
            }
            RejectionCode::Unknown => return None,
        };
        Some(message)
    }
}
