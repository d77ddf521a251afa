use itertools::Itertools;
use log::{debug, warn};
use ogs_compat_core::{
    list_cmp, should_display, time_per_move_cmp, Challenge, ChallengeFilter, RankCodec,
    SeekGraphChallenge, Viewer,
};
use serde_json::Value;
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to read feed {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse feed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Feed must be a JSON array of seek graph messages")]
    NotAList,
}

/// Open challenges left after replaying a seek graph message log.
///
/// `{"challenge_id": n, "delete": 1}` removes an earlier challenge, game
/// start notices are ignored and a repeated id replaces the earlier entry.
#[derive(Debug, Clone, Default)]
pub struct SeekFeed {
    challenges: Vec<SeekGraphChallenge>,
}

impl SeekFeed {
    pub fn load(path: &Path) -> Result<Self, FeedError> {
        let text = fs::read_to_string(path).map_err(|source| FeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, FeedError> {
        let Value::Array(messages) = serde_json::from_str::<Value>(text)? else {
            return Err(FeedError::NotAList);
        };

        let mut feed = SeekFeed::default();
        for message in messages {
            feed.apply(message);
        }
        Ok(feed)
    }

    fn apply(&mut self, message: Value) {
        if message.get("game_started").is_some() {
            return;
        }
        if message.get("delete").is_some() {
            if let Some(id) = message.get("challenge_id").and_then(Value::as_u64) {
                self.challenges.retain(|c| c.challenge_id != id);
            }
            return;
        }
        match serde_json::from_value::<SeekGraphChallenge>(message) {
            Ok(challenge) => {
                self.challenges
                    .retain(|c| c.challenge_id != challenge.challenge_id);
                self.challenges.push(challenge);
            }
            Err(e) => warn!("skipping malformed seek graph message: {}", e),
        }
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    pub fn annotate(&self, viewer: &Viewer, codec: &RankCodec) -> Vec<Challenge> {
        self.challenges
            .iter()
            .map(|message| Challenge::from_seek(message, viewer, codec))
            .collect()
    }
}

/// Visible challenges grouped and ordered the way the play page lists them.
#[derive(Debug, Clone, Default)]
pub struct FeedReport {
    pub live: Vec<Challenge>,
    pub correspondence: Vec<Challenge>,
    pub rengo: Vec<Challenge>,
    pub hidden: usize,
}

impl FeedReport {
    pub fn build(challenges: Vec<Challenge>, filter: &ChallengeFilter) -> Self {
        let mut report = FeedReport::default();
        for challenge in challenges {
            if !should_display(&challenge, filter) {
                debug!("hiding challenge {}", challenge.challenge_id);
                report.hidden += 1;
            } else if challenge.rengo {
                report.rengo.push(challenge);
            } else if challenge.speed().is_live() {
                report.live.push(challenge);
            } else {
                report.correspondence.push(challenge);
            }
        }
        report.live.sort_by(list_cmp);
        report.correspondence.sort_by(list_cmp);
        report.rengo.sort_by(time_per_move_cmp);
        report
    }

    pub fn visible(&self) -> usize {
        self.live.len() + self.correspondence.len() + self.rengo.len()
    }

    pub fn render(&self) -> String {
        [
            ("Live", &self.live),
            ("Correspondence", &self.correspondence),
            ("Rengo", &self.rengo),
        ]
        .iter()
        .map(|(title, section)| {
            let lines = if section.is_empty() {
                String::from("  (none)")
            } else {
                section.iter().map(|c| format!("  {}", describe(c))).join("\n")
            };
            format!("{title} ({})\n{lines}", section.len())
        })
        .join("\n\n")
    }
}

fn handicap_text(handicap: i32) -> String {
    match handicap {
        0 => String::from("even"),
        h if h < 0 => String::from("auto handicap"),
        h => format!("handicap {h}"),
    }
}

/// One line per challenge, e.g. `#12 alice [3k] 19x19 ranked even 25k-1d`.
pub fn describe(challenge: &Challenge) -> String {
    let host_rank = challenge
        .rank
        .map(|rank| rank.to_string())
        .unwrap_or_else(|| String::from("?"));
    let mut line = format!(
        "#{} {} [{}] {}x{} {} {} {}-{}",
        challenge.challenge_id,
        challenge.username,
        host_rank,
        challenge.width,
        challenge.height,
        if challenge.ranked { "ranked" } else { "unranked" },
        handicap_text(challenge.handicap),
        challenge.min_rank,
        challenge.max_rank,
    );
    if challenge.user_challenge {
        line.push_str(" (yours)");
    } else if challenge.joined_rengo {
        line.push_str(" (joined)");
    } else if let Some(reason) = &challenge.ineligible_reason {
        line.push_str(&format!(" ({reason})"));
    }
    line
}
