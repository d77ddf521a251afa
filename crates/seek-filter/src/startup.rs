use crate::{config::Settings, FeedReport, SeekFeed};
use log::info;
use ogs_compat_core::{ChallengeFilter, RankCodec, Viewer};
use std::{io::Write, path::Path};

pub struct Application {
    feed: SeekFeed,
    viewer: Viewer,
    codec: RankCodec,
    filter: ChallengeFilter,
}

impl Application {
    pub fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let codec = RankCodec::new(config.feed_settings.rank_table);
        let viewer = config.viewer_settings.viewer(&codec);
        // Visitors without an account see every challenge
        let filter = if viewer.anonymous {
            ChallengeFilter::show_all()
        } else {
            config.challenge_filter
        };

        let feed = SeekFeed::load(Path::new(&config.feed_settings.path))?;
        info!(
            "loaded {} open challenges from {}",
            feed.len(),
            config.feed_settings.path
        );

        Ok(Self::new(feed, viewer, codec, filter))
    }

    pub fn new(feed: SeekFeed, viewer: Viewer, codec: RankCodec, filter: ChallengeFilter) -> Self {
        Self {
            feed,
            viewer,
            codec,
            filter,
        }
    }

    pub fn report(&self) -> FeedReport {
        let challenges = self.feed.annotate(&self.viewer, &self.codec);
        FeedReport::build(challenges, &self.filter)
    }

    pub fn run<W: Write>(&self, out: &mut W) -> Result<(), anyhow::Error> {
        let report = self.report();
        info!(
            "showing {} challenges, {} hidden by the filter",
            report.visible(),
            report.hidden
        );
        writeln!(out, "{}", report.render())?;
        Ok(())
    }
}
