//! Whole dataset conversion.
//!
//! Splits are converted one after the other, in configuration order.
//! A failing split stops the conversion: following splits are not attempted
//! and no dataset card is published.
use std::io::Write;

use log::info;

use crate::card;
use crate::config::Config;
use crate::error::Error;
use crate::pipelines::split::SplitProcessor;
use crate::pipelines::Pipeline;
use crate::publish::{check_dataset_id, Publisher};
use crate::shard::SplitStats;
use crate::sources::Locator;

/// Destination of the dataset card.
pub const CARD_DESTINATION: &str = "README.md";

/// Counts of a whole conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub splits: Vec<SplitStats>,
}

impl RunStats {
    pub fn total_files(&self) -> usize {
        self.splits.iter().map(|s| s.files).sum()
    }

    pub fn total_shards(&self) -> usize {
        self.splits.iter().map(|s| s.shards).sum()
    }
}

pub struct Conversion<P: Publisher> {
    dataset_id: String,
    private: bool,
    config: Config,
    publisher: P,
}

impl<P: Publisher> Conversion<P> {
    pub fn new(dataset_id: String, private: bool, config: Config, publisher: P) -> Self {
        Self {
            dataset_id,
            private,
            config,
            publisher,
        }
    }

    fn publish_card(&self, stats: &RunStats) -> Result<(), Error> {
        let content = card::render(&self.dataset_id, &self.config, stats);
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(content.as_bytes())?;
        file.flush()?;

        self.publisher
            .publish(file.path(), CARD_DESTINATION, &self.dataset_id)?;
        info!("Dataset card uploaded");
        Ok(())
    }
}

impl<P: Publisher> Pipeline<RunStats> for Conversion<P> {
    fn run(&self) -> Result<RunStats, Error> {
        self.config.validate()?;
        check_dataset_id(&self.dataset_id)?;
        info!(
            "Converting into {} ({} files per shard, speaker {} ({}, {}))",
            self.dataset_id,
            self.config.shard_size,
            self.config.speaker.speaker_id,
            self.config.speaker.speaker_gender,
            self.config.speaker.speaker_age
        );

        // parse every locator before starting: a typo shouldn't be found after hours
        let locators = self
            .config
            .splits
            .iter()
            .map(|split| split.locator.parse::<Locator>())
            .collect::<Result<Vec<_>, _>>()?;

        self.publisher.prepare(&self.dataset_id, self.private)?;

        let processor = SplitProcessor::new(
            &self.dataset_id,
            self.config.shard_size,
            &self.config.speaker,
            &self.publisher,
        );

        let mut stats = RunStats::default();
        for (split, locator) in self.config.splits.iter().zip(&locators) {
            stats
                .splits
                .push(processor.process_locator(locator, &split.name)?);
        }

        self.publish_card(&stats)?;
        info!(
            "Done: {} files in {} shards",
            stats.total_files(),
            stats.total_shards()
        );
        Ok(stats)
    }
}
