//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use log::debug;
use reqwest::Url;
use structopt::StructOpt;

use crate::config::{Config, SplitSource};
use crate::error::Error;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "wavshard",
    about = "Speech corpus to WebDataset shards conversion tool."
)]
/// Holds every command that is callable by the `wavshard` command.
pub enum Wavshard {
    #[structopt(about = "Convert source archives into published WebDataset shards")]
    Convert(Convert),
    #[structopt(about = "Check the layout of local shards")]
    Check(Check),
}

#[derive(StructOpt)]
/// Convert command and parameters.
pub struct Convert {
    #[structopt(help = "dataset identifier, e.g. org/gujarati-tts")]
    pub dataset_id: String,
    #[structopt(long = "private", help = "create the dataset as private")]
    pub private: bool,
    #[structopt(
        parse(from_os_str),
        long = "config",
        short = "c",
        help = "JSON configuration file"
    )]
    pub config: Option<PathBuf>,
    #[structopt(
        long = "split",
        short = "s",
        help = "split to convert, as name=locator (url or path). Can be repeated."
    )]
    pub splits: Vec<SplitSource>,
    #[structopt(long = "shard-size", help = "number of items per shard (default: 500)")]
    pub shard_size: Option<usize>,
    #[structopt(
        parse(from_os_str),
        long = "dst",
        default_value = "out",
        help = "local publication folder, used when no endpoint is given"
    )]
    pub dst: PathBuf,
    #[structopt(long = "endpoint", help = "publish with HTTP PUT requests to this url")]
    pub endpoint: Option<Url>,
    #[structopt(
        long = "token",
        env = "WAVSHARD_TOKEN",
        hide_env_values = true,
        help = "bearer token for the endpoint"
    )]
    pub token: Option<String>,
}

/// Tokens must not end up in logs.
impl std::fmt::Debug for Convert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Convert")
            .field("dataset_id", &self.dataset_id)
            .field("private", &self.private)
            .field("config", &self.config)
            .field(
                "splits",
                &self.splits.iter().map(|s| &s.name).collect::<Vec<_>>(),
            )
            .field("shard_size", &self.shard_size)
            .field("dst", &self.dst)
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Convert {
    /// Build the conversion configuration:
    /// the configuration file if any, then command line splits and shard size on top.
    pub fn config(&self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::from_path(path)?,
            None => Config::default(),
        };

        config.splits.extend(self.splits.iter().cloned());
        if let Some(shard_size) = self.shard_size {
            config.shard_size = shard_size;
        }

        debug!("shard size {}, {} splits", config.shard_size, config.splits.len());
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, StructOpt)]
/// Check command and parameters.
pub struct Check {
    #[structopt(parse(from_os_str), required = true, help = "shard files to check")]
    pub shards: Vec<PathBuf>,
}
