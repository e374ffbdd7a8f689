//! # wavshard
//!
//! Converts gzipped speech corpora (audio recordings + transcript index) into
//! WebDataset tar shards, while the source is being downloaded.
//!
//! ## Getting started
//!
//! ```sh
//! wavshard 0.1.0
//! Speech corpus to WebDataset shards conversion tool.
//!
//! USAGE:
//!     wavshard <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     check      Check the layout of local shards
//!     convert    Convert source archives into published WebDataset shards
//!     help       Prints this message or the help of the given subcommand(s)
//! ```
//!
//! ```sh
//! RUST_LOG=info wavshard convert org/gujarati-tts \
//!     --split 'train=https://objectstore.example.org/train.tar.gz?X-Amz-...' \
//!     --split 'test=https://objectstore.example.org/test.tar.gz?X-Amz-...' \
//!     --dst published/
//! ```

use env_logger::Env;
use log::{debug, info};
use structopt::StructOpt;
use wavshard::check::check_shard;
use wavshard::cli;
use wavshard::error::Error;
use wavshard::pipelines::{Conversion, Pipeline};
use wavshard::publish::{DirPublisher, HttpPublisher, Publisher};

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let opt = cli::Wavshard::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::Wavshard::Convert(c) => {
            let config = c.config()?;
            let publisher: Box<dyn Publisher> = match &c.endpoint {
                Some(endpoint) => Box::new(HttpPublisher::new(endpoint.clone(), c.token.clone())?),
                None => Box::new(DirPublisher::new(c.dst.clone())),
            };

            let conversion = Conversion::new(c.dataset_id, c.private, config, publisher);
            let stats = conversion.run()?;
            for split in &stats.splits {
                info!(
                    "{}: {} files in {} shards",
                    split.split, split.files, split.shards
                );
            }
        }

        cli::Wavshard::Check(c) => {
            for path in &c.shards {
                let report = check_shard(path)?;
                println!("{}\t{}", report.path.display(), report.items);
            }
        }
    };
    Ok(())
}
