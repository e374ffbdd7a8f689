use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::debug;
use reqwest::Url;

use crate::error::Error;

/// Where a source archive lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Remote(Url),
    Local(PathBuf),
}

impl FromStr for Locator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Locator::Remote(Url::parse(s)?))
        } else {
            Ok(Locator::Local(PathBuf::from(s)))
        }
    }
}

/// Pre-signed urls carry credentials in their query string,
/// so only scheme, host and path are displayed.
impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Remote(url) => write!(
                f,
                "{}://{}{}",
                url.scheme(),
                url.host_str().unwrap_or_default(),
                url.path()
            ),
            Locator::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Locator {
    /// Open a forward-only byte stream over the archive.
    ///
    /// Remote archives are fetched with a blocking client without request timeout:
    /// corpora are big and a download can take hours.
    pub fn open(&self) -> Result<Box<dyn Read>, Error> {
        match self {
            Locator::Remote(url) => {
                debug!("fetching {}", self);
                let client = reqwest::blocking::Client::builder()
                    .timeout(None::<Duration>)
                    .build()?;
                let response = client.get(url.clone()).send()?.error_for_status()?;
                Ok(Box::new(response))
            }
            Locator::Local(path) => {
                debug!("opening {:?}", path);
                Ok(Box::new(File::open(path)?))
            }
        }
    }
}
