use std::fs::File;
use std::path::Path;
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::Url;

use super::{check_dataset_id, check_destination, Publisher};
use crate::error::Error;

/// Publishes by `PUT`ting files to `<endpoint>/<dataset_id>/<destination>`.
///
/// Works with object stores and WebDAV-like servers accepting raw uploads.
pub struct HttpPublisher {
    endpoint: Url,
    token: Option<String>,
    client: Client,
}

impl HttpPublisher {
    pub fn new(endpoint: Url, token: Option<String>) -> Result<Self, Error> {
        // shards are hundreds of MB, leave the timeout to the transport.
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self {
            endpoint,
            token,
            client,
        })
    }

    /// Build the upload url of a destination.
    pub fn url(&self, destination: &str, dataset_id: &str) -> Result<Url, Error> {
        check_dataset_id(dataset_id)?;
        let mut base = self.endpoint.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(&format!("{}/{}", dataset_id, destination))?)
    }
}

impl Publisher for HttpPublisher {
    fn prepare(&self, dataset_id: &str, private: bool) -> Result<(), Error> {
        if private {
            warn!(
                "visibility of {} has to be set on {} directly",
                dataset_id, self.endpoint
            );
        }
        Ok(())
    }

    fn publish(&self, local: &Path, destination: &str, dataset_id: &str) -> Result<(), Error> {
        check_destination(destination)?;
        let url = self.url(destination, dataset_id)?;
        debug!("uploading {:?} to {}", local, url);

        let body = File::open(local)?;
        let mut request = self.client.put(url.clone()).body(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| Error::Publication(format!("upload to {} failed: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(Error::Publication(format!(
                "upload to {} failed with status {}",
                url,
                response.status()
            )));
        }
        Ok(())
    }
}
