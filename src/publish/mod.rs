/*! Publication of produced files.

Shards and the dataset card are built locally, then handed to a [Publisher]
that delivers them to their final destination. Destinations are relative paths
inside a dataset (`data/train/train_00001.tar`, `README.md`).

Publishing the same destination twice overwrites it. No retry is done here.
!*/
mod dir;
mod http;

use std::path::Path;

use crate::error::Error;

pub use dir::DirPublisher;
pub use http::HttpPublisher;

pub trait Publisher {
    /// Create the dataset if needed. Called once, before anything is published.
    fn prepare(&self, _dataset_id: &str, _private: bool) -> Result<(), Error> {
        Ok(())
    }

    /// Deliver the file at `local` to `destination` inside `dataset_id`.
    fn publish(&self, local: &Path, destination: &str, dataset_id: &str) -> Result<(), Error>;
}

impl<P: Publisher + ?Sized> Publisher for &P {
    fn prepare(&self, dataset_id: &str, private: bool) -> Result<(), Error> {
        (**self).prepare(dataset_id, private)
    }

    fn publish(&self, local: &Path, destination: &str, dataset_id: &str) -> Result<(), Error> {
        (**self).publish(local, destination, dataset_id)
    }
}

impl<P: Publisher + ?Sized> Publisher for Box<P> {
    fn prepare(&self, dataset_id: &str, private: bool) -> Result<(), Error> {
        (**self).prepare(dataset_id, private)
    }

    fn publish(&self, local: &Path, destination: &str, dataset_id: &str) -> Result<(), Error> {
        (**self).publish(local, destination, dataset_id)
    }
}

/// Whether a `/`-separated path stays below the folder it is joined to.
fn is_relative_path(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && path
            .split('/')
            .all(|c| !c.is_empty() && c != "." && c != "..")
}

/// Destinations are `/`-separated relative paths.
/// Reject anything that could escape the dataset.
pub(crate) fn check_destination(destination: &str) -> Result<(), Error> {
    if !is_relative_path(destination) {
        return Err(Error::Publication(format!(
            "invalid destination {:?}",
            destination
        )));
    }
    Ok(())
}

/// Dataset ids are relative paths too (`org/dataset`), checked before anything is built.
pub fn check_dataset_id(dataset_id: &str) -> Result<(), Error> {
    if !is_relative_path(dataset_id) {
        return Err(Error::Config(format!(
            "invalid dataset id {:?}",
            dataset_id
        )));
    }
    Ok(())
}
