use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{check_dataset_id, check_destination, Publisher};
use crate::error::Error;

/// Publishes into a local folder: `<root>/<dataset_id>/<destination>`.
#[derive(Debug, Clone)]
pub struct DirPublisher {
    root: PathBuf,
}

impl DirPublisher {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn dataset_path(&self, dataset_id: &str) -> Result<PathBuf, Error> {
        check_dataset_id(dataset_id)?;
        Ok(self.root.join(dataset_id))
    }
}

impl Publisher for DirPublisher {
    fn prepare(&self, dataset_id: &str, private: bool) -> Result<(), Error> {
        let path = self.dataset_path(dataset_id)?;
        std::fs::create_dir_all(&path)?;

        #[cfg(unix)]
        if private {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o700))?;
        }
        #[cfg(not(unix))]
        let _ = private;

        info!("Repository ready at {:?}", path);
        Ok(())
    }

    fn publish(&self, local: &Path, destination: &str, dataset_id: &str) -> Result<(), Error> {
        check_destination(destination)?;
        let dst = self.dataset_path(dataset_id)?.join(destination);

        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }

        debug!("copying {:?} to {:?}", local, dst);
        std::fs::copy(local, &dst).map_err(|e| {
            Error::Publication(format!("could not copy {:?} to {:?}: {}", local, dst, e))
        })?;
        Ok(())
    }
}
