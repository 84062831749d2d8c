use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

use crate::errors::DownloadError;
use crate::sources::LogoSource;
use crate::utils::basename;

/// A logo written to the local logos directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedLogo {
    pub local_path: PathBuf,
    pub local_filename: String,
    pub bytes: u64,
}

impl DownloadedLogo {
    /// Name used for the logo record: the file name without its extension
    pub fn logo_name(&self) -> &str {
        self.local_filename
            .rsplit_once('.')
            .map_or(self.local_filename.as_str(), |(stem, _)| stem)
    }
}

/// Local file name for a remote path: basename with the extension lowercased.
///
/// `Sports/ESPN.PNG` becomes `ESPN.png`.
pub fn local_filename(remote_path: &str) -> String {
    let base = basename(remote_path);
    match base.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}.{}", ext.to_lowercase()),
        None => base.to_string(),
    }
}

pub struct LogoDownloader {
    source: Arc<dyn LogoSource>,
}

impl LogoDownloader {
    pub fn new(source: Arc<dyn LogoSource>) -> Self {
        Self { source }
    }

    /// Fetch `remote_path` and store it in `dest_dir`, overwriting any file
    /// of the same name.
    pub async fn download(&self, remote_path: &str, dest_dir: &Path) -> Result<DownloadedLogo, DownloadError> {
        fs::create_dir_all(dest_dir)
            .await
            .map_err(|source| DownloadError::Write {
                path: dest_dir.to_path_buf(),
                source,
            })?;

        let data = self
            .source
            .fetch_raw(remote_path)
            .await
            .map_err(|e| DownloadError::from_source(remote_path, e))?;

        let local_filename = local_filename(remote_path);
        let local_path = dest_dir.join(&local_filename);

        fs::write(&local_path, &data)
            .await
            .map_err(|source| DownloadError::Write {
                path: local_path.clone(),
                source,
            })?;

        debug!(
            "Downloaded {} -> {} ({} bytes)",
            remote_path,
            local_path.display(),
            data.len()
        );

        Ok(DownloadedLogo {
            local_path,
            local_filename,
            bytes: data.len() as u64,
        })
    }
}
