//! Collaborator traits for the resolution pass
//!
//! The pass never touches the host's data model directly. It reads channels
//! through [`ChannelSource`] and hands finished downloads to [`LogoAssigner`].

use async_trait::async_trait;

use crate::errors::StoreResult;
use crate::logo_assets::DownloadedLogo;
use crate::models::ChannelRecord;

/// Supplies the channels to scan
#[async_trait]
pub trait ChannelSource: Send + Sync {
    async fn list_channels(&self) -> StoreResult<Vec<ChannelRecord>>;
}

/// Durably links a downloaded logo to a channel
///
/// Implementations reuse an existing logo record whose name matches
/// [`DownloadedLogo::logo_name`] and create one otherwise.
#[async_trait]
pub trait LogoAssigner: Send + Sync {
    async fn assign_logo(&self, channel: &ChannelRecord, logo: &DownloadedLogo) -> StoreResult<()>;
}
