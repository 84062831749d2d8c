pub mod json_store;
pub mod traits;

pub use json_store::{JsonChannelStore, StoreDocument, StoredChannel};
pub use traits::{ChannelSource, LogoAssigner};
