//! Utility modules for tvlogo-sync
//!
//! Small, pure helpers shared by the index builder, the downloader and the
//! pass coordinator.

pub mod fs;
pub mod normalize;
pub mod placeholder;
pub mod url;

pub use normalize::{IMAGE_EXTENSIONS, basename, normalize_key, split_image_extension};
pub use placeholder::is_placeholder;
