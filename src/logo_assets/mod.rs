pub mod downloader;

pub use downloader::{DownloadedLogo, LogoDownloader, local_filename};
