pub mod config;
pub mod errors;
pub mod logo_assets;
pub mod logo_index;
pub mod models;
pub mod repositories;
pub mod services;
pub mod sources;
pub mod utils;
