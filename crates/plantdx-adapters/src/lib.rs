//! plantdx adapters - external adapters for plantdx.
//!
//! This crate provides adapters for:
//! - Filesystem leaf image source
//! - Model file location and fingerprinting

pub mod fs;
pub mod models;

pub use fs::FsImageSource;
pub use models::{default_model_path, model_fingerprint, models_dir, resolve_model_path};
