//! Batch extraction of spectral audio features into a single archive.
/// Audio decoding and spectral feature extraction.
pub mod analysis;
/// Feature archive serialization.
pub mod archive;
/// Sequential batch driver.
pub mod batch;
/// Run configuration and defaults.
pub mod config;
/// Logging setup.
pub mod logging;
