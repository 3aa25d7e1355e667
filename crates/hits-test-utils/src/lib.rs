//! Shared test fixtures for the hits workspace.
//!
//! Dev-dependency only; never published.
//!
//! # Modules
//!
//! - [`case`]: [`TestCase`] builder that lays out a catalog file and its
//!   content blobs in a temporary directory

pub mod case;

pub use case::TestCase;
