//! Client for a remote image-storage backend
//!
//! Lists stored images, uploads new ones from local files, deletes them by
//! identifier, and derives resized display URLs for each listed image.

pub mod error;
pub mod images;
pub mod mime;
pub mod models;
pub mod urls;

pub use error::{Error, Result};
