//! Image ingestion for Waif.
//!
//! Converts client-supplied `data:` URI payloads into durable retrieval
//! URLs backed by content-addressed files on local disk.

mod disk;
mod parse;

pub mod error;

pub use disk::DiskImageStore;
pub use error::{Error, Result};
pub use parse::{DecodedImage, parse_data_uri};
