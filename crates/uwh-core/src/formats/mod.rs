//! # Formats Module
//!
//! Serialization formats for persisted game results.
//!
//! File I/O operations are in the `storage` module.

mod results;

pub use results::{
    Insertion, ResultDocument, ResultRecord, document_from_bytes, document_to_bytes,
};
