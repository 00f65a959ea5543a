//! # avt-tools
//!
//! Decode/encode toolkit for the legacy Aventuro (AVT) world-data format:
//! a single binary blob of fixed-layout record sections (rooms, items,
//! monsters, synonyms, phenomena, verbs) plus a variable-length string
//! pool. The crate provides a schema-driven record decoder shared by every
//! record kind and a normalization ("repack") pass that pads every section
//! to its declared capacity with deterministic zeros.
pub mod avt;

// Re-export the main types for convenience
pub use avt::{
    repack::repack_file,
    schema::{Field, FieldValue, Record},
    AvtError, DecodeConfig, Result, WorldFile,
};
