//! Command implementations for the chunkmap CLI

pub mod build;
pub mod edit;
pub mod info;
