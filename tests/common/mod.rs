//! Shared fixtures for the integration tests
//!
//! Builders for scene snapshots and the filaments inside them.

#![allow(dead_code)]

pub mod scenes;

pub use scenes::{
    branching_record, chain_record, document, extent, flipped_extent, write_scene,
};
