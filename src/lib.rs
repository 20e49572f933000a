//! Splits ship inventories into shipment packages bounded by volume and value.
//!
//! A run goes stack splitting → chunk ordering → bin packing → local
//! improvement → per-type consolidation. See [`solver::Solver`].

pub mod consolidate;
pub mod error;
pub mod improve;
pub mod package;
pub mod packer;
pub mod parse;
pub mod render;
pub mod score;
pub mod solver;
pub mod split;
pub mod types;

pub use error::{Error, Result};
pub use solver::Solver;
pub use types::{ItemStack, PackingConfig, Solution};
