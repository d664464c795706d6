//! Surgery algorithms over a [`Zone`](crate::zone::Zone).

pub mod communicator;
pub mod editor;
pub mod exchange;
pub mod meshgen;
pub mod periodic;
pub mod subset;
pub mod transform;

pub use periodic::{fold_back, unroll_periodic_pairings};
pub use transform::apply_affine_transform;
