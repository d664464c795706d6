//! Data attached to a zone: coordinates, distributions, patches, joins and
//! field containers.

pub mod coordinates;
pub mod distribution;
pub mod field;
pub mod join;
pub mod patch;

pub use coordinates::Coordinates;
pub use distribution::Distribution;
pub use field::FieldContainer;
pub use join::VertexJoin;
pub use patch::{Patch, PatchSet, TwinPatch};
