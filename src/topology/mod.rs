//! Element kinds, id ranges, connectivity blocks and vertex renumbering maps.
//!
//! A zone stores one [`ElementBlock`] per [`ElementKind`]; their global id
//! ranges live in a single [`RangeTable`] so that resizing one block shifts
//! every lower-dimensional range in one place.

pub mod element_block;
pub mod element_kind;
pub mod range_table;
pub mod vertex_map;

pub use element_block::ElementBlock;
pub use element_kind::{ElementKind, GridLocation};
pub use range_table::{ElementRange, RangeTable};
pub use vertex_map::{VertexCorrespondence, VertexMap};
