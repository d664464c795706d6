//! Connectivity editor: primitive mutators of a [`Zone`](crate::zone::Zone).
//!
//! Each primitive keeps element ranges, patch point lists, distributions and
//! field rows consistent with the connectivity it changes. Vertex-level
//! operations live in [`vertices`], element-level ones in [`elements`],
//! subset-level ones in [`patches`].

pub mod elements;
pub mod patches;
pub mod vertices;

pub use elements::{
    DuplicateRequest, add_bounding_faces, duplicate_elements, remove_elements,
    renumber_connectivity,
};
pub use patches::{
    convert_joins_to_face_patches, merge_two_boundary_patches, remove_scratch_patches,
    update_vertex_subsets,
};
pub use vertices::{duplicate_vertices, remove_vertices};

use crate::algs::communicator::SelfComm;
use crate::algs::exchange::{block_to_part, part_to_block};
use crate::data::distribution::Distribution;
use crate::data::field::FieldContainer;
use crate::mesh_error::MeshSurgeryError;

/// Drop the entries at sorted unique 0-based `positions`.
pub(crate) fn delete_positions<T>(values: &mut Vec<T>, positions: &[usize]) {
    if positions.is_empty() {
        return;
    }
    let mut next = positions.iter().peekable();
    let mut i = 0;
    values.retain(|_| {
        let drop = next.peek().is_some_and(|&&p| p == i);
        if drop {
            next.next();
        }
        i += 1;
        !drop
    });
}

/// Append copies of the rows of 1-based `ids` to every array of a full container.
pub(crate) fn duplicate_rows(
    name: &str,
    container: &mut FieldContainer,
    expected: usize,
    ids: &[usize],
) -> Result<(), MeshSurgeryError> {
    let distribution = Distribution::full(expected);
    for (field, values) in container.iter_mut() {
        if values.len() != expected {
            return Err(MeshSurgeryError::FieldLengthMismatch {
                container: name.to_string(),
                field: field.to_string(),
                expected,
                found: values.len(),
            });
        }
        let copied = block_to_part(values, &distribution, ids, &SelfComm)?;
        values.extend(copied);
    }
    Ok(())
}

/// Delete the rows of 1-based `ids` from every array of a full container.
pub(crate) fn remove_rows(
    name: &str,
    container: &mut FieldContainer,
    expected: usize,
    ids: &[usize],
) -> Result<(), MeshSurgeryError> {
    let distribution = Distribution::full(expected);
    let positions = part_to_block(&distribution, ids, &SelfComm)?;
    for (field, values) in container.iter_mut() {
        if values.len() != expected {
            return Err(MeshSurgeryError::FieldLengthMismatch {
                container: name.to_string(),
                field: field.to_string(),
                expected,
                found: values.len(),
            });
        }
        delete_positions(values, &positions);
    }
    Ok(())
}
