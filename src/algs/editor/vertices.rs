//! Vertex duplication and removal.

use crate::algs::communicator::{Communicator, SelfComm};
use crate::algs::editor::{delete_positions, duplicate_rows, remove_rows};
use crate::algs::exchange::{block_to_part, part_to_block};
use crate::mesh_error::MeshSurgeryError;
use crate::topology::element_kind::GridLocation;
use crate::zone::Zone;

/// Append copies of `vertex_ids` (in the given order); returns the new ids.
///
/// Full-zone vertex fields get their rows copied the same way. Connectivity
/// is left untouched.
pub fn duplicate_vertices(zone: &mut Zone, vertex_ids: &[usize]) -> Result<Vec<usize>, MeshSurgeryError> {
    let n_vtx = zone.vertex_count();
    let distribution = zone.vertex_distribution;
    let copies = {
        let [x, y, z] = zone.coordinates.components();
        [
            block_to_part(x, &distribution, vertex_ids, &SelfComm)?,
            block_to_part(y, &distribution, vertex_ids, &SelfComm)?,
            block_to_part(z, &distribution, vertex_ids, &SelfComm)?,
        ]
    };
    for (name, fc) in zone.fields.iter_mut() {
        if fc.location == GridLocation::Vertex && fc.is_full() {
            duplicate_rows(name, fc, n_vtx, vertex_ids)?;
        }
    }
    for (component, copy) in zone.coordinates.components_mut().into_iter().zip(copies) {
        component.extend(copy);
    }

    let added = vertex_ids.len();
    zone.vertex_distribution.grow(added, SelfComm.allreduce_sum(added));
    log::debug!("duplicated {added} vertices ({n_vtx} -> {})", zone.vertex_count());
    Ok((n_vtx + 1..=n_vtx + added).collect())
}

/// Delete `vertex_ids` with their coordinates and full-zone vertex field rows.
///
/// References to these vertices must already have been remapped away;
/// connectivity and subsets are not inspected.
pub fn remove_vertices(zone: &mut Zone, vertex_ids: &[usize]) -> Result<(), MeshSurgeryError> {
    let n_vtx = zone.vertex_count();
    let positions = part_to_block(&zone.vertex_distribution, vertex_ids, &SelfComm)?;
    for (name, fc) in zone.fields.iter_mut() {
        if fc.location == GridLocation::Vertex && fc.is_full() {
            remove_rows(name, fc, n_vtx, vertex_ids)?;
        }
    }
    for component in zone.coordinates.components_mut() {
        delete_positions(component, &positions);
    }

    let removed = positions.len();
    zone.vertex_distribution
        .shrink(removed, SelfComm.allreduce_sum(removed));
    log::debug!("removed {removed} vertices ({n_vtx} -> {})", zone.vertex_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::coordinates::Coordinates;
    use crate::data::field::FieldContainer;

    fn zone() -> Zone {
        let mut z = Zone::new(
            "Z",
            Coordinates::from_points(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]),
        );
        let mut fc = FieldContainer::full(GridLocation::Vertex);
        fc.insert("T", vec![10.0, 20.0, 30.0]);
        z.add_field_container("FS", fc);
        let mut bc = FieldContainer::with_point_list(GridLocation::Vertex, vec![2]);
        bc.insert("q", vec![5.0]);
        z.add_field_container("BCData", bc);
        z
    }

    #[test]
    fn duplicated_vertices_are_appended_in_order() {
        let mut z = zone();
        let new = duplicate_vertices(&mut z, &[3, 1]).unwrap();
        assert_eq!(new, vec![4, 5]);
        assert_eq!(z.coordinates().try_get(4).unwrap(), [2.0, 0.0, 0.0]);
        assert_eq!(z.coordinates().try_get(5).unwrap(), [0.0, 0.0, 0.0]);
        assert_eq!(z.fields["FS"].get("T").unwrap(), &[10.0, 20.0, 30.0, 30.0, 10.0]);
        assert_eq!(z.fields["BCData"].get("q").unwrap(), &[5.0]);
        assert_eq!(z.vertex_distribution.total, 5);
    }

    #[test]
    fn removed_vertices_compact_coordinates_and_fields() {
        let mut z = zone();
        remove_vertices(&mut z, &[2, 2]).unwrap();
        assert_eq!(z.vertex_count(), 2);
        assert_eq!(z.coordinates().try_get(2).unwrap(), [2.0, 0.0, 0.0]);
        assert_eq!(z.fields["FS"].get("T").unwrap(), &[10.0, 30.0]);
        assert_eq!(z.vertex_distribution.total, 2);
        assert!(remove_vertices(&mut z, &[9]).is_err());
    }
}
