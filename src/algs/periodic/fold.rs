//! Fold-back pass: replay the pairings in reverse on the remeshed zone and
//! restore the periodic joins.

use crate::algs::editor::{
    DuplicateRequest, duplicate_elements, merge_two_boundary_patches, remove_scratch_patches,
};
use crate::algs::periodic::pairing::{PairingRecord, UnrollRecord};
use crate::algs::periodic::{carried_elements, read_vertex_tags, require_tetrahedra};
use crate::algs::subset::elt_pl_to_vtx_pl;
use crate::algs::transform::apply_affine_transform;
use crate::config::SurgeryConfig;
use crate::data::join::VertexJoin;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshSurgeryError;
use crate::topology::element_kind::ElementKind;
use crate::topology::vertex_map::VertexCorrespondence;
use crate::zone::Zone;

/// Undo [`unroll_periodic_pairings`](super::unroll_periodic_pairings) on a
/// possibly remeshed zone.
///
/// Pairings are replayed in reverse order: the first side's face patch is
/// duplicated again (recreating the second side and its twin edge
/// patches), the carved layer goes back through the inverse transform and
/// the constraint surface is merged with its periodic copy. Scratch patches
/// are then removed, the joins restored and the bookkeeping dropped.
pub fn fold_back(
    zone: &mut Zone,
    record: &UnrollRecord,
    config: &SurgeryConfig,
) -> Result<(), MeshSurgeryError> {
    require_tetrahedra(zone)?;
    for pairing in record.pairings.iter().rev() {
        fold_pairing(zone, pairing, config)?;
        crate::debug_invariants!(zone.validate_invariants(), "after folding a pairing");
    }

    let scratch = remove_scratch_patches(zone, config)?;
    if !scratch.is_empty() {
        log::info!("removed {} scratch patches", scratch.len());
    }

    if let Some(container) = zone.fields.get_mut(&config.vertex_tag_container) {
        container.remove(&config.vertex_tag_field);
        if container.names().next().is_none() {
            zone.fields.remove(&config.vertex_tag_container);
        }
    }
    if !config.keep_bookkeeping_patches {
        let bookkeeping = record
            .pairings
            .iter()
            .flat_map(|p| {
                [
                    config.carved_cells_name(p.index),
                    config.constraint_vertices_name(p.index),
                    config.periodic_vertices_name(p.index),
                ]
            })
            .chain(record.converted_patches.iter().cloned());
        for name in bookkeeping {
            zone.patches.remove(&name);
        }
    }
    zone.validate_after("periodic fold-back")
}

fn fold_pairing(
    zone: &mut Zone,
    record: &PairingRecord,
    config: &SurgeryConfig,
) -> Result<(), MeshSurgeryError> {
    let i = record.index;
    let pairing = &record.pairing;
    log::info!("pairing {i}: folding back");

    let carved_name = config.carved_cells_name(i);
    let cells = zone.patch_point_list(&carved_name)?.to_vec();
    let surface = zone.patch_point_list(&pairing.first_join)?.to_vec();
    let request = DuplicateRequest {
        new_patch: Some(&pairing.second_join),
        family: record.donor_family.as_deref(),
        twins: &record.twins,
        touching: carried_elements(zone, &cells)?,
    };
    let mut back = duplicate_elements(zone, ElementKind::Triangle, &surface, &request)?;

    let cells = zone.patch_point_list(&carved_name)?.to_vec();
    let moved = elt_pl_to_vtx_pl(zone, &cells, ElementKind::Tetrahedron)?;
    apply_affine_transform(zone, &moved, pairing.transform.inverse())?;

    let tags = read_vertex_tags(zone, config)?;
    let map = merge_two_boundary_patches(
        zone,
        &config.constraint_surface_name(i),
        &config.periodic_surface_name(i),
        &tags,
        &record.correspondence,
        false,
    )?;
    back.remap(&map)?;
    restore_joins(zone, &pairing.first_join, &pairing.second_join, &back)
}

/// Point the first join at the recreated second side and mirror it.
fn restore_joins(
    zone: &mut Zone,
    first: &str,
    second: &str,
    back: &VertexCorrespondence,
) -> Result<(), MeshSurgeryError> {
    let join = zone
        .joins
        .get_mut(first)
        .ok_or_else(|| MeshSurgeryError::MissingJoin(first.to_string()))?;
    let partners = back.partners();
    let donor: Vec<usize> = join
        .point_list
        .iter()
        .map(|&v| {
            partners.get(&v).copied().unwrap_or_else(|| {
                log::warn!("join `{first}`: vertex {v} has no periodic partner");
                v
            })
        })
        .collect();
    join.point_list_donor = donor.clone();
    let own = join.point_list.clone();
    zone.joins.insert(second.to_string(), VertexJoin::new(donor, own));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::editor::{duplicate_vertices, remove_elements};
    use crate::algs::meshgen::{box_pairings, tetra_box};
    use crate::algs::periodic::unroll_periodic_pairings;

    /// Split carved cell `cell` at its centroid, tagging the new vertex with `tag`.
    fn split_carved_cell(z: &mut Zone, cell: usize, tag: f64) -> usize {
        let conn = z.block(ElementKind::Tetrahedron).unwrap().element(cell - 1).to_vec();
        let mut centroid = [0.0; 3];
        for &v in &conn {
            let p = z.coordinates().try_get(v).unwrap();
            for (c, x) in centroid.iter_mut().zip(p) {
                *c += x / 4.0;
            }
        }
        let m = duplicate_vertices(z, &conn[..1]).unwrap()[0];
        z.coordinates.try_set(m, centroid).unwrap();
        let config = SurgeryConfig::default();
        z.fields
            .get_mut(&config.vertex_tag_container)
            .and_then(|fc| fc.get_mut(&config.vertex_tag_field))
            .unwrap()[m - 1] = tag;

        remove_elements(z, ElementKind::Tetrahedron, &[cell]).unwrap();
        let pieces: Vec<usize> = ElementKind::Tetrahedron
            .faces()
            .iter()
            .flat_map(|f| f.nodes.iter().map(|&i| conn[i]).chain([m]))
            .collect();
        let added = z.append_elements(ElementKind::Tetrahedron, &pieces).unwrap();
        let carved = z.patches.get_mut("tetra_4_periodic_0").unwrap();
        let mut ids = carved.point_list.clone();
        ids.extend(added.first..=added.last);
        carved.set_point_list(ids);
        m
    }

    #[test]
    fn missing_carved_patch_aborts() {
        let mut z = tetra_box(2, [true, false, false]).unwrap();
        let config = SurgeryConfig::default();
        let record = unroll_periodic_pairings(&mut z, &box_pairings([true, false, false]), &config).unwrap();
        z.patches.remove("tetra_4_periodic_0");
        assert_eq!(
            fold_back(&mut z, &record, &config),
            Err(MeshSurgeryError::MissingPatch("tetra_4_periodic_0".into()))
        );
    }

    #[test]
    fn refined_layer_with_interpolated_tags_folds_back() {
        let mut z = tetra_box(2, [true, false, false]).unwrap();
        let config = SurgeryConfig::default();
        let record = unroll_periodic_pairings(&mut z, &box_pairings([true, false, false]), &config).unwrap();
        let cell = z.patch_point_list("tetra_4_periodic_0").unwrap()[0];
        split_carved_cell(&mut z, cell, 13.25);
        assert_eq!(z.vertex_count(), 28);
        z.validate_invariants().unwrap();

        fold_back(&mut z, &record, &config).unwrap();
        assert_eq!(z.vertex_count(), 28);
        assert_eq!(z.element_count(ElementKind::Tetrahedron), 51);
        assert_eq!(z.element_count(ElementKind::Triangle), 48);
        assert_eq!(z.element_count(ElementKind::Edge), 24);
        // the inner vertex went back with its layer
        assert!(z.coordinates().points().all(|p| (-1e-12..=1.0 + 1e-12).contains(&p[0])));
        assert!(z.coordinates().points().any(|p| p[0] > 0.5 && p[0] < 1.0));
    }

    #[test]
    fn restored_join_keeps_unpaired_vertices() {
        let mut z = tetra_box(1, [false; 3]).unwrap();
        z.add_join("Lo", VertexJoin::new(vec![1, 3, 5], vec![1, 3, 5]));
        let back = VertexCorrespondence::new(vec![5, 1], vec![6, 2]);
        restore_joins(&mut z, "Lo", "Hi", &back).unwrap();

        assert_eq!(z.join("Lo").unwrap().point_list_donor, vec![2, 3, 6]);
        let hi = z.join("Hi").unwrap();
        assert_eq!(hi.point_list, vec![2, 3, 6]);
        assert_eq!(hi.point_list_donor, vec![1, 3, 5]);
        assert_eq!(
            restore_joins(&mut z, "Nope", "Hi", &back),
            Err(MeshSurgeryError::MissingJoin("Nope".into()))
        );
    }

    #[test]
    fn joins_are_restored() {
        let original = tetra_box(2, [true, false, false]).unwrap();
        let mut z = original.clone();
        let config = SurgeryConfig::default();
        let record = unroll_periodic_pairings(&mut z, &box_pairings([true, false, false]), &config).unwrap();
        fold_back(&mut z, &record, &config).unwrap();

        for name in ["PerXmin", "PerXmax"] {
            let join = z.join(name).unwrap();
            for (&a, &b) in join.point_list.iter().zip(&join.point_list_donor) {
                let pa = z.coordinates().try_get(a).unwrap();
                let pb = z.coordinates().try_get(b).unwrap();
                assert!((pa[0] - pb[0]).abs() > 0.999, "{name}: {a} and {b} not across the box");
                assert!((pa[1] - pb[1]).abs() < 1e-12 && (pa[2] - pb[2]).abs() < 1e-12);
            }
        }
        assert!(!z.fields.contains_key("VertexTag"));
        assert!(!z.patches.contains("vtx_constraint_0"));
    }
}
