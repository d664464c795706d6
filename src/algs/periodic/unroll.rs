//! Unroll pass: move the carved layer of each pairing next to its first side.

use hashbrown::HashMap;

use crate::algs::editor::{
    DuplicateRequest, add_bounding_faces, convert_joins_to_face_patches, duplicate_elements,
    merge_two_boundary_patches, remove_elements,
};
use crate::algs::periodic::pairing::{PairingRecord, PairingRun, PeriodicPairing, UnrollRecord};
use crate::algs::periodic::{carried_elements, require_tetrahedra, stamp_vertex_tags};
use crate::algs::subset::{elt_pl_to_vtx_pl, find_matching_bcs, tag_elements_owning_vtx};
use crate::algs::transform::apply_affine_transform;
use crate::config::SurgeryConfig;
use crate::data::patch::Patch;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshSurgeryError;
use crate::topology::element_kind::{ElementKind, GridLocation};
use crate::topology::vertex_map::VertexCorrespondence;
use crate::zone::Zone;

/// Unroll every pairing in order and stamp the vertex tags.
///
/// Joins without a face patch of the same name are first exposed as face
/// patches. Each pairing then runs the full [`PairingState`] sequence; the
/// first failure aborts the whole pass and leaves the zone as it is.
///
/// [`PairingState`]: crate::algs::periodic::PairingState
pub fn unroll_periodic_pairings(
    zone: &mut Zone,
    pairings: &[PeriodicPairing],
    config: &SurgeryConfig,
) -> Result<UnrollRecord, MeshSurgeryError> {
    require_tetrahedra(zone)?;
    check_disjoint_pairings(zone, pairings)?;
    let to_convert: Vec<String> = pairings
        .iter()
        .flat_map(|p| [p.first_join.clone(), p.second_join.clone()])
        .filter(|name| !zone.patches.contains(name))
        .collect();
    let converted_patches = convert_joins_to_face_patches(zone, &to_convert, config)?;

    let mut records: Vec<PairingRecord> = Vec::with_capacity(pairings.len());
    for (index, pairing) in pairings.iter().enumerate() {
        let record = unroll_pairing(zone, index, pairing, &mut records, config)?;
        records.push(record);
    }
    stamp_vertex_tags(zone, config)?;
    zone.validate_after("periodic unroll")?;
    Ok(UnrollRecord {
        pairings: records,
        converted_patches,
    })
}

/// Pairings must not share interface vertices: each merge renumbers the
/// vertices the next pairing would have to find again.
fn check_disjoint_pairings(zone: &Zone, pairings: &[PeriodicPairing]) -> Result<(), MeshSurgeryError> {
    let mut owner: HashMap<usize, usize> = HashMap::new();
    for (index, pairing) in pairings.iter().enumerate() {
        let join = zone.join(&pairing.first_join)?;
        for &v in join.point_list.iter().chain(&join.point_list_donor) {
            match owner.insert(v, index) {
                Some(other) if other != index => {
                    return Err(MeshSurgeryError::InvalidGeometry(format!(
                        "pairings {other} and {index} share vertex {v}; \
                         interfaces meeting at a corner are not supported"
                    )));
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn unroll_pairing(
    zone: &mut Zone,
    index: usize,
    pairing: &PeriodicPairing,
    previous: &mut [PairingRecord],
    config: &SurgeryConfig,
) -> Result<PairingRecord, MeshSurgeryError> {
    let mut run = PairingRun::new(index);
    let join = zone.join(&pairing.first_join)?.clone();
    let family = Some(config.periodic_family.as_str());

    // carve the cell layer on the donor side and close it
    let cells = tag_elements_owning_vtx(zone, &join.point_list_donor, ElementKind::Tetrahedron, false);
    let faces = add_bounding_faces(zone, ElementKind::Tetrahedron, &cells, &join.point_list_donor)?;
    if faces.is_empty() {
        return Err(MeshSurgeryError::InvalidGeometry(format!(
            "pairing {index}: the cells on `{}` have no free face to close the layer",
            pairing.second_join
        )));
    }
    let carved_name = config.carved_cells_name(index);
    let constraint_name = config.constraint_surface_name(index);
    zone.add_patch(
        carved_name.clone(),
        Patch::new(GridLocation::CellCenter, cells.clone()).with_family(config.periodic_family.clone()),
    )?;
    zone.add_patch(
        constraint_name,
        Patch::new(GridLocation::FaceCenter, faces.clone()).with_family(config.periodic_family.clone()),
    )?;
    run.advance();
    crate::debug_invariants!(zone.validate_invariants(), "after carving");

    // edges of the donor side have a twin on the other side
    let donor_edges = tag_elements_owning_vtx(zone, &join.point_list_donor, ElementKind::Edge, true);
    let own_edges = tag_elements_owning_vtx(zone, &join.point_list, ElementKind::Edge, true);
    let twins = find_matching_bcs(
        zone,
        &donor_edges,
        &own_edges,
        &VertexCorrespondence::new(join.point_list_donor.clone(), join.point_list.clone()),
        ElementKind::Edge,
        config.twin_match,
    )?;
    remove_elements(zone, ElementKind::Edge, &donor_edges)?;
    run.advance();

    let periodic_name = config.periodic_surface_name(index);
    let request = DuplicateRequest {
        new_patch: Some(&periodic_name),
        family,
        twins: &[],
        touching: carried_elements(zone, &cells)?,
    };
    let mut correspondence = duplicate_elements(zone, ElementKind::Triangle, &faces, &request)?;
    run.advance();
    crate::debug_invariants!(zone.validate_invariants(), "after surface duplication");

    // the layer grew onto the duplicated vertices
    let cells = zone.patch_point_list(&carved_name)?.to_vec();
    let moved = elt_pl_to_vtx_pl(zone, &cells, ElementKind::Tetrahedron)?;
    apply_affine_transform(zone, &moved, pairing.transform.forward())?;
    run.advance();

    let donor_family = zone.patch(&pairing.second_join).and_then(|p| p.family.clone());
    let tags: Vec<f64> = (1..=zone.vertex_count()).map(|v| v as f64).collect();
    let map = merge_two_boundary_patches(
        zone,
        &pairing.first_join,
        &pairing.second_join,
        &tags,
        &VertexCorrespondence::new(join.point_list, join.point_list_donor),
        true,
    )?;
    for record in previous.iter_mut() {
        record.correspondence.remap(&map)?;
    }
    correspondence.remap(&map)?;
    zone.add_patch(
        config.constraint_vertices_name(index),
        Patch::new(GridLocation::Vertex, correspondence.old.clone())
            .with_family(config.periodic_family.clone()),
    )?;
    zone.add_patch(
        config.periodic_vertices_name(index),
        Patch::new(GridLocation::Vertex, correspondence.new.clone())
            .with_family(config.periodic_family.clone()),
    )?;
    run.advance();
    crate::debug_invariants!(zone.validate_invariants(), "after merge");

    run.advance();
    log::debug!(
        "pairing {index}: {} cells carved, {} twin edge patches, {} interface vertices",
        cells.len(),
        twins.len(),
        correspondence.len()
    );
    Ok(PairingRecord {
        index,
        pairing: pairing.clone(),
        correspondence,
        twins,
        donor_family,
    })
}
