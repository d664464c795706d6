//! Periodic patch orchestrator: unroll periodic interfaces for an external
//! remesher, then fold the remeshed result back.
//!
//! For every [`PeriodicPairing`] the unroll pass carves the cell layer on
//! the second side of the interface, closes it with a constraint surface,
//! duplicates that surface and moves the layer next to the first side,
//! where the two sides are merged. The returned [`UnrollRecord`] holds what
//! [`fold_back`] needs to replay the steps in reverse.
//!
//! Only tetrahedral zones are handled.

mod fold;
mod pairing;
mod unroll;

use std::collections::BTreeMap;

pub use fold::fold_back;
pub use pairing::{PairingRecord, PairingRun, PairingState, PeriodicPairing, UnrollRecord};
pub use unroll::unroll_periodic_pairings;

use crate::algs::subset::{is_elt_included, tag_elements_owning_vtx};
use crate::config::SurgeryConfig;
use crate::data::field::FieldContainer;
use crate::mesh_error::MeshSurgeryError;
use crate::topology::element_kind::{ElementKind, GridLocation};
use crate::zone::Zone;

fn require_tetrahedra(zone: &Zone) -> Result<(), MeshSurgeryError> {
    match zone.cell_kind() {
        Some(ElementKind::Tetrahedron) => Ok(()),
        other => Err(MeshSurgeryError::InvalidGeometry(format!(
            "periodic surgery needs tetrahedral cells, zone `{}` has {other:?}",
            zone.name
        ))),
    }
}

/// Elements to carry along when the vertices of `cells` are duplicated:
/// the cells, the faces of their closure and the edges they contain.
fn carried_elements(
    zone: &Zone,
    cells: &[usize],
) -> Result<BTreeMap<ElementKind, Vec<usize>>, MeshSurgeryError> {
    let vertices = zone.vertex_ids_of(ElementKind::Tetrahedron, cells)?;
    let faces = tag_elements_owning_vtx(zone, &vertices, ElementKind::Triangle, true);
    let faces = is_elt_included(
        zone,
        &faces,
        ElementKind::Triangle,
        cells,
        ElementKind::Tetrahedron,
    )?;
    let edges = tag_elements_owning_vtx(zone, &vertices, ElementKind::Edge, true);
    Ok(BTreeMap::from([
        (ElementKind::Tetrahedron, cells.to_vec()),
        (ElementKind::Triangle, faces),
        (ElementKind::Edge, edges),
    ]))
}

/// Vertex tags stamped by the unroll pass, as carried by the remesher.
///
/// Only the length is checked here: vertices added by the remesher may hold
/// interpolated values, and only the merged patches need valid ids.
fn read_vertex_tags(zone: &Zone, config: &SurgeryConfig) -> Result<Vec<f64>, MeshSurgeryError> {
    let missing = || MeshSurgeryError::MissingField {
        container: config.vertex_tag_container.clone(),
        field: config.vertex_tag_field.clone(),
    };
    let container = zone
        .fields
        .get(&config.vertex_tag_container)
        .ok_or_else(missing)?;
    let values = container.get(&config.vertex_tag_field).ok_or_else(missing)?;
    if values.len() != zone.vertex_count() {
        return Err(MeshSurgeryError::FieldLengthMismatch {
            container: config.vertex_tag_container.clone(),
            field: config.vertex_tag_field.clone(),
            expected: zone.vertex_count(),
            found: values.len(),
        });
    }
    Ok(values.to_vec())
}

/// Write `vtx_tag[v] = v` in a full vertex container.
fn stamp_vertex_tags(zone: &mut Zone, config: &SurgeryConfig) -> Result<(), MeshSurgeryError> {
    let n_vtx = zone.vertex_count();
    let container = zone
        .fields
        .entry(config.vertex_tag_container.clone())
        .or_insert_with(|| FieldContainer::full(GridLocation::Vertex));
    if container.location != GridLocation::Vertex || !container.is_full() {
        return Err(MeshSurgeryError::InvalidLocation {
            patch: config.vertex_tag_container.clone(),
            location: container.location,
        });
    }
    container.insert(
        config.vertex_tag_field.clone(),
        (1..=n_vtx).map(|v| v as f64).collect(),
    );
    Ok(())
}
