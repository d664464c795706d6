//! Element-level mutators: renumbering, duplication, removal and face
//! synthesis.
//!
//! Ids passed in are global element ids as numbered when the call starts.
//! Whenever a block changes size the zone shifts every lower-dimensional
//! range and point list, so callers never adjust ids themselves.

use std::collections::BTreeMap;

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;

use crate::algs::editor::{duplicate_rows, remove_rows, vertices::duplicate_vertices};
use crate::data::patch::{Patch, TwinPatch};
use crate::mesh_error::MeshSurgeryError;
use crate::topology::element_kind::{ElementKind, GridLocation};
use crate::topology::vertex_map::{VertexCorrespondence, VertexMap};
use crate::zone::Zone;

/// Rewrite vertex references of `kind` elements through `map`.
///
/// `element_ids == None` renumbers the whole block. No-op for an absent kind.
pub fn renumber_connectivity(
    zone: &mut Zone,
    kind: ElementKind,
    map: &VertexMap,
    element_ids: Option<&[usize]>,
) -> Result<(), MeshSurgeryError> {
    let locals = match element_ids {
        Some(ids) => Some(zone.local_ids(kind, ids)?),
        None => None,
    };
    match zone.blocks.get_mut(&kind) {
        Some(block) => block.renumber(map, locals.as_deref()),
        None => Ok(()),
    }
}

/// Arguments of [`duplicate_elements`] beyond the duplicated ids.
#[derive(Clone, Debug, Default)]
pub struct DuplicateRequest<'a> {
    /// Register the copies as a new patch with this name.
    pub new_patch: Option<&'a str>,
    /// Family of the new patch.
    pub family: Option<&'a str>,
    /// Patches to recreate on the duplicated vertices.
    pub twins: &'a [TwinPatch],
    /// Elements to move onto the duplicated vertices, per kind.
    pub touching: BTreeMap<ElementKind, Vec<usize>>,
}

/// Duplicate `element_ids` of `kind` on fresh copies of their vertices.
///
/// The copies are appended at the end of the kind's range. Elements listed
/// in `request.touching` are renumbered onto the duplicated vertices, except
/// the duplicated elements themselves and the elements of twin patches that
/// were copied. Twin patches with a vertex outside the duplicated set are
/// skipped. Returns the `(old, new)` vertex correspondence.
pub fn duplicate_elements(
    zone: &mut Zone,
    kind: ElementKind,
    element_ids: &[usize],
    request: &DuplicateRequest<'_>,
) -> Result<VertexCorrespondence, MeshSurgeryError> {
    let Some(block) = zone.block(kind) else {
        return Ok(VertexCorrespondence::default());
    };

    // Work in block positions: appends below shift global ids of lower kinds.
    let surface = zone.local_ids(kind, element_ids)?;
    if surface.is_empty() {
        // nothing to copy, and no empty `new_patch` either
        return Ok(VertexCorrespondence::default());
    }
    let surface_conn = block.gather(&surface);
    let old = block.vertex_ids_of(&surface);
    let mut touching: BTreeMap<ElementKind, Vec<usize>> = BTreeMap::new();
    for (&k, ids) in &request.touching {
        touching.insert(k, zone.local_ids(k, ids)?);
    }

    let new = duplicate_vertices(zone, &old)?;
    let map = VertexMap::redirect(zone.vertex_count(), &old, &new)?;
    let old_set: HashSet<usize> = old.iter().copied().collect();

    duplicate_full_rows(zone, kind, &surface)?;
    let added = zone.append_elements(kind, &map.apply(&surface_conn)?)?;

    if let Some(name) = request.new_patch {
        let ids: Vec<usize> = (added.first..=added.last).collect();
        let mut patch = Patch::new(kind.location(), ids);
        patch.family = request.family.map(str::to_string);
        zone.add_patch(name, patch)?;
    }

    let mut kept_twins: HashMap<ElementKind, HashSet<usize>> = HashMap::new();
    for twin in request.twins {
        let Some(existing) = zone.patch(&twin.existing) else {
            return Err(MeshSurgeryError::MissingPatch(twin.existing.clone()));
        };
        let Some(twin_kind) = existing.location.element_kind() else {
            return Err(MeshSurgeryError::InvalidLocation {
                patch: twin.existing.clone(),
                location: existing.location,
            });
        };
        let family = twin.family.clone().or_else(|| existing.family.clone());
        let ids = existing.point_list.clone();
        let conn = zone.connectivity_of(twin_kind, &ids)?;
        if !conn.iter().all(|v| old_set.contains(v)) {
            log::debug!(
                "twin patch `{}` is not on the duplicated surface, not recreated",
                twin.existing
            );
            continue;
        }
        let locals = zone.local_ids(twin_kind, &ids)?;
        let copy = zone.append_elements(twin_kind, &map.apply(&conn)?)?;
        let mut patch = Patch::new(twin_kind.location(), (copy.first..=copy.last).collect());
        patch.family = family;
        zone.add_patch(twin.copy_name.clone(), patch)?;
        kept_twins.entry(twin_kind).or_default().extend(locals);
    }

    for (k, locals) in touching {
        let excluded = kept_twins.get(&k);
        let surface_set: HashSet<usize> = if k == kind {
            surface.iter().copied().collect()
        } else {
            HashSet::new()
        };
        let selected: Vec<usize> = locals
            .into_iter()
            .filter(|l| !surface_set.contains(l) && !excluded.is_some_and(|e| e.contains(l)))
            .unique()
            .collect();
        if let Some(block) = zone.blocks.get_mut(&k) {
            block.renumber(&map, Some(&selected))?;
        }
    }

    log::debug!(
        "duplicated {} {:?} elements on {} new vertices",
        surface.len(),
        kind,
        new.len()
    );
    Ok(VertexCorrespondence::new(old, new))
}

/// Remove `element_ids` of `kind`; returns how many were removed.
///
/// Patches at the kind's location lose the removed entries, are compacted,
/// and disappear when they become empty. No-op for an absent kind.
pub fn remove_elements(
    zone: &mut Zone,
    kind: ElementKind,
    element_ids: &[usize],
) -> Result<usize, MeshSurgeryError> {
    let Some(range) = zone.range(kind) else {
        return Ok(0);
    };
    let locals: HashSet<usize> = zone.local_ids(kind, element_ids)?.into_iter().collect();
    if locals.is_empty() {
        return Ok(0);
    }
    let n_elt = range.len();

    // old position -> new position, None when removed
    let mut compaction = vec![None; n_elt];
    let mut next = 0;
    for (i, slot) in compaction.iter_mut().enumerate() {
        if !locals.contains(&i) {
            *slot = Some(next);
            next += 1;
        }
    }
    let remap = |id: usize| {
        range
            .local(id)
            .and_then(|l| compaction[l])
            .map(|l| range.first + l)
    };

    let removed_locals: Vec<usize> = locals.iter().copied().sorted_unstable().collect();
    remove_full_rows(zone, kind, &removed_locals)?;

    let location = kind.location();
    let mut emptied = Vec::new();
    for (name, patch) in zone.patches.iter_mut() {
        if patch.location != location {
            continue;
        }
        let kept: Vec<usize> = patch.point_list.iter().filter_map(|&id| remap(id)).collect();
        if kept.is_empty() {
            emptied.push(name.to_string());
        }
        patch.set_point_list(kept);
    }
    for name in &emptied {
        log::debug!("patch `{name}` emptied by element removal, dropped");
        zone.patches.remove(name);
    }
    for (name, fc) in zone.fields.iter_mut() {
        if fc.location != location {
            continue;
        }
        let Some(pl) = fc.point_list.as_mut() else {
            continue;
        };
        let dropped: Vec<usize> = pl
            .iter()
            .enumerate()
            .filter(|&(_, &id)| remap(id).is_none())
            .map(|(i, _)| i)
            .collect();
        pl.retain(|&id| remap(id).is_some());
        for id in pl.iter_mut() {
            *id = remap(*id).unwrap_or(*id);
        }
        let n_rows = pl.len() + dropped.len();
        let drop_ids: Vec<usize> = dropped.iter().map(|i| i + 1).collect();
        remove_rows(name, fc, n_rows, &drop_ids)?;
    }

    let removed = match zone.blocks.get_mut(&kind) {
        Some(block) => block.remove(&locals),
        None => 0,
    };
    zone.resize_block(kind, -(removed as isize))?;
    log::debug!("removed {removed} {kind:?} elements");
    Ok(removed)
}

/// Append the faces closing a layer of cells on its side away from `donor_vertices`.
///
/// A cell with exactly one vertex in `donor_vertices` contributes the face
/// opposite that vertex, oriented by the static face table. Faces found
/// twice among the candidates (internal faces) or already listed in a patch
/// of the face location are discarded. Returns the new face ids.
pub fn add_bounding_faces(
    zone: &mut Zone,
    cell_kind: ElementKind,
    cell_ids: &[usize],
    donor_vertices: &[usize],
) -> Result<Vec<usize>, MeshSurgeryError> {
    let Some(face_kind) = cell_kind.face_kind() else {
        return Ok(Vec::new());
    };
    let Some(cells) = zone.block(cell_kind) else {
        return Ok(Vec::new());
    };
    let donor: HashSet<usize> = donor_vertices.iter().copied().collect();

    let mut candidates: Vec<Vec<usize>> = Vec::new();
    for local in zone.local_ids(cell_kind, cell_ids)? {
        let elt = cells.element(local);
        let on_donor: Vec<usize> = (0..elt.len()).filter(|&i| donor.contains(&elt[i])).collect();
        let [opposite] = on_donor.as_slice() else {
            continue;
        };
        if let Some(face) = cell_kind.faces().iter().find(|f| f.opposite == *opposite) {
            candidates.push(face.nodes.iter().map(|&n| elt[n]).collect());
        }
    }

    let key = |f: &[usize]| f.iter().copied().sorted_unstable().collect::<Vec<_>>();
    let mut declared: HashSet<Vec<usize>> = HashSet::new();
    for (_, patch) in zone.patches.iter() {
        if patch.location == face_kind.location() {
            for face in zone.connectivity_of(face_kind, &patch.point_list)?.chunks_exact(face_kind.nodes_per_element()) {
                declared.insert(key(face));
            }
        }
    }
    let counts = candidates.iter().map(|f| key(f)).counts();
    let faces: Vec<usize> = candidates
        .iter()
        .filter(|f| {
            let k = key(f);
            counts[&k] == 1 && !declared.contains(&k)
        })
        .flatten()
        .copied()
        .collect();
    if faces.is_empty() {
        return Ok(Vec::new());
    }
    let added = zone.append_elements(face_kind, &faces)?;
    log::debug!("added {} bounding {:?} elements", added.len(), face_kind);
    Ok((added.first..=added.last).collect())
}

/// Copy full-zone field rows of duplicated elements (cell-located data).
fn duplicate_full_rows(zone: &mut Zone, kind: ElementKind, locals: &[usize]) -> Result<(), MeshSurgeryError> {
    let location = kind.location();
    if location == GridLocation::Vertex || locals.is_empty() {
        return Ok(());
    }
    let expected = zone.element_count(kind);
    let rows: Vec<usize> = locals.iter().map(|l| l + 1).collect();
    for (name, fc) in zone.fields.iter_mut() {
        if fc.location == location && fc.is_full() {
            duplicate_rows(name, fc, expected, &rows)?;
        }
    }
    Ok(())
}

fn remove_full_rows(zone: &mut Zone, kind: ElementKind, locals: &[usize]) -> Result<(), MeshSurgeryError> {
    let location = kind.location();
    let expected = zone.element_count(kind);
    let rows: Vec<usize> = locals.iter().map(|l| l + 1).collect();
    for (name, fc) in zone.fields.iter_mut() {
        if fc.location == location && fc.is_full() {
            remove_rows(name, fc, expected, &rows)?;
        }
    }
    Ok(())
}
