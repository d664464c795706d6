//! Subset algebra: vertex ↔ element membership queries and patch matching.
//!
//! Every function here is read-only on the zone. Absent element kinds give
//! empty results.

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;

use crate::config::TwinMatchPolicy;
use crate::data::patch::TwinPatch;
use crate::mesh_error::MeshSurgeryError;
use crate::topology::element_kind::ElementKind;
use crate::topology::vertex_map::VertexCorrespondence;
use crate::zone::Zone;

/// Vertices of the given elements, sorted and unique.
pub fn elt_pl_to_vtx_pl(
    zone: &Zone,
    element_ids: &[usize],
    kind: ElementKind,
) -> Result<Vec<usize>, MeshSurgeryError> {
    zone.vertex_ids_of(kind, element_ids)
}

/// Elements of `kind` touching any (`full == false`) or all of `vertex_ids`.
pub fn tag_elements_owning_vtx(
    zone: &Zone,
    vertex_ids: &[usize],
    kind: ElementKind,
    full: bool,
) -> Vec<usize> {
    zone.elements_owning(vertex_ids, kind, full)
}

fn face_key(nodes: &[usize]) -> Vec<usize> {
    nodes.iter().copied().sorted_unstable().collect()
}

/// Candidates that are a face of one of the container elements.
///
/// Container elements are split into faces with the static face table of
/// their kind; faces are compared as unordered vertex sets. Candidate order
/// is preserved.
pub fn is_elt_included(
    zone: &Zone,
    candidate_ids: &[usize],
    candidate_kind: ElementKind,
    container_ids: &[usize],
    container_kind: ElementKind,
) -> Result<Vec<usize>, MeshSurgeryError> {
    if container_kind.face_kind() != Some(candidate_kind) {
        return Ok(Vec::new());
    }
    let (Some(cand_block), Some(cont_block)) =
        (zone.block(candidate_kind), zone.block(container_kind))
    else {
        return Ok(Vec::new());
    };

    let mut faces: HashSet<Vec<usize>> = HashSet::new();
    for local in zone.local_ids(container_kind, container_ids)? {
        let elt = cont_block.element(local);
        for face in container_kind.faces() {
            faces.insert(face_key(&face.nodes.iter().map(|&n| elt[n]).collect::<Vec<_>>()));
        }
    }

    let locals = zone.local_ids(candidate_kind, candidate_ids)?;
    Ok(candidate_ids
        .iter()
        .zip(locals)
        .filter(|(_, local)| faces.contains(&face_key(cand_block.element(*local))))
        .map(|(&id, _)| id)
        .collect())
}

/// Pair named patches of `kind` lying on the source side with twins on the
/// target side.
///
/// A patch belongs to a side when every one of its ids is in that side's
/// element set. A source patch matches a target patch when every vertex of
/// the source patch, pushed through `correspondence` (`old` = source vertex,
/// `new` = target vertex), is a vertex of the target patch. The returned
/// [`TwinPatch`] keeps the target patch and recreates the source patch under
/// its own name.
pub fn find_matching_bcs(
    zone: &Zone,
    source_ids: &[usize],
    target_ids: &[usize],
    correspondence: &VertexCorrespondence,
    kind: ElementKind,
    policy: TwinMatchPolicy,
) -> Result<Vec<TwinPatch>, MeshSurgeryError> {
    if zone.block(kind).is_none() {
        return Ok(Vec::new());
    }
    let source_set: HashSet<usize> = source_ids.iter().copied().collect();
    let target_set: HashSet<usize> = target_ids.iter().copied().collect();

    let mut sources = Vec::new();
    let mut targets = Vec::new();
    for (name, patch) in zone.patches.iter() {
        if patch.location != kind.location() || patch.is_empty() {
            continue;
        }
        if patch.point_list.iter().all(|id| source_set.contains(id)) {
            sources.push((name, patch));
        }
        if patch.point_list.iter().all(|id| target_set.contains(id)) {
            targets.push((name, patch));
        }
    }

    let src_to_tgt: HashMap<usize, usize> = correspondence
        .old
        .iter()
        .copied()
        .zip(correspondence.new.iter().copied())
        .collect();
    let target_vertices = targets
        .iter()
        .map(|(_, p)| {
            zone.connectivity_of(kind, &p.point_list)
                .map(|conn| conn.into_iter().collect::<HashSet<usize>>())
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut pairs = Vec::new();
    for (src_name, src_patch) in sources {
        let mapped: Vec<usize> = zone
            .connectivity_of(kind, &src_patch.point_list)?
            .into_iter()
            .map(|v| src_to_tgt.get(&v).copied().unwrap_or(v))
            .collect();
        let candidates: Vec<&str> = targets
            .iter()
            .zip(&target_vertices)
            .filter(|(_, verts)| mapped.iter().all(|v| verts.contains(v)))
            .map(|((name, _), _)| *name)
            .collect();
        let chosen = match (candidates.as_slice(), policy) {
            ([], _) => continue,
            ([only], _) => *only,
            ([first, ..], TwinMatchPolicy::FirstMatch) => {
                log::warn!("patch `{src_name}` has {} twin candidates, keeping `{first}`", candidates.len());
                *first
            }
            (_, TwinMatchPolicy::Reject) => {
                return Err(MeshSurgeryError::AmbiguousTwinPatch {
                    source_patch: src_name.to_string(),
                    candidates: candidates.iter().map(|c| c.to_string()).collect(),
                });
            }
        };
        log::debug!("twin patches: `{src_name}` -> `{chosen}`");
        pairs.push(TwinPatch {
            existing: chosen.to_string(),
            copy_name: src_name.to_string(),
            family: src_patch.family.clone(),
        });
    }
    Ok(pairs)
}
