//! Subset-level mutators: merging coincident patches, vertex subset
//! renumbering, join conversion and scratch cleanup.

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;

use crate::algs::editor::elements::{remove_elements, renumber_connectivity};
use crate::algs::editor::vertices::remove_vertices;
use crate::config::SurgeryConfig;
use crate::data::patch::Patch;
use crate::mesh_error::MeshSurgeryError;
use crate::topology::element_kind::{ElementKind, GridLocation};
use crate::topology::vertex_map::{VertexCorrespondence, VertexMap};
use crate::zone::Zone;

fn patch_vertices(zone: &Zone, name: &str) -> Result<(ElementKind, Vec<usize>), MeshSurgeryError> {
    let patch = zone
        .patch(name)
        .ok_or_else(|| MeshSurgeryError::MissingPatch(name.to_string()))?;
    let kind = patch
        .location
        .element_kind()
        .ok_or_else(|| MeshSurgeryError::InvalidLocation {
            patch: name.to_string(),
            location: patch.location,
        })?;
    Ok((kind, zone.vertex_ids_of(kind, &patch.point_list)?))
}

/// Tag of vertex `v` as a vertex id; only whole non-negative values qualify.
fn tag_of(tags: &[f64], v: usize) -> Result<usize, MeshSurgeryError> {
    let value = tags[v - 1];
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Ok(value as usize)
    } else {
        Err(MeshSurgeryError::InvalidVertexTag { vertex: v, value })
    }
}

/// Collapse the vertices of patch `second` onto the coincident vertices of
/// patch `first`.
///
/// Each vertex `v` of `first` is matched through its tag: `tags[v]` is looked
/// up in `correspondence.old`, the paired `new` value is the tag of the
/// matching vertex of `second`. Only the tags of the two patches are read;
/// other vertices may carry any value. The elements of `second` (and of `first`
/// unless `keep_original`) are removed, every block is renumbered through
/// the resulting contraction, the contracted vertices are deleted and vertex
/// subsets follow. Returns the contraction map.
pub fn merge_two_boundary_patches(
    zone: &mut Zone,
    first: &str,
    second: &str,
    tags: &[f64],
    correspondence: &VertexCorrespondence,
    keep_original: bool,
) -> Result<VertexMap, MeshSurgeryError> {
    let n_vtx = zone.vertex_count();
    if tags.len() != n_vtx {
        return Err(MeshSurgeryError::FieldLengthMismatch {
            container: "vertex tags".into(),
            field: first.to_string(),
            expected: n_vtx,
            found: tags.len(),
        });
    }
    let (first_kind, first_vtx) = patch_vertices(zone, first)?;
    let (_, second_vtx) = patch_vertices(zone, second)?;

    let position_in_old: HashMap<usize, usize> = correspondence
        .old
        .iter()
        .enumerate()
        .map(|(k, &o)| (o, k))
        .collect();
    let second_by_tag: HashMap<usize, usize> = second_vtx
        .iter()
        .map(|&w| Ok((tag_of(tags, w)?, w)))
        .collect::<Result<_, MeshSurgeryError>>()?;
    if second_by_tag.len() != second_vtx.len() {
        log::warn!("patch `{second}` carries repeated vertex tags");
    }

    let mut sources = Vec::with_capacity(first_vtx.len());
    let mut targets = Vec::with_capacity(first_vtx.len());
    for &v in &first_vtx {
        let k = position_in_old
            .get(&tag_of(tags, v)?)
            .ok_or_else(|| MeshSurgeryError::UnmatchedVertex {
                patch: first.to_string(),
                vertex: v,
            })?;
        let w = second_by_tag
            .get(&correspondence.new[*k])
            .ok_or_else(|| MeshSurgeryError::UnmatchedVertex {
                patch: second.to_string(),
                vertex: v,
            })?;
        if *w != v {
            sources.push(*w);
            targets.push(v);
        }
    }
    let map = VertexMap::contraction(n_vtx, &sources, &targets)?;

    if !keep_original {
        let ids = zone.patch_point_list(first)?.to_vec();
        remove_elements(zone, first_kind, &ids)?;
    }
    // re-read: removing `first` may have shifted or dropped `second`
    if let Some(patch) = zone.patch(second) {
        let kind = patch.location.element_kind().unwrap_or(first_kind);
        let ids = patch.point_list.clone();
        remove_elements(zone, kind, &ids)?;
    }
    for kind in ElementKind::ALL {
        renumber_connectivity(zone, kind, &map, None)?;
    }
    remove_vertices(zone, &sources)?;
    update_vertex_subsets(zone, &map)?;

    log::debug!(
        "merged `{second}` onto `{first}`: {} vertices contracted",
        sources.len()
    );
    Ok(map)
}

/// Renumber vertex patches, joins and point-list vertex fields through `map`.
pub fn update_vertex_subsets(zone: &mut Zone, map: &VertexMap) -> Result<(), MeshSurgeryError> {
    for (_, patch) in zone.patches.iter_mut() {
        if patch.location == GridLocation::Vertex {
            map.apply_in_place(&mut patch.point_list)?;
        }
    }
    for join in zone.joins.values_mut() {
        map.apply_in_place(&mut join.point_list)?;
        map.apply_in_place(&mut join.point_list_donor)?;
    }
    for (name, fc) in zone.fields.iter_mut() {
        if fc.location != GridLocation::Vertex {
            continue;
        }
        if let Some(pl) = fc.point_list.as_mut() {
            map.apply_in_place(pl)?;
            if !pl.iter().all_unique() {
                log::warn!("vertex field container `{name}` now lists a vertex twice");
            }
        }
    }
    Ok(())
}

/// Expose the vertex joins named in `join_names` as face patches.
///
/// Triangles with all vertices in a join that are not yet listed in a face
/// patch become a patch named after the join, with family
/// `config.join_family`. Joins with no such triangle create nothing.
/// Returns the names of the created patches.
pub fn convert_joins_to_face_patches(
    zone: &mut Zone,
    join_names: &[String],
    config: &SurgeryConfig,
) -> Result<Vec<String>, MeshSurgeryError> {
    let declared: HashSet<usize> = zone
        .patches
        .iter()
        .filter(|(_, p)| p.location == GridLocation::FaceCenter)
        .flat_map(|(_, p)| p.point_list.iter().copied())
        .collect();

    let mut created = Vec::new();
    for name in join_names {
        let join = zone.join(name)?;
        let faces: Vec<usize> = zone
            .elements_owning(&join.point_list, ElementKind::Triangle, true)
            .into_iter()
            .filter(|id| !declared.contains(id))
            .collect();
        if faces.is_empty() {
            log::debug!("join `{name}` has no undeclared face");
            continue;
        }
        zone.add_patch(
            name.clone(),
            Patch::new(GridLocation::FaceCenter, faces).with_family(config.join_family.clone()),
        )?;
        created.push(name.clone());
    }
    Ok(created)
}

/// Drop the patches whose name carries the scratch prefix.
///
/// Cell-located scratch patches are only unregistered; the elements of the
/// others are removed from the zone (which drops the patch with them).
/// Returns the names handled.
pub fn remove_scratch_patches(zone: &mut Zone, config: &SurgeryConfig) -> Result<Vec<String>, MeshSurgeryError> {
    let names: Vec<String> = zone
        .patches
        .names()
        .filter(|n| config.is_scratch(n))
        .map(str::to_string)
        .collect();
    for name in &names {
        // earlier removals may have shifted or dropped this one
        let Some(patch) = zone.patch(name) else {
            continue;
        };
        match patch.location.element_kind() {
            Some(ElementKind::Tetrahedron) | None => {
                zone.patches.remove(name);
            }
            Some(kind) => {
                let ids = patch.point_list.clone();
                remove_elements(zone, kind, &ids)?;
                zone.patches.remove(name);
            }
        }
        log::debug!("scratch patch `{name}` removed");
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::coordinates::Coordinates;
    use crate::data::field::FieldContainer;
    use crate::data::join::VertexJoin;
    use crate::debug_invariants::DebugInvariants;

    /// Two unit squares (z = 0 and a copy at z = 0 as well, vertices 5..8),
    /// each split into two triangles, with one tet hanging on each side.
    fn doubled_square() -> Zone {
        let mut pts = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
        pts.extend_from_within(..);
        pts.push([0.0, 0.0, 1.0]);
        pts.push([0.0, 0.0, -1.0]);
        let mut z = Zone::new("Z", Coordinates::from_points(&pts));
        z.add_block(ElementKind::Tetrahedron, vec![1, 2, 3, 9, 5, 7, 6, 10]).unwrap();
        z.add_block(ElementKind::Triangle, vec![1, 2, 3, 1, 3, 4, 5, 6, 7, 5, 7, 8]).unwrap();
        z.add_block(ElementKind::Edge, vec![5, 6]).unwrap();
        z.add_patch("lower", Patch::new(GridLocation::FaceCenter, vec![3, 4])).unwrap();
        z.add_patch("upper", Patch::new(GridLocation::FaceCenter, vec![5, 6])).unwrap();
        z.add_patch("seam", Patch::new(GridLocation::EdgeCenter, vec![7])).unwrap();
        z.add_patch("corner", Patch::new(GridLocation::Vertex, vec![8])).unwrap();
        z.add_join("J", VertexJoin::new(vec![1, 2], vec![5, 6]));
        let mut fc = FieldContainer::full(GridLocation::Vertex);
        fc.insert("T", (1..=10).map(f64::from).collect());
        z.add_field_container("FS", fc);
        z
    }

    fn identity_tags(z: &Zone) -> Vec<f64> {
        (1..=z.vertex_count()).map(|v| v as f64).collect()
    }

    #[test]
    fn merge_contracts_second_onto_first() {
        let mut z = doubled_square();
        let tags = identity_tags(&z);
        let corr = VertexCorrespondence::new(vec![1, 2, 3, 4], vec![5, 6, 7, 8]);
        let map = merge_two_boundary_patches(&mut z, "lower", "upper", &tags, &corr, true).unwrap();

        assert_eq!(z.vertex_count(), 6);
        assert_eq!(map.apply(&[5, 6, 7, 8, 9, 10]).unwrap(), vec![1, 2, 3, 4, 5, 6]);
        assert!(z.patches.contains("lower"));
        assert!(!z.patches.contains("upper"));
        assert_eq!(z.element_count(ElementKind::Triangle), 2);
        assert_eq!(z.block(ElementKind::Tetrahedron).unwrap().element(1), &[1, 3, 2, 6]);
        assert_eq!(z.connectivity_of(ElementKind::Edge, &z.patch_point_list("seam").unwrap().to_vec()).unwrap(), vec![1, 2]);
        assert_eq!(z.patch_point_list("corner").unwrap(), &[4]);
        assert_eq!(z.join("J").unwrap().point_list_donor, vec![1, 2]);
        assert_eq!(z.fields["FS"].get("T").unwrap(), &[1.0, 2.0, 3.0, 4.0, 9.0, 10.0]);
        assert!(z.validate_invariants().is_ok());
    }

    #[test]
    fn merge_without_keep_removes_both_patches() {
        let mut z = doubled_square();
        let tags = identity_tags(&z);
        let corr = VertexCorrespondence::new(vec![1, 2, 3, 4], vec![5, 6, 7, 8]);
        merge_two_boundary_patches(&mut z, "lower", "upper", &tags, &corr, false).unwrap();
        assert!(!z.patches.contains("lower"));
        assert!(!z.patches.contains("upper"));
        assert_eq!(z.element_count(ElementKind::Triangle), 0);
        assert_eq!(z.patch_point_list("seam").unwrap(), &[3]);
        assert!(z.validate_invariants().is_ok());
    }

    #[test]
    fn merge_reports_unmatched_vertices() {
        let mut z = doubled_square();
        let tags = identity_tags(&z);
        let corr = VertexCorrespondence::new(vec![1, 2, 3], vec![5, 6, 7]);
        let err = merge_two_boundary_patches(&mut z, "lower", "upper", &tags, &corr, true).unwrap_err();
        assert_eq!(
            err,
            MeshSurgeryError::UnmatchedVertex {
                patch: "lower".into(),
                vertex: 4
            }
        );
        assert!(matches!(
            merge_two_boundary_patches(&mut z, "lower", "nope", &tags, &corr, true),
            Err(MeshSurgeryError::MissingPatch(_))
        ));
    }

    #[test]
    fn merge_reads_only_the_tags_of_both_patches() {
        let mut z = doubled_square();
        let mut tags = identity_tags(&z);
        tags[8] = 4.75;
        tags[9] = f64::NAN;
        let corr = VertexCorrespondence::new(vec![1, 2, 3, 4], vec![5, 6, 7, 8]);
        merge_two_boundary_patches(&mut z.clone(), "lower", "upper", &tags, &corr, true).unwrap();

        tags[6] = 7.5;
        assert_eq!(
            merge_two_boundary_patches(&mut z, "lower", "upper", &tags, &corr, true),
            Err(MeshSurgeryError::InvalidVertexTag { vertex: 7, value: 7.5 })
        );
    }

    #[test]
    fn joins_become_face_patches_once() {
        let mut z = doubled_square();
        z.add_join("K", VertexJoin::new(vec![1, 2, 3, 4], vec![5, 6, 7, 8]));
        z.add_join("L", VertexJoin::new(vec![5, 6, 7, 8], vec![1, 2, 3, 4]));
        z.patches.remove("lower");
        let cfg = SurgeryConfig::default();
        let created =
            convert_joins_to_face_patches(&mut z, &["K".to_string(), "L".to_string()], &cfg).unwrap();
        // L's triangles are already declared in `upper`
        assert_eq!(created, vec!["K".to_string()]);
        assert_eq!(z.patch_point_list("K").unwrap(), &[3, 4]);
        assert_eq!(z.patch("K").unwrap().family.as_deref(), Some("GCS"));
        assert!(convert_joins_to_face_patches(&mut z, &["M".to_string()], &cfg).is_err());
    }

    #[test]
    fn scratch_patches_are_removed_by_location() {
        let mut z = doubled_square();
        z.add_patch("remesh_cells", Patch::new(GridLocation::CellCenter, vec![1])).unwrap();
        z.add_patch("remesh_faces", Patch::new(GridLocation::FaceCenter, vec![4])).unwrap();
        let removed = remove_scratch_patches(&mut z, &SurgeryConfig::default()).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(z.cell_count(), 2);
        assert_eq!(z.element_count(ElementKind::Triangle), 3);
        assert_eq!(z.patch_point_list("lower").unwrap(), &[3]);
        assert_eq!(z.patch_point_list("seam").unwrap(), &[6]);
        assert!(z.validate_invariants().is_ok());
    }
}
