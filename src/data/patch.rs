//! Boundary patches: named point-list subsets of a zone.

use serde::{Deserialize, Serialize};

use crate::data::distribution::Distribution;
use crate::mesh_error::MeshSurgeryError;
use crate::topology::element_kind::GridLocation;

/// Named subset of entities at one location.
///
/// For element locations the point list holds global element ids of the
/// matching block; for `Vertex` it holds raw vertex ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub location: GridLocation,
    pub point_list: Vec<usize>,
    pub family: Option<String>,
    pub distribution: Distribution,
}

impl Patch {
    pub fn new(location: GridLocation, point_list: Vec<usize>) -> Self {
        let distribution = Distribution::full(point_list.len());
        Self {
            location,
            point_list,
            family: None,
            distribution,
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn len(&self) -> usize {
        self.point_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point_list.is_empty()
    }

    /// Replace the point list, keeping the distribution in step.
    pub fn set_point_list(&mut self, point_list: Vec<usize>) {
        let old = self.point_list.len();
        let new = point_list.len();
        if new >= old {
            self.distribution.grow(new - old, new - old);
        } else {
            self.distribution.shrink(old - new, old - new);
        }
        self.point_list = point_list;
    }
}

/// A patch to recreate on a duplicated surface under another name.
///
/// `existing` names the patch that survives; its elements are copied onto
/// the duplicated vertices and the copy is registered as `copy_name`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwinPatch {
    pub existing: String,
    pub copy_name: String,
    /// Family for the copy; `None` reuses the family of `existing`.
    pub family: Option<String>,
}

/// Patches of a zone, kept in declaration order.
///
/// Order matters: twin-patch matching scans patches in the order they were
/// declared.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSet {
    entries: Vec<(String, Patch)>,
}

impl PatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Add a new patch; names are unique.
    pub fn insert(&mut self, name: impl Into<String>, patch: Patch) -> Result<(), MeshSurgeryError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(MeshSurgeryError::DuplicatePatch(name));
        }
        self.entries.push((name, patch));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Patch> {
        self.entries
            .iter()
            .find_map(|(n, p)| (n == name).then_some(p))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Patch> {
        self.entries
            .iter_mut()
            .find_map(|(n, p)| (n == name).then_some(p))
    }

    pub fn remove(&mut self, name: &str) -> Option<Patch> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Patch)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Patch)> {
        self.entries.iter_mut().map(|(n, p)| (n.as_str(), p))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_declaration_order_and_rejects_duplicates() {
        let mut set = PatchSet::new();
        set.insert("b", Patch::new(GridLocation::FaceCenter, vec![1])).unwrap();
        set.insert("a", Patch::new(GridLocation::EdgeCenter, vec![2])).unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["b", "a"]);
        let err = set
            .insert("a", Patch::new(GridLocation::Vertex, vec![]))
            .unwrap_err();
        assert_eq!(err, MeshSurgeryError::DuplicatePatch("a".into()));
    }

    #[test]
    fn set_point_list_tracks_distribution() {
        let mut p = Patch::new(GridLocation::FaceCenter, vec![1, 2, 3]);
        p.set_point_list(vec![1]);
        assert_eq!(p.distribution, Distribution::full(1));
        p.set_point_list(vec![1, 5, 6, 7]);
        assert_eq!(p.distribution, Distribution::full(4));
    }
}
