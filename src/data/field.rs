//! Field containers (flow solutions) attached to a zone.
//!
//! A container groups scalar arrays living at one [`GridLocation`]. Without a
//! point list each array has one value per entity of the zone (vertex or
//! cell); with a point list each array is aligned with that list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::topology::element_kind::GridLocation;

/// Named scalar arrays sharing a location and an optional point list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldContainer {
    pub location: GridLocation,
    pub point_list: Option<Vec<usize>>,
    arrays: BTreeMap<String, Vec<f64>>,
}

impl FieldContainer {
    /// Container spanning every entity of `location`.
    pub fn full(location: GridLocation) -> Self {
        Self {
            location,
            point_list: None,
            arrays: BTreeMap::new(),
        }
    }

    /// Container restricted to `point_list`.
    pub fn with_point_list(location: GridLocation, point_list: Vec<usize>) -> Self {
        Self {
            location,
            point_list: Some(point_list),
            arrays: BTreeMap::new(),
        }
    }

    /// True when arrays follow the zone's full entity count.
    pub fn is_full(&self) -> bool {
        self.point_list.is_none()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) -> Option<Vec<f64>> {
        self.arrays.insert(name.into(), values)
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.arrays.get(name).map(Vec::as_slice)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<f64>> {
        self.arrays.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<f64>> {
        self.arrays.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.arrays.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Vec<f64>)> {
        self.arrays.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }

    /// Base names `b` for which `bX`, `bY` and `bZ` are all present.
    pub fn cartesian_vector_basenames(&self) -> Vec<String> {
        self.arrays
            .keys()
            .filter_map(|name| name.strip_suffix('X'))
            .filter(|base| {
                self.arrays.contains_key(&format!("{base}Y"))
                    && self.arrays.contains_key(&format!("{base}Z"))
            })
            .map(str::to_string)
            .collect()
    }
}
