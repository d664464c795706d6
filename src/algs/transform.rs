//! Rigid motion of a vertex subset and of the vector fields it carries.

use hashbrown::HashSet;
use itertools::Itertools;

use crate::geometry::periodic::RigidMap;
use crate::mesh_error::MeshSurgeryError;
use crate::topology::element_kind::GridLocation;
use crate::zone::Zone;

/// Move `vertex_ids` by `map` and rotate the vertex vector fields there.
///
/// Vector fields are the `<base>X / <base>Y / <base>Z` triples of vertex
/// field containers; they are rotated but never translated. Point-list
/// containers are updated on the rows whose vertex is in the subset.
pub fn apply_affine_transform(
    zone: &mut Zone,
    vertex_ids: &[usize],
    map: RigidMap,
) -> Result<(), MeshSurgeryError> {
    let vertices: Vec<usize> = vertex_ids.iter().copied().sorted_unstable().dedup().collect();
    for &v in &vertices {
        let p = zone.coordinates.try_get(v)?;
        zone.coordinates.try_set(v, map.point(p))?;
    }

    let vertex_count = zone.vertex_count();
    let selected: HashSet<usize> = vertices.iter().copied().collect();
    for (name, fc) in zone.fields.iter_mut() {
        if fc.location != GridLocation::Vertex {
            continue;
        }
        let rows: Vec<usize> = match &fc.point_list {
            None => vertices.iter().map(|v| v - 1).collect(),
            Some(pl) => pl
                .iter()
                .enumerate()
                .filter(|(_, v)| selected.contains(*v))
                .map(|(i, _)| i)
                .collect(),
        };
        let expected = fc.point_list.as_ref().map_or(vertex_count, Vec::len);
        for base in fc.cartesian_vector_basenames() {
            let names = [format!("{base}X"), format!("{base}Y"), format!("{base}Z")];
            let mut components: Vec<Vec<f64>> = Vec::with_capacity(3);
            for n in &names {
                let values = fc.remove(n).ok_or_else(|| MeshSurgeryError::MissingField {
                    container: name.clone(),
                    field: n.clone(),
                })?;
                if values.len() != expected {
                    return Err(MeshSurgeryError::FieldLengthMismatch {
                        container: name.clone(),
                        field: n.clone(),
                        expected,
                        found: values.len(),
                    });
                }
                components.push(values);
            }
            for &r in &rows {
                let v = map.vector([components[0][r], components[1][r], components[2][r]]);
                for (c, value) in components.iter_mut().zip(v) {
                    c[r] = value;
                }
            }
            for (n, values) in names.into_iter().zip(components) {
                fc.insert(n, values);
            }
        }
    }
    log::debug!("transformed {} vertices", vertices.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::coordinates::Coordinates;
    use crate::data::field::FieldContainer;
    use crate::geometry::periodic::PeriodicTransform;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn points_move_and_vectors_only_rotate() {
        let mut z = Zone::new(
            "Z",
            Coordinates::from_points(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [5.0, 5.0, 5.0]]),
        );
        let mut fc = FieldContainer::full(GridLocation::Vertex);
        fc.insert("VelocityX", vec![1.0, 1.0, 1.0]);
        fc.insert("VelocityY", vec![0.0, 0.0, 0.0]);
        fc.insert("VelocityZ", vec![0.0, 0.0, 0.0]);
        fc.insert("Density", vec![7.0, 7.0, 7.0]);
        z.add_field_container("FS", fc);

        let t = PeriodicTransform::rotation([0.0; 3], [0.0, 0.0, FRAC_PI_2]).with_translation([0.0, 0.0, 2.0]);
        apply_affine_transform(&mut z, &[2, 1, 1], t.forward()).unwrap();

        let p1 = z.coordinates().try_get(1).unwrap();
        assert!((p1[0]).abs() < 1e-12 && (p1[1] - 1.0).abs() < 1e-12 && (p1[2] - 2.0).abs() < 1e-12);
        assert_eq!(z.coordinates().try_get(3).unwrap(), [5.0, 5.0, 5.0]);

        let fs = &z.fields["FS"];
        assert!(fs.get("VelocityX").unwrap()[0].abs() < 1e-12);
        assert!((fs.get("VelocityY").unwrap()[0] - 1.0).abs() < 1e-12);
        assert_eq!(fs.get("VelocityZ").unwrap()[0], 0.0);
        assert_eq!(fs.get("VelocityX").unwrap()[2], 1.0);
        assert_eq!(fs.get("Density").unwrap(), &[7.0, 7.0, 7.0]);
    }

    #[test]
    fn inverse_restores_coordinates() {
        let pts = [[0.3, -2.0, 1.5], [4.0, 0.0, -1.0]];
        let mut z = Zone::new("Z", Coordinates::from_points(&pts));
        let t = PeriodicTransform::rotation([1.0, 1.0, 0.0], [0.4, 0.2, -1.3]).with_translation([3.0, 0.0, 1.0]);
        apply_affine_transform(&mut z, &[1, 2], t.forward()).unwrap();
        apply_affine_transform(&mut z, &[1, 2], t.inverse()).unwrap();
        for (p, q) in z.coordinates().points().zip(pts) {
            assert!(p.iter().zip(q).all(|(a, b)| (a - b).abs() < 1e-12));
        }
        assert!(apply_affine_transform(&mut z, &[3], t.forward()).is_err());
    }
}
