//! Tetrahedral box generator with named boundary patches and periodic joins.

use itertools::Itertools;

use crate::algs::periodic::PeriodicPairing;
use crate::data::coordinates::Coordinates;
use crate::data::join::VertexJoin;
use crate::data::patch::Patch;
use crate::geometry::periodic::PeriodicTransform;
use crate::mesh_error::MeshSurgeryError;
use crate::topology::element_kind::{ElementKind, GridLocation};
use crate::zone::Zone;

const AXES: [&str; 3] = ["X", "Y", "Z"];

fn invalid_geometry(message: impl Into<String>) -> MeshSurgeryError {
    MeshSurgeryError::InvalidGeometry(message.into())
}

/// Join names of the two sides of a periodic axis.
pub fn join_names(axis: usize) -> (String, String) {
    (format!("Per{}min", AXES[axis]), format!("Per{}max", AXES[axis]))
}

/// Unit cube `[0, 1]^3` cut into `n^3` hexahedra, six Kuhn tetrahedra each.
///
/// Boundary triangles and the twelve cube edges are meshed too. Each cube
/// face becomes a face patch (`Xmin`, `Xmax`, ...) unless its axis is
/// periodic: then the two faces are described by vertex joins `PerXmin`
/// (point list on `x = 0`, donor on `x = 1`) and `PerXmax`. Cube edges are
/// edge patches named `line_<axis>_<a><0|1><b><0|1>`, e.g. `line_x_y0z1`.
pub fn tetra_box(n: usize, periodic: [bool; 3]) -> Result<Zone, MeshSurgeryError> {
    if n == 0 {
        return Err(invalid_geometry("cells_per_side must be positive"));
    }
    let stride = n + 1;
    let vid = |ijk: [usize; 3]| 1 + ijk[0] + stride * (ijk[1] + stride * ijk[2]);
    let ijk_of = |v: usize| {
        let l = v - 1;
        [l % stride, (l / stride) % stride, l / (stride * stride)]
    };

    let h = 1.0 / n as f64;
    let mut points = Vec::with_capacity(stride.pow(3));
    for k in 0..=n {
        for j in 0..=n {
            for i in 0..=n {
                points.push([i as f64 * h, j as f64 * h, k as f64 * h]);
            }
        }
    }

    let mut tets = Vec::with_capacity(24 * n.pow(3));
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                for axes in (0..3).permutations(3) {
                    let mut c = [i, j, k];
                    let v0 = vid(c);
                    c[axes[0]] += 1;
                    let v1 = vid(c);
                    c[axes[1]] += 1;
                    let v2 = vid(c);
                    let v3 = vid([i + 1, j + 1, k + 1]);
                    // odd permutations would give a negative volume
                    let inversions = axes.iter().tuple_combinations().filter(|(x, y)| x > y).count();
                    if inversions % 2 == 1 {
                        tets.extend([v0, v2, v1, v3]);
                    } else {
                        tets.extend([v0, v1, v2, v3]);
                    }
                }
            }
        }
    }

    let tet_faces = ElementKind::Tetrahedron.faces();
    let all_faces: Vec<Vec<usize>> = tets
        .chunks_exact(4)
        .flat_map(|t| tet_faces.iter().map(move |f| f.nodes.iter().map(|&i| t[i]).collect()))
        .collect();
    let key = |f: &[usize]| f.iter().copied().sorted_unstable().collect::<Vec<_>>();
    let counts = all_faces.iter().map(|f| key(f)).counts();
    let boundary: Vec<&Vec<usize>> = all_faces.iter().filter(|f| counts[&key(f)] == 1).collect();

    // boundary triangle -> (axis, side)
    let plane_of = |f: &[usize]| {
        let coords: Vec<[usize; 3]> = f.iter().map(|&v| ijk_of(v)).collect();
        (0..3).find_map(|a| {
            [0, n]
                .into_iter()
                .position(|s| coords.iter().all(|c| c[a] == s))
                .map(|side| (a, side))
        })
    };
    let mut tris = Vec::with_capacity(3 * boundary.len());
    let mut face_patches: [[Vec<usize>; 2]; 3] = Default::default();
    let first_tri = tets.len() / 4 + 1;
    for (pos, f) in boundary.iter().enumerate() {
        let (axis, side) = plane_of(f).ok_or_else(|| invalid_geometry("boundary face off the box"))?;
        tris.extend_from_slice(f);
        face_patches[axis][side].push(first_tri + pos);
    }

    let mut edges = Vec::with_capacity(24 * n);
    let mut line_patches = Vec::with_capacity(12);
    let first_edge = first_tri + boundary.len();
    for axis in 0..3 {
        let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);
        let (a, b) = (a.min(b), a.max(b));
        for (sa, sb) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            let first = first_edge + edges.len() / 2;
            for t in 0..n {
                let mut c = [0; 3];
                c[a] = sa * n;
                c[b] = sb * n;
                c[axis] = t;
                let p = vid(c);
                c[axis] = t + 1;
                edges.extend([p, vid(c)]);
            }
            let name = format!(
                "line_{}_{}{sa}{}{sb}",
                AXES[axis].to_lowercase(),
                AXES[a].to_lowercase(),
                AXES[b].to_lowercase()
            );
            line_patches.push((name, (first..first + n).collect::<Vec<_>>()));
        }
    }

    let mut zone = Zone::new("Box", Coordinates::from_points(&points));
    zone.add_block(ElementKind::Tetrahedron, tets)?;
    zone.add_block(ElementKind::Triangle, tris)?;
    zone.add_block(ElementKind::Edge, edges)?;

    for (axis, sides) in face_patches.into_iter().enumerate() {
        if periodic[axis] {
            let (lo_name, hi_name) = join_names(axis);
            let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);
            let mut lo = Vec::with_capacity(stride * stride);
            let mut hi = Vec::with_capacity(stride * stride);
            for (u, w) in (0..=n).cartesian_product(0..=n) {
                let mut c = [0; 3];
                c[a] = u;
                c[b] = w;
                lo.push(vid(c));
                c[axis] = n;
                hi.push(vid(c));
            }
            zone.add_join(lo_name, VertexJoin::new(lo.clone(), hi.clone()));
            zone.add_join(hi_name, VertexJoin::new(hi, lo));
            continue;
        }
        for (side, ids) in sides.into_iter().enumerate() {
            let name = format!("{}{}", AXES[axis], ["min", "max"][side]);
            zone.add_patch(name, Patch::new(GridLocation::FaceCenter, ids))?;
        }
    }
    for (name, ids) in line_patches {
        zone.add_patch(name, Patch::new(GridLocation::EdgeCenter, ids))?;
    }
    log::debug!(
        "tetra box n={n}: {} vertices, {} cells",
        zone.vertex_count(),
        zone.cell_count()
    );
    Ok(zone)
}

/// Pairings of the periodic axes of [`tetra_box`], in axis order.
///
/// The transform moves the `max` side onto the `min` side.
pub fn box_pairings(periodic: [bool; 3]) -> Vec<PeriodicPairing> {
    (0..3)
        .filter(|&axis| periodic[axis])
        .map(|axis| {
            let (first_join, second_join) = join_names(axis);
            let mut t = [0.0; 3];
            t[axis] = -1.0;
            PeriodicPairing {
                first_join,
                second_join,
                transform: PeriodicTransform::translation(t),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_invariants::DebugInvariants;

    fn signed_volume(zone: &Zone, tet: &[usize]) -> f64 {
        let p: Vec<[f64; 3]> = tet.iter().map(|&v| zone.coordinates().try_get(v).unwrap()).collect();
        let d = |a: usize| [p[a][0] - p[0][0], p[a][1] - p[0][1], p[a][2] - p[0][2]];
        let (a, b, c) = (d(1), d(2), d(3));
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    #[test]
    fn box_counts_and_patches() {
        let z = tetra_box(2, [false; 3]).unwrap();
        assert_eq!(z.vertex_count(), 27);
        assert_eq!(z.element_count(ElementKind::Tetrahedron), 48);
        assert_eq!(z.element_count(ElementKind::Triangle), 48);
        assert_eq!(z.element_count(ElementKind::Edge), 24);
        assert_eq!(z.patch_point_list("Zmax").unwrap().len(), 8);
        assert_eq!(z.patch_point_list("line_x_y0z1").unwrap().len(), 2);
        assert_eq!(z.patches.len(), 18);
        assert!(z.joins.is_empty());
        z.validate_invariants().unwrap();
    }

    #[test]
    fn tets_are_positively_oriented() {
        let z = tetra_box(1, [false; 3]).unwrap();
        let block = z.block(ElementKind::Tetrahedron).unwrap();
        let total: f64 = block.elements().map(|t| signed_volume(&z, t)).sum();
        for t in block.elements() {
            assert!(signed_volume(&z, t) > 0.0);
        }
        assert!((total - 6.0).abs() < 1e-12, "six unit-cube volumes, got {total}");
    }

    #[test]
    fn periodic_axis_becomes_joins() {
        let z = tetra_box(2, [true, false, false]).unwrap();
        assert!(z.patch("Xmin").is_none());
        let lo = z.join("PerXmin").unwrap();
        assert_eq!(lo.len(), 9);
        for (&a, &b) in lo.point_list.iter().zip(&lo.point_list_donor) {
            let pa = z.coordinates().try_get(a).unwrap();
            let pb = z.coordinates().try_get(b).unwrap();
            assert_eq!((pa[0], pb[0]), (0.0, 1.0));
            assert_eq!((pa[1], pa[2]), (pb[1], pb[2]));
        }
        assert_eq!(z.join("PerXmax").unwrap().point_list, lo.point_list_donor);
        assert_eq!(z.element_count(ElementKind::Triangle), 48);

        let pairings = box_pairings([true, false, false]);
        assert_eq!(pairings.len(), 1);
        assert_eq!(pairings[0].transform.translation, [-1.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_box_is_rejected() {
        assert!(matches!(
            tetra_box(0, [false; 3]),
            Err(MeshSurgeryError::InvalidGeometry(_))
        ));
    }
}
