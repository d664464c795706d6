#![allow(dead_code)]
use mesh_surgery::prelude::*;

/// (vertices, tetrahedra, triangles, edges)
pub fn counts(zone: &Zone) -> (usize, usize, usize, usize) {
    (
        zone.vertex_count(),
        zone.element_count(ElementKind::Tetrahedron),
        zone.element_count(ElementKind::Triangle),
        zone.element_count(ElementKind::Edge),
    )
}

/// Patch names, sorted.
pub fn patch_names(zone: &Zone) -> Vec<String> {
    let mut names: Vec<String> = zone.patches.names().map(str::to_string).collect();
    names.sort_unstable();
    names
}

/// Coordinates rounded to `1e-9`, sorted, for order-agnostic comparison.
pub fn point_set(zone: &Zone) -> Vec<[i64; 3]> {
    let mut pts: Vec<[i64; 3]> = zone
        .coordinates()
        .points()
        .map(|p| p.map(|c| (c * 1e9).round() as i64))
        .collect();
    pts.sort_unstable();
    pts
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Clone + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}

/// Every element's vertices, as sorted coordinate triples.
pub fn element_shapes(zone: &Zone, kind: ElementKind) -> Vec<Vec<[i64; 3]>> {
    let Some(block) = zone.block(kind) else {
        return Vec::new();
    };
    let mut shapes: Vec<Vec<[i64; 3]>> = block
        .elements()
        .map(|elt| {
            let mut pts: Vec<[i64; 3]> = elt
                .iter()
                .map(|&v| {
                    zone.coordinates()
                        .try_get(v)
                        .unwrap()
                        .map(|c| (c * 1e9).round() as i64)
                })
                .collect();
            pts.sort_unstable();
            pts
        })
        .collect();
    shapes.sort_unstable();
    shapes
}

/// x-periodic Kuhn box with its pairing.
pub fn x_periodic_box(n: usize) -> (Zone, Vec<PeriodicPairing>) {
    let periodic = [true, false, false];
    (tetra_box(n, periodic).unwrap(), box_pairings(periodic))
}

/// Two disjoint x-periodic boxes in one zone, the second shifted by `y + 2`.
///
/// Patches and joins of the second box carry a `_b` suffix.
pub fn two_x_periodic_boxes(n: usize) -> (Zone, Vec<PeriodicPairing>) {
    let a = tetra_box(n, [true, false, false]).unwrap();
    let b = a.clone();
    let offset = a.vertex_count();

    let points: Vec<[f64; 3]> = a
        .coordinates()
        .points()
        .chain(b.coordinates().points().map(|[x, y, z]| [x, y + 2.0, z]))
        .collect();
    let mut zone = Zone::new("TwoBoxes", Coordinates::from_points(&points));
    for kind in ElementKind::ALL {
        let mut conn = a.block(kind).unwrap().connectivity().to_vec();
        conn.extend(b.block(kind).unwrap().connectivity().iter().map(|v| v + offset));
        zone.add_block(kind, conn).unwrap();
    }

    for (src, shift, suffix) in [(&a, false, ""), (&b, true, "_b")] {
        for (name, patch) in src.patches.iter() {
            let kind = patch.location.element_kind().unwrap();
            let first = zone.range(kind).unwrap().first
                + if shift { a.element_count(kind) } else { 0 };
            let src_range = src.range(kind).unwrap();
            let ids = patch
                .point_list
                .iter()
                .map(|&id| first + src_range.local(id).unwrap())
                .collect();
            zone.add_patch(format!("{name}{suffix}"), Patch::new(patch.location, ids))
                .unwrap();
        }
        for (name, join) in &src.joins {
            let moved = |pl: &[usize]| -> Vec<usize> {
                pl.iter().map(|&v| if shift { v + offset } else { v }).collect()
            };
            zone.add_join(
                format!("{name}{suffix}"),
                VertexJoin::new(moved(&join.point_list), moved(&join.point_list_donor)),
            );
        }
    }

    let pairings = vec![
        PeriodicPairing::new("PerXmin", "PerXmax", PeriodicTransform::translation([-1.0, 0.0, 0.0])),
        PeriodicPairing::new("PerXmin_b", "PerXmax_b", PeriodicTransform::translation([-1.0, 0.0, 0.0])),
    ];
    (zone, pairings)
}
