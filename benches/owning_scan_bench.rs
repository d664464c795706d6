use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use mesh_surgery::algs::subset::{is_elt_included, tag_elements_owning_vtx};
use mesh_surgery::prelude::*;

fn x_max_vertices(zone: &Zone) -> Vec<usize> {
    (1..=zone.vertex_count())
        .filter(|&v| zone.coordinates().try_get(v).map_or(false, |p| p[0] == 1.0))
        .collect()
}

fn bench_owning_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("owning_scan");

    for &n in &[8usize, 16] {
        let zone = tetra_box(n, [false; 3]).expect("box");
        let side = x_max_vertices(&zone);
        let cells = tag_elements_owning_vtx(&zone, &side, ElementKind::Tetrahedron, false);
        let layer = zone.vertex_ids_of(ElementKind::Tetrahedron, &cells).expect("layer");

        group.bench_with_input(BenchmarkId::new("cells_touching_side", n), &n, |b, _| {
            b.iter(|| {
                let out = tag_elements_owning_vtx(&zone, &side, ElementKind::Tetrahedron, false);
                black_box(out);
            });
        });

        group.bench_with_input(BenchmarkId::new("faces_in_layer_closure", n), &n, |b, _| {
            b.iter(|| {
                let faces = tag_elements_owning_vtx(&zone, &layer, ElementKind::Triangle, true);
                let out = is_elt_included(&zone, &faces, ElementKind::Triangle, &cells, ElementKind::Tetrahedron);
                black_box(out)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_owning_scan);
criterion_main!(benches);
