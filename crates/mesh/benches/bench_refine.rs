use std::hint::black_box;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use terrain_common::Color;
use terrain_math::{Ray, Vector3};
use terrain_mesh::GridMesh;

fn make_mesh(cells: usize, rng: &mut StdRng) -> GridMesh {
    let extent = cells as f64;
    match GridMesh::new(cells, cells, extent, extent, Color::BLUE, rng) {
        Ok(mesh) => mesh,
        Err(e) => panic!("bench mesh: {e}"),
    }
}

fn bench_fractalize(cells: usize, iterations: usize) {
    let mut rng = StdRng::seed_from_u64(42);
    let mesh = make_mesh(cells, &mut rng);

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(black_box(&mesh).fractalize(&mut rng));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  fractalize ({cells}x{cells} cells, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_smooth(cells: usize, iterations: usize) {
    let mut rng = StdRng::seed_from_u64(42);
    let mesh = make_mesh(cells, &mut rng);

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(black_box(&mesh).smooth());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  smooth ({cells}x{cells} cells, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_pick(cells: usize, iterations: usize) {
    let mut rng = StdRng::seed_from_u64(42);
    let mesh = make_mesh(cells, &mut rng);
    let ray = match Ray::new(Vector3::new(0.0, 50.0, 0.0), Vector3::ZERO) {
        Ok(ray) => ray,
        Err(e) => panic!("bench ray: {e}"),
    };

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(mesh.pick_nearest(black_box(&ray)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  pick ({cells}x{cells} cells, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== Mesh Refinement Benchmarks ===\n");

    println!("Fractalize:");
    bench_fractalize(16, 1000);
    bench_fractalize(64, 100);
    bench_fractalize(256, 10);

    println!("\nSmooth:");
    bench_smooth(16, 1000);
    bench_smooth(64, 100);
    bench_smooth(256, 10);

    println!("\nPick nearest:");
    bench_pick(64, 10000);
    bench_pick(256, 1000);

    println!("\n=== Done ===");
}
