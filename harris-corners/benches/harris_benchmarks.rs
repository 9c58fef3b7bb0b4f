use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use harris_corners::{DetectorBuilder, Grid, HarrisConfig, HarrisDetector, IntensityGrid, NonMaxSuppressor};

/// Synthetic image with corner-like structure
fn create_benchmark_image(width: usize, height: usize, complexity: &str) -> IntensityGrid {
    let mut img = Grid::filled(width, height, 128.0f32).unwrap();

    match complexity {
        "simple" => {
            // One bright square in the middle
            let (cy, cx) = (height / 2, width / 2);
            for row in cy - 2..=cy + 2 {
                for col in cx - 2..=cx + 2 {
                    img[(row, col)] = 255.0;
                }
            }
        }
        "checkerboard" => {
            for row in 0..height {
                for col in 0..width {
                    if (row / 16 + col / 16) % 2 == 0 {
                        img[(row, col)] = 30.0;
                    }
                }
            }
        }
        "realistic" => {
            // Gradient with periodic texture and scattered blocks
            for row in 0..height {
                for col in 0..width {
                    let gradient = (col as f32 / width as f32) * 50.0;
                    let texture = ((row + col) % 7) as f32;
                    img[(row, col)] = 100.0 + gradient + texture;
                }
            }
            for i in 0..40 {
                let cy = (i * 37) % (height - 8);
                let cx = (i * 61) % (width - 8);
                for row in cy..cy + 6 {
                    for col in cx..cx + 6 {
                        img[(row, col)] = if i % 2 == 0 { 20.0 } else { 230.0 };
                    }
                }
            }
        }
        _ => {}
    }

    img
}

fn create_test_config() -> HarrisConfig {
    HarrisConfig {
        n_threads: 1,
        ..HarrisConfig::default()
    }
}

/// Full detection across sizes and content
fn bench_full_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_detection");
    let detector = HarrisDetector::new(create_test_config()).unwrap();

    let sizes = [(64, 64), (256, 256), (640, 480), (1024, 768)];
    let complexities = ["simple", "checkerboard", "realistic"];

    for &(width, height) in &sizes {
        for complexity in &complexities {
            let img = create_benchmark_image(width, height, complexity);
            group.bench_with_input(
                BenchmarkId::new(format!("{}x{}", width, height), complexity),
                &img,
                |b, img| b.iter(|| black_box(detector.detect(black_box(img)).unwrap())),
            );
        }
    }

    group.finish();
}

/// Each stage on its own, cumulative from the input grid
fn bench_pipeline_stages(c: &mut Criterion) {
    let detector = HarrisDetector::new(create_test_config()).unwrap();
    let img = create_benchmark_image(640, 480, "realistic");

    let mut group = c.benchmark_group("pipeline_stages");

    group.bench_function("gradients", |b| {
        b.iter(|| black_box(detector.gradients(black_box(&img)).unwrap()))
    });
    group.bench_function("structure_tensor", |b| {
        b.iter(|| black_box(detector.structure_tensor(black_box(&img)).unwrap()))
    });
    group.bench_function("response_map", |b| {
        b.iter(|| black_box(detector.response_map(black_box(&img)).unwrap()))
    });

    let response = detector.response_map(&img).unwrap();
    let suppressor = NonMaxSuppressor::from_config(detector.config());
    group.bench_function("non_maximum_suppression", |b| {
        b.iter(|| black_box(suppressor.suppress(black_box(&response)).unwrap()))
    });

    group.finish();
}

/// Exclusion radius drives the cost of the mask updates
fn bench_nms_radius(c: &mut Criterion) {
    let detector = HarrisDetector::new(create_test_config()).unwrap();
    let img = create_benchmark_image(640, 480, "checkerboard");
    let response = detector.response_map(&img).unwrap();

    let mut group = c.benchmark_group("nms_radius");
    for radius in [1, 5, 10, 20, 40] {
        let suppressor = NonMaxSuppressor::new(10, 10, 10, radius, 10_000.0);
        group.bench_with_input(BenchmarkId::from_parameter(radius), &suppressor, |b, s| {
            b.iter(|| black_box(s.suppress(black_box(&response)).unwrap()))
        });
    }
    group.finish();
}

fn benchmark_detector_builder_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("DetectorBuilder Presets");
    let img = create_benchmark_image(640, 480, "realistic");

    group.bench_function("dense_preset", |b| {
        b.iter(|| {
            let detector = DetectorBuilder::new().preset_dense().build().unwrap();
            detector.detect(&img).unwrap()
        })
    });
    group.bench_function("sparse_preset", |b| {
        b.iter(|| {
            let detector = DetectorBuilder::new().preset_sparse().build().unwrap();
            detector.detect(&img).unwrap()
        })
    });
    group.bench_function("no_pre_blur", |b| {
        b.iter(|| {
            let detector = DetectorBuilder::new().pre_blur(false).build().unwrap();
            detector.detect(&img).unwrap()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_full_detection,
    bench_pipeline_stages,
    bench_nms_radius,
    benchmark_detector_builder_presets
);
criterion_main!(benches);
