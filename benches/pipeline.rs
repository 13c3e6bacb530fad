use std::hint::black_box;

use copy_move_forensics::{CopyMoveConfig, analysis::copy_move::CopyMoveDetector};
use criterion::{Criterion, criterion_group, criterion_main};
use image::{Rgb, RgbImage};

fn textured(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 + y * 13) as u8, (x ^ y) as u8, (x * y) as u8])
    })
}

fn bench_detect(c: &mut Criterion) {
    let detector = CopyMoveDetector::new(CopyMoveConfig::default()).unwrap();

    for side in [64u32, 160] {
        let image = textured(side, side);
        c.bench_function(&format!("detect_{side}x{side}"), |b| {
            b.iter(|| detector.detect(black_box(&image)).unwrap())
        });
    }
}

criterion_group!(benches, bench_detect);
criterion_main!(benches);
