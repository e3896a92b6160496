//! リサイズ戦略と出力フォーマットごとのパフォーマンス比較ベンチマーク

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use quick_resizer::{
    core::{ResizeStrategy, TargetFormat},
    encoder, process, resize, InputItem, OutputFormat, Preset, ProcessingConfig,
};
use std::io::Cursor;
use std::time::Duration;

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

/// 3戦略のリサイズ単体のベンチマーク
fn benchmark_resize_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resize Strategies");
    group.measurement_time(Duration::from_secs(10));

    let source = gradient(1600, 1200);
    for strategy in [ResizeStrategy::Fit, ResizeStrategy::Fill, ResizeStrategy::Stretch] {
        group.bench_with_input(
            BenchmarkId::new("1600x1200 -> 1080x1080", format!("{strategy:?}")),
            &strategy,
            |b, &strategy| {
                b.iter(|| {
                    let resized = resize::resize(&source, 1080, 1080, strategy, false);
                    std::hint::black_box(resized)
                })
            },
        );
    }

    group.finish();
}

/// フォーマット別のエンコードのベンチマーク
fn benchmark_encoders(c: &mut Criterion) {
    let mut group = c.benchmark_group("Encoders");

    let image = gradient(1080, 1080);
    for format in [TargetFormat::Jpeg, TargetFormat::Png, TargetFormat::WebP] {
        group.bench_with_input(BenchmarkId::from_parameter(format), &format, |b, &format| {
            b.iter(|| std::hint::black_box(encoder::encode(&image, format, 85, Some(72))))
        });
    }

    group.finish();
}

/// バッチ全体（並列パイプライン込み）のベンチマーク
fn benchmark_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch");
    group.sample_size(10);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(error) => panic!("tokio runtime: {error}"),
    };
    let mut buffer = Cursor::new(Vec::new());
    if let Err(error) = gradient(800, 600).write_to(&mut buffer, ImageFormat::Png) {
        panic!("fixture: {error}");
    }
    let data = buffer.into_inner();
    let inputs: Vec<InputItem> = (0..16)
        .map(|i| InputItem::new(format!("image{i}.png"), data.clone()))
        .collect();
    let config = ProcessingConfig::new(Preset::Square1x1).with_output_format(OutputFormat::Jpeg);

    group.bench_function("16 images -> 1:1 JPEG", |b| {
        b.iter(|| {
            let result = runtime.block_on(process(inputs.clone(), &config));
            std::hint::black_box(result)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_resize_strategies,
    benchmark_encoders,
    benchmark_batch
);
criterion_main!(benches);
