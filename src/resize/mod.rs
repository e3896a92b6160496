// リサイズエンジン - Fit / Fill / Stretch の3戦略で出力寸法に合わせる

use crate::core::{ProcessingError, ProcessingResult, ResizeStrategy, TargetFormat};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

/// 拡大・縮小の両方で使用する再サンプリングフィルタ
pub const RESAMPLING_FILTER: FilterType = FilterType::Lanczos3;

/// 余白とアルファ合成に使う不透明な白
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// 透明度を保持すべきか（出力フォーマットと元画像の両方がアルファを持つ場合のみ）
pub fn preserves_alpha(image: &DynamicImage, format: TargetFormat) -> bool {
    format.supports_alpha() && image.color().has_alpha()
}

/// 画像を`(target_width, target_height)`ちょうどにリサイズする
///
/// `keep_alpha`がfalseの場合、透明部分は白背景に合成されRGB画像を返す。
pub fn resize(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    strategy: ResizeStrategy,
    keep_alpha: bool,
) -> ProcessingResult<DynamicImage> {
    let (source_width, source_height) = image.dimensions();
    if source_width == 0 || source_height == 0 {
        return Err(ProcessingError::invalid_image(format!(
            "元画像の寸法が0です ({source_width}x{source_height})"
        )));
    }
    if target_width == 0 || target_height == 0 {
        return Err(ProcessingError::invalid_dimensions(format!(
            "出力寸法が0です ({target_width}x{target_height})"
        )));
    }

    let resized = match strategy {
        ResizeStrategy::Stretch => scale_exact(image, target_width, target_height),
        ResizeStrategy::Fit => fit(image, target_width, target_height, keep_alpha),
        ResizeStrategy::Fill => fill(image, target_width, target_height),
    };

    Ok(apply_background(resized, keep_alpha))
}

/// 倍率適用後の寸法（四捨五入、1..=上限に丸める）
fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let scaled_width = (width as f64 * scale).round().max(1.0) as u32;
    let scaled_height = (height as f64 * scale).round().max(1.0) as u32;
    (scaled_width, scaled_height)
}

fn scale_exact(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    image.resize_exact(width, height, RESAMPLING_FILTER)
}

fn fit(image: &DynamicImage, target_width: u32, target_height: u32, keep_alpha: bool) -> DynamicImage {
    let (source_width, source_height) = image.dimensions();
    let scale = f64::min(
        target_width as f64 / source_width as f64,
        target_height as f64 / source_height as f64,
    );
    let (scaled_width, scaled_height) = scaled_dimensions(source_width, source_height, scale);
    let scaled_width = scaled_width.min(target_width);
    let scaled_height = scaled_height.min(target_height);

    let scaled = scale_exact(image, scaled_width, scaled_height);
    if (scaled_width, scaled_height) == (target_width, target_height) {
        return scaled;
    }

    let fill_color = if keep_alpha { TRANSPARENT } else { BACKGROUND };
    let mut canvas = RgbaImage::from_pixel(target_width, target_height, fill_color);
    let x = ((target_width - scaled_width) / 2) as i64;
    let y = ((target_height - scaled_height) / 2) as i64;
    let layer = scaled.to_rgba8();

    if keep_alpha {
        imageops::replace(&mut canvas, &layer, x, y);
        DynamicImage::ImageRgba8(canvas)
    } else {
        imageops::overlay(&mut canvas, &layer, x, y);
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
    }
}

fn fill(image: &DynamicImage, target_width: u32, target_height: u32) -> DynamicImage {
    let (source_width, source_height) = image.dimensions();
    let (crop_width, crop_height) =
        cover_crop_size(source_width, source_height, target_width, target_height);

    // 元画像の座標で中央を切り出してから縮尺する。端数は後ろ側から切り捨てる
    let cropped = if (crop_width, crop_height) == (source_width, source_height) {
        image.clone()
    } else {
        let x = (source_width - crop_width) / 2;
        let y = (source_height - crop_height) / 2;
        image.crop_imm(x, y, crop_width, crop_height)
    };

    scale_exact(&cropped, target_width, target_height)
}

/// 出力のアスペクト比に合わせた元画像上の切り出しサイズ
fn cover_crop_size(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
) -> (u32, u32) {
    let source_wide = source_width as u64 * target_height as u64;
    let target_wide = target_width as u64 * source_height as u64;

    if source_wide > target_wide {
        // 横長: 幅を削る
        let width = (source_height as f64 * target_width as f64 / target_height as f64).round();
        ((width as u32).clamp(1, source_width), source_height)
    } else if source_wide < target_wide {
        // 縦長: 高さを削る
        let height = (source_width as f64 * target_height as f64 / target_width as f64).round();
        (source_width, (height as u32).clamp(1, source_height))
    } else {
        (source_width, source_height)
    }
}

/// 背景ポリシーを適用
fn apply_background(image: DynamicImage, keep_alpha: bool) -> DynamicImage {
    if keep_alpha {
        return match image {
            DynamicImage::ImageRgba8(_) => image,
            other => DynamicImage::ImageRgba8(other.to_rgba8()),
        };
    }

    if !image.color().has_alpha() {
        return match image {
            DynamicImage::ImageRgb8(_) => image,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };
    }

    flatten(&image)
}

/// アルファ付き画像を白背景に合成してRGBにする
pub fn flatten(image: &DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);
    imageops::overlay(&mut canvas, &image.to_rgba8(), 0, 0);
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
}
