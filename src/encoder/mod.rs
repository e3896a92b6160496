// フォーマットエンコーダー - 処理済み画像をJPEG / PNG / WEBP（Original時はBMP / GIF / TIFFも）へ書き出す

use crate::core::{OutputFormat, ProcessingError, ProcessingResult, TargetFormat};
use crate::resize::flatten;
use anyhow::{anyhow, Context};
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat};
use mockall::automock;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

pub mod density;

/// エンコードバックエンドのトレイト
#[automock]
pub trait EncoderBackend: Send + Sync {
    /// 画像を指定フォーマットのバイト列にする
    ///
    /// `quality`はJPEG/WEBPのみ有効。`dpi`はJPEG/PNGに埋め込まれる。
    fn encode(
        &self,
        image: &DynamicImage,
        format: TargetFormat,
        quality: u8,
        dpi: Option<u32>,
    ) -> ProcessingResult<Vec<u8>>;

    /// エンコーダー名
    fn encoder_name(&self) -> &'static str;
}

/// `image`クレートと`webp`クレートによる標準エンコーダー
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEncoder;

impl StandardEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl EncoderBackend for StandardEncoder {
    fn encode(
        &self,
        image: &DynamicImage,
        format: TargetFormat,
        quality: u8,
        dpi: Option<u32>,
    ) -> ProcessingResult<Vec<u8>> {
        encode(image, format, quality, dpi)
    }

    fn encoder_name(&self) -> &'static str {
        "Standard"
    }
}

/// 出力フォーマットの解決結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResolution {
    pub format: TargetFormat,
    /// 出力ファイル名に付ける拡張子（ドットなし）
    pub extension: String,
    /// フォールバック時の補足
    pub note: Option<String>,
}

/// ファイル名の拡張子
pub fn file_extension(file_name: &str) -> Option<&str> {
    Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .filter(|extension| !extension.is_empty())
}

/// ファイル名の拡張子から元のフォーマットを推定
pub fn infer_format(file_name: &str) -> Option<TargetFormat> {
    file_extension(file_name).and_then(TargetFormat::from_extension)
}

/// 出力フォーマットをアイテム単位で解決
///
/// `Original`で拡張子を認識できない場合はJPEGにフォールバックし、noteに記録する。
pub fn resolve_format(output_format: OutputFormat, file_name: &str) -> FormatResolution {
    let explicit = match output_format {
        OutputFormat::Jpeg => Some(TargetFormat::Jpeg),
        OutputFormat::Png => Some(TargetFormat::Png),
        OutputFormat::WebP => Some(TargetFormat::WebP),
        OutputFormat::Original => None,
    };
    if let Some(format) = explicit {
        return FormatResolution {
            format,
            extension: format.extension().to_string(),
            note: None,
        };
    }

    let original = file_extension(file_name)
        .and_then(|extension| TargetFormat::from_extension(extension).map(|f| (extension, f)));
    match original {
        Some((extension, format)) => FormatResolution {
            format,
            extension: extension.to_string(),
            note: None,
        },
        None => {
            let note = match file_extension(file_name) {
                Some(extension) => format!("拡張子 .{extension} を認識できないためJPEGで出力しました"),
                None => "拡張子がないためJPEGで出力しました".to_string(),
            };
            debug!("{file_name}: {note}");
            FormatResolution {
                format: TargetFormat::Jpeg,
                extension: TargetFormat::Jpeg.extension().to_string(),
                note: Some(note),
            }
        }
    }
}

/// 画像をエンコード
pub fn encode(
    image: &DynamicImage,
    format: TargetFormat,
    quality: u8,
    dpi: Option<u32>,
) -> ProcessingResult<Vec<u8>> {
    let encoded = match format {
        TargetFormat::Jpeg => encode_jpeg(image, quality, dpi),
        TargetFormat::Png => encode_png(image, dpi),
        TargetFormat::WebP => encode_webp(image, quality),
        TargetFormat::Bmp => encode_with_image(&flatten_if_alpha(image), ImageFormat::Bmp),
        TargetFormat::Gif => encode_with_image(image, ImageFormat::Gif),
        TargetFormat::Tiff => encode_with_image(image, ImageFormat::Tiff),
    };
    encoded.map_err(|source| ProcessingError::encode(format.name(), source))
}

fn flatten_if_alpha(image: &DynamicImage) -> DynamicImage {
    if image.color().has_alpha() {
        flatten(image)
    } else {
        image.clone()
    }
}

fn encode_jpeg(image: &DynamicImage, quality: u8, dpi: Option<u32>) -> anyhow::Result<Vec<u8>> {
    // JPEGはアルファを持てないため白背景に合成する
    let rgb = if image.color().has_alpha() {
        flatten(image).into_rgb8()
    } else {
        image.to_rgb8()
    };

    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    if let Some(dpi) = dpi {
        let density = u16::try_from(dpi).unwrap_or(u16::MAX);
        encoder.set_pixel_density(PixelDensity::dpi(density));
    }
    encoder
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .context("JPEGの書き出しに失敗しました")?;
    Ok(buffer)
}

fn encode_png(image: &DynamicImage, dpi: Option<u32>) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilterType::Adaptive);

    if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        encoder
            .write_image(rgba.as_raw(), rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
            .context("PNGの書き出しに失敗しました")?;
    } else {
        let rgb = image.to_rgb8();
        encoder
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .context("PNGの書き出しに失敗しました")?;
    }

    match dpi {
        Some(dpi) => density::insert_png_density(&buffer, dpi),
        None => Ok(buffer),
    }
}

/// `image`クレート標準のエンコーダーで書き出す（qualityとDPIは使わない）
fn encode_with_image(image: &DynamicImage, format: ImageFormat) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, format)
        .with_context(|| format!("{format:?}の書き出しに失敗しました"))?;
    Ok(buffer.into_inner())
}

fn encode_webp(image: &DynamicImage, quality: u8) -> anyhow::Result<Vec<u8>> {
    // 品質100はロスレス
    let lossless = quality >= 100;
    let quality = quality.clamp(1, 100) as f32;

    let memory = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
            .encode_simple(lossless, quality)
    } else {
        let rgb = image.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height())
            .encode_simple(lossless, quality)
    }
    .map_err(|error| anyhow!("WebPの書き出しに失敗しました: {error:?}"))?;

    Ok(memory.to_vec())
}
