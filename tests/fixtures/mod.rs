// テスト用の画像データ生成ヘルパー
// 全てメモリ上で生成し、ファイルシステムには依存しない
#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use quick_resizer::InputItem;
use std::io::Cursor;

/// 単色のRGB画像
pub fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

/// 横方向のグラデーション（リサイズ結果の比較用）
pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    }))
}

/// 半透明ピクセルを含むRGBA画像
pub fn translucent_rgba(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 128])))
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient_rgb(width, height), ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient_rgb(width, height), ImageFormat::Jpeg)
}

pub fn rgba_png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&translucent_rgba(width, height), ImageFormat::Png)
}

pub fn png_item(name: &str, width: u32, height: u32) -> InputItem {
    InputItem::new(name, png_bytes(width, height))
}

pub fn jpeg_item(name: &str, width: u32, height: u32) -> InputItem {
    InputItem::new(name, jpeg_bytes(width, height))
}

pub fn corrupt_item(name: &str) -> InputItem {
    InputItem::new(name, b"this is definitely not an image".to_vec())
}

/// ZIPアーカイブのエントリ名を格納順に取得
pub fn archive_entry_names(archive: &[u8]) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}

/// ZIPアーカイブからエントリの中身を取得
pub fn archive_entry(archive: &[u8], name: &str) -> Vec<u8> {
    use std::io::Read;
    let mut zip = zip::ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();
    let mut file = zip.by_name(name).unwrap();
    let mut contents = Vec::new();
    file.read_to_end(&mut contents).unwrap();
    contents
}
