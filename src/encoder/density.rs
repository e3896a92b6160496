// 解像度(DPI)メタデータの読み書き
// PNGはpHYsチャンク、JPEGはJFIF APP0セグメントを扱う

use anyhow::{bail, Result};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// シグネチャ(8) + IHDRチャンク(長さ4 + 種別4 + データ13 + CRC4)
const IHDR_END: usize = 8 + 4 + 4 + 13 + 4;

const METERS_PER_INCH: f64 = 0.0254;

/// pHYsの単位: メートル
const UNIT_METER: u8 = 1;

pub fn dpi_to_pixels_per_meter(dpi: u32) -> u32 {
    (dpi as f64 / METERS_PER_INCH).round() as u32
}

pub fn pixels_per_meter_to_dpi(pixels_per_meter: u32) -> u32 {
    (pixels_per_meter as f64 * METERS_PER_INCH).round() as u32
}

/// IHDR直後にpHYsチャンクを挿入したPNGを返す
pub fn insert_png_density(png: &[u8], dpi: u32) -> Result<Vec<u8>> {
    if png.len() < IHDR_END || png[..8] != PNG_SIGNATURE || &png[12..16] != b"IHDR" {
        bail!("PNGヘッダーが不正です");
    }

    let pixels_per_meter = dpi_to_pixels_per_meter(dpi);
    let mut body = Vec::with_capacity(4 + 9);
    body.extend_from_slice(b"pHYs");
    body.extend_from_slice(&pixels_per_meter.to_be_bytes());
    body.extend_from_slice(&pixels_per_meter.to_be_bytes());
    body.push(UNIT_METER);

    let mut output = Vec::with_capacity(png.len() + 21);
    output.extend_from_slice(&png[..IHDR_END]);
    output.extend_from_slice(&9u32.to_be_bytes());
    output.extend_from_slice(&body);
    output.extend_from_slice(&crc32fast::hash(&body).to_be_bytes());
    output.extend_from_slice(&png[IHDR_END..]);
    Ok(output)
}

/// PNGのpHYsチャンクからDPIを読み取る
pub fn read_png_density(png: &[u8]) -> Option<u32> {
    if png.len() < 8 || png[..8] != PNG_SIGNATURE {
        return None;
    }

    let mut position = 8;
    while position + 8 <= png.len() {
        let length = u32::from_be_bytes(png[position..position + 4].try_into().ok()?) as usize;
        let kind = &png[position + 4..position + 8];
        let data_start = position + 8;
        let data_end = data_start.checked_add(length)?;
        if data_end > png.len() {
            return None;
        }

        if kind == b"pHYs" && length == 9 {
            let data = &png[data_start..data_end];
            if data[8] != UNIT_METER {
                return None;
            }
            let pixels_per_meter = u32::from_be_bytes(data[..4].try_into().ok()?);
            return Some(pixels_per_meter_to_dpi(pixels_per_meter));
        }
        if kind == b"IDAT" || kind == b"IEND" {
            return None;
        }

        position = data_end + 4;
    }
    None
}

/// JPEGのJFIF APP0セグメントからDPIを読み取る（単位がインチの場合のみ）
pub fn read_jpeg_density(jpeg: &[u8]) -> Option<u32> {
    if jpeg.len() < 18 || jpeg[..4] != [0xFF, 0xD8, 0xFF, 0xE0] || &jpeg[6..11] != b"JFIF\0" {
        return None;
    }
    // 単位 1 = dots per inch
    if jpeg[13] != 1 {
        return None;
    }
    Some(u16::from_be_bytes([jpeg[14], jpeg[15]]) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(3, 2)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_dpi_conversion() {
        assert_eq!(dpi_to_pixels_per_meter(300), 11811);
        assert_eq!(pixels_per_meter_to_dpi(11811), 300);
        assert_eq!(pixels_per_meter_to_dpi(dpi_to_pixels_per_meter(72)), 72);
    }

    #[test]
    fn test_insert_and_read_png_density() {
        let png = png_bytes();
        assert_eq!(read_png_density(&png), None);

        let with_density = insert_png_density(&png, 300).unwrap();
        assert_eq!(with_density.len(), png.len() + 21);
        assert_eq!(read_png_density(&with_density), Some(300));

        // 挿入後も有効なPNGとしてデコードできる
        let decoded = image::load_from_memory(&with_density).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[test]
    fn test_insert_rejects_non_png() {
        assert!(insert_png_density(b"not a png at all, definitely not", 300).is_err());
        assert!(insert_png_density(&[], 300).is_err());
    }

    #[test]
    fn test_read_jpeg_density_rejects_other_data() {
        assert_eq!(read_jpeg_density(b"plain bytes"), None);
        assert_eq!(read_jpeg_density(&png_bytes()), None);
    }
}
