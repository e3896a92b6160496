// プリセット解決 - プリセット名から出力寸法とDPIを決定する純粋関数

use crate::core::{Preset, ProcessingConfig, ProcessingError, ProcessingResult, ResolvedTarget};

/// 画面表示用プリセットのDPI
pub const DISPLAY_DPI: u32 = 72;

/// 印刷用プリセットのDPI
pub const PRINT_DPI: u32 = 300;

const MM_PER_INCH: f64 = 25.4;

/// パスポート写真の物理サイズ (幅, 高さ) [mm]
pub const PASSPORT_SIZE_MM: (f64, f64) = (35.0, 45.0);

/// ミリメートルを指定DPIでのピクセル数に変換
pub fn mm_to_pixels(mm: f64, dpi: u32) -> u32 {
    (mm / MM_PER_INCH * dpi as f64).round() as u32
}

/// プリセットを具体的な寸法に解決
///
/// Customの場合は`custom_width`/`custom_height`が両方とも1以上である必要がある。
pub fn resolve(
    preset: Preset,
    custom_width: Option<u32>,
    custom_height: Option<u32>,
) -> ProcessingResult<ResolvedTarget> {
    let target = match preset {
        Preset::Square1x1 => ResolvedTarget {
            width: 1080,
            height: 1080,
            dpi: DISPLAY_DPI,
        },
        Preset::FullHd1080p => ResolvedTarget {
            width: 1920,
            height: 1080,
            dpi: DISPLAY_DPI,
        },
        Preset::Passport => ResolvedTarget {
            width: mm_to_pixels(PASSPORT_SIZE_MM.0, PRINT_DPI),
            height: mm_to_pixels(PASSPORT_SIZE_MM.1, PRINT_DPI),
            dpi: PRINT_DPI,
        },
        Preset::Custom => {
            let (width, height) = match (custom_width, custom_height) {
                (Some(width), Some(height)) => (width, height),
                _ => {
                    return Err(ProcessingError::invalid_dimensions(
                        "Customプリセットには幅と高さの両方が必要です",
                    ))
                }
            };
            ResolvedTarget {
                width,
                height,
                dpi: DISPLAY_DPI,
            }
        }
    };

    if target.width == 0 || target.height == 0 {
        return Err(ProcessingError::invalid_dimensions(format!(
            "幅と高さは1以上である必要があります ({}x{})",
            target.width, target.height
        )));
    }

    Ok(target)
}

/// 設定値からプリセットを解決
pub fn resolve_config(config: &ProcessingConfig) -> ProcessingResult<ResolvedTarget> {
    resolve(config.preset, config.custom_width, config.custom_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_preset() {
        let target = resolve(Preset::Square1x1, None, None).unwrap();
        assert_eq!(target.dimensions(), (1080, 1080));
        assert_eq!(target.dpi, DISPLAY_DPI);
    }

    #[test]
    fn test_full_hd_preset() {
        let target = resolve(Preset::FullHd1080p, None, None).unwrap();
        assert_eq!(target.dimensions(), (1920, 1080));
    }

    #[test]
    fn test_passport_preset() {
        let target = resolve(Preset::Passport, None, None).unwrap();
        assert_eq!(target.dimensions(), (413, 531));
        assert_eq!(target.dpi, 300);
    }

    #[test]
    fn test_presets_ignore_custom_values() {
        let target = resolve(Preset::FullHd1080p, Some(10), Some(10)).unwrap();
        assert_eq!(target.dimensions(), (1920, 1080));
    }

    #[test]
    fn test_custom_preset() {
        let target = resolve(Preset::Custom, Some(800), Some(600)).unwrap();
        assert_eq!(target.dimensions(), (800, 600));
    }

    #[test]
    fn test_custom_preset_missing_dimension() {
        let result = resolve(Preset::Custom, Some(800), None);
        assert!(matches!(result, Err(ProcessingError::InvalidDimensions { .. })));

        let result = resolve(Preset::Custom, None, None);
        assert!(matches!(result, Err(ProcessingError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_custom_preset_zero_dimension() {
        let result = resolve(Preset::Custom, Some(0), Some(600));
        assert!(matches!(result, Err(ProcessingError::InvalidDimensions { .. })));

        let result = resolve(Preset::Custom, Some(800), Some(0));
        assert!(matches!(result, Err(ProcessingError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_mm_to_pixels() {
        assert_eq!(mm_to_pixels(25.4, 300), 300);
        assert_eq!(mm_to_pixels(35.0, 300), 413);
        assert_eq!(mm_to_pixels(45.0, 300), 531);
    }

    #[test]
    fn test_resolve_config() {
        let config = ProcessingConfig::default().with_custom_size(320, 240);
        assert_eq!(resolve_config(&config).unwrap().dimensions(), (320, 240));
    }
}
