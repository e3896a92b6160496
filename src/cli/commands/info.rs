use crate::image_loader::{inspect, ImageInfo};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct FileInfo {
    path: String,
    #[serde(flatten)]
    info: ImageInfo,
}

/// 1ファイル分の画像情報を取得
pub fn inspect_file(path: &Path) -> Result<ImageInfo> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    inspect(&data).with_context(|| format!("Failed to inspect image: {}", path.display()))
}

/// Show image information
pub fn execute_info(files: Vec<PathBuf>, json: bool) -> Result<()> {
    let mut infos = Vec::with_capacity(files.len());
    for path in &files {
        infos.push(FileInfo {
            path: path.display().to_string(),
            info: inspect_file(path)?,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    for FileInfo { path, info } in &infos {
        println!("🖼️  {path}");
        println!("   - サイズ: {}x{} px", info.width, info.height);
        println!("   - フォーマット: {}", info.format);
        println!("   - カラー: {}", info.color);
        println!("   - ファイルサイズ: {:.1} KB", info.size_kb);
        match info.dpi {
            Some(dpi) => println!("   - DPI: {dpi}"),
            None => println!("   - DPI: (未設定)"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_inspect_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("test.png");
        image::RgbImage::new(12, 7).save(&path).unwrap();

        let info = inspect_file(&path).unwrap();
        assert_eq!((info.width, info.height), (12, 7));
        assert_eq!(info.format, "PNG");
    }

    #[test]
    fn test_execute_info_fails_on_non_image() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        assert!(execute_info(vec![path], true).is_err());
    }
}
