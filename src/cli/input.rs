// 入力収集 - ファイル・ディレクトリからInputItemを作る

use crate::core::InputItem;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// ディレクトリ走査で拾う拡張子
pub fn is_image_extension(extension: &str) -> bool {
    matches!(
        extension,
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tiff" | "tif" | "webp"
    )
}

/// ディレクトリを再帰的に走査し、画像ファイルをファイル名順で返す
pub fn scan_directory(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut file_paths = Vec::new();

    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;

        if entry.file_type().is_file() {
            if let Some(extension) = entry.path().extension() {
                let ext = extension.to_string_lossy().to_lowercase();
                if is_image_extension(&ext) {
                    file_paths.push(entry.path().to_path_buf());
                }
            }
        }
    }

    Ok(file_paths)
}

/// 引数のパスを入力順に展開して読み込む
///
/// 明示的に指定されたファイルは拡張子に関係なく含める（デコード失敗はアイテム単位で扱う）。
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<InputItem>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(scan_directory(path)?);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            anyhow::bail!("Input does not exist: {}", path.display());
        }
    }

    files
        .into_iter()
        .map(|path| {
            let data = std::fs::read(&path)
                .with_context(|| format!("Failed to read input: {}", path.display()))?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(InputItem::new(name, data))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_directory_filters_and_sorts() {
        let temp_dir = tempdir().unwrap();
        let temp_path = temp_dir.path();
        fs::create_dir(temp_path.join("nested")).unwrap();

        fs::write(temp_path.join("b.png"), b"dummy").unwrap();
        fs::write(temp_path.join("a.JPG"), b"dummy").unwrap();
        fs::write(temp_path.join("document.txt"), b"dummy").unwrap();
        fs::write(temp_path.join("nested").join("c.webp"), b"dummy").unwrap();

        let result = scan_directory(temp_path).unwrap();
        let names: Vec<String> = result
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.JPG", "b.png", "c.webp"]);
    }

    #[test]
    fn test_collect_inputs_keeps_argument_order() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().join("photos");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("x.png"), b"x").unwrap();
        fs::write(dir.join("y.png"), b"y").unwrap();
        let single = temp_dir.path().join("first.dat");
        fs::write(&single, b"first").unwrap();

        let items = collect_inputs(&[single, dir]).unwrap();
        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();

        assert_eq!(names, vec!["first.dat", "x.png", "y.png"]);
        assert_eq!(items[0].data, b"first");
    }

    #[test]
    fn test_collect_inputs_missing_path() {
        let temp_dir = tempdir().unwrap();
        assert!(collect_inputs(&[temp_dir.path().join("missing.jpg")]).is_err());
    }

    #[test]
    fn test_is_image_extension() {
        assert!(is_image_extension("jpg"));
        assert!(is_image_extension("webp"));
        assert!(!is_image_extension("txt"));
    }
}
