use super::{ImageLoaderBackend, LoadResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use image::{ImageReader, Limits};
use std::io::Cursor;
use std::time::Instant;

/// 標準的な画像ローダー実装
#[derive(Clone, Debug)]
pub struct StandardImageLoader {
    max_dimension: Option<u32>,
}

impl Default for StandardImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardImageLoader {
    /// 新しい標準画像ローダーを作成
    pub fn new() -> Self {
        Self {
            max_dimension: None,
        }
    }

    /// 最大サイズ制限付きの画像ローダーを作成
    ///
    /// 幅または高さが制限を超える画像はデコードせずにエラーとする。
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension: Some(max_dimension),
        }
    }

    fn limits(&self) -> Limits {
        let mut limits = Limits::default();
        if let Some(max_dim) = self.max_dimension {
            limits.max_image_width = Some(max_dim);
            limits.max_image_height = Some(max_dim);
        }
        limits
    }
}

#[async_trait]
impl ImageLoaderBackend for StandardImageLoader {
    async fn load_from_bytes(&self, data: &[u8]) -> Result<LoadResult> {
        let start_time = Instant::now();
        let limits = self.limits();

        let (image, detected_format) = tokio::task::spawn_blocking({
            let data = data.to_vec();
            move || -> Result<_> {
                let mut reader = ImageReader::new(Cursor::new(data))
                    .with_guessed_format()
                    .context("Failed to guess image format")?;
                reader.limits(limits);
                let format = reader.format();
                let image = reader.decode().context("Failed to decode image")?;
                Ok((image, format))
            }
        })
        .await
        .context("Failed to spawn blocking task for image loading")??;

        let original_dimensions = (image.width(), image.height());
        let load_time_ms = start_time.elapsed().as_millis() as u64;

        Ok(LoadResult {
            image,
            original_dimensions,
            detected_format,
            load_time_ms,
        })
    }

    fn strategy_name(&self) -> &'static str {
        if self.max_dimension.is_some() {
            "Standard with size limit"
        } else {
            "Standard"
        }
    }

    fn max_supported_pixels(&self) -> Option<u64> {
        self.max_dimension.map(|dim| (dim as u64) * (dim as u64))
    }
}
