use crate::cli::{collect_inputs, ProcessArgs};
use crate::config::{worker_profile, JobFile, DEFAULT_CUSTOM_SIZE};
use crate::core::{BatchResult, ItemReport, Preset, ProcessingConfig};
use crate::processing::{
    create_default_processing_engine, create_quiet_processing_engine, DefaultWorkerConfig,
    WorkerConfig,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// JSONレポートの構造
#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub generated_at: String,
    pub summary: String,
    pub succeeded: usize,
    pub failed: usize,
    pub total_processing_time_ms: u64,
    pub config: &'a ProcessingConfig,
    pub items: Vec<ItemReport>,
}

impl<'a> BatchReport<'a> {
    pub fn new(result: &BatchResult, config: &'a ProcessingConfig) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary: result.summary(),
            succeeded: result.succeeded,
            failed: result.failed,
            total_processing_time_ms: result.total_processing_time_ms,
            config,
            items: result.report(),
        }
    }
}

/// ジョブファイルの設定にCLI引数を上書き
pub fn build_processing_config(args: &ProcessArgs, base: ProcessingConfig) -> ProcessingConfig {
    let mut config = base;

    if let Some(preset) = args.preset {
        config.preset = preset;
    }
    if args.width.is_some() || args.height.is_some() {
        config.preset = Preset::Custom;
    }
    if let Some(width) = args.width {
        config.custom_width = Some(width);
    }
    if let Some(height) = args.height {
        config.custom_height = Some(height);
    }
    if config.preset == Preset::Custom {
        config.custom_width = config.custom_width.or(Some(DEFAULT_CUSTOM_SIZE.0));
        config.custom_height = config.custom_height.or(Some(DEFAULT_CUSTOM_SIZE.1));
    }

    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(format) = args.format {
        config.output_format = format;
    }
    if let Some(quality) = args.quality {
        config.quality = quality;
    }

    if let Some(prefix) = &args.prefix {
        config.renaming.prefix = prefix.clone();
    }
    if let Some(suffix) = &args.suffix {
        config.renaming.suffix = suffix.clone();
    }
    if args.sequence {
        config.renaming.use_sequence = true;
    }
    if let Some(start) = args.sequence_start {
        config.renaming.sequence_start = start;
    }
    if let Some(padding) = args.sequence_padding {
        config.renaming.sequence_padding = padding;
    }

    config
}

/// ワーカー設定を決定（CLI > ジョブファイル > デフォルト）
pub fn build_worker_config(args: &ProcessArgs, job: &JobFile) -> Result<DefaultWorkerConfig> {
    let mut worker = match &args.profile {
        Some(name) => worker_profile(name)?,
        None => job.worker_config()?,
    };
    if let Some(threads) = args.threads {
        worker = worker.with_max_concurrent(threads);
    }
    if args.quiet {
        worker = worker.with_progress_reporting(false);
    }
    Ok(worker)
}

/// Resize and convert images into a zip archive
pub async fn execute_process(args: ProcessArgs) -> Result<BatchResult> {
    let job = match &args.config {
        Some(path) => JobFile::load(path)?,
        None => JobFile::default(),
    };
    let config = build_processing_config(&args, job.processing.clone());
    let worker = build_worker_config(&args, &job)?;

    if args.output.exists() && !args.force {
        anyhow::bail!(
            "Output file already exists: {} (use --force to overwrite)",
            args.output.display()
        );
    }

    let inputs = collect_inputs(&args.inputs)?;
    if inputs.is_empty() {
        anyhow::bail!("No image files found in the given inputs");
    }
    info!(
        inputs = inputs.len(),
        workers = worker.max_concurrent_tasks(),
        "入力を読み込みました"
    );

    let result = if args.quiet {
        create_quiet_processing_engine(worker)
            .process(inputs, &config)
            .await?
    } else {
        create_default_processing_engine(worker)
            .process(inputs, &config)
            .await?
    };

    if !args.quiet {
        print_summary(&result);
    }

    match &result.archive {
        Some(archive) => {
            write_file(&args.output, archive)?;
            if !args.quiet {
                println!("📦 アーカイブを書き出しました: {}", args.output.display());
            }
        }
        None => eprintln!("⚠️  処理に成功した画像がないため、アーカイブは作成されませんでした"),
    }

    if let Some(report_path) = &args.report {
        let report = BatchReport::new(&result, &config);
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        write_file(report_path, json.as_bytes())?;
        if !args.quiet {
            println!("📄 レポートを書き出しました: {}", report_path.display());
        }
    }

    Ok(result)
}

fn print_summary(result: &BatchResult) {
    println!("\n📊 処理結果: {}", result.summary());
    for item in &result.items {
        match (&item.output_name, item.failure()) {
            (Some(output_name), _) => {
                let size = item
                    .final_dimensions
                    .map(|(w, h)| format!("{w}x{h}"))
                    .unwrap_or_default();
                println!("   ✅ {} -> {} ({size})", item.source_name, output_name);
                if let Some(note) = &item.note {
                    println!("      ℹ️  {note}");
                }
            }
            (None, Some(failure)) => {
                println!(
                    "   ❌ {} [{}] {}",
                    item.source_name, failure.kind, failure.message
                );
            }
            (None, None) => {}
        }
    }
    println!(
        "⏱️  総処理時間: {:.2}秒",
        result.total_processing_time_ms as f64 / 1000.0
    );
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OutputFormat, ResizeStrategy};
    use std::io::Cursor;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn args(inputs: Vec<PathBuf>, output: PathBuf) -> ProcessArgs {
        ProcessArgs {
            inputs,
            output,
            quiet: true,
            ..ProcessArgs::default()
        }
    }

    #[test]
    fn test_build_processing_config_overrides_job_file() {
        let base = ProcessingConfig::new(Preset::Passport).with_quality(70);
        let mut cli = args(vec![], PathBuf::from("out.zip"));
        cli.format = Some(OutputFormat::Png);
        cli.strategy = Some(ResizeStrategy::Stretch);
        cli.prefix = Some("web_".to_string());
        cli.sequence = true;
        cli.sequence_padding = Some(3);

        let config = build_processing_config(&cli, base);
        assert_eq!(config.preset, Preset::Passport);
        assert_eq!(config.quality, 70);
        assert_eq!(config.output_format, OutputFormat::Png);
        assert_eq!(config.strategy, ResizeStrategy::Stretch);
        assert_eq!(config.renaming.prefix, "web_");
        assert!(config.renaming.use_sequence);
        assert_eq!(config.renaming.sequence_start, 1);
        assert_eq!(config.renaming.sequence_padding, 3);
    }

    #[test]
    fn test_width_implies_custom_with_default_height() {
        let mut cli = args(vec![], PathBuf::from("out.zip"));
        cli.width = Some(1024);

        let config = build_processing_config(&cli, ProcessingConfig::default());
        assert_eq!(config.preset, Preset::Custom);
        assert_eq!(config.custom_width, Some(1024));
        assert_eq!(config.custom_height, Some(600));
    }

    #[test]
    fn test_build_worker_config() {
        let mut cli = args(vec![], PathBuf::from("out.zip"));
        cli.profile = Some("testing".to_string());
        cli.threads = Some(5);

        let worker = build_worker_config(&cli, &JobFile::default()).unwrap();
        assert_eq!(worker.max_concurrent_tasks(), 5);
        assert!(!worker.enable_progress_reporting());

        cli.profile = Some("unknown".to_string());
        assert!(build_worker_config(&cli, &JobFile::default()).is_err());
    }

    #[tokio::test]
    async fn test_execute_process_writes_archive_and_report() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("photo.png");
        image::RgbImage::new(50, 30).save(&input).unwrap();
        let broken = temp_dir.path().join("broken.jpg");
        std::fs::write(&broken, b"not an image").unwrap();

        let output = temp_dir.path().join("out").join("result.zip");
        let report = temp_dir.path().join("report.json");
        let mut cli = args(vec![input, broken], output.clone());
        cli.width = Some(20);
        cli.height = Some(20);
        cli.report = Some(report.clone());

        let result = execute_process(cli).await.unwrap();
        assert_eq!(result.succeeded, 1);
        assert_eq!(result.failed, 1);

        let bytes = std::fs::read(&output).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 1);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["succeeded"], 1);
        assert_eq!(json["items"].as_array().unwrap().len(), 2);
        assert_eq!(json["items"][1]["error_kind"], "DecodeError");
    }

    #[tokio::test]
    async fn test_execute_process_refuses_overwrite() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("photo.png");
        image::RgbImage::new(5, 5).save(&input).unwrap();
        let output = temp_dir.path().join("existing.zip");
        std::fs::write(&output, b"keep me").unwrap();

        let result = execute_process(args(vec![input], output.clone())).await;
        assert!(result.is_err());
        assert_eq!(std::fs::read(&output).unwrap(), b"keep me");
    }
}
