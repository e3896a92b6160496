use anyhow::Result;
use clap::Parser;
use quick_resizer::cli::{execute_info, execute_presets, execute_process, Cli, Commands};
use quick_resizer::ProcessingError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOGが優先、なければ--verboseで切り替え
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Process(args) => match execute_process(args).await {
            Ok(result) if result.succeeded == 0 => std::process::exit(1),
            Ok(_) => {}
            Err(error) => {
                eprintln!("❌ エラー: {error:#}");
                if let Some(hint) = error
                    .downcast_ref::<ProcessingError>()
                    .and_then(ProcessingError::suggestion)
                {
                    eprintln!("💡 {hint}");
                }
                std::process::exit(1);
            }
        },
        Commands::Presets => execute_presets(),
        Commands::Info { files, json } => execute_info(files, json)?,
    }

    Ok(())
}
