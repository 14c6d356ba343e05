use anyhow::Context;
use clap::Parser;
use textnorm::config::toml_config::TomlConfig;
use textnorm::utils::report::RunReport;
use textnorm::utils::{logger, validation::Validate};
use textnorm::{CliConfig, LocalStorage, LogFormat, NormalizeEngine, RunSettings};

fn main() {
    // clap 預設以 2 結束；無效參數一律改為 1，說明頁仍為 0
    let config = match CliConfig::try_parse() {
        Ok(config) => config,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };

    let file_config = match &config.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(file_config) => Some(file_config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        },
        None => None,
    };

    let settings = config.resolve(file_config.as_ref());

    // 初始化日誌
    match settings.log_format {
        LogFormat::Text => logger::init_cli_logger(settings.request.verbose),
        LogFormat::Json => logger::init_json_logger(settings.request.verbose),
    }

    tracing::debug!("Run settings: {:?}", settings);

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if settings.request.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no file will be modified");
    }

    if let Err(e) = run(&settings) {
        tracing::error!("❌ {:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn run(settings: &RunSettings) -> anyhow::Result<()> {
    let engine = NormalizeEngine::new(LocalStorage, settings.request.clone());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = engine
        .run(&settings.paths, &mut out)
        .context("failed to process input paths")?;

    if let Some(path) = &settings.report_path {
        RunReport::new(engine.request(), &summary)
            .write_to(path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!("📁 Report saved to: {}", path.display());
    }

    Ok(())
}
