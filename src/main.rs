use anyhow::Context;
use clap::Parser;
use meal_map::domain::ports::ConfigProvider;
use meal_map::utils::logger::{self, LogFormat};
use meal_map::utils::validation::Validate;
use meal_map::{CliConfig, DataLoader, HtmlRenderer, LocalStorage, MapEngine, MapError, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(LogFormat::from_json_flag(cli.log_json), cli.verbose);

    tracing::info!("Starting meal-map");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = TomlConfig::from_file(&path)
                .with_context(|| format!("failed to load config file '{}'", path))?;
            run(config).await
        }
        None => run(cli).await,
    };

    match result {
        Ok(output_path) => {
            tracing::info!("✅ Map rendered successfully!");
            println!("✅ Map rendered successfully!");
            println!("📁 Output saved to: {}", output_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Map rendering failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            std::process::exit(e.severity().exit_code());
        }
    }
}

async fn run<C: ConfigProvider>(config: C) -> Result<String, MapError>
where
    C: Validate,
{
    config.validate()?;

    let settings = config.render_settings();
    settings.validate()?;

    let container_id = config.container_id().to_string();
    let map_name = config.map_name().to_string();
    let output_path = config.output_path().to_string();
    let output_file = config.output_file().to_string();

    // 資料集路徑相對於目前工作目錄
    let loader = DataLoader::new(LocalStorage::new("."), config)?;
    let engine = MapEngine::new(loader, &container_id, &map_name, settings);

    let (renderer, summary) = engine.run(HtmlRenderer::new()).await?;
    tracing::info!(
        "📊 Records: {}, resolved points: {}, skipped fields: {}, displayed: {}",
        summary.records_loaded,
        summary.points_resolved,
        summary.fields_skipped,
        summary.points_displayed
    );

    let storage = LocalStorage::new(&output_path);
    renderer.port().publish(&storage, &output_file).await?;

    Ok(storage.resolve(&output_file).display().to_string())
}
