use anyhow::Context;
use clap::Parser;
use date_helper::app::commands;
use date_helper::utils::{logger, validation::Validate};
use date_helper::{CliConfig, DateHelper, Settings, TomlConfig};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 載入配置檔 (可選)
    let file_config = match &config.config {
        Some(path) => {
            let file = TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path.display()))?;
            Some(file)
        }
        None => None,
    };

    let settings = Settings::resolve(&config, file_config.as_ref())
        .context("Failed to resolve settings")?;

    // 初始化日誌
    if settings.json_logs {
        logger::init_json_logger(settings.verbose);
    } else {
        logger::init_cli_logger(settings.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    let validation = file_config
        .as_ref()
        .map_or(Ok(()), |file| file.validate())
        .and_then(|_| config.validate());
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let helper = DateHelper::from_config(&settings)?;

    match commands::run(&config.command, &settings, &helper) {
        Ok(output) => {
            if config.json {
                println!("{}", output.to_json()?);
            } else {
                println!("{}", output);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
