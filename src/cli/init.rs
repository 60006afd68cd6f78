use sheetql::config::{save_config, Config};
use sheetql::error::Result;

/// Run the init command to generate a default configuration
pub fn run(output: Option<String>) -> Result<()> {
    let config = Config::default();

    match output {
        Some(output_path) => {
            save_config(&config, &output_path)?;
            tracing::info!("📝 Generated configuration: {}", output_path);
            tracing::info!("💡 Next steps:");
            tracing::info!("   1. Put .csv or .json files in '{}'", config.source.data_dir);
            tracing::info!("   2. Start server with 'sheetql serve --config {}'", output_path);
        }
        None => {
            let toml_string = toml::to_string_pretty(&config)?;
            println!("{}", toml_string);
        }
    }

    Ok(())
}
