use sheetql::error::Result;
use std::fs;

/// Run the schema command to print the SDL of the generated schema
pub fn run(config_path: String, output: Option<String>) -> Result<()> {
    let config = sheetql::config::load_config(&config_path)?;
    let schema = super::build_schema_from_config(&config)?;
    let sdl = schema.sdl();

    match output {
        Some(path) => {
            fs::write(&path, sdl)?;
            tracing::info!("📝 Wrote schema to {}", path);
        }
        None => println!("{}", sdl),
    }

    Ok(())
}
