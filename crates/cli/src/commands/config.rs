//! CLI configuration commands

use anyhow::{Context, Result};
use serde_json::json;
use url::Url;

use crate::config::{resolve_api_url, Config};
use crate::output::{print_fields, print_info, print_json, print_success, FieldRow, OutputFormat};

/// Show the stored configuration and the URL that will be used
pub fn show_config(config: &Config, api_url_flag: Option<&str>, format: OutputFormat) -> Result<()> {
    let path = Config::config_path()?;
    let effective = resolve_api_url(api_url_flag, config);

    match format {
        OutputFormat::Json => print_json(&json!({
            "config_path": path.display().to_string(),
            "api_url": config.api_url,
            "effective_api_url": effective,
        }))?,
        OutputFormat::Table => {
            print_fields(vec![
                FieldRow::new("Config file", path.display().to_string()),
                FieldRow::new(
                    "Stored API URL",
                    config.api_url.clone().unwrap_or_else(|| "-".to_string()),
                ),
                FieldRow::new("Effective API URL", effective),
            ]);
            if api_url_flag.is_some() {
                print_info("API URL overridden by --api-url or EVP_API_URL");
            }
        }
    }

    Ok(())
}

/// Store the service URL in the config file
pub fn set_url(mut config: Config, url: &str) -> Result<()> {
    let parsed = Url::parse(url).with_context(|| format!("Invalid API URL: {}", url))?;
    config.api_url = Some(parsed.to_string());
    config.save()?;

    print_success(&format!("API URL set to {}", parsed));
    Ok(())
}
