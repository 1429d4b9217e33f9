use anyhow::{Context, Result};
use cadenza_remote::{config, Config};
use toml_edit::{value, DocumentMut};

const VALID_KEYS: &str =
    "catalog_base_url, spotify_client_id, spotify_client_secret, request_timeout_secs";

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    println!("  catalog_base_url: {}", config.catalog_base_url);
    println!(
        "  spotify_client_id: {}",
        config.spotify_client_id.as_deref().unwrap_or("<not set>")
    );
    println!(
        "  spotify_client_secret: {}",
        redact(config.spotify_client_secret.as_deref())
    );
    println!("  request_timeout_secs: {}", config.request_timeout_secs);
    println!(
        "  album order: {}",
        if config.spotify_credentials().is_some() {
            "enabled"
        } else {
            "disabled (no Spotify credentials)"
        }
    );

    println!("\nPriority: CLI args > ENV vars (CADENZA_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the whole file.
pub fn get_config(key: Option<String>) -> Result<()> {
    let Some(key) = key else {
        let config_path = config::config_file_path();
        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{contents}");
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'cadenza config init' to create it.");
        }
        return Ok(());
    };

    let config = Config::load()?;
    match key.as_str() {
        "catalog_base_url" => println!("{}", config.catalog_base_url),
        "spotify_client_id" => println!(
            "{}",
            config.spotify_client_id.as_deref().unwrap_or("<not set>")
        ),
        "spotify_client_secret" => {
            println!("{}", redact(config.spotify_client_secret.as_deref()));
        }
        "request_timeout_secs" => println!("{}", config.request_timeout_secs),
        _ => anyhow::bail!("Unknown config key: {key}\n\nValid keys: {VALID_KEYS}"),
    }

    Ok(())
}

/// Set a config value, keeping the rest of the file intact.
pub fn set_config(key: &str, new_value: &str) -> Result<()> {
    let config_path = config::config_file_path();
    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = set_value(&contents, key, new_value)?;
    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    let shown = if key == "spotify_client_secret" {
        redact(Some(new_value))
    } else {
        new_value.to_string()
    };
    println!("✓ Updated {key} = {shown}");
    println!("  in {}", config_path.display());

    Ok(())
}

/// Apply one key update to TOML `contents`.
fn set_value(contents: &str, key: &str, new_value: &str) -> Result<String> {
    let mut doc: DocumentMut = contents.parse().context("Config file is not valid TOML")?;

    match key {
        "catalog_base_url" | "spotify_client_id" | "spotify_client_secret" => {
            doc[key] = value(new_value);
        }
        "request_timeout_secs" => {
            let secs: i64 = new_value.parse().with_context(|| {
                format!("request_timeout_secs must be a whole number, got {new_value:?}")
            })?;
            anyhow::ensure!(secs > 0, "request_timeout_secs must be positive");
            doc[key] = value(secs);
        }
        _ => anyhow::bail!("Unknown config key: {key}\n\nValid keys: {VALID_KEYS}"),
    }

    Ok(doc.to_string())
}

fn redact(secret: Option<&str>) -> String {
    match secret {
        Some(s) if !s.is_empty() => "********".to_string(),
        _ => "<not set>".to_string(),
    }
}

/// Show the config file path.
pub fn show_path() {
    println!("{}", config::config_file_path().display());
}

/// Show example configuration.
pub fn show_example() {
    print!("{}", config::example_config());
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure cadenza.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
