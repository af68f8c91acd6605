use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses the credentials file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML credentials file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use reddit_harvester::config::load_config;
///
/// let config = load_config(Path::new("credentials.toml")).unwrap();
/// println!("User agent: {}", config.credentials.user_agent);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the credentials file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[credentials]
client-id = "abc"
client-secret = "def"
user-agent = "harvester/1.0 (by u/someone)"

[fetch]
skip-deleted = false
max-pages = 10

[retry]
max-attempts = 3
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.credentials.client_id, "abc");
        assert!(!config.fetch.skip_deleted);
        assert!(config.fetch.skip_removed); // default
        assert_eq!(config.fetch.max_pages, 10);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_delay_ms, 1000); // default
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config_content = r#"
[credentials]
client-id = "abc"
client-secret = "def"
user-agent = "harvester/1.0"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert!(config.fetch.skip_deleted);
        assert!(config.fetch.scrape_comments);
        assert_eq!(config.fetch.max_pages, 50);
        assert_eq!(config.fetch.window_days, 1);
        assert_eq!(config.retry.max_attempts, 5);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/credentials.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[credentials]
client-id = ""
client-secret = "def"
user-agent = "harvester/1.0"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
