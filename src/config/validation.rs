use crate::config::types::Config;
use crate::ConfigError;

/// Validates a parsed configuration
///
/// Credentials must be present and non-empty; the tuning knobs must be in
/// ranges the fetch pipeline can actually run with.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.credentials.client_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "credentials.client-id must not be empty".to_string(),
        ));
    }

    if config.credentials.client_secret.trim().is_empty() {
        return Err(ConfigError::Validation(
            "credentials.client-secret must not be empty".to_string(),
        ));
    }

    if config.credentials.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "credentials.user-agent must not be empty".to_string(),
        ));
    }

    if config.fetch.max_pages == 0 {
        return Err(ConfigError::Validation(
            "fetch.max-pages must be at least 1".to_string(),
        ));
    }

    if config.fetch.window_days == 0 {
        return Err(ConfigError::Validation(
            "fetch.window-days must be at least 1".to_string(),
        ));
    }

    if config.retry.max_attempts == 0 {
        return Err(ConfigError::Validation(
            "retry.max-attempts must be at least 1".to_string(),
        ));
    }

    if config.retry.backoff_multiplier < 1.0 {
        return Err(ConfigError::Validation(
            "retry.backoff-multiplier must be at least 1.0".to_string(),
        ));
    }

    if config.retry.max_delay_ms < config.retry.base_delay_ms {
        return Err(ConfigError::Validation(
            "retry.max-delay-ms must not be smaller than retry.base-delay-ms".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{Credentials, FetchConfig, RetryConfig};

    fn valid_config() -> Config {
        Config {
            credentials: Credentials {
                client_id: "abc".to_string(),
                client_secret: "def".to_string(),
                user_agent: "harvester/1.0".to_string(),
            },
            fetch: FetchConfig::default(),
            retry: RetryConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_client_id_rejected() {
        let mut config = valid_config();
        config.credentials.client_id = "  ".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut config = valid_config();
        config.credentials.user_agent = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let mut config = valid_config();
        config.fetch.max_pages = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = valid_config();
        config.retry.max_attempts = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_inverted_delay_bounds_rejected() {
        let mut config = valid_config();
        config.retry.base_delay_ms = 5000;
        config.retry.max_delay_ms = 1000;
        assert!(validate(&config).is_err());
    }
}
