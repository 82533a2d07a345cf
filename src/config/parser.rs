use std::path::Path;

use tracing::warn;

use super::schema::CONFIG_SCHEMA;
use super::types::PortalConfig;
use crate::errors::PortalError;

const MAX_CONFIG_BYTES: u64 = 1_048_576;
const MAX_RETRIES_LIMIT: u32 = 10;

/// Load the config at `path`, or the defaults when no path is given.
pub async fn load_config(path: Option<&Path>) -> Result<PortalConfig, PortalError> {
    match path {
        Some(path) => parse_config(path).await,
        None => Ok(PortalConfig::default()),
    }
}

pub async fn parse_config(path: &Path) -> Result<PortalConfig, PortalError> {
    if !path.exists() {
        return Err(PortalError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(PortalError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<PortalConfig, PortalError> {
    // An empty file is a valid, all-defaults config.
    if content.trim().is_empty() {
        return Ok(PortalConfig::default());
    }
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    validate_schema(&yaml)?;

    let config: PortalConfig = serde_yaml::from_value(yaml)?;
    validate_semantics(&config)?;
    Ok(config)
}

/// Structural check against the JSON schema. Advisory: problems are logged
/// and the typed parse decides.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), PortalError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| PortalError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| PortalError::Config(format!("Schema compilation error: {}", e)))?;

    if let Err(errors) = compiled.validate(&json_value) {
        for e in errors {
            warn!(validation_error = %e, path = %e.instance_path, "Config schema warning");
        }
    }
    Ok(())
}

fn validate_semantics(config: &PortalConfig) -> Result<(), PortalError> {
    if let Some(server) = &config.server {
        if server.port == Some(0) {
            return Err(PortalError::Config("server.port must be between 1 and 65535".into()));
        }
    }

    if let Some(database) = &config.database {
        if database.path.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(PortalError::Config("database.path must not be empty".into()));
        }
    }

    if let Some(notifications) = &config.notifications {
        if let Some(url) = &notifications.webhook_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(PortalError::Config(format!(
                    "notifications.webhook_url must be an http(s) URL, got '{url}'"
                )));
            }
        }
        if notifications.max_retries.is_some_and(|n| n > MAX_RETRIES_LIMIT) {
            return Err(PortalError::Config(format!(
                "notifications.max_retries must be at most {MAX_RETRIES_LIMIT}"
            )));
        }
        if let Some(recipient) = &notifications.vendor_recipient {
            if !recipient.contains('@') {
                warn!(recipient = %recipient, "vendor_recipient does not look like an email address");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_full_config() {
        let config = parse_config_str(
            r#"
server:
  host: 0.0.0.0
  port: 9000
database:
  path: /var/lib/ivv/portal.db
notifications:
  webhook_url: https://hooks.example.gov/ivv
  max_retries: 5
"#,
        )
        .unwrap();
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.port(), 9000);
        assert_eq!(config.db_path(), "/var/lib/ivv/portal.db");
        assert_eq!(config.max_retries(), 5);
    }

    #[test]
    fn test_rejects_non_http_webhook() {
        let err = parse_config_str("notifications:\n  webhook_url: ftp://example.gov\n").unwrap_err();
        assert!(matches!(err, PortalError::Config(_)));
    }

    #[test]
    fn test_rejects_excessive_retries() {
        assert!(parse_config_str("notifications:\n  max_retries: 50\n").is_err());
    }

    #[test]
    fn test_rejects_port_zero() {
        assert!(parse_config_str("server:\n  port: 0\n").is_err());
    }

    #[test]
    fn test_empty_file_is_defaults() {
        let config = parse_config_str("  \n").unwrap();
        assert_eq!(config.port(), 8080);
    }

    #[test]
    fn test_type_errors_are_yaml_errors() {
        let err = parse_config_str("server:\n  port: eighty\n").unwrap_err();
        assert!(matches!(err, PortalError::Yaml(_)));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = parse_config(Path::new("/nonexistent/ivv.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "policy:\n  allow_submit_when_closed: false").unwrap();
        let config = load_config(Some(file.path())).await.unwrap();
        assert!(!config.workflow_policy().allow_submit_when_closed);
        assert_eq!(load_config(None).await.unwrap().port(), 8080);
    }
}
