use config::{Config, ConfigError, File};
use extractors::{Field, HeaderAliases};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ImporterConfig {
    pub store: Option<StoreConfig>,
    pub import: Option<ImportDefaults>,
    /// Extra accepted header spellings per canonical field, merged over
    /// the built-in aliases.
    pub header_aliases: Option<HashMap<String, Vec<String>>>,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    /// Base URL of the contacts REST endpoint.
    pub url: String,
    pub table: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ImportDefaults {
    pub batch_size: Option<usize>,
    pub threads: Option<usize>,
}

impl ImporterConfig {
    pub fn load(path_override: Option<PathBuf>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path_override.unwrap_or_else(get_config_path);

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            let default_config = r#"
# Base URL of the contacts REST endpoint
# [store]
# url = "https://YOUR_PROJECT.example.co/rest/v1"
# table = "contacts"
# api_key = "YOUR_SERVICE_KEY"

[import]
batch_size = 100
threads = 4

[header_aliases]
# Extra accepted header spellings, merged over the built-in set
# email = ["correo"]
# company = ["account"]
"#;
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let config: ImporterConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }

    /// Built-in header aliases extended with the configured extras.
    pub fn aliases(&self) -> HeaderAliases {
        let mut aliases = HeaderAliases::default();
        if let Some(extra) = &self.header_aliases {
            for (field_name, spellings) in extra {
                match parse_field(field_name) {
                    Some(field) => aliases.extend(field, spellings),
                    None => {
                        tracing::warn!(field = %field_name, "unknown header alias field, ignored")
                    }
                }
            }
        }
        aliases
    }
}

fn parse_field(name: &str) -> Option<Field> {
    match name.to_lowercase().as_str() {
        "name" => Some(Field::Name),
        "email" => Some(Field::Email),
        "phone" => Some(Field::Phone),
        "company" => Some(Field::Company),
        _ => None,
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("outreach").join("importer.toml")
    } else {
        PathBuf::from("importer.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("importer.toml");
        std::fs::write(
            &path,
            r#"
[store]
url = "https://db.example.com/rest/v1"
api_key = "secret"

[import]
batch_size = 50

[header_aliases]
email = ["correo"]
"#,
        )
        .unwrap();

        let (config, loaded_path) = ImporterConfig::load(Some(path.clone())).unwrap();
        assert_eq!(loaded_path, path);
        assert_eq!(config.store.as_ref().unwrap().url, "https://db.example.com/rest/v1");
        assert_eq!(config.import.as_ref().unwrap().batch_size, Some(50));

        let aliases = config.aliases();
        let resolved = aliases.resolve(&["Correo".to_string()]);
        assert_eq!(resolved.header_for(Field::Email), Some("Correo"));
    }

    #[test]
    fn test_missing_file_gets_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("importer.toml");

        let (config, _) = ImporterConfig::load(Some(path.clone())).unwrap();
        assert!(path.exists());
        assert!(config.store.is_none());
        assert_eq!(config.import.as_ref().unwrap().threads, Some(4));
    }

    #[test]
    fn test_unknown_alias_field_is_ignored() {
        let config = ImporterConfig {
            header_aliases: Some(HashMap::from([(
                "nickname".to_string(),
                vec!["alias".to_string()],
            )])),
            ..Default::default()
        };
        let aliases = config.aliases();
        let resolved = aliases.resolve(&["alias".to_string()]);
        assert!(!resolved.is_mapped("alias"));
    }
}
