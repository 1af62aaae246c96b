//! src/configuration.rs
use crate::attribute::AttributeSelector;
use crate::writer::ReportFormat;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::path::PathBuf;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub input: InputSettings,
    pub output: OutputSettings,
    pub job: JobSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct InputSettings {
    pub directory: PathBuf,
    pub extension: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct OutputSettings {
    pub directory: PathBuf,
    #[serde(default)]
    pub format: ReportFormat,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct JobSettings {
    pub attribute: AttributeSelector,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub workers: usize,
}

/// Reads `configuration/base.yaml` from the working directory, then applies
/// `ORDER_STATS_*` overrides, e.g. `ORDER_STATS_JOB__ATTRIBUTE=city`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let config_dir = base_path.join("configuration");

    let settings = config::Config::builder()
        .add_source(config::File::from(config_dir.join("base.yaml")))
        .add_source(
            config::Environment::with_prefix("ORDER_STATS")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}
