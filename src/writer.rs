//! src/writer.rs
use crate::error::StatisticsError;
use crate::report::ReportEntry;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Xml,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Xml => "xml",
            ReportFormat::Json => "json",
        }
    }
}

#[derive(Serialize)]
#[serde(rename = "statistics")]
struct XmlDocument<'a> {
    items: XmlItems<'a>,
}

#[derive(Serialize)]
struct XmlItems<'a> {
    item: &'a [ReportEntry],
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    attribute: &'a str,
    items: &'a [ReportEntry],
}

/// Writes a finished report to `statistics_by_<attribute>.<ext>`.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    directory: PathBuf,
    format: ReportFormat,
}

impl ReportWriter {
    pub fn new(directory: impl Into<PathBuf>, format: ReportFormat) -> Self {
        Self {
            directory: directory.into(),
            format,
        }
    }

    pub fn output_path(&self, attribute: &str) -> PathBuf {
        self.directory
            .join(format!("statistics_by_{}.{}", attribute, self.format.extension()))
    }

    #[tracing::instrument(name = "Write report", skip_all, fields(attribute = %attribute))]
    pub fn write(&self, attribute: &str, entries: &[ReportEntry]) -> Result<PathBuf, StatisticsError> {
        let path = self.output_path(attribute);
        self.write_to(&path, attribute, entries)
            .map_err(StatisticsError::ReportWrite)?;
        tracing::info!("Statistics saved to {}", path.display());
        Ok(path)
    }

    fn write_to(&self, path: &Path, attribute: &str, entries: &[ReportEntry]) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.directory).with_context(|| {
            format!("Failed to create output directory {}", self.directory.display())
        })?;
        let body = match self.format {
            ReportFormat::Xml => render_xml(entries)?,
            ReportFormat::Json => render_json(attribute, entries)?,
        };
        std::fs::write(path, body)
            .with_context(|| format!("Failed to write report {}", path.display()))
    }
}

fn render_xml(entries: &[ReportEntry]) -> anyhow::Result<String> {
    let mut body = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut body);
    serializer.indent(' ', 2);
    XmlDocument {
        items: XmlItems { item: entries },
    }
    .serialize(serializer)
    .context("Failed to serialize report as XML")?;
    Ok(format!("{XML_DECLARATION}\n{body}\n"))
}

fn render_json(attribute: &str, entries: &[ReportEntry]) -> anyhow::Result<String> {
    let body = serde_json::to_string_pretty(&JsonDocument {
        attribute,
        items: entries,
    })
    .context("Failed to serialize report as JSON")?;
    Ok(body + "\n")
}
