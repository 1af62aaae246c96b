//! src/tests/api/helpers.rs
use order_stats::attribute::AttributeSelector;
use order_stats::configuration::{InputSettings, JobSettings, OutputSettings, Settings};
use order_stats::telemetry::init_tracing;
use order_stats::writer::ReportFormat;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use uuid::Uuid;

static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        init_tracing("debug").expect("Failed to setup tracing");
    }
});

pub fn test_data_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path
}

pub fn input_files(fixture: &str) -> Vec<PathBuf> {
    order_stats::input::list_files(&test_data_dir().join(fixture), "json")
        .expect("Failed to list fixture files")
}

/// Per-test output directory, removed on drop.
pub struct TestOutput {
    pub directory: PathBuf,
}

impl TestOutput {
    pub fn new() -> Self {
        LazyLock::force(&TRACING);
        let directory = std::env::temp_dir().join(format!("order-stats-api-{}", Uuid::new_v4()));
        Self { directory }
    }

    pub fn settings(&self, input: &Path, attribute: &str, workers: usize) -> Settings {
        Settings {
            input: InputSettings {
                directory: input.to_path_buf(),
                extension: "json".into(),
            },
            output: OutputSettings {
                directory: self.directory.clone(),
                format: ReportFormat::Xml,
            },
            job: JobSettings {
                attribute: AttributeSelector::parse(attribute),
                workers,
            },
        }
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.directory.join(name)).expect("Failed to read report")
    }
}

impl Drop for TestOutput {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.directory);
    }
}

/// The `(value, count)` pairs of an XML report, in document order.
pub fn report_items(xml: &str) -> Vec<(String, u64)> {
    let mut items = vec![];
    let mut rest = xml;
    while let Some(start) = rest.find("<value>") {
        rest = &rest[start + "<value>".len()..];
        let value_end = rest.find("</value>").expect("Unterminated value");
        let value = rest[..value_end].to_string();
        let count_start = rest.find("<count>").expect("Missing count") + "<count>".len();
        let count_end = rest.find("</count>").expect("Unterminated count");
        let count = rest[count_start..count_end].parse().expect("Invalid count");
        items.push((value, count));
        rest = &rest[count_end..];
    }
    items
}
