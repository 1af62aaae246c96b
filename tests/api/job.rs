//! src/tests/api/job.rs
use crate::helpers::{TestOutput, report_items, test_data_dir};
use claims::{assert_err, assert_matches, assert_ok};
use order_stats::error::{StatisticsError, UnknownAttribute};
use order_stats::job::StatisticsJob;
use order_stats::writer::ReportFormat;

fn items(pairs: &[(&str, u64)]) -> Vec<(String, u64)> {
    pairs.iter().map(|(v, c)| (v.to_string(), *c)).collect()
}

#[test]
fn should_write_status_statistics() {
    // Arrange
    let output = TestOutput::new();
    let settings = output.settings(&test_data_dir().join("orders"), "status", 2);

    // Act
    let summary = assert_ok!(StatisticsJob::new(settings).run());

    // Assert
    assert_eq!(summary.output, output.directory.join("statistics_by_status.xml"));
    assert_eq!(summary.files_processed, 3);
    assert_eq!(summary.files_failed, 0);
    assert_eq!(summary.distinct_values, 2);
    let xml = output.read("statistics_by_status.xml");
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert_eq!(report_items(&xml), items(&[("NEW", 2), ("DONE", 1)]));
}

#[test]
fn should_count_split_tags_once_per_order() {
    let output = TestOutput::new();
    let settings = output.settings(&test_data_dir().join("orders"), "tags", 3);

    assert_ok!(StatisticsJob::new(settings).run());

    let xml = output.read("statistics_by_tags.xml");
    assert_eq!(report_items(&xml), items(&[("gift", 3), ("urgent", 2), ("vip", 1)]));
}

#[test]
fn should_count_customer_fields() {
    let output = TestOutput::new();
    let input = test_data_dir().join("orders");

    assert_ok!(StatisticsJob::new(output.settings(&input, "city", 8)).run());
    assert_ok!(StatisticsJob::new(output.settings(&input, "id", 1)).run());
    assert_ok!(StatisticsJob::new(output.settings(&input, "phone", 1)).run());

    assert_eq!(
        report_items(&output.read("statistics_by_city.xml")),
        items(&[("Kyiv", 2), ("Lviv", 1)])
    );
    assert_eq!(
        report_items(&output.read("statistics_by_id.xml")),
        items(&[("cust-1", 2), ("cust-2", 1)])
    );
    assert_eq!(
        report_items(&output.read("statistics_by_phone.xml")),
        items(&[("+380501112233", 1)])
    );
}

#[test]
fn should_keep_partial_counts_from_malformed_files() {
    let output = TestOutput::new();
    let settings = output.settings(&test_data_dir().join("mixed"), "status", 2);

    let summary = assert_ok!(StatisticsJob::new(settings).run());

    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.files_failed, 2);
    assert_eq!(
        report_items(&output.read("statistics_by_status.xml")),
        items(&[("NEW", 3), ("DONE", 1)])
    );
}

#[test]
fn should_abort_without_report_for_unknown_attribute() {
    let output = TestOutput::new();
    let settings = output.settings(&test_data_dir().join("orders"), "bogus", 2);

    let err = assert_err!(StatisticsJob::new(settings).run());

    assert_matches!(&err, StatisticsError::Aborted(UnknownAttribute(name)) if name == "bogus");
    assert_eq!(err.to_string(), "Statistics run aborted");
    assert!(!output.directory.join("statistics_by_bogus.xml").exists());
}

#[test]
fn should_abort_unknown_attribute_even_without_records() {
    let output = TestOutput::new();
    let settings = output.settings(&test_data_dir().join("unmatched"), "bogus", 2);

    let err = assert_err!(StatisticsJob::new(settings).run());

    assert_matches!(&err, StatisticsError::Aborted(UnknownAttribute(name)) if name == "bogus");
    assert!(!output.directory.join("statistics_by_bogus.xml").exists());
}

#[test]
fn should_fail_for_missing_input_directory() {
    let output = TestOutput::new();
    let settings = output.settings(&test_data_dir().join("does-not-exist"), "status", 2);

    assert_matches!(
        StatisticsJob::new(settings).run(),
        Err(StatisticsError::DirectoryNotFound(_))
    );
}

#[test]
fn should_fail_when_no_input_files_match() {
    let output = TestOutput::new();
    let mut settings = output.settings(&test_data_dir().join("orders"), "status", 2);
    settings.input.extension = "csv".into();

    assert_matches!(
        StatisticsJob::new(settings).run(),
        Err(StatisticsError::NoInputFiles)
    );
}

#[test]
fn should_reject_zero_workers() {
    let output = TestOutput::new();
    let settings = output.settings(&test_data_dir().join("orders"), "status", 0);

    assert_matches!(
        StatisticsJob::new(settings).run(),
        Err(StatisticsError::InvalidPoolSize)
    );
}

#[test]
fn should_write_json_report_when_configured() {
    let output = TestOutput::new();
    let mut settings = output.settings(&test_data_dir().join("orders"), "paymentMethod", 2);
    settings.output.format = ReportFormat::Json;

    let summary = assert_ok!(StatisticsJob::new(settings).run());

    assert_eq!(summary.output, output.directory.join("statistics_by_paymentMethod.json"));
    let json: serde_json::Value =
        serde_json::from_str(&output.read("statistics_by_paymentMethod.json")).unwrap();
    assert_eq!(
        json["items"],
        serde_json::json!([{"value": "CARD", "count": 2}, {"value": "PAYPAL", "count": 1}])
    );
}
