//! Integration tests for export packaging.
//!
//! Runs the pipeline over a small arbitrage board and exports the result in
//! every supported format.

use chrono::{TimeZone, Utc};
use edgeboard_export::{
    DateFormat, ExportField, ExportFormat, ExportOptions, Exporter, NumberFormat,
};
use edgeboard_pipeline::{FieldConstraint, Query, Record, SortKey};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn board() -> Vec<Record> {
    vec![
        Record::new("1")
            .with("sport", "MLB")
            .with("game", "Yankees, NY @ Red Sox")
            .with("roi", 1.25)
            .with("live", false)
            .with("start", "2024-07-04T19:05:00Z"),
        Record::new("2")
            .with("sport", "NBA")
            .with("game", "Lakers @ \"Celtics\"")
            .with("roi", 3.5)
            .with("live", true)
            .with("start", "2024-07-05T01:30:00Z"),
        Record::new("3")
            .with("sport", "NFL")
            .with("game", "Bills @ Jets")
            .with("roi", 0.4),
    ]
}

fn catalogue() -> Vec<ExportField> {
    vec![
        ExportField::text("sport", "Sport"),
        ExportField::text("game", "Game"),
        ExportField::number("roi", "ROI %"),
        ExportField::boolean("live", "Live"),
        ExportField::date("start", "Start"),
    ]
}

fn exporter() -> Exporter {
    Exporter::at(Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap())
}

fn profitable_by_roi(records: &[Record]) -> Vec<&Record> {
    Query::new()
        .filter("roi", FieldConstraint::at_least(1.0))
        .sort_by(SortKey::descending("roi"))
        .run(records)
        .records
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

#[test]
fn test_csv_export_of_pipeline_output() {
    let records = board();
    let options = ExportOptions::new(ExportFormat::Csv, ["game", "roi", "live", "start"]);

    let artifact = exporter()
        .export(profitable_by_roi(&records), &catalogue(), &options)
        .unwrap();

    assert_eq!(artifact.filename, "export_20240704_120000.csv");
    assert_eq!(artifact.mime_type, "text/csv");
    assert_eq!(artifact.record_count, 2);
    assert_eq!(
        artifact.body,
        "Game,ROI %,Live,Start\r\n\
         \"Lakers @ \"\"Celtics\"\"\",3.50,Yes,2024-07-05\r\n\
         \"Yankees, NY @ Red Sox\",1.25,No,2024-07-04\r\n"
    );
}

#[test]
fn test_csv_missing_values_are_empty() {
    let records = board();
    let options = ExportOptions {
        include_headers: false,
        number_format: NumberFormat::Integer,
        date_format: DateFormat::UsDate,
        ..ExportOptions::new(ExportFormat::Csv, ["sport", "roi", "live", "start"])
    };

    let artifact = exporter().export(&records, &catalogue(), &options).unwrap();

    let lines: Vec<_> = artifact.body.split("\r\n").collect();
    assert_eq!(lines[0], "MLB,1,No,07/04/2024");
    assert_eq!(lines[2], "NFL,0,,");
}

#[test]
fn test_empty_export_keeps_header() {
    let records: Vec<Record> = Vec::new();
    let options = ExportOptions::new(ExportFormat::Csv, ["sport"]);

    let artifact = exporter().export(&records, &catalogue(), &options).unwrap();

    assert_eq!(artifact.body, "Sport\r\n");
    assert_eq!(artifact.record_count, 0);
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[test]
fn test_json_export_with_metadata() {
    let records = board();
    let options = ExportOptions {
        title: Some("Arbitrage scanner".into()),
        ..ExportOptions::new(ExportFormat::Json, ["sport", "roi"])
    };

    let artifact = exporter()
        .export(profitable_by_roi(&records), &catalogue(), &options)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&artifact.body).unwrap();

    assert_eq!(
        value["data"],
        serde_json::json!([
            {"sport": "NBA", "roi": "3.50"},
            {"sport": "MLB", "roi": "1.25"},
        ])
    );
    assert_eq!(value["metadata"]["total_records"], 2);
    assert_eq!(value["metadata"]["format"], "json");
    assert_eq!(value["metadata"]["title"], "Arbitrage scanner");
    assert_eq!(value["metadata"]["fields"][1]["label"], "ROI %");
}

#[test]
fn test_json_export_without_metadata() {
    let records = board();
    let options = ExportOptions {
        include_metadata: false,
        number_format: NumberFormat::Raw,
        ..ExportOptions::new(ExportFormat::Json, ["roi"])
    };

    let artifact = exporter().export(&records, &catalogue(), &options).unwrap();
    let value: serde_json::Value = serde_json::from_str(&artifact.body).unwrap();

    assert_eq!(
        value,
        serde_json::json!([{"roi": "1.25"}, {"roi": "3.5"}, {"roi": "0.4"}])
    );
}

// ---------------------------------------------------------------------------
// XML
// ---------------------------------------------------------------------------

#[test]
fn test_xml_export() {
    let records = board();
    let options = ExportOptions::new(ExportFormat::Xml, ["game", "roi"]);

    let artifact = exporter()
        .export(profitable_by_roi(&records), &catalogue(), &options)
        .unwrap();

    assert_eq!(artifact.mime_type, "application/xml");
    assert!(artifact.body.contains("<total_records>2</total_records>"));
    assert!(artifact.body.contains("<game>Lakers @ &quot;Celtics&quot;</game>"));
    assert!(artifact.body.contains("<roi>3.50</roi>"));
    assert_eq!(artifact.body.matches("<record>").count(), 2);
}

#[test]
fn test_options_from_json_drive_export() {
    let records = board();
    let options: ExportOptions = serde_json::from_str(
        r#"{"format":"csv","fields":["sport"],"include_headers":false,"filename":"sports"}"#,
    )
    .unwrap();

    let artifact = exporter().export(&records, &catalogue(), &options).unwrap();

    assert_eq!(artifact.filename, "sports.csv");
    assert_eq!(artifact.body, "MLB\r\nNBA\r\nNFL\r\n");
}
