use std::fs;
use std::sync::mpsc;

use tempfile::tempdir;

use crate::privacy::RiskLevel;
use crate::test_fixtures::{gps_fields, iim_dataset, jpeg_with_exif, jpeg_with_iptc, plain_png};

use super::{
    BatchEvent, ExportFormat, collect_candidate_files, export_batch_report, parse_export_format,
    process_batch, process_batch_with_sender,
};

#[test]
fn batch_keeps_one_slot_per_input_and_collects_failures() {
    let inputs = vec![
        jpeg_with_exif(&gps_fields()),
        b"esto no es una imagen".to_vec(),
        plain_png(),
    ];

    let report = process_batch(&inputs);

    assert_eq!(report.items.len(), 3);
    assert_eq!(
        report.failed_indices.iter().copied().collect::<Vec<_>>(),
        vec![1]
    );

    // La posición fallida conserva los bytes originales, nunca se descarta.
    assert_eq!(report.items[1].bytes, inputs[1]);
    assert!(report.items[0].failure.is_none());
    assert!(report.items[2].failure.is_none());

    // La clasificación se reporta incluso para la entrada fallida.
    assert_eq!(report.items[1].analysis.risk_level(), RiskLevel::None);
    assert!(report.items[0].analysis.has_exact_location);
}

#[test]
fn overall_analysis_is_an_or_reduction() {
    let inputs = vec![
        jpeg_with_exif(&gps_fields()),
        jpeg_with_iptc(&[iim_dataset(120, "Tarde de playa")]),
    ];

    let report = process_batch(&inputs);
    let overall = report.overall_analysis();

    assert!(overall.has_gps_data && overall.has_exact_location && overall.has_iptc_data);
    assert!(!overall.has_device_info);
    assert_eq!(overall.risk_level(), RiskLevel::High);
}

#[test]
fn batch_emits_progress_events() {
    let inputs = vec![plain_png(), b"basura".to_vec()];
    let (sender, receiver) = mpsc::channel();

    let report = process_batch_with_sender(&inputs, sender);
    let events: Vec<BatchEvent> = receiver.try_iter().collect();

    assert!(matches!(events.first(), Some(BatchEvent::Started { total: 2 })));
    assert!(
        events
            .iter()
            .any(|event| matches!(event, BatchEvent::Failed { index: 1, .. }))
    );
    assert!(matches!(
        events.last(),
        Some(BatchEvent::Finished {
            successes: 1,
            failures: 1
        })
    ));
    assert_eq!(report.items.len(), 2);
}

#[test]
fn export_json_report_round_trips() {
    let report = process_batch(&[jpeg_with_exif(&gps_fields())]);
    let dir = tempdir().expect("el directorio temporal debería crearse");
    let path = dir.path().join("reporte.json");

    export_batch_report(&report, ExportFormat::Json, &path)
        .expect("la exportación JSON debería funcionar");

    let contents = fs::read_to_string(&path).expect("el reporte debería leerse");
    let value: serde_json::Value =
        serde_json::from_str(&contents).expect("el JSON generado debería ser válido");

    let rows = value.as_array().expect("el reporte debería ser un arreglo");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["risk_level"], "high");
    assert_eq!(rows[0]["outcome"], "saneada");
    assert_eq!(rows[0]["detail"], "Removed: location data");
    assert_eq!(rows[0]["has_exact_location"], true);
}

#[test]
fn export_csv_report_writes_header_and_rows() {
    let report = process_batch(&[plain_png(), plain_png()]);
    let dir = tempdir().expect("el directorio temporal debería crearse");
    let path = dir.path().join("reporte.csv");

    export_batch_report(&report, ExportFormat::Csv, &path)
        .expect("la exportación CSV debería funcionar");

    let contents = fs::read_to_string(&path).expect("el reporte debería leerse");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("risk_level"));
    assert!(lines[1].contains("none"));
}

#[test]
fn parse_export_format_recognizes_labels() {
    assert!(matches!(parse_export_format("JSON"), Ok(ExportFormat::Json)));
    assert!(matches!(parse_export_format("csv"), Ok(ExportFormat::Csv)));
    assert!(parse_export_format("xml").is_err());
}

#[test]
fn collect_candidate_files_filters_supported_images() {
    let dir = tempdir().expect("el directorio temporal debería crearse");
    fs::write(dir.path().join("a.jpg"), b"x").expect("la escritura debería funcionar");
    fs::write(dir.path().join("nota.txt"), b"x").expect("la escritura debería funcionar");
    fs::create_dir(dir.path().join("sub")).expect("el subdirectorio debería crearse");
    fs::write(dir.path().join("sub").join("b.png"), b"x")
        .expect("la escritura debería funcionar");

    let recursive =
        collect_candidate_files(dir.path(), true).expect("la recolección debería funcionar");
    assert_eq!(recursive.len(), 2);

    let flat =
        collect_candidate_files(dir.path(), false).expect("la recolección debería funcionar");
    assert_eq!(flat.len(), 1);

    let missing = collect_candidate_files(&dir.path().join("no_existe"), true);
    assert!(missing.is_err());
}
