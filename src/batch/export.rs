//! Exportación del reporte de lote en distintos formatos.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::privacy::RiskLevel;

use super::BatchReport;

#[derive(Clone, Copy, Debug)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        }
    }
}

pub fn parse_export_format(input: &str) -> Result<ExportFormat, String> {
    match input.to_lowercase().as_str() {
        "json" => Ok(ExportFormat::Json),
        "csv" => Ok(ExportFormat::Csv),
        _ => Err("Formato de exportación no reconocido".to_string()),
    }
}

#[derive(Serialize)]
struct ReportRow<'a> {
    index: usize,
    sha256: &'a str,
    risk_level: RiskLevel,
    detail: String,
    has_gps_data: bool,
    has_exact_location: bool,
    has_device_info: bool,
    has_timestamps: bool,
    has_camera_settings: bool,
    has_iptc_data: bool,
    outcome: &'a str,
    error: &'a str,
}

fn collect_rows(report: &BatchReport) -> Vec<ReportRow<'_>> {
    report
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| ReportRow {
            index,
            sha256: &item.sha256,
            risk_level: item.analysis.risk_level(),
            detail: item.analysis.removed_data_description(),
            has_gps_data: item.analysis.has_gps_data,
            has_exact_location: item.analysis.has_exact_location,
            has_device_info: item.analysis.has_device_info,
            has_timestamps: item.analysis.has_timestamps,
            has_camera_settings: item.analysis.has_camera_settings,
            has_iptc_data: item.analysis.has_iptc_data,
            outcome: if item.failure.is_none() {
                "saneada"
            } else {
                "original"
            },
            error: item.failure.as_deref().unwrap_or(""),
        })
        .collect()
}

pub fn export_batch_report(
    report: &BatchReport,
    format: ExportFormat,
    path: &Path,
) -> Result<(), String> {
    match format {
        ExportFormat::Json => export_json(report, path),
        ExportFormat::Csv => export_csv(report, path),
    }
}

fn export_json(report: &BatchReport, path: &Path) -> Result<(), String> {
    let rows = collect_rows(report);
    let json = serde_json::to_string_pretty(&rows)
        .map_err(|err| format!("No se pudo serializar JSON: {err}"))?;
    fs::write(path, json).map_err(|err| format!("No se pudo guardar el JSON: {err}"))
}

fn export_csv(report: &BatchReport, path: &Path) -> Result<(), String> {
    let mut writer =
        csv::Writer::from_path(path).map_err(|err| format!("No se pudo crear el CSV: {err}"))?;
    for row in collect_rows(report) {
        writer
            .serialize(row)
            .map_err(|err| format!("No se pudo escribir el CSV: {err}"))?;
    }
    writer
        .flush()
        .map_err(|err| format!("No se pudo guardar el CSV: {err}"))
}
