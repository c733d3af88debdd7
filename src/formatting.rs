//! Utilidades de formato para la consola.

use chrono::{DateTime, Local};
use std::time::SystemTime;

use crate::privacy::RiskLevel;

pub fn format_optional_time(time: Option<SystemTime>) -> String {
    match time {
        Some(value) => format_system_time(value),
        None => "No disponible".to_string(),
    }
}

pub fn format_system_time(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format("%Y-%m-%d %H:%M:%S %Z").to_string()
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["bytes", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit_index = 0;

    while value >= 1024.0 && unit_index < UNITS.len() - 1 {
        value /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} bytes", bytes)
    } else {
        format!("{value:.2} {} ({} bytes)", UNITS[unit_index], bytes)
    }
}

/// Etiqueta en español del nivel de riesgo.
pub fn risk_label(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::None => "Sin riesgo",
        RiskLevel::Low => "Bajo",
        RiskLevel::Medium => "Medio",
        RiskLevel::High => "Alto",
    }
}
