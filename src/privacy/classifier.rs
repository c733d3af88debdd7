//! Clasificación de sensibilidad de la metadata extraída.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::metadata::{ImageMetadata, parse};

/// Nivel de riesgo agregado, ordenado de menor a mayor.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resultado inmutable de clasificar una imagen: un valor por imagen.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PrivacyAnalysis {
    pub has_gps_data: bool,
    pub has_exact_location: bool,
    pub has_device_info: bool,
    pub has_timestamps: bool,
    pub has_camera_settings: bool,
    pub has_iptc_data: bool,
}

impl PrivacyAnalysis {
    /// OR de GPS, dispositivo, fechas e IPTC. Los ajustes de cámara se
    /// rastrean pero quedan fuera del agregado.
    pub fn has_sensitive_data(&self) -> bool {
        self.has_gps_data || self.has_device_info || self.has_timestamps || self.has_iptc_data
    }

    /// El primer criterio que aplica gana, en este orden estricto.
    pub fn risk_level(&self) -> RiskLevel {
        if self.has_exact_location {
            RiskLevel::High
        } else if self.has_gps_data || self.has_device_info {
            RiskLevel::Medium
        } else if self.has_timestamps || self.has_iptc_data {
            RiskLevel::Low
        } else {
            RiskLevel::None
        }
    }

    /// Describe las categorías presentes en orden fijo, o la cadena
    /// centinela cuando no hay ninguna.
    pub fn removed_data_description(&self) -> String {
        let mut categories = Vec::new();
        if self.has_gps_data || self.has_exact_location {
            categories.push("location data");
        }
        if self.has_device_info {
            categories.push("device information");
        }
        if self.has_timestamps {
            categories.push("timestamps");
        }
        if self.has_iptc_data {
            categories.push("embedded metadata");
        }

        if categories.is_empty() {
            "no sensitive metadata detected".to_string()
        } else {
            format!("Removed: {}", categories.join(", "))
        }
    }

    /// Combinación OR campo a campo, para reducir lotes completos.
    pub fn merge(self, other: PrivacyAnalysis) -> PrivacyAnalysis {
        PrivacyAnalysis {
            has_gps_data: self.has_gps_data || other.has_gps_data,
            has_exact_location: self.has_exact_location || other.has_exact_location,
            has_device_info: self.has_device_info || other.has_device_info,
            has_timestamps: self.has_timestamps || other.has_timestamps,
            has_camera_settings: self.has_camera_settings || other.has_camera_settings,
            has_iptc_data: self.has_iptc_data || other.has_iptc_data,
        }
    }
}

/// Función pura: inspecciona el modelo y marca las categorías presentes.
/// Un bloque presente pero vacío no cuenta como presencia.
pub fn classify(model: &ImageMetadata) -> PrivacyAnalysis {
    let gps = model.gps.as_ref().filter(|gps| !gps.is_empty());

    PrivacyAnalysis {
        has_gps_data: gps.is_some(),
        has_exact_location: gps.is_some_and(|gps| gps.has_exact_location()),
        has_device_info: model.device.as_ref().is_some_and(|device| !device.is_empty()),
        has_timestamps: model
            .timestamps
            .as_ref()
            .is_some_and(|timestamps| !timestamps.is_empty()),
        has_camera_settings: model.camera.as_ref().is_some_and(|camera| !camera.is_empty()),
        has_iptc_data: model.caption.as_ref().is_some_and(|caption| !caption.is_empty()),
    }
}

/// Consulta de análisis sobre bytes crudos: analizar y clasificar.
pub fn analyze_image(bytes: &[u8]) -> PrivacyAnalysis {
    classify(&parse(bytes))
}
