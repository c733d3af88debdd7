//! Modelo tipado de la metadata que el motor conserva o elimina.

use serde::Serialize;

/// Etiqueta del modelo de color declarado por el contenedor.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ColorModel {
    Rgb,
    Grayscale,
    Indexed,
    Uncalibrated,
}

impl ColorModel {
    pub fn tag(self) -> &'static str {
        match self {
            ColorModel::Rgb => "RGB",
            ColorModel::Grayscale => "Gray",
            ColorModel::Indexed => "Indexed",
            ColorModel::Uncalibrated => "Uncalibrated",
        }
    }
}

/// Unidad de la densidad de píxeles.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ResolutionUnit {
    Inch,
    Centimeter,
}

/// Densidad de píxeles por eje, en píxeles por unidad.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Resolution {
    pub x: f64,
    pub y: f64,
    pub unit: ResolutionUnit,
}

impl Resolution {
    /// Constantes fijas que toda reescritura impone, sin importar la
    /// resolución de origen.
    pub const SAFE_DEFAULT: Resolution = Resolution {
        x: 72.0,
        y: 72.0,
        unit: ResolutionUnit::Inch,
    };
}

/// Coordenadas y altitud reportadas por el bloque GPS, en grados decimales.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GpsData {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
}

impl GpsData {
    pub fn is_empty(&self) -> bool {
        self.latitude.is_none() && self.longitude.is_none() && self.altitude.is_none()
    }

    /// Latitud y longitud presentes a la vez.
    pub fn has_exact_location(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Identificación del equipo y el software que produjeron la imagen.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DeviceInfo {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub software: Option<String>,
}

impl DeviceInfo {
    pub fn is_empty(&self) -> bool {
        self.manufacturer.is_none() && self.model.is_none() && self.software.is_none()
    }
}

/// Fechas de captura en el formato EXIF `AAAA:MM:DD HH:MM:SS`, opacas
/// para esta capa.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CaptureTimestamps {
    pub original: Option<String>,
    pub digitized: Option<String>,
}

impl CaptureTimestamps {
    pub fn is_empty(&self) -> bool {
        self.original.is_none() && self.digitized.is_none()
    }
}

/// Ajustes de cámara que se rastrean pero no cuentan como sensibles.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CameraSettings {
    pub lens_model: Option<String>,
    pub iso: Option<u32>,
}

impl CameraSettings {
    pub fn is_empty(&self) -> bool {
        self.lens_model.is_none() && self.iso.is_none()
    }
}

/// Título, descripción y palabras clave incrustadas (equivalente IPTC).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CaptionData {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub keywords: Vec<String>,
}

impl CaptionData {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.caption.is_none() && self.keywords.is_empty()
    }
}

/// Metadata estructurada de una sola imagen.
///
/// Cada campo es independiente y la ausencia se distingue de un bloque
/// presente pero vacío. El modelo nunca guarda datos de píxeles: vive lo
/// que dura el análisis o la reescritura de su imagen y se descarta.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ImageMetadata {
    pub orientation: Option<u16>,
    pub pixel_width: Option<u32>,
    pub pixel_height: Option<u32>,
    pub color_model: Option<ColorModel>,
    pub resolution: Option<Resolution>,
    pub gps: Option<GpsData>,
    pub device: Option<DeviceInfo>,
    pub timestamps: Option<CaptureTimestamps>,
    pub camera: Option<CameraSettings>,
    pub caption: Option<CaptionData>,
}

impl ImageMetadata {
    pub fn is_empty(&self) -> bool {
        self.orientation.is_none()
            && self.pixel_width.is_none()
            && self.pixel_height.is_none()
            && self.color_model.is_none()
            && self.resolution.is_none()
            && self.gps.is_none()
            && self.device.is_none()
            && self.timestamps.is_none()
            && self.camera.is_none()
            && self.caption.is_none()
    }
}
