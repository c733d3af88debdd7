//! Extracción de categorías de metadata desde los campos EXIF.

use exif::{Exif, In, Tag, Value};

use super::model::{
    CameraSettings, CaptureTimestamps, ColorModel, DeviceInfo, GpsData, Resolution, ResolutionUnit,
};

/// Orientación EXIF válida (1..=8); cualquier otro valor se descarta.
pub fn orientation(exif: &Exif) -> Option<u16> {
    let value = field_u32(exif, Tag::Orientation)?;
    if (1..=8).contains(&value) {
        Some(value as u16)
    } else {
        log::warn!("orientación EXIF fuera de rango: {value}");
        None
    }
}

pub fn pixel_dimensions(exif: &Exif) -> (Option<u32>, Option<u32>) {
    (
        field_u32(exif, Tag::PixelXDimension).filter(|&v| v > 0),
        field_u32(exif, Tag::PixelYDimension).filter(|&v| v > 0),
    )
}

pub fn color_model(exif: &Exif) -> Option<ColorModel> {
    match field_u32(exif, Tag::ColorSpace)? {
        1 => Some(ColorModel::Rgb),
        _ => Some(ColorModel::Uncalibrated),
    }
}

pub fn resolution(exif: &Exif) -> Option<Resolution> {
    let x = field_rational(exif, Tag::XResolution)?;
    let y = field_rational(exif, Tag::YResolution)?;
    let unit = match field_u32(exif, Tag::ResolutionUnit) {
        Some(3) => ResolutionUnit::Centimeter,
        _ => ResolutionUnit::Inch,
    };
    Some(Resolution { x, y, unit })
}

pub fn gps(exif: &Exif) -> Option<GpsData> {
    let data = GpsData {
        latitude: coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, "S"),
        longitude: coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, "W"),
        altitude: field_rational(exif, Tag::GPSAltitude),
    };
    (!data.is_empty()).then_some(data)
}

pub fn device(exif: &Exif) -> Option<DeviceInfo> {
    let data = DeviceInfo {
        manufacturer: field_ascii(exif, Tag::Make),
        model: field_ascii(exif, Tag::Model),
        software: field_ascii(exif, Tag::Software),
    };
    (!data.is_empty()).then_some(data)
}

pub fn timestamps(exif: &Exif) -> Option<CaptureTimestamps> {
    let data = CaptureTimestamps {
        original: field_ascii(exif, Tag::DateTimeOriginal),
        digitized: field_ascii(exif, Tag::DateTimeDigitized),
    };
    (!data.is_empty()).then_some(data)
}

pub fn camera(exif: &Exif) -> Option<CameraSettings> {
    let data = CameraSettings {
        lens_model: field_ascii(exif, Tag::LensModel),
        iso: field_u32(exif, Tag::PhotographicSensitivity),
    };
    (!data.is_empty()).then_some(data)
}

fn coordinate(exif: &Exif, tag: Tag, ref_tag: Tag, negative_ref: &str) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let Value::Rational(components) = &field.value else {
        log::warn!("coordenada GPS con tipo inesperado en {tag}");
        return None;
    };

    let degrees = dms_to_decimal(components)?;
    let sign = if field_ascii(exif, ref_tag).as_deref() == Some(negative_ref) {
        -1.0
    } else {
        1.0
    };
    Some(sign * degrees)
}

/// Convierte grados/minutos/segundos racionales a grados decimales.
fn dms_to_decimal(components: &[exif::Rational]) -> Option<f64> {
    if components.is_empty() {
        return None;
    }
    if components.iter().any(|component| component.denom == 0) {
        log::warn!("racional GPS con denominador cero");
        return None;
    }

    let mut value = 0.0;
    let mut divisor = 1.0;
    for component in components.iter().take(3) {
        value += component.to_f64() / divisor;
        divisor *= 60.0;
    }
    Some(value)
}

fn field_ascii(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(lines) => {
            let joined = lines
                .iter()
                .map(|line| String::from_utf8_lossy(line))
                .collect::<Vec<_>>()
                .join(" ");
            let trimmed = joined.trim().to_string();
            (!trimmed.is_empty()).then_some(trimmed)
        }
        _ => None,
    }
}

fn field_u32(exif: &Exif, tag: Tag) -> Option<u32> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Short(values) => values.first().map(|&value| u32::from(value)),
        Value::Long(values) => values.first().copied(),
        _ => None,
    }
}

fn field_rational(exif: &Exif, tag: Tag) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Rational(values) => values
            .first()
            .filter(|rational| rational.denom != 0)
            .map(|rational| rational.to_f64()),
        _ => None,
    }
}
