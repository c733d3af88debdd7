//! Serialización del modelo saneado como bloque TIFF/EXIF.

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use std::io::Cursor;

use crate::error::RewriteError;
use crate::metadata::{ImageMetadata, Resolution, ResolutionUnit};

use super::safe_metadata::DEFAULT_ORIENTATION;

/// Serializa únicamente los campos permitidos del modelo.
///
/// La salida es determinista: el mismo modelo produce los mismos bytes,
/// de modo que sanear dos veces deja un bloque idéntico.
pub fn serialize_safe_exif(safe: &ImageMetadata) -> Result<Vec<u8>, RewriteError> {
    let mut fields = Vec::new();

    fields.push(short_field(
        Tag::Orientation,
        safe.orientation.unwrap_or(DEFAULT_ORIENTATION),
    ));

    let resolution = safe.resolution.unwrap_or(Resolution::SAFE_DEFAULT);
    fields.push(rational_field(Tag::XResolution, resolution.x));
    fields.push(rational_field(Tag::YResolution, resolution.y));
    fields.push(short_field(
        Tag::ResolutionUnit,
        resolution_unit_code(resolution.unit),
    ));

    // ColorSpace 1 = sRGB; la política fuerza RGB sin excepción.
    fields.push(short_field(Tag::ColorSpace, 1));

    if let Some(width) = safe.pixel_width {
        fields.push(long_field(Tag::PixelXDimension, width));
    }
    if let Some(height) = safe.pixel_height {
        fields.push(long_field(Tag::PixelYDimension, height));
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }

    let mut buffer = Cursor::new(Vec::new());
    writer
        .write(&mut buffer, false)
        .map_err(|error| RewriteError::EncodeFailure(format!("escritura EXIF fallida: {error}")))?;
    Ok(buffer.into_inner())
}

fn short_field(tag: Tag, value: u16) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Short(vec![value]),
    }
}

fn long_field(tag: Tag, value: u32) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Long(vec![value]),
    }
}

fn rational_field(tag: Tag, value: f64) -> Field {
    // Las constantes de resolución son enteras; el redondeo es exacto.
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(vec![Rational {
            num: value.round() as u32,
            denom: 1,
        }]),
    }
}

fn resolution_unit_code(unit: ResolutionUnit) -> u16 {
    match unit {
        ResolutionUnit::Inch => 2,
        ResolutionUnit::Centimeter => 3,
    }
}
