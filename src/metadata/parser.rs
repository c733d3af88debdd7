//! Análisis tolerante de la metadata presente en un contenedor de imagen.

use std::io::Cursor;

use crate::container::{self, ContainerFormat};
use crate::error::ParseIssue;

use super::model::{CaptionData, ColorModel, ImageMetadata};
use super::{exif as exif_fields, iptc};

/// Analiza la metadata del contenedor sin fallar nunca.
///
/// Un contenedor irreconocible produce un modelo vacío. Cada categoría se
/// extrae de forma independiente: un sub-bloque ilegible se registra y se
/// trata como ausente sin afectar al resto.
pub fn parse(bytes: &[u8]) -> ImageMetadata {
    let mut model = ImageMetadata::default();

    let Some(format) = container::detect_format(bytes) else {
        log::debug!("contenedor no reconocido; se devuelve un modelo vacío");
        return model;
    };

    if let Some(exif) = read_exif(bytes, format) {
        model.orientation = exif_fields::orientation(&exif);
        let (width, height) = exif_fields::pixel_dimensions(&exif);
        model.pixel_width = width;
        model.pixel_height = height;
        model.color_model = exif_fields::color_model(&exif);
        model.resolution = exif_fields::resolution(&exif);
        model.gps = exif_fields::gps(&exif);
        model.device = exif_fields::device(&exif);
        model.timestamps = exif_fields::timestamps(&exif);
        model.camera = exif_fields::camera(&exif);
    }

    match extract_caption(bytes, format) {
        Ok(caption) => model.caption = caption,
        Err(issue) => log::warn!("{issue}"),
    }

    if format == ContainerFormat::Png {
        fill_from_ihdr(bytes, &mut model);
    }

    model
}

fn read_exif(bytes: &[u8], format: ContainerFormat) -> Option<exif::Exif> {
    let reader = exif::Reader::new();
    match reader.read_from_container(&mut Cursor::new(bytes)) {
        Ok(parsed) => Some(parsed),
        Err(exif::Error::NotFound(_)) | Err(exif::Error::BlankValue(_)) => None,
        Err(error) => {
            log::warn!("lectura EXIF del contenedor fallida: {error}; se intenta el bloque crudo");
            let raw = match format {
                ContainerFormat::Jpeg => {
                    container::jpeg::exif_segment(bytes).map(|tiff| tiff.to_vec())
                }
                ContainerFormat::Png => container::png::exif_chunk(bytes),
                _ => None,
            }?;
            reader.read_raw(raw).ok()
        }
    }
}

fn extract_caption(
    bytes: &[u8],
    format: ContainerFormat,
) -> Result<Option<CaptionData>, ParseIssue> {
    match format {
        ContainerFormat::Jpeg => {
            let segment = container::jpeg::iptc_segment(bytes)
                .map_err(|_| ParseIssue::MalformedSubBlock("IPTC"))?;
            Ok(segment.as_deref().and_then(iptc::parse_caption))
        }
        ContainerFormat::Png => {
            let entries = container::png::text_chunks(bytes)
                .map_err(|_| ParseIssue::MalformedSubBlock("texto PNG"))?;
            Ok(caption_from_text_chunks(&entries))
        }
        _ => Ok(None),
    }
}

/// Las claves de texto estándar de PNG se proyectan sobre el bloque de
/// leyenda; el resto de claves se ignora.
fn caption_from_text_chunks(entries: &[(String, String)]) -> Option<CaptionData> {
    let mut caption = CaptionData::default();

    for (keyword, value) in entries {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match keyword.as_str() {
            "Title" => caption.title = Some(value.to_string()),
            "Description" => caption.caption = Some(value.to_string()),
            "Comment" => {
                if caption.caption.is_none() {
                    caption.caption = Some(value.to_string());
                }
            }
            "Author" | "Copyright" => caption.keywords.push(value.to_string()),
            _ => {}
        }
    }

    (!caption.is_empty()).then_some(caption)
}

/// IHDR completa dimensiones y modelo de color cuando el EXIF no los trae.
fn fill_from_ihdr(bytes: &[u8], model: &mut ImageMetadata) {
    let Some((width, height, color_type)) = container::png::ihdr_info(bytes) else {
        return;
    };

    if model.pixel_width.is_none() && width > 0 {
        model.pixel_width = Some(width);
    }
    if model.pixel_height.is_none() && height > 0 {
        model.pixel_height = Some(height);
    }
    if model.color_model.is_none() {
        model.color_model = Some(match color_type {
            0 | 4 => ColorModel::Grayscale,
            3 => ColorModel::Indexed,
            _ => ColorModel::Rgb,
        });
    }
}
