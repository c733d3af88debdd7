//! Reescritura del contenedor con la metadata saneada.

use crate::container::{self, ContainerFormat};
use crate::error::RewriteError;
use crate::metadata::{ImageMetadata, parse};
use crate::privacy::classify;

use super::exif_writer::serialize_safe_exif;
use super::safe_metadata::build_safe;

/// Resultado de la operación de saneamiento sobre bytes.
///
/// Ante cualquier fallo se devuelven los bytes ORIGINALES junto con el
/// error ("fail open"): producir una imagen siempre pesa más que la
/// garantía de limpieza. Quien necesite esa garantía debe consultar
/// `failure` en lugar de asumir que la metadata desapareció.
#[derive(Debug)]
pub struct StripOutcome {
    pub bytes: Vec<u8>,
    pub failure: Option<RewriteError>,
}

impl StripOutcome {
    pub fn is_stripped(&self) -> bool {
        self.failure.is_none()
    }
}

/// Reescribe el contenedor conservando la carga de píxeles byte a byte.
///
/// Solo se procesa la primera imagen del contenedor; los formatos
/// animados o multi-página quedan fuera del alcance.
pub fn rewrite(original: &[u8], safe: &ImageMetadata) -> Result<Vec<u8>, RewriteError> {
    let format = container::detect_format(original).ok_or(RewriteError::UnrecognizedFormat)?;

    // El códec opaco debe poder decodificar la carga antes de tocar nada.
    image::load_from_memory(original)
        .map_err(|error| RewriteError::UndecodablePayload(error.to_string()))?;

    let exif = serialize_safe_exif(safe)?;
    let rewritten = match format {
        ContainerFormat::Jpeg => container::jpeg::replace_metadata(original, &exif)?,
        ContainerFormat::Png => container::png::replace_metadata(original, &exif)?,
        other => return Err(RewriteError::UnsupportedFormat(other)),
    };

    // La salida debe seguir decodificando y quedar sin categorías sensibles.
    image::load_from_memory(&rewritten)
        .map_err(|error| RewriteError::EncodeFailure(error.to_string()))?;
    if classify(&parse(&rewritten)).has_sensitive_data() {
        return Err(RewriteError::ResidualMetadata);
    }

    log::debug!(
        "contenedor {format} reescrito: {} -> {} bytes",
        original.len(),
        rewritten.len()
    );
    Ok(rewritten)
}

/// Operación de saneamiento completa con la política "fail open".
pub fn strip_metadata(bytes: &[u8]) -> StripOutcome {
    let model = parse(bytes);
    let safe = build_safe(&model);

    match rewrite(bytes, &safe) {
        Ok(rewritten) => StripOutcome {
            bytes: rewritten,
            failure: None,
        },
        Err(error) => {
            log::warn!("reescritura fallida, se devuelven los bytes originales: {error}");
            StripOutcome {
                bytes: bytes.to_vec(),
                failure: Some(error),
            }
        }
    }
}
