//! Limpieza en sitio de archivos de imagen y su verificación.

use std::fs;
use std::path::{Path, PathBuf};

use crate::privacy::analyze_image;

use super::rewriter::strip_metadata;

/// Elimina la metadata sensible de una imagen reemplazando el archivo.
///
/// El resultado se escribe en un archivo temporal del mismo directorio,
/// se verifica y recién entonces sustituye al original.
pub fn remove_image_metadata(path: &Path) -> Result<(), String> {
    let original = fs::read(path)
        .map_err(|error| format!("No se pudo leer `{}`: {error}", path.display()))?;

    let outcome = strip_metadata(&original);
    if let Some(error) = outcome.failure {
        return Err(format!("No se pudo sanear `{}`: {error}", path.display()));
    }

    let temp_path = generate_temp_filename(path);
    fs::write(&temp_path, &outcome.bytes)
        .map_err(|error| format!("No se pudo guardar la imagen limpia: {error}"))?;

    match verify_image_metadata_clean(&temp_path) {
        Ok(true) => {}
        Ok(false) => {
            let _ = fs::remove_file(&temp_path);
            return Err(
                "La verificación indicó que la metadata no se eliminó correctamente".to_string(),
            );
        }
        Err(error) => {
            let _ = fs::remove_file(&temp_path);
            return Err(error);
        }
    }

    fs::rename(&temp_path, path).map_err(|error| {
        let _ = fs::remove_file(&temp_path);
        format!("No se pudo reemplazar el archivo original: {error}")
    })?;

    Ok(())
}

/// Comprueba que el archivo carece de categorías sensibles residuales.
pub fn verify_image_metadata_clean(path: &Path) -> Result<bool, String> {
    let bytes = fs::read(path)
        .map_err(|error| format!("No se pudo abrir la imagen para verificación: {error}"))?;
    Ok(!analyze_image(&bytes).has_sensitive_data())
}

/// Crea un nombre de archivo temporal estable en el mismo directorio que `path`.
fn generate_temp_filename(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let extension = path.extension().unwrap_or_default().to_string_lossy();

    // Usar timestamp para evitar colisiones entre ejecuciones consecutivas.
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    parent.join(format!(".{}_temp_{}.{}", stem, timestamp, extension))
}
