//! Acceso estructural a los contenedores de imagen soportados.

pub mod jpeg;
pub mod png;

use infer::Infer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Formatos de contenedor que el motor sabe identificar por contenido.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ContainerFormat {
    Jpeg,
    Png,
    Tiff,
    WebP,
}

impl ContainerFormat {
    pub fn name(self) -> &'static str {
        match self {
            ContainerFormat::Jpeg => "JPEG",
            ContainerFormat::Png => "PNG",
            ContainerFormat::Tiff => "TIFF",
            ContainerFormat::WebP => "WebP",
        }
    }

    /// Solo JPEG y PNG admiten reemplazar la metadata sin recomprimir.
    pub fn supports_rewrite(self) -> bool {
        matches!(self, ContainerFormat::Jpeg | ContainerFormat::Png)
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detecta el formato a partir del contenido, nunca de la extensión.
pub fn detect_format(data: &[u8]) -> Option<ContainerFormat> {
    let kind = Infer::new().get(data)?;
    match kind.mime_type() {
        "image/jpeg" => Some(ContainerFormat::Jpeg),
        "image/png" => Some(ContainerFormat::Png),
        "image/tiff" => Some(ContainerFormat::Tiff),
        "image/webp" => Some(ContainerFormat::WebP),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_format_by_magic_bytes() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01];
        assert_eq!(detect_format(&jpeg), Some(ContainerFormat::Jpeg));

        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D];
        assert_eq!(detect_format(&png), Some(ContainerFormat::Png));

        let tiff = [0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(detect_format(&tiff), Some(ContainerFormat::Tiff));
    }

    #[test]
    fn detect_format_rejects_unknown_content() {
        assert_eq!(detect_format(b"texto plano cualquiera"), None);
        assert_eq!(detect_format(&[]), None);
    }
}
