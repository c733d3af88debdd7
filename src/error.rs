//! Taxonomía de errores del motor de saneamiento.

use thiserror::Error;

use crate::container::ContainerFormat;

/// Estructura de contenedor ilegible a nivel de segmentos o fragmentos.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("firma de contenedor {0} inválida")]
    BadSignature(&'static str),
    #[error("flujo {0} truncado o con marcadores inválidos")]
    Truncated(&'static str),
}

/// Problema no fatal al leer un sub-bloque de metadata.
///
/// Nunca se propaga como error del análisis: la categoría afectada se
/// trata como ausente y el resto de categorías sigue extrayéndose.
#[derive(Debug, Error)]
pub enum ParseIssue {
    #[error("sub-bloque de metadata {0} ilegible; se trata como ausente")]
    MalformedSubBlock(&'static str),
}

/// Fallos de la reescritura. El llamador decide el repliegue: la política
/// de las operaciones de alto nivel es devolver los bytes originales.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("no se pudo reconocer el formato del contenedor")]
    UnrecognizedFormat,
    #[error("el formato {0} no soporta reescritura de metadata")]
    UnsupportedFormat(ContainerFormat),
    #[error("la carga de píxeles no se pudo decodificar: {0}")]
    UndecodablePayload(String),
    #[error("la codificación del contenedor saneado falló: {0}")]
    EncodeFailure(String),
    #[error(transparent)]
    MalformedContainer(#[from] ContainerError),
    #[error("el contenedor reescrito aún contiene metadata sensible")]
    ResidualMetadata,
}
