//! Construcción del modelo mínimo permitido por la política.

use crate::metadata::{ColorModel, ImageMetadata, Resolution};

/// Orientación "hacia arriba", usada cuando la fuente no declara ninguna.
pub const DEFAULT_ORIENTATION: u16 = 1;

/// Política de lista de permitidos: todo lo no listado se descarta.
///
/// Se conserva la orientación (o 1 si falta) y las dimensiones solo si
/// existen; nunca se inventan. El modelo de color se fuerza a RGB y la
/// resolución a las constantes fijas de 72×72 por pulgada: los valores de
/// origen jamás se preservan. GPS, dispositivo, fechas, ajustes de cámara
/// y leyendas nunca se copian, ni siquiera parcialmente. Una categoría
/// futura que el modelo no liste quedará descartada por construcción.
pub fn build_safe(source: &ImageMetadata) -> ImageMetadata {
    ImageMetadata {
        orientation: Some(source.orientation.unwrap_or(DEFAULT_ORIENTATION)),
        pixel_width: source.pixel_width,
        pixel_height: source.pixel_height,
        color_model: Some(ColorModel::Rgb),
        resolution: Some(Resolution::SAFE_DEFAULT),
        ..ImageMetadata::default()
    }
}
