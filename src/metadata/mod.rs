//! Análisis y modelo tipado de la metadata de imágenes.

mod exif;
mod iptc;
mod model;
mod parser;

pub use model::{
    CameraSettings, CaptionData, CaptureTimestamps, ColorModel, DeviceInfo, GpsData,
    ImageMetadata, Resolution, ResolutionUnit,
};
pub use parser::parse;

#[cfg(test)]
mod tests;
