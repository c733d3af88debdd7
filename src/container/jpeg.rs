//! Recorrido y reconstrucción de segmentos JPEG.

use crate::error::ContainerError;

const SOI: [u8; 2] = [0xFF, 0xD8];

const MARKER_TEM: u8 = 0x01;
const MARKER_SOS: u8 = 0xDA;
const MARKER_EOI: u8 = 0xD9;
const MARKER_APP0: u8 = 0xE0;
const MARKER_APP1: u8 = 0xE1;
const MARKER_APP13: u8 = 0xED;
const MARKER_APP14: u8 = 0xEE;
const MARKER_COM: u8 = 0xFE;

const EXIF_HEADER: &[u8] = b"Exif\0\0";
const PHOTOSHOP_HEADER: &[u8] = b"Photoshop 3.0\0";
const IPTC_RESOURCE_ID: u16 = 0x0404;

struct Segment<'a> {
    marker: u8,
    body: &'a [u8],
    raw: &'a [u8],
}

/// Separa los segmentos previos al barrido comprimido y el resto del flujo.
///
/// El resto comienza en SOS (o EOI) y se conserva byte a byte: ahí viven
/// los datos de píxeles que nunca se tocan.
fn split_segments(data: &[u8]) -> Result<(Vec<Segment<'_>>, &[u8]), ContainerError> {
    if !data.starts_with(&SOI) {
        return Err(ContainerError::BadSignature("JPEG"));
    }

    let mut segments = Vec::new();
    let mut pos = 2;

    loop {
        if pos + 2 > data.len() || data[pos] != 0xFF {
            return Err(ContainerError::Truncated("JPEG"));
        }

        let marker = data[pos + 1];

        // Bytes de relleno FF entre segmentos.
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        // Marcadores sin longitud.
        if marker == MARKER_TEM || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }
        if marker == MARKER_SOS || marker == MARKER_EOI {
            return Ok((segments, &data[pos..]));
        }

        if pos + 4 > data.len() {
            return Err(ContainerError::Truncated("JPEG"));
        }
        let length = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if length < 2 || pos + 2 + length > data.len() {
            return Err(ContainerError::Truncated("JPEG"));
        }

        segments.push(Segment {
            marker,
            body: &data[pos + 4..pos + 2 + length],
            raw: &data[pos..pos + 2 + length],
        });
        pos += 2 + length;
    }
}

/// Segmentos que la política de lista de permitidos descarta: todo APPn
/// salvo APP0 (JFIF) y APP14 (transformación de color), más comentarios.
fn is_metadata_segment(marker: u8) -> bool {
    match marker {
        MARKER_COM => true,
        MARKER_APP0 | MARKER_APP14 => false,
        marker => (0xE0..=0xEF).contains(&marker),
    }
}

/// Reemplaza los segmentos de metadata por un único APP1 EXIF saneado.
pub fn replace_metadata(data: &[u8], exif_tiff: &[u8]) -> Result<Vec<u8>, ContainerError> {
    let (segments, rest) = split_segments(data)?;
    let app1 = build_exif_app1(exif_tiff)?;

    let mut out = Vec::with_capacity(data.len() + app1.len());
    out.extend_from_slice(&SOI);

    // El APP1 se inserta tras el APP0 inicial, como lo emiten los
    // codificadores JFIF, o directamente tras SOI si no hay APP0.
    let mut inserted = false;
    for segment in &segments {
        if is_metadata_segment(segment.marker) {
            continue;
        }
        if !inserted && segment.marker != MARKER_APP0 {
            out.extend_from_slice(&app1);
            inserted = true;
        }
        out.extend_from_slice(segment.raw);
        if !inserted && segment.marker == MARKER_APP0 {
            out.extend_from_slice(&app1);
            inserted = true;
        }
    }
    if !inserted {
        out.extend_from_slice(&app1);
    }

    out.extend_from_slice(rest);
    Ok(out)
}

fn build_exif_app1(tiff: &[u8]) -> Result<Vec<u8>, ContainerError> {
    let payload_len = 2 + EXIF_HEADER.len() + tiff.len();
    if payload_len > u16::MAX as usize {
        return Err(ContainerError::Truncated("JPEG"));
    }

    let mut segment = Vec::with_capacity(2 + payload_len);
    segment.extend_from_slice(&[0xFF, MARKER_APP1]);
    segment.extend_from_slice(&(payload_len as u16).to_be_bytes());
    segment.extend_from_slice(EXIF_HEADER);
    segment.extend_from_slice(tiff);
    Ok(segment)
}

/// Cuerpo TIFF del primer segmento APP1 EXIF, si existe.
pub fn exif_segment(data: &[u8]) -> Option<&[u8]> {
    let (segments, _) = split_segments(data).ok()?;
    segments.iter().find_map(|segment| {
        (segment.marker == MARKER_APP1 && segment.body.starts_with(EXIF_HEADER))
            .then(|| &segment.body[EXIF_HEADER.len()..])
    })
}

/// Bytes IIM del recurso IPTC dentro del APP13 de Photoshop, si existe.
pub fn iptc_segment(data: &[u8]) -> Result<Option<Vec<u8>>, ContainerError> {
    let (segments, _) = split_segments(data)?;

    for segment in &segments {
        if segment.marker != MARKER_APP13 || !segment.body.starts_with(PHOTOSHOP_HEADER) {
            continue;
        }
        if let Some(iim) = find_iptc_resource(&segment.body[PHOTOSHOP_HEADER.len()..]) {
            return Ok(Some(iim.to_vec()));
        }
    }

    Ok(None)
}

fn find_iptc_resource(mut data: &[u8]) -> Option<&[u8]> {
    while data.len() >= 12 {
        if &data[..4] != b"8BIM" {
            return None;
        }
        let id = u16::from_be_bytes([data[4], data[5]]);
        let name_len = data[6] as usize;
        // El nombre Pascal se rellena a longitud par.
        let mut offset = 6 + ((1 + name_len + 1) & !1);
        let size_bytes = data.get(offset..offset + 4)?;
        let size =
            u32::from_be_bytes([size_bytes[0], size_bytes[1], size_bytes[2], size_bytes[3]])
                as usize;
        offset += 4;
        let resource = data.get(offset..offset + size)?;
        if id == IPTC_RESOURCE_ID {
            return Some(resource);
        }
        offset += size + (size & 1);
        data = data.get(offset..)?;
    }
    None
}
