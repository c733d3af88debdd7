//! Recorrido y reconstrucción de fragmentos PNG.

use crate::error::ContainerError;

pub const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Fragmentos que sobreviven al saneamiento: estructura, paleta,
/// transparencia y la información de color necesaria para renderizar.
const KEEP_CHUNKS: [&[u8; 4]; 7] = [b"IHDR", b"PLTE", b"tRNS", b"sRGB", b"gAMA", b"IDAT", b"IEND"];

struct Chunk<'a> {
    kind: [u8; 4],
    data: &'a [u8],
    raw: &'a [u8],
}

fn split_chunks(data: &[u8]) -> Result<Vec<Chunk<'_>>, ContainerError> {
    if !data.starts_with(&SIGNATURE) {
        return Err(ContainerError::BadSignature("PNG"));
    }

    let mut chunks = Vec::new();
    let mut pos = SIGNATURE.len();

    while pos < data.len() {
        let header = data
            .get(pos..pos + 8)
            .ok_or(ContainerError::Truncated("PNG"))?;
        let length = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let kind = [header[4], header[5], header[6], header[7]];
        let raw = data
            .get(pos..pos + 12 + length)
            .ok_or(ContainerError::Truncated("PNG"))?;

        chunks.push(Chunk {
            kind,
            data: &raw[8..8 + length],
            raw,
        });
        pos += 12 + length;

        if &kind == b"IEND" {
            break;
        }
    }

    Ok(chunks)
}

/// Reemplaza los fragmentos de metadata por un único `eXIf` saneado.
///
/// Los `IDAT` se copian byte a byte junto con su CRC original.
pub fn replace_metadata(data: &[u8], exif_tiff: &[u8]) -> Result<Vec<u8>, ContainerError> {
    let chunks = split_chunks(data)?;
    let exif_chunk = build_chunk(b"eXIf", exif_tiff);

    let mut out = Vec::with_capacity(data.len() + exif_chunk.len());
    out.extend_from_slice(&SIGNATURE);

    for chunk in &chunks {
        if !KEEP_CHUNKS.contains(&&chunk.kind) {
            continue;
        }
        out.extend_from_slice(chunk.raw);
        if &chunk.kind == b"IHDR" {
            out.extend_from_slice(&exif_chunk);
        }
    }

    Ok(out)
}

/// Pares clave/valor de los fragmentos `tEXt` e `iTXt` sin comprimir.
pub fn text_chunks(data: &[u8]) -> Result<Vec<(String, String)>, ContainerError> {
    let chunks = split_chunks(data)?;
    let mut entries = Vec::new();

    for chunk in &chunks {
        match &chunk.kind {
            b"tEXt" => {
                if let Some(split) = chunk.data.iter().position(|&b| b == 0) {
                    entries.push((
                        latin1_to_string(&chunk.data[..split]),
                        latin1_to_string(&chunk.data[split + 1..]),
                    ));
                }
            }
            b"iTXt" => {
                if let Some(entry) = parse_itxt(chunk.data) {
                    entries.push(entry);
                }
            }
            _ => {}
        }
    }

    Ok(entries)
}

fn parse_itxt(data: &[u8]) -> Option<(String, String)> {
    let keyword_end = data.iter().position(|&b| b == 0)?;
    let keyword = latin1_to_string(&data[..keyword_end]);

    // Solo texto sin comprimir; el resto de variantes se ignora.
    if *data.get(keyword_end + 1)? != 0 {
        return None;
    }

    // Saltar método de compresión, etiqueta de idioma y clave traducida.
    let mut pos = keyword_end + 3;
    for _ in 0..2 {
        let end = data.get(pos..)?.iter().position(|&b| b == 0)?;
        pos += end + 1;
    }

    let text = String::from_utf8_lossy(data.get(pos..)?).to_string();
    Some((keyword, text))
}

fn latin1_to_string(data: &[u8]) -> String {
    data.iter().map(|&b| b as char).collect()
}

/// Cuerpo TIFF del fragmento `eXIf`, si existe.
pub fn exif_chunk(data: &[u8]) -> Option<Vec<u8>> {
    let chunks = split_chunks(data).ok()?;
    chunks
        .iter()
        .find(|chunk| &chunk.kind == b"eXIf")
        .map(|chunk| chunk.data.to_vec())
}

/// Dimensiones y tipo de color declarados en IHDR.
pub fn ihdr_info(data: &[u8]) -> Option<(u32, u32, u8)> {
    let chunks = split_chunks(data).ok()?;
    let ihdr = chunks.iter().find(|chunk| &chunk.kind == b"IHDR")?;
    if ihdr.data.len() < 13 {
        return None;
    }

    let width = u32::from_be_bytes([ihdr.data[0], ihdr.data[1], ihdr.data[2], ihdr.data[3]]);
    let height = u32::from_be_bytes([ihdr.data[4], ihdr.data[5], ihdr.data[6], ihdr.data[7]]);
    Some((width, height, ihdr.data[9]))
}

/// Construye un fragmento PNG completo con su CRC.
pub fn build_chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut chunk = Vec::with_capacity(12 + data.len());
    chunk.extend_from_slice(&(data.len() as u32).to_be_bytes());
    chunk.extend_from_slice(kind);
    chunk.extend_from_slice(data);
    chunk.extend_from_slice(&crc32(kind, data).to_be_bytes());
    chunk
}

fn crc32(kind: &[u8; 4], data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFF_u32;
    for &byte in kind.iter().chain(data) {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_png(extra: &[Vec<u8>]) -> Vec<u8> {
        let ihdr = [0, 0, 0, 1, 0, 0, 0, 1, 8, 2, 0, 0, 0];
        let mut data = SIGNATURE.to_vec();
        data.extend_from_slice(&build_chunk(b"IHDR", &ihdr));
        for chunk in extra {
            data.extend_from_slice(chunk);
        }
        data.extend_from_slice(&build_chunk(b"IEND", &[]));
        data
    }

    #[test]
    fn build_chunk_computes_the_png_crc() {
        let iend = build_chunk(b"IEND", &[]);
        assert_eq!(&iend, &[0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]);
    }

    #[test]
    fn text_chunks_reads_text_and_itxt_entries() {
        let text = build_chunk(b"tEXt", b"Title\0Una foto");
        let itxt = build_chunk(b"iTXt", b"Comment\0\0\0\0\0hola");
        let data = minimal_png(&[text, itxt]);

        let entries = text_chunks(&data).expect("el recorrido deberia funcionar");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("Title".to_string(), "Una foto".to_string()));
        assert_eq!(entries[1], ("Comment".to_string(), "hola".to_string()));
    }

    #[test]
    fn replace_metadata_drops_text_and_inserts_exif() {
        let text = build_chunk(b"tEXt", b"Author\0Yo");
        let data = minimal_png(&[text]);

        let out = replace_metadata(&data, b"II*\0tiff").expect("la reescritura deberia funcionar");

        assert!(text_chunks(&out).expect("la salida deberia recorrerse").is_empty());
        assert_eq!(exif_chunk(&out), Some(b"II*\0tiff".to_vec()));
        assert_eq!(ihdr_info(&out), Some((1, 1, 2)));
    }
}
