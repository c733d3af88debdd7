//! Lectura de los conjuntos de datos IPTC-IIM incrustados en APP13.

use super::model::CaptionData;

const IIM_TAG_MARKER: u8 = 0x1C;
const IIM_APPLICATION_RECORD: u8 = 0x02;

const DATASET_OBJECT_NAME: u8 = 5;
const DATASET_KEYWORDS: u8 = 25;
const DATASET_CAPTION: u8 = 120;

/// Extrae título, descripción y palabras clave del bloque IIM crudo.
///
/// Cada conjunto de datos es `1C`, número de registro, número de conjunto,
/// longitud en dos bytes big-endian y el valor. Solo interesa el registro
/// de aplicación (2); el resto se salta sin fallar.
pub fn parse_caption(data: &[u8]) -> Option<CaptionData> {
    let mut caption = CaptionData::default();
    let mut pos = 0;

    while pos + 5 <= data.len() {
        if data[pos] != IIM_TAG_MARKER {
            pos += 1;
            continue;
        }

        let record = data[pos + 1];
        let dataset = data[pos + 2];
        let length = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as usize;
        pos += 5;

        if pos + length > data.len() {
            log::warn!("conjunto de datos IIM truncado; se ignora el resto");
            break;
        }

        if record == IIM_APPLICATION_RECORD {
            let value = String::from_utf8_lossy(&data[pos..pos + length])
                .trim()
                .to_string();
            if !value.is_empty() {
                match dataset {
                    DATASET_OBJECT_NAME => caption.title = Some(value),
                    DATASET_KEYWORDS => caption.keywords.push(value),
                    DATASET_CAPTION => caption.caption = Some(value),
                    _ => {}
                }
            }
        }

        pos += length;
    }

    (!caption.is_empty()).then_some(caption)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(number: u8, value: &str) -> Vec<u8> {
        let mut out = vec![IIM_TAG_MARKER, IIM_APPLICATION_RECORD, number];
        out.extend_from_slice(&(value.len() as u16).to_be_bytes());
        out.extend_from_slice(value.as_bytes());
        out
    }

    #[test]
    fn parse_caption_collects_known_datasets() {
        let mut data = dataset(DATASET_OBJECT_NAME, "Atardecer");
        data.extend_from_slice(&dataset(DATASET_CAPTION, "Playa en agosto"));
        data.extend_from_slice(&dataset(DATASET_KEYWORDS, "playa"));
        data.extend_from_slice(&dataset(DATASET_KEYWORDS, "verano"));
        data.extend_from_slice(&dataset(99, "ignorado"));

        let caption = parse_caption(&data).expect("la leyenda deberia estar presente");
        assert_eq!(caption.title.as_deref(), Some("Atardecer"));
        assert_eq!(caption.caption.as_deref(), Some("Playa en agosto"));
        assert_eq!(caption.keywords, vec!["playa", "verano"]);
    }

    #[test]
    fn parse_caption_survives_truncated_datasets() {
        let mut data = dataset(DATASET_OBJECT_NAME, "Titulo");
        data.extend_from_slice(&[IIM_TAG_MARKER, IIM_APPLICATION_RECORD, DATASET_CAPTION, 0xFF, 0xFF]);

        let caption = parse_caption(&data).expect("el titulo previo deberia sobrevivir");
        assert_eq!(caption.title.as_deref(), Some("Titulo"));
        assert!(caption.caption.is_none());
    }

    #[test]
    fn parse_caption_returns_none_for_empty_block() {
        assert!(parse_caption(&[]).is_none());
        assert!(parse_caption(b"sin marcador IIM").is_none());
    }
}
