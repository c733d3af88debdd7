//! Imágenes y bloques EXIF de prueba construidos en memoria.

use std::io::Cursor;

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};

use crate::container;

/// JPEG mínimo generado por el códec, sin metadata sensible.
pub(crate) fn plain_jpeg() -> Vec<u8> {
    let pixels = image::RgbImage::from_pixel(8, 8, image::Rgb([180, 90, 30]));
    let mut bytes = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(pixels)
        .write_to(&mut bytes, image::ImageFormat::Jpeg)
        .expect("la codificación JPEG de prueba no debería fallar");
    bytes.into_inner()
}

/// PNG mínimo generado por el códec.
pub(crate) fn plain_png() -> Vec<u8> {
    let pixels = image::RgbImage::from_pixel(8, 8, image::Rgb([20, 120, 220]));
    let mut bytes = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(pixels)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("la codificación PNG de prueba no debería fallar");
    bytes.into_inner()
}

/// Bloque TIFF con los campos EXIF dados.
pub(crate) fn exif_tiff(fields: &[Field]) -> Vec<u8> {
    let mut writer = Writer::new();
    for field in fields {
        writer.push_field(field);
    }

    let mut buffer = Cursor::new(Vec::new());
    writer
        .write(&mut buffer, false)
        .expect("la escritura EXIF de prueba no debería fallar");
    buffer.into_inner()
}

pub(crate) fn ascii_field(tag: Tag, value: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![value.as_bytes().to_vec()]),
    }
}

pub(crate) fn short_field(tag: Tag, value: u16) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Short(vec![value]),
    }
}

/// Coordenadas completas (latitud y longitud con referencia).
pub(crate) fn gps_fields() -> Vec<Field> {
    vec![
        Field {
            tag: Tag::GPSLatitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![
                Rational { num: 40, denom: 1 },
                Rational { num: 26, denom: 1 },
                Rational {
                    num: 4614,
                    denom: 100,
                },
            ]),
        },
        ascii_field(Tag::GPSLatitudeRef, "N"),
        Field {
            tag: Tag::GPSLongitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![
                Rational { num: 3, denom: 1 },
                Rational { num: 42, denom: 1 },
                Rational {
                    num: 1331,
                    denom: 100,
                },
            ]),
        },
        ascii_field(Tag::GPSLongitudeRef, "W"),
    ]
}

/// Inserta los campos dados como APP1 del JPEG de prueba.
pub(crate) fn jpeg_with_exif(fields: &[Field]) -> Vec<u8> {
    container::jpeg::replace_metadata(&plain_jpeg(), &exif_tiff(fields))
        .expect("la inserción del APP1 de prueba no debería fallar")
}

/// Un conjunto de datos IIM del registro de aplicación.
pub(crate) fn iim_dataset(dataset: u8, value: &str) -> Vec<u8> {
    let mut data = vec![0x1C, 0x02, dataset];
    data.extend_from_slice(&(value.len() as u16).to_be_bytes());
    data.extend_from_slice(value.as_bytes());
    data
}

/// JPEG de prueba con un APP13 de Photoshop que envuelve los conjuntos IIM.
pub(crate) fn jpeg_with_iptc(datasets: &[Vec<u8>]) -> Vec<u8> {
    let iim: Vec<u8> = datasets.concat();

    let mut resource = b"Photoshop 3.0\0".to_vec();
    resource.extend_from_slice(b"8BIM");
    resource.extend_from_slice(&0x0404_u16.to_be_bytes());
    resource.extend_from_slice(&[0, 0]);
    resource.extend_from_slice(&(iim.len() as u32).to_be_bytes());
    resource.extend_from_slice(&iim);
    if iim.len() % 2 == 1 {
        resource.push(0);
    }

    let mut segment = vec![0xFF, 0xED];
    segment.extend_from_slice(&((resource.len() + 2) as u16).to_be_bytes());
    segment.extend_from_slice(&resource);

    // Insertarlo justo después de SOI alcanza para el analizador.
    let jpeg = plain_jpeg();
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&segment);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Inserta un fragmento arbitrario justo después del IHDR de un PNG.
pub(crate) fn add_png_chunk(png: &[u8], kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
    assert_eq!(&png[12..16], b"IHDR", "el IHDR debería ser el primer fragmento");
    const IHDR_END: usize = 33;

    let chunk = container::png::build_chunk(kind, data);
    let mut out = png[..IHDR_END].to_vec();
    out.extend_from_slice(&chunk);
    out.extend_from_slice(&png[IHDR_END..]);
    out
}
