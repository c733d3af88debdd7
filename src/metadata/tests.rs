use exif::Tag;

use crate::container;
use crate::test_fixtures::{
    add_png_chunk, ascii_field, exif_tiff, gps_fields, iim_dataset, jpeg_with_exif,
    jpeg_with_iptc, plain_jpeg, plain_png, short_field,
};

use super::model::ColorModel;
use super::parse;

#[test]
fn parse_junk_bytes_yields_empty_model() {
    let model = parse(b"esto no es una imagen");
    assert!(model.is_empty());
}

#[test]
fn parse_plain_jpeg_yields_no_categories() {
    let model = parse(&plain_jpeg());

    assert!(model.gps.is_none());
    assert!(model.device.is_none());
    assert!(model.timestamps.is_none());
    assert!(model.camera.is_none());
    assert!(model.caption.is_none());
    assert!(model.orientation.is_none());
}

#[test]
fn parse_extracts_each_category() {
    let mut fields = gps_fields();
    fields.push(ascii_field(Tag::Make, "Canon"));
    fields.push(ascii_field(Tag::Model, "EOS R5"));
    fields.push(ascii_field(Tag::Software, "darktable 4.6"));
    fields.push(ascii_field(Tag::DateTimeOriginal, "2024:05:01 10:30:00"));
    fields.push(ascii_field(Tag::LensModel, "RF 35mm F1.8"));
    fields.push(short_field(Tag::PhotographicSensitivity, 400));
    fields.push(short_field(Tag::Orientation, 6));

    let model = parse(&jpeg_with_exif(&fields));

    let gps = model.gps.expect("el bloque GPS debería estar presente");
    let latitude = gps.latitude.expect("la latitud debería estar presente");
    assert!((latitude - 40.446).abs() < 0.01);
    let longitude = gps.longitude.expect("la longitud debería estar presente");
    assert!(longitude < 0.0, "la referencia W debería dar longitud negativa");

    let device = model.device.expect("el bloque de dispositivo debería estar presente");
    assert_eq!(device.manufacturer.as_deref(), Some("Canon"));
    assert_eq!(device.model.as_deref(), Some("EOS R5"));
    assert_eq!(device.software.as_deref(), Some("darktable 4.6"));

    let timestamps = model.timestamps.expect("las fechas deberían estar presentes");
    assert_eq!(timestamps.original.as_deref(), Some("2024:05:01 10:30:00"));
    assert!(timestamps.digitized.is_none());

    let camera = model.camera.expect("los ajustes de cámara deberían estar presentes");
    assert_eq!(camera.lens_model.as_deref(), Some("RF 35mm F1.8"));
    assert_eq!(camera.iso, Some(400));

    assert_eq!(model.orientation, Some(6));
}

#[test]
fn parse_discards_out_of_range_orientation() {
    let model = parse(&jpeg_with_exif(&[short_field(Tag::Orientation, 9)]));
    assert!(model.orientation.is_none());
}

#[test]
fn parse_survives_garbage_exif_payload() {
    let bytes = container::jpeg::replace_metadata(&plain_jpeg(), b"esto no es un bloque TIFF")
        .expect("la inserción del APP1 de prueba no debería fallar");

    let model = parse(&bytes);

    assert!(model.gps.is_none());
    assert!(model.device.is_none());
    assert!(model.orientation.is_none());
}

#[test]
fn parse_reads_iptc_caption_from_app13() {
    let bytes = jpeg_with_iptc(&[
        iim_dataset(5, "Atardecer"),
        iim_dataset(120, "Playa en agosto"),
        iim_dataset(25, "verano"),
    ]);

    let model = parse(&bytes);

    let caption = model.caption.expect("la leyenda debería estar presente");
    assert_eq!(caption.title.as_deref(), Some("Atardecer"));
    assert_eq!(caption.caption.as_deref(), Some("Playa en agosto"));
    assert_eq!(caption.keywords, vec!["verano"]);
}

#[test]
fn parse_png_fills_dimensions_and_color_from_ihdr() {
    let model = parse(&plain_png());

    assert_eq!(model.pixel_width, Some(8));
    assert_eq!(model.pixel_height, Some(8));
    assert_eq!(model.color_model, Some(ColorModel::Rgb));
}

#[test]
fn parse_png_maps_text_chunks_to_caption() {
    let bytes = add_png_chunk(&plain_png(), b"tEXt", b"Description\0Una tarde cualquiera");

    let model = parse(&bytes);

    let caption = model.caption.expect("la leyenda debería estar presente");
    assert_eq!(caption.caption.as_deref(), Some("Una tarde cualquiera"));
}

#[test]
fn parse_png_reads_exif_chunk() {
    let bytes = add_png_chunk(&plain_png(), b"eXIf", &exif_tiff(&gps_fields()));

    let model = parse(&bytes);

    let gps = model.gps.expect("el bloque GPS debería estar presente");
    assert!(gps.has_exact_location());
}
