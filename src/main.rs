use comfy_table::Color;
use console::style;
use std::io::{self, Write};
use std::path::Path;
use std::sync::mpsc;
use std::{env, fs, thread};

mod batch;
mod container;
mod error;
mod formatting;
mod hashing;
mod metadata;
mod privacy;
mod sanitizer;
mod ui;

#[cfg(test)]
mod test_fixtures;

use crate::metadata::ImageMetadata;
use crate::privacy::{PrivacyAnalysis, RiskLevel};

fn main() {
    env_logger::init();

    if env::args().len() > 1 {
        eprintln!(
            "ImageLens es interactivo y no acepta argumentos. Ejecuta solo `cargo run` o el binario sin parámetros."
        );
        std::process::exit(1);
    }

    ui::render_header();
    ui::render_intro();

    let mut input = String::new();
    loop {
        match read_user_input(&mut input) {
            Ok(None) => {
                println!("\n{}", style("Fin de la entrada. ¡Hasta luego!").dim());
                break;
            }
            Ok(Some(line)) => {
                if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("salir") {
                    println!("{}", style("Hasta luego!").dim());
                    break;
                }

                if line.is_empty() {
                    continue;
                }

                match inspect_path(&line) {
                    Ok(()) => println!("{}\n", style("Consulta completada.").dim()),
                    Err(message) => eprintln!("{message}"),
                }
            }
            Err(error) => {
                eprintln!("Error al leer la entrada: {error}");
            }
        }
    }
}

fn read_user_input(buffer: &mut String) -> io::Result<Option<String>> {
    print!("{} ", style("Ruta").bold().cyan());
    print!("{} ", style("›").cyan());
    io::stdout().flush()?;

    buffer.clear();
    let bytes_read = io::stdin().read_line(buffer)?;
    if bytes_read == 0 {
        return Ok(None);
    }

    Ok(Some(buffer.trim().to_string()))
}

fn inspect_path(path_str: &str) -> Result<(), String> {
    let path = Path::new(path_str);

    if path.is_dir() {
        return process_directory(path);
    }

    inspect_file(path)
}

fn inspect_file(path: &Path) -> Result<(), String> {
    let bytes = fs::read(path)
        .map_err(|error| format!("No se pudo leer `{}`: {error}", path.display()))?;

    let model = metadata::parse(&bytes);
    let analysis = privacy::classify(&model);

    render_analysis_table(path, &bytes, &model, &analysis);

    if model.is_empty() && container::detect_format(&bytes).is_none() {
        println!(
            "\n{}",
            style("│ El contenido no se reconoce como imagen: no hay metadata que sanear.")
                .yellow()
        );
        return Ok(());
    }

    if analysis.has_sensitive_data() {
        offer_cleanup(path)?;
    } else {
        println!(
            "\n{}",
            style("  No se encontró metadata sensible en esta imagen").dim()
        );
    }

    Ok(())
}

fn render_analysis_table(
    path: &Path,
    bytes: &[u8],
    model: &ImageMetadata,
    analysis: &PrivacyAnalysis,
) {
    let mut table = ui::build_table();

    table.add_row(ui::build_row(
        "Archivo",
        &path.display().to_string(),
        Color::White,
    ));

    if let Ok(file_metadata) = fs::symlink_metadata(path) {
        table.add_row(ui::build_row(
            "Tamaño",
            &formatting::format_size(file_metadata.len()),
            Color::White,
        ));
        table.add_row(ui::build_row(
            "Última modificación",
            &formatting::format_optional_time(file_metadata.modified().ok()),
            Color::White,
        ));
    }

    let format = container::detect_format(bytes);
    let format_label = match format {
        Some(format) => format.name().to_string(),
        None => "No reconocido".to_string(),
    };
    table.add_row(ui::build_row("Formato", &format_label, Color::White));
    if let Some(format) = format {
        let rewrite_label = if format.supports_rewrite() {
            "Análisis y saneamiento"
        } else {
            "Solo análisis"
        };
        table.add_row(ui::build_row("Soporte", rewrite_label, Color::White));
    }

    table.add_row(ui::build_row(
        "Hash SHA-256",
        &hashing::sha256_hex(bytes),
        Color::White,
    ));

    if let Some(orientation) = model.orientation {
        table.add_row(ui::build_row(
            "Orientación",
            &orientation.to_string(),
            Color::White,
        ));
    }
    if let (Some(width), Some(height)) = (model.pixel_width, model.pixel_height) {
        table.add_row(ui::build_row(
            "Dimensiones",
            &format!("{width}×{height} px"),
            Color::White,
        ));
    }
    if let Some(color_model) = model.color_model {
        table.add_row(ui::build_row(
            "Modelo de color",
            color_model.tag(),
            Color::White,
        ));
    }

    if let Some(gps) = &model.gps {
        let value = match (gps.latitude, gps.longitude) {
            (Some(latitude), Some(longitude)) => format!("{latitude:.5}, {longitude:.5}"),
            _ => "Presente (parcial)".to_string(),
        };
        table.add_row(ui::build_row("⚠  GPS", &value, Color::Yellow));
    }
    if let Some(device) = &model.device {
        let value = [&device.manufacturer, &device.model, &device.software]
            .into_iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(" · ");
        table.add_row(ui::build_row("⚠  Dispositivo", &value, Color::Yellow));
    }
    if let Some(timestamps) = &model.timestamps {
        let value = timestamps
            .original
            .as_deref()
            .or(timestamps.digitized.as_deref())
            .unwrap_or("Presente");
        table.add_row(ui::build_row("⚠  Fecha de captura", value, Color::Yellow));
    }
    if let Some(camera) = &model.camera {
        let mut parts = Vec::new();
        if let Some(lens) = &camera.lens_model {
            parts.push(lens.clone());
        }
        if let Some(iso) = camera.iso {
            parts.push(format!("ISO {iso}"));
        }
        table.add_row(ui::build_row("Cámara", &parts.join(" · "), Color::White));
    }
    if let Some(caption) = &model.caption {
        let value = caption
            .title
            .as_deref()
            .or(caption.caption.as_deref())
            .unwrap_or("Presente");
        table.add_row(ui::build_row("⚠  Leyenda incrustada", value, Color::Yellow));
    }

    let risk = analysis.risk_level();
    let risk_color = match risk {
        RiskLevel::High => Color::Red,
        RiskLevel::Medium | RiskLevel::Low => Color::Yellow,
        RiskLevel::None => Color::Green,
    };
    table.add_row(ui::build_row(
        "Nivel de riesgo",
        formatting::risk_label(risk),
        risk_color,
    ));
    table.add_row(ui::build_row(
        "Detalle",
        &analysis.removed_data_description(),
        Color::White,
    ));

    println!("\n{table}");
}

fn offer_cleanup(path: &Path) -> Result<(), String> {
    println!("\n{}", style("┌─ Opciones ─").cyan());
    println!("{}", style("│  [1] Eliminar la metadata sensible").cyan());
    println!("{}", style("│  [2] Conservar el archivo tal cual").cyan());
    println!("{}", style("└─").cyan());

    print!("\n{}", style("│ Selecciona una opción ▸ ").cyan());
    io::stdout().flush().unwrap();

    let mut choice = String::new();
    io::stdin().read_line(&mut choice).unwrap();

    if choice.trim() == "1" {
        sanitizer::remove_image_metadata(path)?;

        println!(
            "\n{}",
            style("┌─ Metadata Eliminada Exitosamente ─").green()
        );
        println!(
            "{}",
            style(format!("│ Archivo: {}", path.display()))
                .green()
                .bold()
        );
        println!(
            "{}",
            style("│ Solo se conservaron orientación, dimensiones y color.").green()
        );
        println!("{}", style("└─").green());
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool, String> {
    print!("\n{}", style(format!("│ {prompt} ▸ ")).cyan());
    io::stdout()
        .flush()
        .map_err(|error| format!("No se pudo escribir en la consola: {error}"))?;

    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .map_err(|error| format!("No se pudo leer la respuesta: {error}"))?;

    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("s")
        || answer.eq_ignore_ascii_case("si")
        || answer.eq_ignore_ascii_case("sí"))
}

fn process_directory(root: &Path) -> Result<(), String> {
    let files = batch::collect_candidate_files(root, true)?;
    if files.is_empty() {
        println!(
            "\n{}",
            style("│ No se encontraron imágenes soportadas en el directorio.").yellow()
        );
        return Ok(());
    }

    println!(
        "\n{}",
        style(format!("│ Se encontraron {} imágenes soportadas.", files.len())).cyan()
    );
    if !confirm("¿Sanear todas las imágenes encontradas? (s/n)")? {
        return Ok(());
    }

    let mut inputs = Vec::with_capacity(files.len());
    for file in &files {
        inputs.push(
            fs::read(file)
                .map_err(|error| format!("No se pudo leer `{}`: {error}", file.display()))?,
        );
    }

    let (sender, receiver) = mpsc::channel();
    let handle = thread::spawn(move || batch::process_batch_with_sender(&inputs, sender));

    for event in receiver.iter() {
        match event {
            batch::BatchEvent::Started { total } => {
                println!("\n{}", style(format!("│ Procesando {total} imágenes...")).dim());
            }
            batch::BatchEvent::Processing { index, total } => {
                let name = files[index].display();
                println!("{}", style(format!("│ ({}/{total}) {name}", index + 1)).dim());
            }
            batch::BatchEvent::Cleaned { risk, .. } => {
                println!(
                    "{}",
                    style(format!("│   saneada (riesgo: {})", formatting::risk_label(risk)))
                        .green()
                );
            }
            batch::BatchEvent::Failed { error, .. } => {
                println!("{}", style(format!("│   falló: {error}")).red());
            }
            batch::BatchEvent::Finished {
                successes,
                failures,
            } => {
                println!(
                    "\n{}",
                    style(format!(
                        "│ Lote terminado: {successes} saneadas, {failures} sin cambios."
                    ))
                    .cyan()
                );
                break;
            }
        }
    }

    let report = handle
        .join()
        .map_err(|_| "La limpieza por lote falló".to_string())?;

    let overall = report.overall_analysis();
    println!(
        "{}",
        style(format!(
            "│ Riesgo agregado del lote: {}",
            formatting::risk_label(overall.risk_level())
        ))
        .cyan()
    );

    for (index, item) in report.items.iter().enumerate() {
        if report.failed_indices.contains(&index) {
            continue;
        }
        if let Err(error) = fs::write(&files[index], &item.bytes) {
            println!(
                "{}",
                style(format!(
                    "│ No se pudo escribir `{}`: {error}",
                    files[index].display()
                ))
                .red()
            );
        }
    }

    offer_report_export(root, &report)
}

fn offer_report_export(root: &Path, report: &batch::BatchReport) -> Result<(), String> {
    print!(
        "\n{}",
        style("│ ¿Exportar reporte del lote? (json/csv/no) ▸ ").cyan()
    );
    io::stdout().flush().unwrap();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer).unwrap();
    let answer = answer.trim();

    if answer.is_empty() || answer.eq_ignore_ascii_case("no") || answer.eq_ignore_ascii_case("n") {
        return Ok(());
    }

    let format = batch::parse_export_format(answer)?;
    let destination = root.join(format!("imagelens_reporte.{}", format.extension()));
    batch::export_batch_report(report, format, &destination)?;

    println!(
        "{}",
        style(format!(
            "│ Reporte {} guardado en {}",
            format.label(),
            destination.display()
        ))
        .green()
    );

    Ok(())
}
