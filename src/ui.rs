//! Encabezado y tablas con el estilo visual de ImageLens.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Row, Table};
use console::style;

const HEADER_WIDTH: usize = 74;

pub fn render_header() {
    let border = "─".repeat(HEADER_WIDTH - 2);
    println!("\n{}", style(format!("┌{}┐", border)).cyan());
    println!(
        "{}",
        style(format!(
            "│ {:^inner_width$} │",
            "▸ ImageLens · Privacidad de Metadata de Imágenes ◂",
            inner_width = HEADER_WIDTH - 4
        ))
        .cyan()
        .bold()
    );
    println!("{}\n", style(format!("└{}┘", border)).cyan());
}

pub fn render_intro() {
    println!(
        "{}",
        style("Escribe la ruta de una imagen para analizar su metadata,").dim()
    );
    println!(
        "{}",
        style("o la de un directorio para sanear sus imágenes en lote.").dim()
    );
    println!(
        "{}\n",
        style("Escribe 'salir' o 'exit' para terminar.").dim()
    );
}

pub fn build_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![header_cell("Propiedad"), header_cell("Valor")]);

    table
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
        .add_attribute(Attribute::Underlined)
}

pub fn build_row(label: &str, value: &str, value_color: Color) -> Row {
    Row::from(vec![
        Cell::new(label).fg(Color::Rgb {
            r: 160,
            g: 196,
            b: 255,
        }),
        Cell::new(value).fg(value_color),
    ])
}
