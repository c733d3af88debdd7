//! Procesamiento por lotes: un resultado por entrada y sin abortos.

mod export;

pub use export::{ExportFormat, export_batch_report, parse_export_format};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use walkdir::WalkDir;

use crate::hashing::sha256_hex;
use crate::privacy::{PrivacyAnalysis, RiskLevel, analyze_image};
use crate::sanitizer::strip_metadata;

#[cfg(test)]
mod tests;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Eventos de progreso emitidos durante la limpieza por lote.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum BatchEvent {
    Started { total: usize },
    Processing { index: usize, total: usize },
    Cleaned { index: usize, risk: RiskLevel },
    Failed { index: usize, error: String },
    Finished { successes: usize, failures: usize },
}

/// Resultado por imagen: bytes de salida, análisis y huella de entrada.
///
/// Cuando la reescritura falla, `bytes` son los bytes originales de la
/// entrada; la posición nunca se descarta.
#[derive(Clone, Debug)]
pub struct BatchItem {
    pub bytes: Vec<u8>,
    pub analysis: PrivacyAnalysis,
    pub sha256: String,
    pub failure: Option<String>,
}

/// Resultado completo de un lote, alineado con la entrada por índice.
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
    pub failed_indices: BTreeSet<usize>,
}

impl BatchReport {
    /// Reducción OR de todos los análisis del lote.
    pub fn overall_analysis(&self) -> PrivacyAnalysis {
        self.items
            .iter()
            .fold(PrivacyAnalysis::default(), |acc, item| {
                acc.merge(item.analysis)
            })
    }
}

/// Procesa cada imagen de forma aislada: la clasificación corre siempre,
/// y ante un fallo de reescritura la salida conserva los bytes originales
/// en la misma posición. Ningún fallo aborta el resto del lote.
pub fn process_batch(inputs: &[Vec<u8>]) -> BatchReport {
    process_batch_inner(inputs, None)
}

/// Variante con eventos de progreso por `mpsc`, para la consola.
pub fn process_batch_with_sender(inputs: &[Vec<u8>], sender: Sender<BatchEvent>) -> BatchReport {
    process_batch_inner(inputs, Some(sender))
}

fn process_batch_inner(inputs: &[Vec<u8>], sender: Option<Sender<BatchEvent>>) -> BatchReport {
    let total = inputs.len();
    send(&sender, BatchEvent::Started { total });

    let mut report = BatchReport::default();

    for (index, input) in inputs.iter().enumerate() {
        send(&sender, BatchEvent::Processing { index, total });

        // Independiente de la reescritura: se reporta incluso si falla.
        let analysis = analyze_image(input);
        let sha256 = sha256_hex(input);

        let outcome = strip_metadata(input);
        if outcome.is_stripped() {
            send(
                &sender,
                BatchEvent::Cleaned {
                    index,
                    risk: analysis.risk_level(),
                },
            );
        } else {
            report.failed_indices.insert(index);
        }

        let failure = outcome.failure.map(|error| error.to_string());
        if let Some(error) = &failure {
            send(
                &sender,
                BatchEvent::Failed {
                    index,
                    error: error.clone(),
                },
            );
        }

        report.items.push(BatchItem {
            bytes: outcome.bytes,
            analysis,
            sha256,
            failure,
        });
    }

    send(
        &sender,
        BatchEvent::Finished {
            successes: total - report.failed_indices.len(),
            failures: report.failed_indices.len(),
        },
    );

    report
}

fn send(sender: &Option<Sender<BatchEvent>>, event: BatchEvent) {
    if let Some(sender) = sender {
        let _ = sender.send(event);
    }
}

/// Reúne las imágenes soportadas bajo un directorio, en orden estable.
pub fn collect_candidate_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, String> {
    if !root.is_dir() {
        return Err("La ruta proporcionada no es un directorio".to_string());
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(root).max_depth(max_depth).sort_by_file_name() {
        let entry = entry
            .map_err(|error| format!("Entrada inválida bajo {}: {error}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        if extension
            .as_deref()
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext))
        {
            files.push(path);
        }
    }

    Ok(files)
}
