//! Dataset files

use crate::config::InputFormat;
use crate::dataset::Dataset;
use crate::error::{RunResult, TranslationRunError};
use crate::normalize::{normalize, ExportDataset};
use flate2::read::ZlibDecoder;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Load a dataset file, normalizing platform exports to the canonical form
/// in `language`
///
/// Files that are not UTF-8 text are read as zlib-compressed JSON.
pub fn load_dataset(path: &Path, format: InputFormat, language: &str) -> RunResult<Dataset> {
    let content = read_text(path)?;

    let dataset = match format {
        InputFormat::Platform => {
            let export: ExportDataset = serde_json::from_str(&content)?;
            normalize(&export, language)?
        }
        InputFormat::Canonical => serde_json::from_str(&content)?,
    };
    info!(
        path = %path.display(),
        intents = dataset.intents.len(),
        expressions = dataset.expression_count(),
        gazettes = dataset.gazettes.len(),
        "Loaded dataset"
    );
    Ok(dataset)
}

fn read_text(path: &Path) -> RunResult<String> {
    let io_error = |source| TranslationRunError::Io {
        path: path.to_path_buf(),
        source,
    };
    let bytes = fs::read(path).map_err(io_error)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(not_utf8) => {
            debug!(path = %path.display(), "Dataset is not UTF-8, inflating as zlib");
            let mut text = String::new();
            ZlibDecoder::new(not_utf8.as_bytes())
                .read_to_string(&mut text)
                .map_err(io_error)?;
            Ok(text)
        }
    }
}

/// Write `dataset` as JSON indented by four spaces; non-ASCII text is
/// written as is
pub fn save_dataset(path: &Path, dataset: &Dataset) -> RunResult<()> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    dataset.serialize(&mut serializer)?;

    fs::write(path, buffer).map_err(|source| TranslationRunError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Saved translated dataset");
    Ok(())
}
