// File: src/persistence.rs
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::core::decision_list::DecisionList;
use crate::core::types::Prediction;
use crate::errors::{Result, WsdError};

/// Human-readable model: one block per rule, in application order.
pub fn format_report(model: &DecisionList) -> String {
    let mut report = String::new();
    for rule in model.rules() {
        // writing to a String cannot fail
        let _ = write!(
            report,
            "Feature: {}\nLog-likelihood: {}\nSense: {}\n\n",
            rule.feature,
            rule.score,
            model.label(rule.sense)
        );
    }
    report
}

/// `<answer instance="ID" senseid="SENSE"/>`
pub fn format_answer(prediction: &Prediction) -> String {
    format!(
        "<answer instance=\"{}\" senseid=\"{}\"/>",
        prediction.instance_id, prediction.sense
    )
}

pub fn write_answers<W: Write>(predictions: &[Prediction], mut out: W) -> Result<()> {
    for prediction in predictions {
        writeln!(out, "{}", format_answer(prediction))?;
    }
    out.flush()?;
    Ok(())
}

/// Writes through a temp file in the same directory, then renames over `path`,
/// so readers never see a half-written file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let temp_file = temp_beside(path)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        writer.write_all(contents)?;
        writer.flush()?;
    }
    persist(temp_file, path)
}

pub fn save_report(model: &DecisionList, path: &Path) -> Result<()> {
    write_atomic(path, format_report(model).as_bytes())
}

/// Binary snapshot of a trained model.
pub fn save_model(model: &DecisionList, path: &Path) -> Result<()> {
    let temp_file = temp_beside(path)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, model)?;
        writer.flush()?;
    }
    persist(temp_file, path)
}

/// Loads a snapshot and rejects one whose rules or sense indices are
/// inconsistent.
pub fn load_model(path: &Path) -> Result<DecisionList> {
    let file = File::open(path)
        .map_err(|e| WsdError::io(format!("opening model {}", path.display()), e))?;
    let reader = BufReader::new(file);
    let model: DecisionList = bincode::deserialize_from(reader)?;
    model.check().map_err(|reason| WsdError::Serialization {
        message: format!("model snapshot {} is inconsistent: {reason}", path.display()),
        source: reason.into(),
    })?;
    Ok(model)
}

fn temp_beside(path: &Path) -> Result<NamedTempFile> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)
        .map_err(|e| WsdError::io(format!("creating {}", parent_dir.display()), e))?;
    NamedTempFile::new_in(parent_dir)
        .map_err(|e| WsdError::io(format!("creating temp file in {}", parent_dir.display()), e))
}

fn persist(temp_file: NamedTempFile, path: &Path) -> Result<()> {
    temp_file
        .persist(path)
        .map_err(|e| WsdError::io(format!("writing {}", path.display()), e.error))?;
    Ok(())
}
