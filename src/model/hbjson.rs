//! HBJSON-style file I/O.
//!
//! Models persist as pretty-printed, type-tagged JSON. A plain `Model`
//! file carries the base building only; a `PhModel` file adds the
//! Passive House property stores under a `properties` map.

use crate::model::Model;
use crate::properties::PhModel;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Writes a base model to a JSON file.
///
/// # Example
/// ```no_run
/// use passivhaus::model::Model;
/// use passivhaus::model::hbjson::write_model;
/// use std::path::Path;
///
/// let model = Model::new("my_building");
/// write_model(Path::new("model.hbjson"), &model).unwrap();
/// ```
pub fn write_model(path: &Path, model: &Model) -> Result<()> {
    let value = model.to_dict()?;
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, &value)
        .with_context(|| format!("Failed to serialize model to: {}", path.display()))?;

    Ok(())
}

/// Reads a base model from a JSON file.
pub fn read_model(path: &Path) -> Result<Model> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let value: Value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse JSON from: {}", path.display()))?;

    Model::from_dict(&value)
        .with_context(|| format!("Failed to deserialize model from: {}", path.display()))
}

/// Writes a model and its Passive House properties to a JSON file.
pub fn write_ph_model(path: &Path, ph_model: &PhModel) -> Result<()> {
    let value = ph_model.to_dict()?;
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, &value)
        .with_context(|| format!("Failed to serialize model to: {}", path.display()))?;

    Ok(())
}

/// Reads a model and its Passive House properties from a JSON file.
///
/// # Example
/// ```no_run
/// use passivhaus::model::hbjson::read_ph_model;
/// use std::path::Path;
///
/// let ph_model = read_ph_model(Path::new("model.hbjson")).unwrap();
/// println!("Loaded model: {}", ph_model.model.base.display_name);
/// ```
pub fn read_ph_model(path: &Path) -> Result<PhModel> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let value: Value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse JSON from: {}", path.display()))?;

    PhModel::from_dict(&value)
        .with_context(|| format!("Failed to deserialize model from: {}", path.display()))
}

/// Serializes a PH model to a JSON string.
///
/// Useful for in-memory operations or network transfer.
pub fn to_hbjson_string(ph_model: &PhModel) -> Result<String> {
    let value = ph_model.to_dict()?;
    serde_json::to_string_pretty(&value).context("Failed to serialize model to string")
}

/// Deserializes a PH model from a JSON string.
pub fn from_hbjson_string(json: &str) -> Result<PhModel> {
    let value: Value = serde_json::from_str(json).context("Failed to parse JSON string")?;
    PhModel::from_dict(&value)
}
