//! Day-template file IO
//!
//! Templates are plain JSON arrays of [`TemplateEntry`] values stored as
//! `<template_dir>/<name>.json`. Only the seed command touches these.

use std::path::{Path, PathBuf};

use timebridge_domain::{Result, TemplateEntry, TimebridgeError};
use tracing::debug;

use crate::errors::InfraError;

/// Path of a named template inside the template directory.
pub fn template_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

/// Read a named template from the template directory.
pub fn load_template(dir: &Path, name: &str) -> Result<Vec<TemplateEntry>> {
    let path = template_path(dir, name);
    let contents = std::fs::read_to_string(&path).map_err(|e| {
        TimebridgeError::Storage(format!("cannot read template {}: {e}", path.display()))
    })?;

    let entries: Vec<TemplateEntry> =
        serde_json::from_str(&contents).map_err(InfraError::from)?;
    debug!(path = %path.display(), count = entries.len(), "loaded day template");
    Ok(entries)
}

/// Write a named template, creating the template directory if needed.
pub fn save_template(dir: &Path, name: &str, entries: &[TemplateEntry]) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        TimebridgeError::Storage(format!("cannot create template dir {}: {e}", dir.display()))
    })?;

    let path = template_path(dir, name);
    let contents = serde_json::to_string_pretty(entries).map_err(InfraError::from)?;
    std::fs::write(&path, contents).map_err(|e| {
        TimebridgeError::Storage(format!("cannot write template {}: {e}", path.display()))
    })?;

    debug!(path = %path.display(), count = entries.len(), "saved day template");
    Ok(())
}
