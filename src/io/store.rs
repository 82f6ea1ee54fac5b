use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use log::info;

use crate::{
    common::error::StoreError,
    domain::ledger::Ledger,
    io::{json, tabular},
};

/// On-disk layout of a saved auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    /// Single JSON document with `bidders` and `items` maps.
    Json,
    /// `Items` and `Bidders` sheets in one CSV workbook.
    Tabular,
}

impl StoreFormat {
    /// `.json` files use the document format, everything else the workbook.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => StoreFormat::Json,
            _ => StoreFormat::Tabular,
        }
    }
}

/// Saves the ledger to `path` in the format implied by its extension.
pub fn save(ledger: &Ledger, path: &Path) -> Result<(), StoreError> {
    save_as(ledger, path, StoreFormat::from_path(path))
}

pub fn save_as(ledger: &Ledger, path: &Path, format: StoreFormat) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        StoreFormat::Json => json::write_document(&mut writer, ledger)?,
        StoreFormat::Tabular => tabular::write_workbook(&mut writer, ledger)?,
    }
    writer.flush()?;
    info!(
        "saved {} items and {} bidders to {}",
        ledger.item_count(),
        ledger.bidder_count(),
        path.display()
    );
    Ok(())
}

/// Reads `path` into a new ledger; nothing outside the returned value is
/// touched.
pub fn load(path: &Path) -> Result<Ledger, StoreError> {
    load_as(path, StoreFormat::from_path(path))
}

pub fn load_as(path: &Path, format: StoreFormat) -> Result<Ledger, StoreError> {
    let reader = BufReader::new(File::open(path)?);
    let ledger = match format {
        StoreFormat::Json => json::read_document(reader)?,
        StoreFormat::Tabular => tabular::read_workbook(reader)?,
    };
    info!(
        "loaded {} items and {} bidders from {}",
        ledger.item_count(),
        ledger.bidder_count(),
        path.display()
    );
    Ok(ledger)
}

/// Replaces `ledger` with the contents of `path`. On any error the ledger
/// keeps its previous state.
pub fn load_into(ledger: &mut Ledger, path: &Path) -> Result<(), StoreError> {
    let staged = load(path)?;
    ledger.replace_with(staged);
    Ok(())
}
