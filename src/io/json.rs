use std::io::{Read, Write};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    common::error::StoreError,
    domain::{
        bidder::{Bidder, BidderId},
        item::{Item, ItemNumber},
        ledger::Ledger,
    },
};

#[derive(Serialize)]
/// Borrowed view written out as `{ "bidders": {..}, "items": {..} }`.
struct DocumentRef<'a> {
    bidders: IndexMap<BidderId, &'a Bidder>,
    items: IndexMap<ItemNumber, &'a Item>,
}

#[derive(Deserialize)]
struct Document {
    bidders: IndexMap<BidderId, Bidder>,
    items: IndexMap<ItemNumber, Item>,
}

/// Writes the ledger as a pretty-printed JSON document keyed by stringified
/// ids, in insertion order.
pub fn write_document<W: Write>(writer: W, ledger: &Ledger) -> Result<(), StoreError> {
    let doc = DocumentRef {
        bidders: ledger.bidders().map(|b| (b.bidder_id, b)).collect(),
        items: ledger.items().map(|i| (i.item_number, i)).collect(),
    };
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}

/// Parses a JSON document into a fresh ledger without touching any live
/// state.
///
/// # Errors
///
/// `StoreError::Json` for syntax errors, missing members or wrong types;
/// `StoreError::Format` when a map key disagrees with the embedded id or the
/// records break the sold-state / won-items invariants.
pub fn read_document<R: Read>(reader: R) -> Result<Ledger, StoreError> {
    let doc: Document = serde_json::from_reader(reader)?;

    for (key, item) in &doc.items {
        if *key != item.item_number {
            return Err(StoreError::Format(format!(
                "items key {} does not match itemNumber {}",
                key, item.item_number
            )));
        }
    }
    for (key, bidder) in &doc.bidders {
        if *key != bidder.bidder_id {
            return Err(StoreError::Format(format!(
                "bidders key {} does not match bidderId {}",
                key, bidder.bidder_id
            )));
        }
    }

    let ledger = Ledger::from_parts(doc.items, doc.bidders);
    ledger
        .check_consistency()
        .map_err(|e| StoreError::Format(e.to_string()))?;
    Ok(ledger)
}
