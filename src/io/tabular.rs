use std::{
    io::{Read, Write},
    str::FromStr,
};

use csv::StringRecord;
use indexmap::{IndexMap, map::Entry};
use log::{debug, warn};

use crate::{
    common::{error::StoreError, money::Money},
    domain::{
        bidder::{Bidder, BidderId},
        item::{Item, ItemNumber, ItemType},
        ledger::Ledger,
    },
    io::workbook::{Sheet, Workbook},
};

pub const ITEMS_SHEET: &str = "Items";
pub const BIDDERS_SHEET: &str = "Bidders";
const ITEM_HEADERS: [&str; 5] = ["ItemId", "Name", "Type", "SalePrice", "WinnerId"];
const BIDDER_HEADERS: [&str; 3] = ["BidderId", "Name", "TotalOwed"];

#[derive(serde::Deserialize)]
/// Positional row of the `Items` sheet. Sale columns are blank for unsold items.
struct ItemRow {
    item_id: ItemNumber,
    name: String,
    item_type: String,
    sale_price: Option<String>,
    winner_id: Option<BidderId>,
}

#[derive(serde::Deserialize)]
/// Row of the `Bidders` sheet. Won items are not stored; they are derived
/// from the `Items` sheet on load.
struct BidderRow {
    bidder_id: BidderId,
    name: String,
    total_owed: String,
}

/// Writes the `Items` and `Bidders` sheets, rows in insertion order.
pub fn write_workbook<W: Write>(writer: W, ledger: &Ledger) -> Result<(), StoreError> {
    let mut items = Sheet::new(ITEMS_SHEET, &ITEM_HEADERS);
    for item in ledger.items() {
        items.rows.push(StringRecord::from(vec![
            item.item_number.to_string(),
            item.name.clone(),
            item.item_type.to_string(),
            item.sale_price.map(|p| p.to_string_2dp()).unwrap_or_default(),
            item.winner_id.map(|w| w.to_string()).unwrap_or_default(),
        ]));
    }

    let mut bidders = Sheet::new(BIDDERS_SHEET, &BIDDER_HEADERS);
    for bidder in ledger.bidders() {
        bidders.rows.push(StringRecord::from(vec![
            bidder.bidder_id.to_string(),
            bidder.name.clone(),
            bidder.total_owed.to_string_2dp(),
        ]));
    }

    Workbook {
        sheets: vec![items, bidders],
    }
    .write(writer)
}

fn checked_sheet<'a>(
    book: &'a Workbook,
    name: &str,
    expected: &[&str],
) -> Result<&'a Sheet, StoreError> {
    let sheet = book.sheet(name)?;
    if sheet.header != expected {
        return Err(StoreError::Format(format!(
            "sheet '{}' has header {:?}, expected {:?}",
            name, sheet.header, expected
        )));
    }
    Ok(sheet)
}

fn parse_money(text: &str, context: &str) -> Result<Money, StoreError> {
    Money::from_str(text).map_err(|e| StoreError::Format(format!("{context}: {e}")))
}

fn parse_item(record: &StringRecord, line: usize) -> Result<Item, StoreError> {
    let row: ItemRow = record
        .deserialize(None)
        .map_err(|e| StoreError::Format(format!("{ITEMS_SHEET} row {line}: {e}")))?;

    let item_type = ItemType::from_str(&row.item_type)
        .map_err(|e| StoreError::Format(format!("{ITEMS_SHEET} row {line}: {e}")))?;
    let mut item = Item::new(row.item_id, row.name, item_type);

    let price = row
        .sale_price
        .filter(|p| !p.trim().is_empty())
        .map(|p| parse_money(&p, &format!("{ITEMS_SHEET} row {line} SalePrice")))
        .transpose()?;
    match (price, row.winner_id) {
        (Some(price), Some(_)) if !price.is_positive() => {
            return Err(StoreError::Format(format!(
                "{ITEMS_SHEET} row {line}: SalePrice must be positive, got {price}"
            )));
        }
        (Some(price), Some(winner)) => item.mark_sold(winner, price),
        (None, None) => {}
        _ => {
            return Err(StoreError::Format(format!(
                "{ITEMS_SHEET} row {line}: SalePrice and WinnerId must both be set or both be empty"
            )));
        }
    }
    Ok(item)
}

fn parse_bidder(record: &StringRecord, line: usize) -> Result<(Bidder, Money), StoreError> {
    let row: BidderRow = record
        .deserialize(None)
        .map_err(|e| StoreError::Format(format!("{BIDDERS_SHEET} row {line}: {e}")))?;
    let stored_total = parse_money(
        &row.total_owed,
        &format!("{BIDDERS_SHEET} row {line} TotalOwed"),
    )?;
    Ok((Bidder::new(row.bidder_id, row.name), stored_total))
}

/// Reads a two-sheet workbook into a fresh ledger.
///
/// Items are taken as written. Bidders keep only their id and name: win
/// lists and totals are rebuilt from each sold item's `WinnerId` and
/// `SalePrice`, in `Items` row order. A sale naming a bidder absent from the
/// `Bidders` sheet still marks the item sold but is credited to nobody.
///
/// # Errors
///
/// `StoreError::Format` for a missing sheet, unexpected header, malformed
/// cell, duplicate id, non-positive sale price, a row with only one of the
/// sale columns filled, or sales whose sum leaves the money range.
pub fn read_workbook<R: Read>(reader: R) -> Result<Ledger, StoreError> {
    let book = Workbook::read(reader)?;
    let item_sheet = checked_sheet(&book, ITEMS_SHEET, &ITEM_HEADERS)?;
    let bidder_sheet = checked_sheet(&book, BIDDERS_SHEET, &BIDDER_HEADERS)?;

    let mut items: IndexMap<ItemNumber, Item> = IndexMap::new();
    for (idx, record) in item_sheet.rows.iter().enumerate() {
        let item = parse_item(record, idx + 2)?;
        match items.entry(item.item_number) {
            Entry::Occupied(_) => {
                return Err(StoreError::Format(format!(
                    "{ITEMS_SHEET} lists item {} twice",
                    item.item_number
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(item);
            }
        }
    }

    let mut bidders: IndexMap<BidderId, Bidder> = IndexMap::new();
    let mut stored_totals: Vec<(BidderId, Money)> = Vec::new();
    for (idx, record) in bidder_sheet.rows.iter().enumerate() {
        let (bidder, stored_total) = parse_bidder(record, idx + 2)?;
        stored_totals.push((bidder.bidder_id, stored_total));
        match bidders.entry(bidder.bidder_id) {
            Entry::Occupied(_) => {
                return Err(StoreError::Format(format!(
                    "{BIDDERS_SHEET} lists bidder {} twice",
                    bidder.bidder_id
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(bidder);
            }
        }
    }

    reconcile(&items, &mut bidders)?;

    for (bidder_id, stored_total) in stored_totals {
        if let Some(bidder) = bidders.get(&bidder_id) {
            if bidder.total_owed != stored_total {
                debug!(
                    "bidder {} TotalOwed {} replaced by {} from the Items sheet",
                    bidder_id, stored_total, bidder.total_owed
                );
            }
        }
    }

    let ledger = Ledger::from_parts(items, bidders);
    ledger
        .check_consistency()
        .map_err(|e| StoreError::Format(e.to_string()))?;
    Ok(ledger)
}

/// Rebuilds every bidder's win list and total purely from the items.
fn reconcile(
    items: &IndexMap<ItemNumber, Item>,
    bidders: &mut IndexMap<BidderId, Bidder>,
) -> Result<(), StoreError> {
    for bidder in bidders.values_mut() {
        bidder.items_won.clear();
        bidder.total_owed = Money::zero();
    }

    for item in items.values() {
        let Some((winner, price)) = item.sale() else {
            continue;
        };
        match bidders.get_mut(&winner) {
            Some(bidder) => bidder
                .record_win(item.item_number, price)
                .map_err(|e| StoreError::Format(format!("bidder {winner}: {e}")))?,
            None => warn!(
                "item {} names unknown winner {}; sale not credited to any bidder",
                item.item_number, winner
            ),
        }
    }
    Ok(())
}
