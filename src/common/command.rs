use std::path::PathBuf;

use crate::{
    common::money::Money,
    domain::{
        bidder::BidderId,
        item::{ItemNumber, ItemType},
    },
};

/// A fully parsed menu action, handed from the shell to the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuctionCommand {
    AddItem {
        item: ItemNumber,
        name: String,
        item_type: ItemType,
    },
    CheckInBidder {
        bidder: BidderId,
        name: String,
    },
    RecordSale {
        item: ItemNumber,
        bidder: BidderId,
        price: Money,
    },
    PrintReceipt {
        bidder: BidderId,
    },
    PrintSummary,
    Save {
        path: PathBuf,
    },
    SaveAndExit {
        path: PathBuf,
    },
}
