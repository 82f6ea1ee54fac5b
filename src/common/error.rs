use crate::{
    common::money::Money,
    domain::{bidder::BidderId, item::ItemNumber},
};

/// Coarse classification of ledger failures, used by callers that only care
/// about the category (the shell, tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Duplicate,
    InvalidState,
    InvalidValue,
}

/// Rule violations raised by the ledger. Every variant is raised before any
/// field is mutated.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuctionError {
    #[error("Item {0} does not exist")]
    ItemNotFound(ItemNumber),
    #[error("Bidder {0} does not exist")]
    BidderNotFound(BidderId),
    #[error("Item {0} already exists")]
    DuplicateItem(ItemNumber),
    #[error("Bidder {0} already exists")]
    DuplicateBidder(BidderId),
    #[error("Item {0} already sold")]
    AlreadySold(ItemNumber),
    #[error("Sale price must be positive")]
    InvalidPrice,
    #[error("invalid item type: {0} (expected 'live' or 'silent')")]
    InvalidItemType(String),
    #[error("Amount too large: totals may not exceed ${max}")]
    AmountTooLarge { max: Money },
    #[error("inconsistent records: {0}")]
    Inconsistent(String),
}

impl AuctionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuctionError::ItemNotFound(_) | AuctionError::BidderNotFound(_) => ErrorKind::NotFound,
            AuctionError::DuplicateItem(_) | AuctionError::DuplicateBidder(_) => {
                ErrorKind::Duplicate
            }
            AuctionError::AlreadySold(_) | AuctionError::Inconsistent(_) => {
                ErrorKind::InvalidState
            }
            AuctionError::InvalidPrice
            | AuctionError::InvalidItemType(_)
            | AuctionError::AmountTooLarge { .. } => ErrorKind::InvalidValue,
        }
    }
}

/// Failures while saving or loading a persisted auction.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("format error: {0}")]
    Format(String),
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("invalid arguments: {0}")]
    Config(#[from] clap::Error),
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("input closed")]
    InputClosed,
    #[error(transparent)]
    Auction(#[from] AuctionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
