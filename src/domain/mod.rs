pub mod bidder;
pub mod item;
pub mod ledger;
