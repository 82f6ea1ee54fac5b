use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::{error::AuctionError, money::Money};
use crate::domain::bidder::BidderId;

pub type ItemNumber = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Live,
    Silent,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Live => "live",
            ItemType::Silent => "silent",
        }
    }
}

impl FromStr for ItemType {
    type Err = AuctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(ItemType::Live),
            "silent" => Ok(ItemType::Silent),
            _ => Err(AuctionError::InvalidItemType(s.trim().to_string())),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalogued lot. `sale_price` and `winner_id` are set together by a
/// recorded sale and never cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_number: ItemNumber,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub sale_price: Option<Money>,
    pub winner_id: Option<BidderId>,
}

impl Item {
    pub fn new(item_number: ItemNumber, name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            item_number,
            name: name.into(),
            item_type,
            sale_price: None,
            winner_id: None,
        }
    }

    pub fn is_sold(&self) -> bool {
        self.winner_id.is_some()
    }

    /// Winner and price, when both halves of the sold state are present.
    pub fn sale(&self) -> Option<(BidderId, Money)> {
        self.winner_id.zip(self.sale_price)
    }

    pub(crate) fn mark_sold(&mut self, winner: BidderId, price: Money) {
        self.sale_price = Some(price);
        self.winner_id = Some(winner);
    }
}
