use serde::{Deserialize, Serialize};

use crate::common::{error::AuctionError, money::Money};
use crate::domain::item::ItemNumber;

pub type BidderId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bidder {
    pub bidder_id: BidderId,
    pub name: String,
    /// Item numbers in the order their sales were recorded.
    pub items_won: Vec<ItemNumber>,
    /// Sum of the sale prices of `items_won`.
    pub total_owed: Money,
}

impl Bidder {
    pub fn new(bidder_id: BidderId, name: impl Into<String>) -> Self {
        Self {
            bidder_id,
            name: name.into(),
            items_won: Vec::new(),
            total_owed: Money::zero(),
        }
    }

    /// Appends a won item. Fails without changing anything if the new total
    /// would leave the money range.
    pub(crate) fn record_win(
        &mut self,
        item_number: ItemNumber,
        price: Money,
    ) -> Result<(), AuctionError> {
        let total_owed = self
            .total_owed
            .checked_add(price)
            .ok_or(AuctionError::AmountTooLarge { max: Money::max() })?;
        self.items_won.push(item_number);
        self.total_owed = total_owed;
        Ok(())
    }
}
