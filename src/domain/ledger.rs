use indexmap::IndexMap;
use log::debug;

use crate::{
    common::{error::AuctionError, money::Money},
    domain::{
        bidder::{Bidder, BidderId},
        item::{Item, ItemNumber, ItemType},
    },
};

/// In-memory store of every bidder and item in the auction.
///
/// Both maps keep insertion order, which is the order reports and saved
/// files list their rows in.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Ledger {
    items: IndexMap<ItemNumber, Item>,
    bidders: IndexMap<BidderId, Bidder>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
            bidders: IndexMap::new(),
        }
    }

    /// Builds a ledger from already-validated maps. Loaders use this to stage
    /// state before swapping it in.
    pub(crate) fn from_parts(
        items: IndexMap<ItemNumber, Item>,
        bidders: IndexMap<BidderId, Bidder>,
    ) -> Self {
        Self { items, bidders }
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.values()
    }

    pub fn bidders(&self) -> impl Iterator<Item = &Bidder> + '_ {
        self.bidders.values()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn bidder_count(&self) -> usize {
        self.bidders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.bidders.is_empty()
    }

    pub fn item(&self, item_number: ItemNumber) -> Result<&Item, AuctionError> {
        self.items
            .get(&item_number)
            .ok_or(AuctionError::ItemNotFound(item_number))
    }

    pub fn bidder(&self, bidder_id: BidderId) -> Result<&Bidder, AuctionError> {
        self.bidders
            .get(&bidder_id)
            .ok_or(AuctionError::BidderNotFound(bidder_id))
    }

    pub fn add_item(
        &mut self,
        item_number: ItemNumber,
        name: impl Into<String>,
        item_type: ItemType,
    ) -> Result<(), AuctionError> {
        if self.items.contains_key(&item_number) {
            return Err(AuctionError::DuplicateItem(item_number));
        }
        let item = Item::new(item_number, name, item_type);
        debug!("added item {} ({}, {})", item_number, item.name, item_type);
        self.items.insert(item_number, item);
        Ok(())
    }

    pub fn check_in_bidder(
        &mut self,
        bidder_id: BidderId,
        name: impl Into<String>,
    ) -> Result<(), AuctionError> {
        if self.bidders.contains_key(&bidder_id) {
            return Err(AuctionError::DuplicateBidder(bidder_id));
        }
        let bidder = Bidder::new(bidder_id, name);
        debug!("checked in bidder {} ({})", bidder_id, bidder.name);
        self.bidders.insert(bidder_id, bidder);
        Ok(())
    }

    /// Records `bidder_id` as the winner of `item_number` at `price`.
    ///
    /// All checks run before any field is touched, so a failed sale leaves
    /// the ledger exactly as it was.
    pub fn record_sale(
        &mut self,
        item_number: ItemNumber,
        bidder_id: BidderId,
        price: Money,
    ) -> Result<(), AuctionError> {
        let item_idx = self
            .items
            .get_index_of(&item_number)
            .ok_or(AuctionError::ItemNotFound(item_number))?;
        let bidder_idx = self
            .bidders
            .get_index_of(&bidder_id)
            .ok_or(AuctionError::BidderNotFound(bidder_id))?;

        if self.items[item_idx].is_sold() {
            return Err(AuctionError::AlreadySold(item_number));
        }
        if !price.is_positive() {
            return Err(AuctionError::InvalidPrice);
        }
        self.checked_revenue()
            .and_then(|revenue| revenue.checked_add(price))
            .ok_or(AuctionError::AmountTooLarge { max: Money::max() })?;

        // record_win is the only fallible step and changes nothing on failure.
        self.bidders[bidder_idx].record_win(item_number, price)?;
        self.items[item_idx].mark_sold(bidder_id, price);
        debug!("item {item_number} sold to bidder {bidder_id} for {price}");
        Ok(())
    }

    fn checked_revenue(&self) -> Option<Money> {
        self.items
            .values()
            .filter_map(|item| item.sale_price)
            .try_fold(Money::zero(), Money::checked_add)
    }

    /// Sum of all sale prices. `record_sale` and the loaders keep this
    /// within [`Money::max`].
    pub fn total_revenue(&self) -> Money {
        self.checked_revenue().unwrap_or_else(Money::max)
    }

    /// Replaces the whole state with a staged ledger.
    pub fn replace_with(&mut self, staged: Ledger) {
        *self = staged;
    }

    /// Verifies the cross-record invariants: every sold item has a positive
    /// price, a winner that is checked in lists it, every bidder's win list
    /// and total agree with the items table, and revenue stays in range.
    ///
    /// A sold item whose winner is not checked in is accepted; workbook loads
    /// produce that state when a `WinnerId` names a missing bidder.
    pub fn check_consistency(&self) -> Result<(), AuctionError> {
        let inconsistent = |msg: String| Err(AuctionError::Inconsistent(msg));

        for item in self.items.values() {
            if item.sale_price.is_some() != item.winner_id.is_some() {
                return inconsistent(format!(
                    "item {} has only one of salePrice/winnerId",
                    item.item_number
                ));
            }
            let Some((winner, price)) = item.sale() else {
                continue;
            };
            if !price.is_positive() {
                return inconsistent(format!(
                    "item {} has non-positive salePrice {}",
                    item.item_number, price
                ));
            }
            if let Some(bidder) = self.bidders.get(&winner) {
                if !bidder.items_won.contains(&item.item_number) {
                    return inconsistent(format!(
                        "bidder {} does not list won item {}",
                        winner, item.item_number
                    ));
                }
            }
        }
        if self.checked_revenue().is_none() {
            return Err(AuctionError::AmountTooLarge { max: Money::max() });
        }

        for bidder in self.bidders.values() {
            let mut owed = Money::zero();
            for (idx, number) in bidder.items_won.iter().enumerate() {
                if bidder.items_won[..idx].contains(number) {
                    return inconsistent(format!(
                        "bidder {} lists item {} twice",
                        bidder.bidder_id, number
                    ));
                }
                let Some(item) = self.items.get(number) else {
                    return inconsistent(format!(
                        "bidder {} lists unknown item {}",
                        bidder.bidder_id, number
                    ));
                };
                match item.sale() {
                    // Bounded by the revenue check above.
                    Some((winner, price)) if winner == bidder.bidder_id => {
                        owed = owed
                            .checked_add(price)
                            .ok_or(AuctionError::AmountTooLarge { max: Money::max() })?;
                    }
                    _ => {
                        return inconsistent(format!(
                            "bidder {} lists item {} they did not win",
                            bidder.bidder_id, number
                        ));
                    }
                }
            }
            if owed != bidder.total_owed {
                return inconsistent(format!(
                    "bidder {} totalOwed {} does not match won items ({})",
                    bidder.bidder_id, bidder.total_owed, owed
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::common::error::ErrorKind;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn vase_and_alice() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add_item(101, "Vase", ItemType::Silent).unwrap();
        ledger.check_in_bidder(7, "Alice").unwrap();
        ledger
    }

    #[test]
    fn add_and_lookup_return_stored_records() {
        let mut ledger = Ledger::new();
        ledger.add_item(101, "Vase", ItemType::Silent).unwrap();
        ledger.add_item(5, "Quilt", ItemType::Live).unwrap();
        ledger.check_in_bidder(7, "Alice").unwrap();

        assert_eq!(ledger.item(101).unwrap(), &Item::new(101, "Vase", ItemType::Silent));
        assert_eq!(ledger.item(5).unwrap().item_type, ItemType::Live);
        assert_eq!(ledger.bidder(7).unwrap(), &Bidder::new(7, "Alice"));

        let order: Vec<_> = ledger.items().map(|i| i.item_number).collect();
        assert_eq!(order, vec![101, 5]);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut ledger = vase_and_alice();

        let err = ledger.add_item(101, "Other", ItemType::Live).unwrap_err();
        assert_eq!(err, AuctionError::DuplicateItem(101));
        assert_eq!(err.kind(), ErrorKind::Duplicate);
        assert_eq!(ledger.item(101).unwrap().name, "Vase");

        let err = ledger.check_in_bidder(7, "Bob").unwrap_err();
        assert_eq!(err, AuctionError::DuplicateBidder(7));
        assert_eq!(ledger.bidder(7).unwrap().name, "Alice");
    }

    #[test]
    fn lookups_fail_with_not_found() {
        let ledger = Ledger::new();
        assert_eq!(ledger.item(1).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(ledger.bidder(1).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn record_sale_links_item_and_bidder() {
        let mut ledger = vase_and_alice();

        ledger.record_sale(101, 7, money("50.0")).unwrap();

        let item = ledger.item(101).unwrap();
        assert_eq!(item.sale_price, Some(money("50")));
        assert_eq!(item.winner_id, Some(7));
        let bidder = ledger.bidder(7).unwrap();
        assert_eq!(bidder.items_won, vec![101]);
        assert_eq!(bidder.total_owed, money("50"));
        assert_eq!(ledger.total_revenue(), money("50"));
        assert!(ledger.check_consistency().is_ok());
    }

    #[test]
    fn record_sale_on_sold_item_changes_nothing() {
        let mut ledger = vase_and_alice();
        ledger.check_in_bidder(8, "Bob").unwrap();
        ledger.record_sale(101, 7, money("50")).unwrap();
        let before = ledger.clone();

        let err = ledger.record_sale(101, 8, money("75")).unwrap_err();

        assert_eq!(err, AuctionError::AlreadySold(101));
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(ledger, before);
        assert_eq!(ledger.total_revenue(), money("50"));
    }

    #[test]
    fn record_sale_rejects_non_positive_price() {
        let mut ledger = vase_and_alice();
        let before = ledger.clone();

        for price in ["0", "-1.50"] {
            let err = ledger.record_sale(101, 7, money(price)).unwrap_err();
            assert_eq!(err, AuctionError::InvalidPrice);
            assert_eq!(err.kind(), ErrorKind::InvalidValue);
        }
        assert_eq!(ledger, before);
    }

    #[test]
    fn record_sale_requires_both_entities() {
        let mut ledger = vase_and_alice();
        let before = ledger.clone();

        assert_eq!(
            ledger.record_sale(999, 7, money("1")).unwrap_err(),
            AuctionError::ItemNotFound(999)
        );
        assert_eq!(
            ledger.record_sale(101, 99, money("1")).unwrap_err(),
            AuctionError::BidderNotFound(99)
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn total_revenue_sums_sold_items_only() {
        let mut ledger = vase_and_alice();
        assert_eq!(ledger.total_revenue(), Money::zero());

        ledger.add_item(102, "Lamp", ItemType::Live).unwrap();
        ledger.add_item(103, "Rug", ItemType::Live).unwrap();
        ledger.check_in_bidder(8, "Bob").unwrap();
        ledger.record_sale(101, 7, money("50")).unwrap();
        ledger.record_sale(103, 8, money("19.99")).unwrap();
        ledger.record_sale(102, 7, money("0.01")).unwrap();

        assert_eq!(ledger.total_revenue(), money("70.00"));
        assert_eq!(ledger.bidder(7).unwrap().items_won, vec![101, 102]);
        assert_eq!(ledger.bidder(7).unwrap().total_owed, money("50.01"));
    }

    #[test]
    fn replace_with_swaps_whole_state() {
        let mut ledger = vase_and_alice();
        ledger.replace_with(Ledger::new());
        assert!(ledger.is_empty());
    }

    #[test]
    fn consistency_check_flags_stale_totals() {
        let mut items = IndexMap::new();
        let mut item = Item::new(1, "Vase", ItemType::Live);
        item.mark_sold(7, money("10"));
        items.insert(1, item);

        let mut bidders = IndexMap::new();
        let mut bidder = Bidder::new(7, "Alice");
        bidder.items_won.push(1);
        bidders.insert(7, bidder);

        let err = Ledger::from_parts(items, bidders).check_consistency().unwrap_err();
        assert!(
            matches!(&err, AuctionError::Inconsistent(msg) if msg.contains("totalOwed")),
            "{err}"
        );
    }

    fn sold(number: ItemNumber, winner: BidderId, price: &str) -> Item {
        let mut item = Item::new(number, "Vase", ItemType::Live);
        item.mark_sold(winner, money(price));
        item
    }

    #[test]
    fn record_sale_past_the_money_limit_changes_nothing() {
        let mut ledger = vase_and_alice();
        ledger.add_item(102, "Lamp", ItemType::Live).unwrap();
        ledger.record_sale(101, 7, Money::max()).unwrap();
        let before = ledger.clone();

        let err = ledger.record_sale(102, 7, money("0.01")).unwrap_err();

        assert!(matches!(err, AuctionError::AmountTooLarge { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(ledger, before);
        assert!(!ledger.item(102).unwrap().is_sold());
        assert_eq!(ledger.total_revenue(), Money::max());
    }

    #[test]
    fn revenue_limit_spans_bidders() {
        let mut ledger = vase_and_alice();
        ledger.add_item(102, "Lamp", ItemType::Live).unwrap();
        ledger.check_in_bidder(8, "Bob").unwrap();
        ledger.record_sale(101, 7, money("600000000000")).unwrap();
        let before = ledger.clone();

        let err = ledger.record_sale(102, 8, money("600000000000")).unwrap_err();

        assert!(matches!(err, AuctionError::AmountTooLarge { .. }));
        assert_eq!(ledger, before);
    }

    #[test]
    fn consistency_accepts_winner_missing_from_bidders() {
        let mut items = IndexMap::new();
        items.insert(1, sold(1, 99, "10"));
        let mut bidders = IndexMap::new();
        bidders.insert(7, Bidder::new(7, "Alice"));

        assert_eq!(Ledger::from_parts(items, bidders).check_consistency(), Ok(()));
    }

    #[test]
    fn consistency_rejects_checked_in_winner_that_does_not_list_item() {
        let mut items = IndexMap::new();
        items.insert(1, sold(1, 7, "10"));
        let mut bidders = IndexMap::new();
        bidders.insert(7, Bidder::new(7, "Alice"));

        let err = Ledger::from_parts(items, bidders).check_consistency().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn consistency_rejects_non_positive_prices() {
        for price in ["0", "-5"] {
            let mut items = IndexMap::new();
            items.insert(1, sold(1, 99, price));
            let err = Ledger::from_parts(items, IndexMap::new())
                .check_consistency()
                .unwrap_err();
            assert!(matches!(err, AuctionError::Inconsistent(_)), "{price}: {err}");
        }
    }

    #[test]
    fn consistency_rejects_revenue_past_the_limit() {
        let mut items = IndexMap::new();
        items.insert(1, sold(1, 99, "600000000000"));
        items.insert(2, sold(2, 99, "600000000000"));

        let err = Ledger::from_parts(items, IndexMap::new())
            .check_consistency()
            .unwrap_err();
        assert!(matches!(err, AuctionError::AmountTooLarge { .. }));
    }
}
