use crate::{
    common::error::AuctionError,
    domain::{bidder::BidderId, ledger::Ledger},
};

/// Renders the receipt for one bidder: a header, every won item in the
/// order the sales were recorded, and the amount owed.
///
/// # Errors
///
/// `BidderNotFound` if the bidder is not checked in, `ItemNotFound` if the
/// win list names an item the ledger does not hold.
///
/// # Examples
///
/// ```
/// use auction_ledger::domain::{item::ItemType, ledger::Ledger};
/// use auction_ledger::io::report::bidder_receipt;
///
/// let mut ledger = Ledger::new();
/// ledger.add_item(101, "Vase", ItemType::Silent).unwrap();
/// ledger.check_in_bidder(7, "Alice").unwrap();
/// ledger.record_sale(101, 7, "50".parse().unwrap()).unwrap();
///
/// let receipt = bidder_receipt(&ledger, 7).unwrap();
/// assert!(receipt.contains("Vase"));
/// assert!(receipt.ends_with("Total Owed: $50.00"));
/// ```
pub fn bidder_receipt(ledger: &Ledger, bidder_id: BidderId) -> Result<String, AuctionError> {
    let bidder = ledger.bidder(bidder_id)?;

    let mut lines = vec![format!(
        "Receipt for {} (Bidder ID: {})",
        bidder.name, bidder.bidder_id
    )];
    lines.push("Items Won:".to_string());

    if bidder.items_won.is_empty() {
        lines.push(" - None".to_string());
    }

    for &item_number in &bidder.items_won {
        let item = ledger.item(item_number)?;
        let price = item.sale_price.unwrap_or_default();
        lines.push(format!(
            " - {} (Item {}): ${}",
            item.name, item.item_number, price
        ));
    }

    lines.push(format!("Total Owed: ${}", bidder.total_owed));
    Ok(lines.join("\n"))
}

/// Renders one line per item in catalogue order followed by total revenue.
///
/// # Errors
///
/// `BidderNotFound` if a sold item names a winner that is not checked in.
pub fn auction_summary(ledger: &Ledger) -> Result<String, AuctionError> {
    let mut lines = vec!["Auction Summary:".to_string()];

    for item in ledger.items() {
        match item.sale() {
            None => lines.push(format!(
                " - {} (Item {}): Not Sold",
                item.name, item.item_number
            )),
            Some((winner, price)) => {
                let bidder = ledger.bidder(winner)?;
                lines.push(format!(
                    " - {} (Item {}): Sold to {} for ${}",
                    item.name, item.item_number, bidder.name, price
                ));
            }
        }
    }

    lines.push(format!("\nTotal Revenue: ${}", ledger.total_revenue()));
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::{common::money::Money, domain::item::ItemType};

    fn sample() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add_item(101, "Vase", ItemType::Silent).unwrap();
        ledger.add_item(102, "Quilt", ItemType::Live).unwrap();
        ledger.add_item(103, "Lamp", ItemType::Live).unwrap();
        ledger.check_in_bidder(7, "Alice").unwrap();
        ledger.check_in_bidder(8, "Bob").unwrap();
        ledger
            .record_sale(103, 7, Money::from_str("12.5").unwrap())
            .unwrap();
        ledger
            .record_sale(101, 7, Money::from_str("50").unwrap())
            .unwrap();
        ledger
    }

    #[test]
    fn receipt_lists_wins_in_sale_order() {
        let receipt = bidder_receipt(&sample(), 7).unwrap();
        assert_eq!(
            receipt,
            "Receipt for Alice (Bidder ID: 7)\n\
             Items Won:\n \
             - Lamp (Item 103): $12.50\n \
             - Vase (Item 101): $50.00\n\
             Total Owed: $62.50"
        );
    }

    #[test]
    fn receipt_without_wins_says_none() {
        let receipt = bidder_receipt(&sample(), 8).unwrap();
        assert_eq!(
            receipt,
            "Receipt for Bob (Bidder ID: 8)\nItems Won:\n - None\nTotal Owed: $0.00"
        );
    }

    #[test]
    fn receipt_for_unknown_bidder_fails() {
        assert_eq!(
            bidder_receipt(&sample(), 42).unwrap_err(),
            AuctionError::BidderNotFound(42)
        );
    }

    #[test]
    fn summary_covers_every_item_and_revenue() {
        let summary = auction_summary(&sample()).unwrap();
        assert_eq!(
            summary,
            "Auction Summary:\n \
             - Vase (Item 101): Sold to Alice for $50.00\n \
             - Quilt (Item 102): Not Sold\n \
             - Lamp (Item 103): Sold to Alice for $12.50\n\
             \n\
             Total Revenue: $62.50"
        );
    }

    #[test]
    fn summary_of_empty_ledger() {
        let summary = auction_summary(&Ledger::new()).unwrap();
        assert_eq!(summary, "Auction Summary:\n\nTotal Revenue: $0.00");
    }
}
