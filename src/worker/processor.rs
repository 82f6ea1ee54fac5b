use crate::{
    common::{command::AuctionCommand, error::AppError},
    domain::ledger::Ledger,
    io::{report, store},
};

/// What the shell should show after a command, and whether to keep going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Exit(String),
}

impl Outcome {
    pub fn message(&self) -> &str {
        match self {
            Outcome::Continue(msg) | Outcome::Exit(msg) => msg,
        }
    }
}

#[derive(Debug, Default)]
pub struct Processor {}
impl Processor {
    pub fn new() -> Self {
        Self {}
    }

    /// Applies one command to the ledger. Errors leave the ledger untouched.
    pub fn process(
        &mut self,
        ledger: &mut Ledger,
        command: AuctionCommand,
    ) -> Result<Outcome, AppError> {
        let outcome = match command {
            AuctionCommand::AddItem {
                item,
                name,
                item_type,
            } => {
                ledger.add_item(item, name, item_type)?;
                Outcome::Continue("Item added.".into())
            }
            AuctionCommand::CheckInBidder { bidder, name } => {
                ledger.check_in_bidder(bidder, name)?;
                Outcome::Continue("Bidder checked in.".into())
            }
            AuctionCommand::RecordSale {
                item,
                bidder,
                price,
            } => {
                ledger.record_sale(item, bidder, price)?;
                Outcome::Continue("Sale recorded.".into())
            }
            AuctionCommand::PrintReceipt { bidder } => {
                Outcome::Continue(report::bidder_receipt(ledger, bidder)?)
            }
            AuctionCommand::PrintSummary => Outcome::Continue(report::auction_summary(ledger)?),
            AuctionCommand::Save { path } => {
                store::save(ledger, &path)?;
                Outcome::Continue(format!("Auction data saved to {}.", path.display()))
            }
            AuctionCommand::SaveAndExit { path } => {
                store::save(ledger, &path)?;
                Outcome::Exit("Saved and exiting...".into())
            }
        };
        Ok(outcome)
    }
}
