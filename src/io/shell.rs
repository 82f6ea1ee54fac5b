use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{info, warn};

use crate::{
    common::{command::AuctionCommand, error::AppError, money::Money},
    domain::{item::ItemType, ledger::Ledger},
    io::store,
    worker::processor::{Outcome, Processor},
};

const MENU: &str = "\n==== Auction Menu ====\n\
1. Add Item\n\
2. Check In Bidder\n\
3. Record Sale\n\
4. Print Bidder Receipt\n\
5. Print Auction Summary\n\
6. Save Auction Data\n\
7. Save and Exit";

/// Line-oriented menu driving a [`Ledger`] through a [`Processor`].
///
/// Generic over its input and output so sessions can be scripted in tests.
pub struct Shell<R, W> {
    input: R,
    output: W,
    default_path: PathBuf,
    last_path: Option<PathBuf>,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, default_path: PathBuf) -> Self {
        Self {
            input,
            output,
            default_path,
            last_path: None,
        }
    }

    /// Runs the startup load prompt and then the menu until the user exits or
    /// input ends. Input ending early is not an error; nothing is saved.
    pub fn run(&mut self, ledger: &mut Ledger, preload: Option<&Path>) -> Result<(), AppError> {
        match self.startup(ledger, preload).and_then(|_| self.menu(ledger)) {
            Err(AppError::InputClosed) => {
                warn!("input closed; leaving without saving");
                Ok(())
            }
            other => other,
        }
    }

    fn say(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<String, AppError> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(AppError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn prompt_parsed<T: FromStr>(&mut self, text: &str, retry: &str) -> Result<T, AppError> {
        loop {
            if let Ok(value) = self.prompt(text)?.trim().parse() {
                return Ok(value);
            }
            self.say(retry)?;
        }
    }

    fn prompt_number(&mut self, text: &str) -> Result<u32, AppError> {
        self.prompt_parsed(text, "Please enter a valid number.")
    }

    fn prompt_price(&mut self, text: &str) -> Result<Money, AppError> {
        self.prompt_parsed(text, "Please enter a valid price.")
    }

    fn prompt_type(&mut self, text: &str) -> Result<ItemType, AppError> {
        self.prompt_parsed(text, "Please enter 'live' or 'silent'.")
    }

    /// Blank answers fall back to the last file used, then the configured
    /// default.
    fn prompt_path(&mut self, text: &str) -> Result<PathBuf, AppError> {
        let fallback = self
            .last_path
            .clone()
            .unwrap_or_else(|| self.default_path.clone());
        let answer = self.prompt(&format!("{text} [{}]: ", fallback.display()))?;
        let answer = answer.trim();
        Ok(if answer.is_empty() {
            fallback
        } else {
            PathBuf::from(answer)
        })
    }

    fn try_load(&mut self, ledger: &mut Ledger, path: &Path) -> Result<bool, AppError> {
        match store::load_into(ledger, path) {
            Ok(()) => {
                self.last_path = Some(path.to_path_buf());
                self.say("Auction data loaded.")?;
                Ok(true)
            }
            Err(e) => {
                warn!("load of {} failed: {}", path.display(), e);
                self.say(&format!("Failed to load data: {e}"))?;
                Ok(false)
            }
        }
    }

    fn startup(&mut self, ledger: &mut Ledger, preload: Option<&Path>) -> Result<(), AppError> {
        if let Some(path) = preload {
            if self.try_load(ledger, path)? {
                return Ok(());
            }
        }

        loop {
            let answer = self.prompt("Would you like to load existing auction data? (y/n): ")?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" => {
                    let filename = self.prompt("Filename to load: ")?;
                    if self.try_load(ledger, Path::new(filename.trim()))? {
                        return Ok(());
                    }
                }
                "n" => {
                    self.say("Starting new auction.")?;
                    return Ok(());
                }
                _ => self.say("Invalid input. Please enter 'y' or 'n'.")?,
            }
        }
    }

    fn read_command(&mut self, choice: &str) -> Result<Option<AuctionCommand>, AppError> {
        let command = match choice {
            "1" => {
                let item = self.prompt_number("Item Number: ")?;
                let name = self.prompt("Item Name: ")?;
                let item_type = self.prompt_type("Item Type (live/silent): ")?;
                AuctionCommand::AddItem {
                    item,
                    name,
                    item_type,
                }
            }
            "2" => {
                let bidder = self.prompt_number("Bidder ID: ")?;
                let name = self.prompt("Bidder Name: ")?;
                AuctionCommand::CheckInBidder { bidder, name }
            }
            "3" => {
                let item = self.prompt_number("Item Number: ")?;
                let bidder = self.prompt_number("Winning Bidder ID: ")?;
                let price = self.prompt_price("Sale Price: ")?;
                AuctionCommand::RecordSale {
                    item,
                    bidder,
                    price,
                }
            }
            "4" => AuctionCommand::PrintReceipt {
                bidder: self.prompt_number("Bidder ID: ")?,
            },
            "5" => AuctionCommand::PrintSummary,
            "6" => AuctionCommand::Save {
                path: self.prompt_path("Filename to save to")?,
            },
            "7" => AuctionCommand::SaveAndExit {
                path: self.prompt_path("Filename to save to")?,
            },
            _ => return Ok(None),
        };
        Ok(Some(command))
    }

    fn menu(&mut self, ledger: &mut Ledger) -> Result<(), AppError> {
        let mut processor = Processor::new();
        loop {
            self.say(MENU)?;
            let choice = self.prompt("Select an option: ")?;
            let Some(command) = self.read_command(choice.trim())? else {
                self.say("Invalid option.")?;
                continue;
            };

            let saved_to = match &command {
                AuctionCommand::Save { path } | AuctionCommand::SaveAndExit { path } => {
                    Some(path.clone())
                }
                _ => None,
            };

            match processor.process(ledger, command) {
                Ok(outcome) => {
                    if saved_to.is_some() {
                        self.last_path = saved_to;
                    }
                    self.say(outcome.message())?;
                    if let Outcome::Exit(_) = outcome {
                        info!("session ended");
                        return Ok(());
                    }
                }
                Err(e @ (AppError::Auction(_) | AppError::Store(_))) => {
                    self.say(&format!("Error: {e}"))?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
