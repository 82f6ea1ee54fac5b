use std::io::{Read, Write};

use csv::StringRecord;

use crate::common::error::StoreError;

/// One named table: a header row followed by data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<StringRecord>,
}

impl Sheet {
    pub fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn header_record(&self) -> StringRecord {
        StringRecord::from(self.header.clone())
    }
}

/// Several named sheets stored in a single CSV stream.
///
/// Each sheet starts with a one-field marker record such as `[Items]`,
/// followed by its header row and its data rows:
///
/// ```text
/// [Items]
/// ItemId,Name,Type,SalePrice,WinnerId
/// 101,Vase,silent,50.00,7
/// [Bidders]
/// BidderId,Name,TotalOwed
/// 7,Alice,50.00
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

fn marker_name(record: &StringRecord) -> Option<&str> {
    if record.len() != 1 {
        return None;
    }
    record
        .get(0)?
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Result<&Sheet, StoreError> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| StoreError::Format(format!("missing sheet '{name}'")))
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<(), StoreError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(writer);

        for sheet in &self.sheets {
            wtr.write_record([format!("[{}]", sheet.name)])?;
            wtr.write_record(&sheet.header)?;
            for row in &sheet.rows {
                wtr.write_record(row)?;
            }
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn read<R: Read>(reader: R) -> Result<Self, StoreError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut book = Workbook::default();
        for record in rdr.records() {
            let record = record?;
            if let Some(name) = marker_name(&record) {
                if book.sheets.iter().any(|s| s.name == name) {
                    return Err(StoreError::Format(format!("sheet '{name}' appears twice")));
                }
                book.sheets.push(Sheet {
                    name: name.to_string(),
                    header: Vec::new(),
                    rows: Vec::new(),
                });
                continue;
            }

            let sheet = book.sheets.last_mut().ok_or_else(|| {
                StoreError::Format("data found before the first sheet marker".into())
            })?;
            if sheet.header.is_empty() {
                sheet.header = record.iter().map(|f| f.trim().to_string()).collect();
            } else {
                sheet.rows.push(record);
            }
        }
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_marker_header_and_rows() {
        let mut items = Sheet::new("Items", &["ItemId", "Name"]);
        items.rows.push(StringRecord::from(vec!["1", "Vase, blue"]));
        let bidders = Sheet::new("Bidders", &["BidderId"]);
        let book = Workbook {
            sheets: vec![items, bidders],
        };

        let mut out = Vec::new();
        book.write(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[Items]\nItemId,Name\n1,\"Vase, blue\"\n[Bidders]\nBidderId\n"
        );
    }

    #[test]
    fn reads_sheets_back() {
        let data = "[Items]\nItemId,Name\n1,Vase\n2,Lamp\n[Bidders]\nBidderId,Name\n";
        let book = Workbook::read(data.as_bytes()).unwrap();

        let items = book.sheet("Items").unwrap();
        assert_eq!(items.header, vec!["ItemId", "Name"]);
        assert_eq!(items.rows.len(), 2);
        assert_eq!(&items.rows[1][1], "Lamp");
        assert!(book.sheet("Bidders").unwrap().rows.is_empty());
        assert!(matches!(book.sheet("Notes"), Err(StoreError::Format(_))));
    }

    #[test]
    fn rejects_rows_outside_a_sheet() {
        let err = Workbook::read("ItemId,Name\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::Format(_)), "{err}");
    }

    #[test]
    fn rejects_repeated_sheet() {
        let err = Workbook::read("[Items]\nA\n[Items]\nA\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::Format(_)), "{err}");
    }
}
