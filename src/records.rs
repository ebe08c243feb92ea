//! Label records and merging them by SKU.

use std::collections::HashMap;

use thiserror::Error;

use crate::currency::Price;

/// One product to print labels for, `quantity` times
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub sku: String,
    pub product: String,
    pub display_price: Price,
    pub quantity: u32,
}

/// Why a source row could not become a [LabelRecord]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowParseError {
    #[error("row {row}: sku is empty")]
    EmptySku { row: usize },

    #[error("row {row} (sku `{sku}`): invalid price `{value}`")]
    InvalidPrice {
        row: usize,
        sku: String,
        value: String,
    },

    #[error("row {row} (sku `{sku}`): invalid quantity `{value}`")]
    InvalidQuantity {
        row: usize,
        sku: String,
        value: String,
    },
}

impl LabelRecord {
    /// Build a record from raw field text, as read from a source row.
    /// `row` is only used to report errors.
    pub fn from_fields(
        row: usize,
        sku: &str,
        product: &str,
        price: &str,
        quantity: &str,
    ) -> Result<LabelRecord, RowParseError> {
        let sku = sku.trim();
        if sku.is_empty() {
            return Err(RowParseError::EmptySku { row });
        }

        let display_price = price
            .parse::<Price>()
            .ok()
            .filter(|p| !p.is_negative())
            .ok_or_else(|| RowParseError::InvalidPrice {
                row,
                sku: sku.to_string(),
                value: price.to_string(),
            })?;

        let quantity = quantity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|&q| q > 0)
            .ok_or_else(|| RowParseError::InvalidQuantity {
                row,
                sku: sku.to_string(),
                value: quantity.to_string(),
            })?;

        Ok(LabelRecord {
            sku: sku.to_string(),
            product: product.trim().to_string(),
            display_price,
            quantity,
        })
    }
}

/// The outcome of merging source rows
#[derive(Debug, Default, Clone)]
pub struct Aggregation {
    /// One record per SKU, in first-seen order
    pub records: Vec<LabelRecord>,
    /// Rows that were dropped, in input order
    pub skipped: Vec<RowParseError>,
}

impl Aggregation {
    /// Total number of physical labels across all records
    pub fn total_labels(&self) -> u64 {
        self.records.iter().map(|r| r.quantity as u64).sum()
    }
}

/// Merge rows by SKU. Quantities add up; the product name and price of the first
/// row seen for a SKU win. Rows that failed to parse are skipped and reported.
pub fn aggregate<I>(rows: I) -> Aggregation
where
    I: IntoIterator<Item = Result<LabelRecord, RowParseError>>,
{
    let mut out = Aggregation::default();
    let mut by_sku: HashMap<String, usize> = HashMap::new();

    for row in rows {
        match row {
            Ok(record) => match by_sku.get(&record.sku) {
                Some(&i) => {
                    out.records[i].quantity = out.records[i].quantity.saturating_add(record.quantity);
                }
                None => {
                    by_sku.insert(record.sku.clone(), out.records.len());
                    out.records.push(record);
                }
            },
            Err(e) => {
                log::warn!("skipping row: {e}");
                out.skipped.push(e);
            }
        }
    }

    out
}
