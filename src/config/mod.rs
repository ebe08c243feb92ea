//! Label type configuration.
//!
//! Label types are stored as loosely typed [`RawLabelType`] records (the JSON
//! shape used by existing label type definitions). [`resolve`] validates one of
//! them and applies every default exactly once, producing a [`LabelTypeConfig`]
//! in which each offset, size and font has a single concrete value. Layout code
//! only ever sees the resolved form.
//!
//! # Example
//!
//! ```
//! use label_sheet::LabelTypes;
//!
//! let types = LabelTypes::from_json(r#"{
//!     "S-18475": {
//!         "name": "Landscape Label",
//!         "label_width": 2.0, "label_height": 1.0,
//!         "labels_per_row": 3, "labels_per_column": 8,
//!         "label_orientation": "landscape",
//!         "page_width_inch": 8.5, "page_height_inch": 11.0,
//!         "margin_top": 0.5, "margin_bottom": 0.5,
//!         "margin_left": 0.5, "margin_right": 0.5
//!     }
//! }"#).expect("valid label types");
//!
//! let config = types.get("S-18475").expect("configured");
//! assert_eq!(config.labels_per_row, 3);
//! assert!(types.get("S-00000").is_err());
//! ```

mod raw;
mod resolve;

pub use raw::*;
pub use resolve::resolve;

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::currency::Price;
use crate::layout::Margins;
use crate::units::Pt;
use crate::LabelError;

/// Which internal arrangement a label uses
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// QR on top, text below, price upright
    #[default]
    Portrait,
    /// QR on the left, text to its right, price rotated
    Landscape,
}

/// Horizontal alignment of each wrapped line within its element's width
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Centre,
    Right,
}

/// What to do when the label grid doesn't fit the usable page area
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Refuse to lay out the sheet
    #[default]
    Fail,
    /// Clamp the spacing to zero, warn, and carry on
    Clamp,
}

/// Distance of an element's anchor from the label's top-left corner, y downward
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Offset {
    pub x: Pt,
    pub y: Pt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QrConfig {
    pub visible: bool,
    pub offset: Offset,
    /// Explicit edge length; when [None] the orientation's default applies
    pub size: Option<Pt>,
}

/// Legacy single-block sizing: shrink the font until the wrapped block fits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoFit {
    /// Smallest font size that may be chosen; the element's font size is the largest
    pub min_font_size: Pt,
    /// Maximum height of the wrapped block
    pub max_height: Pt,
}

/// A wrapped text element (SKU or product name)
#[derive(Debug, Clone, PartialEq)]
pub struct TextConfig {
    pub visible: bool,
    pub offset: Offset,
    pub font: String,
    pub font_size: Pt,
    /// Longest run of characters allowed before a forced split
    pub max_word_length: Option<usize>,
    pub alignment: Alignment,
    pub auto_fit: Option<AutoFit>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceConfig {
    pub visible: bool,
    pub offset: Offset,
    pub font: String,
    pub font_size: Pt,
    /// Only applied to landscape labels
    pub rotation_degrees: f64,
}

/// Placeholder content used to preview a label type
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    pub sku: String,
    pub product_name: String,
    pub price: Price,
}

/// A fully resolved, validated label type. Immutable for the duration of a
/// generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTypeConfig {
    /// The key the label type is stored under
    pub name: String,
    pub display_name: String,
    /// Stem of generated file names
    pub file_name: String,

    pub label_width: Pt,
    pub label_height: Pt,
    pub labels_per_row: usize,
    pub labels_per_column: usize,
    pub page_width: Pt,
    pub page_height: Pt,
    pub margins: Margins,
    pub orientation: Orientation,
    pub overflow_policy: OverflowPolicy,

    pub qr: QrConfig,
    pub sku: TextConfig,
    pub product_name: TextConfig,
    pub price: PriceConfig,

    /// ISO currency code the price is printed in
    pub currency: String,
    pub samples: Samples,
}

impl LabelTypeConfig {
    /// Number of labels on one page
    pub fn capacity(&self) -> usize {
        self.labels_per_row * self.labels_per_column
    }

    /// Name of the file a sheet generated on `date` is saved as, e.g. `20240131_labels.pdf`
    pub fn output_file_name(&self, date: NaiveDate) -> String {
        format!("{}_{}.pdf", date.format("%Y%m%d"), self.file_name)
    }
}

/// A named set of resolved label types
#[derive(Debug, Default, Clone)]
pub struct LabelTypes {
    types: BTreeMap<String, LabelTypeConfig>,
}

impl LabelTypes {
    /// Parse and resolve a JSON object mapping label type names to raw label types.
    /// Fails on the first label type that doesn't validate.
    pub fn from_json(json: &str) -> Result<LabelTypes, LabelError> {
        let raw: BTreeMap<String, RawLabelType> = serde_json::from_str(json)?;
        LabelTypes::from_raw(raw)
    }

    /// Resolve every raw label type
    pub fn from_raw<I>(raw: I) -> Result<LabelTypes, LabelError>
    where
        I: IntoIterator<Item = (String, RawLabelType)>,
    {
        let mut types = BTreeMap::new();
        for (name, raw) in raw {
            let config = resolve(&name, &raw)?;
            types.insert(name, config);
        }
        log::debug!("loaded {} label types", types.len());
        Ok(LabelTypes { types })
    }

    /// Add an already resolved label type, replacing any with the same name
    pub fn insert(&mut self, config: LabelTypeConfig) -> &mut Self {
        self.types.insert(config.name.clone(), config);
        self
    }

    pub fn get(&self, name: &str) -> Result<&LabelTypeConfig, LabelError> {
        self.types
            .get(name)
            .ok_or_else(|| LabelError::UnsupportedLabelType(name.to_string()))
    }

    /// Names of all label types, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
