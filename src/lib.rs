//! Lay out sheets of product labels (QR code, SKU, product name and price) and
//! draw them through a [Renderer], such as the bundled [pdf::PdfRenderer].
//!
//! ```
//! use label_sheet::{CurrencyTable, DrawPrimitive, LabelRecord, LabelSheet, LabelTypes, MemoryQrCache, QrCodeEncoder, Pt};
//!
//! let types = LabelTypes::from_json(r#"{
//!     "shelf": {
//!         "label_width": 2.0, "label_height": 1.0,
//!         "labels_per_row": 4, "labels_per_column": 10,
//!         "page_width_inch": 8.5, "page_height_inch": 11.0
//!     }
//! }"#).expect("valid label types");
//! let config = types.get("shelf").expect("configured");
//!
//! let measure = |text: &str, _font: &str, size: Pt| Pt(text.chars().count() as f64 * size.0 * 0.5);
//! let qr = MemoryQrCache::new(QrCodeEncoder);
//! let sheet = LabelSheet::new(config, &measure, &qr, &CurrencyTable::common());
//!
//! let records = vec![LabelRecord::from_fields(1, "A-1", "Widget", "5", "3").expect("valid row")];
//! let mut drawn: Vec<DrawPrimitive> = Vec::new();
//! let summary = sheet.generate(&records, &mut drawn).expect("can lay out");
//! assert_eq!(summary.labels, 3);
//! ```

mod config;
pub use config::*;

mod currency;
pub use currency::*;

mod error;
pub use error::*;

/// Grid geometry, label placement and text fitting
pub mod layout;
pub use layout::{GridGeometry, LabelPlacer, PlacementInstance, TextMeasure};

/// PDF output for label sheets
pub mod pdf;

mod primitives;
pub use primitives::*;

mod qr;
pub use qr::*;

mod records;
pub use records::*;

mod sheet;
pub use sheet::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
