use derive_more::Display;
use thiserror::Error;

use crate::records::RowParseError;

/// Which grid axis a layout problem was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Axis {
    #[display("horizontal")]
    Horizontal,
    #[display("vertical")]
    Vertical,
}

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("label type `{label_type}`: invalid `{field}`: {reason}")]
    /// A label type configuration field is missing or violates its invariant
    Validation {
        label_type: String,
        field: String,
        reason: String,
    },

    #[error("label type `{label_type}`: labels do not fit the page ({axis} spacing would be {spacing}pt)")]
    /// The declared label grid is larger than the usable page area
    OverflowLayout {
        label_type: String,
        axis: Axis,
        spacing: f64,
    },

    #[error("unsupported label type `{0}`")]
    /// The request named a label type that isn't configured
    UnsupportedLabelType(String),

    #[error(transparent)]
    /// A source record could not be turned into a label
    RowParse(#[from] RowParseError),

    #[error("could not acquire QR image for `{sku}`: {reason}")]
    /// The QR image for a label could not be produced or loaded
    QrAcquisition { sku: String, reason: String },

    #[error("no font registered for family `{0}` and no default font")]
    /// The PDF renderer was asked for a font it doesn't have
    MissingFont(String),

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to decode or encode an image
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// The label type definitions were not valid JSON
    Json(#[from] serde_json::Error),
}

impl LabelError {
    pub(crate) fn validation<L, F, R>(label_type: L, field: F, reason: R) -> LabelError
    where
        L: ToString,
        F: ToString,
        R: ToString,
    {
        LabelError::Validation {
            label_type: label_type.to_string(),
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}
