use serde::Deserialize;

/// A boolean that may be written as `true`/`false` or `1`/`0`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Int(i64),
}

impl From<Flag> for bool {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

/// A label type exactly as it is stored: flat, loosely typed, everything optional.
///
/// Field names follow the stored label type records so existing definitions
/// deserialize unchanged. Unknown fields are ignored.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawLabelType {
    /// Human readable name of the label sheet product
    #[serde(alias = "name")]
    pub display_name: Option<String>,

    pub label_width: Option<f64>,
    pub label_height: Option<f64>,
    pub labels_per_row: Option<i64>,
    pub labels_per_column: Option<i64>,
    pub label_orientation: Option<String>,
    pub page_width_inch: Option<f64>,
    pub page_height_inch: Option<f64>,

    pub margin_top: Option<f64>,
    pub margin_bottom: Option<f64>,
    pub margin_left: Option<f64>,
    pub margin_right: Option<f64>,

    /// `Inches` or `Percentage`; which offset representation wins when both exist
    pub offset_input_mode: Option<String>,
    /// `fail` or `clamp`
    pub overflow_policy: Option<String>,

    pub show_qr_code: Option<Flag>,
    pub qrcode_x_offset: Option<f64>,
    pub qrcode_x_offset_pct: Option<f64>,
    pub qrcode_y_offset: Option<f64>,
    pub qrcode_y_offset_pct: Option<f64>,
    pub qrcode_size_inch: Option<f64>,
    pub qrcode_size_pct: Option<f64>,
    pub qrcode_size_pts: Option<f64>,

    pub show_sku: Option<Flag>,
    pub sku_sample: Option<String>,
    pub sku_x_offset: Option<f64>,
    pub sku_x_offset_pct: Option<f64>,
    pub sku_y_offset: Option<f64>,
    pub sku_y_offset_pct: Option<f64>,
    pub sku_font_type: Option<String>,
    pub sku_font_size: Option<f64>,
    pub sku_max_word_length: Option<i64>,
    pub sku_text_align: Option<String>,
    pub sku_auto_fit_min_font_size: Option<f64>,
    pub sku_auto_fit_max_height: Option<f64>,

    pub show_product_name: Option<Flag>,
    pub product_name_sample: Option<String>,
    pub product_name_x_offset: Option<f64>,
    pub product_name_x_offset_pct: Option<f64>,
    pub product_name_y_offset: Option<f64>,
    pub product_name_y_offset_pct: Option<f64>,
    pub product_name_font_type: Option<String>,
    pub product_name_font_size: Option<f64>,
    pub product_name_max_word_length: Option<i64>,
    pub product_name_text_align: Option<String>,
    pub product_name_auto_fit_min_font_size: Option<f64>,
    pub product_name_auto_fit_max_height: Option<f64>,

    pub show_price: Option<Flag>,
    pub price_sample: Option<f64>,
    pub price_x_offset: Option<f64>,
    pub price_x_offset_pct: Option<f64>,
    pub price_y_offset: Option<f64>,
    pub price_y_offset_pct: Option<f64>,
    pub price_rotation: Option<f64>,
    pub price_font_type: Option<String>,
    pub price_font_size: Option<f64>,

    pub currency: Option<String>,
    pub file_name: Option<String>,
}

/// The raw fields describing one wrapped text element (SKU or product name)
pub(crate) struct RawText<'a> {
    pub prefix: &'static str,
    pub show: Option<Flag>,
    pub x_offset: Option<f64>,
    pub x_offset_pct: Option<f64>,
    pub y_offset: Option<f64>,
    pub y_offset_pct: Option<f64>,
    pub font_type: &'a Option<String>,
    pub font_size: Option<f64>,
    pub max_word_length: Option<i64>,
    pub text_align: &'a Option<String>,
    pub auto_fit_min_font_size: Option<f64>,
    pub auto_fit_max_height: Option<f64>,
}

impl RawLabelType {
    pub(crate) fn sku(&self) -> RawText<'_> {
        RawText {
            prefix: "sku",
            show: self.show_sku,
            x_offset: self.sku_x_offset,
            x_offset_pct: self.sku_x_offset_pct,
            y_offset: self.sku_y_offset,
            y_offset_pct: self.sku_y_offset_pct,
            font_type: &self.sku_font_type,
            font_size: self.sku_font_size,
            max_word_length: self.sku_max_word_length,
            text_align: &self.sku_text_align,
            auto_fit_min_font_size: self.sku_auto_fit_min_font_size,
            auto_fit_max_height: self.sku_auto_fit_max_height,
        }
    }

    pub(crate) fn product_name(&self) -> RawText<'_> {
        RawText {
            prefix: "product_name",
            show: self.show_product_name,
            x_offset: self.product_name_x_offset,
            x_offset_pct: self.product_name_x_offset_pct,
            y_offset: self.product_name_y_offset,
            y_offset_pct: self.product_name_y_offset_pct,
            font_type: &self.product_name_font_type,
            font_size: self.product_name_font_size,
            max_word_length: self.product_name_max_word_length,
            text_align: &self.product_name_text_align,
            auto_fit_min_font_size: self.product_name_auto_fit_min_font_size,
            auto_fit_max_height: self.product_name_auto_fit_max_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_numbers_and_booleans() {
        let raw: RawLabelType =
            serde_json::from_str(r#"{"show_qr_code": 0, "show_sku": true, "show_price": 1}"#)
                .unwrap();
        assert_eq!(raw.show_qr_code.map(bool::from), Some(false));
        assert_eq!(raw.show_sku.map(bool::from), Some(true));
        assert_eq!(raw.show_price.map(bool::from), Some(true));
        assert_eq!(raw.show_product_name, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let raw: RawLabelType = serde_json::from_str(
            r#"{"name": "Small", "label_width": 0.5, "barcode_type": "QR Code"}"#,
        )
        .unwrap();
        assert_eq!(raw.display_name.as_deref(), Some("Small"));
        assert_eq!(raw.label_width, Some(0.5));
    }
}
