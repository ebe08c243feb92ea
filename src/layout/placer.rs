use crate::config::{LabelTypeConfig, Orientation, TextConfig};
use crate::currency::{format_price, CurrencyInfo};
use crate::primitives::{DrawPrimitive, FontSpec};
use crate::qr::QrSource;
use crate::records::LabelRecord;
use crate::units::Pt;
use crate::LabelError;

use super::{aligned_x, fit_font_size, line_height, wrap_text, FittedBlock, PlacementInstance, TextMeasure};

/// Space kept clear between wrapped text and the label's right edge
pub const TEXT_RIGHT_PADDING: Pt = Pt(10.0);
/// Right padding used by auto-fitted (single block) text
pub const LEGACY_TEXT_RIGHT_PADDING: Pt = Pt(5.0);
/// Default QR size on landscape labels, as a fraction of the label height
pub const LANDSCAPE_QR_RATIO: f64 = 0.8;
/// Default QR size on portrait labels, as a fraction of the label height
pub const PORTRAIT_QR_RATIO: f64 = 0.4;

/// Turns one label's record into drawing primitives for a label type.
///
/// Element offsets are measured from the label's top-left corner with y growing
/// downward. Elements are placed independently; overlapping offsets overlap.
pub struct LabelPlacer<'a, M: ?Sized, Q: ?Sized> {
    config: &'a LabelTypeConfig,
    measure: &'a M,
    qr: &'a Q,
    currency: CurrencyInfo,
}

impl<'a, M, Q> LabelPlacer<'a, M, Q>
where
    M: TextMeasure + ?Sized,
    Q: QrSource + ?Sized,
{
    pub fn new(
        config: &'a LabelTypeConfig,
        measure: &'a M,
        qr: &'a Q,
        currency: CurrencyInfo,
    ) -> LabelPlacer<'a, M, Q> {
        LabelPlacer {
            config,
            measure,
            qr,
            currency,
        }
    }

    /// Edge length of the QR code
    pub fn qr_size(&self) -> Pt {
        let config = self.config;
        match (config.qr.size, config.orientation) {
            (Some(size), _) => size,
            (None, Orientation::Portrait) => config
                .label_width
                .min(config.label_height * PORTRAIT_QR_RATIO),
            (None, Orientation::Landscape) => config.label_height * LANDSCAPE_QR_RATIO,
        }
    }

    pub fn place(&self, instance: &PlacementInstance<'_>) -> Result<Vec<DrawPrimitive>, LabelError> {
        self.place_at(instance.x, instance.y, instance.record)
    }

    /// Place a label whose top-left corner is at `x`, `y` (y from the bottom of the page)
    pub fn place_at(
        &self,
        x: Pt,
        y: Pt,
        record: &LabelRecord,
    ) -> Result<Vec<DrawPrimitive>, LabelError> {
        let config = self.config;
        let mut out = Vec::new();

        if config.qr.visible {
            let size = self.qr_size();
            out.push(DrawPrimitive::PlaceImage {
                image: self.qr.get_or_create(&record.sku)?,
                x: x + config.qr.offset.x,
                y: y - config.qr.offset.y - size,
                width: size,
                height: size,
            });
        }

        self.text_block(&mut out, &record.sku, &config.sku, x, y);
        self.text_block(&mut out, &record.product, &config.product_name, x, y);

        let price = &config.price;
        if price.visible {
            let text = format_price(record.display_price, &self.currency);
            let font = FontSpec::new(&price.font, price.font_size);
            let anchor_x = x + price.offset.x;
            let anchor_y = y - price.offset.y;
            out.push(match config.orientation {
                Orientation::Portrait => DrawPrimitive::TextLine {
                    text,
                    x: anchor_x,
                    y: anchor_y - price.font_size,
                    font,
                },
                Orientation::Landscape => DrawPrimitive::RotatedText {
                    text,
                    center_x: anchor_x,
                    center_y: anchor_y,
                    angle_degrees: price.rotation_degrees,
                    font,
                },
            });
        }

        Ok(out)
    }

    fn text_block(&self, out: &mut Vec<DrawPrimitive>, text: &str, element: &TextConfig, x: Pt, y: Pt) {
        if !element.visible {
            return;
        }

        let left = x + element.offset.x;
        let block = match element.auto_fit {
            Some(fit) => {
                let available = self.config.label_width - element.offset.x - LEGACY_TEXT_RIGHT_PADDING;
                let block = fit_font_size(
                    text,
                    &element.font,
                    available,
                    fit.max_height,
                    element.font_size,
                    fit.min_font_size,
                    element.max_word_length,
                    self.measure,
                );
                (available, block)
            }
            None => {
                let available = self.config.label_width - element.offset.x - TEXT_RIGHT_PADDING;
                let lines = wrap_text(
                    text,
                    &element.font,
                    element.font_size,
                    available,
                    element.max_word_length,
                    self.measure,
                );
                (
                    available,
                    FittedBlock {
                        size: element.font_size,
                        lines,
                    },
                )
            }
        };
        let (available, FittedBlock { size, lines }) = block;

        let first_baseline = y - element.offset.y - size;
        for (i, line) in lines.into_iter().enumerate() {
            let line_x = aligned_x(
                &line,
                &element.font,
                size,
                left,
                available,
                element.alignment,
                self.measure,
            );
            out.push(DrawPrimitive::TextLine {
                text: line,
                x: line_x,
                y: first_baseline - line_height(size) * i as f64,
                font: FontSpec::new(&element.font, size),
            });
        }
    }
}
