use super::*;
use crate::units::In;

const DEFAULT_TEXT_FONT: &str = "Helvetica";
const DEFAULT_PRICE_FONT: &str = "Helvetica-Bold";
const DEFAULT_SKU_FONT_SIZE: f64 = 7.0;
const DEFAULT_PRODUCT_NAME_FONT_SIZE: f64 = 6.0;
const DEFAULT_PRICE_FONT_SIZE: f64 = 10.0;
const DEFAULT_LANDSCAPE_PRICE_ROTATION: f64 = 90.0;
const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_FILE_NAME: &str = "labels";
const DEFAULT_SKU_SAMPLE: &str = "SAM-PLE-SKU";
const DEFAULT_PRODUCT_NAME_SAMPLE: &str = "Sample Product Name";
const DEFAULT_PRICE_SAMPLE_CENTS: i64 = 2999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetMode {
    Inches,
    Percentage,
}

/// Field-by-field validation for a single label type. Every error names the
/// label type and the offending field.
struct Resolver<'a> {
    name: &'a str,
    raw: &'a RawLabelType,
}

impl Resolver<'_> {
    fn err<F: ToString, R: ToString>(&self, field: F, reason: R) -> LabelError {
        LabelError::validation(self.name, field, reason)
    }

    fn positive(&self, field: &str, value: Option<f64>) -> Result<f64, LabelError> {
        match value {
            None => Err(self.err(field, "is required")),
            Some(v) if !v.is_finite() || v <= 0.0 => {
                Err(self.err(field, format!("must be greater than 0, got {v}")))
            }
            Some(v) => Ok(v),
        }
    }

    fn count(&self, field: &str, value: Option<i64>) -> Result<usize, LabelError> {
        match value {
            None => Err(self.err(field, "is required")),
            Some(v) if v <= 0 => Err(self.err(field, format!("must be greater than 0, got {v}"))),
            Some(v) => Ok(v as usize),
        }
    }

    fn non_negative(&self, field: &str, value: Option<f64>) -> Result<f64, LabelError> {
        match value {
            None => Ok(0.0),
            Some(v) if !v.is_finite() || v < 0.0 => {
                Err(self.err(field, format!("must not be negative, got {v}")))
            }
            Some(v) => Ok(v),
        }
    }

    fn font_size(&self, field: &str, value: Option<f64>, default: f64) -> Result<Pt, LabelError> {
        match value {
            None => Ok(Pt(default)),
            Some(v) => self.positive(field, Some(v)).map(Pt),
        }
    }

    fn font(value: &Option<String>, default: &str) -> String {
        match value.as_deref().map(str::trim) {
            Some(f) if !f.is_empty() => f.to_string(),
            _ => default.to_string(),
        }
    }

    fn offset_mode(&self) -> Result<OffsetMode, LabelError> {
        match self.raw.offset_input_mode.as_deref().map(str::trim) {
            None | Some("") => Ok(OffsetMode::Inches),
            Some(m) if m.eq_ignore_ascii_case("inches") => Ok(OffsetMode::Inches),
            Some(m) if m.eq_ignore_ascii_case("percentage") => Ok(OffsetMode::Percentage),
            Some(m) => Err(self.err(
                "offset_input_mode",
                format!("expected `Inches` or `Percentage`, got `{m}`"),
            )),
        }
    }

    /// Resolve one offset axis to inches. The representation chosen by `mode` wins
    /// when both are present; otherwise whichever is present is used.
    fn offset_axis(
        &self,
        mode: OffsetMode,
        field: &str,
        inches: Option<f64>,
        percent: Option<f64>,
        dimension: In,
    ) -> Result<In, LabelError> {
        let pct_field = format!("{field}_pct");
        let from_inches = |v: Option<f64>| -> Result<Option<In>, LabelError> {
            v.map(|v| self.non_negative(field, Some(v)).map(In)).transpose()
        };
        let from_percent = |v: Option<f64>| -> Result<Option<In>, LabelError> {
            v.map(|v| {
                self.non_negative(&pct_field, Some(v))
                    .map(|pct| In(dimension.0 * pct / 100.0))
            })
            .transpose()
        };

        let resolved = match mode {
            OffsetMode::Inches => match from_inches(inches)? {
                Some(v) => Some(v),
                None => from_percent(percent)?,
            },
            OffsetMode::Percentage => match from_percent(percent)? {
                Some(v) => Some(v),
                None => from_inches(inches)?,
            },
        };
        Ok(resolved.unwrap_or_default())
    }

    #[allow(clippy::too_many_arguments)]
    fn offset(
        &self,
        mode: OffsetMode,
        prefix: &str,
        x: Option<f64>,
        x_pct: Option<f64>,
        y: Option<f64>,
        y_pct: Option<f64>,
        label: (In, In),
    ) -> Result<Offset, LabelError> {
        let x = self.offset_axis(mode, &format!("{prefix}_x_offset"), x, x_pct, label.0)?;
        let y = self.offset_axis(mode, &format!("{prefix}_y_offset"), y, y_pct, label.1)?;
        Ok(Offset {
            x: x.into(),
            y: y.into(),
        })
    }

    fn qr_size(&self, mode: OffsetMode, label_width: In) -> Result<Option<Pt>, LabelError> {
        let raw = self.raw;
        let inches = raw
            .qrcode_size_inch
            .map(|v| self.positive("qrcode_size_inch", Some(v)).map(|v| Pt::from(In(v))))
            .transpose()?;
        let percent = raw
            .qrcode_size_pct
            .map(|v| {
                self.positive("qrcode_size_pct", Some(v))
                    .map(|pct| Pt::from(In(label_width.0 * pct / 100.0)))
            })
            .transpose()?;
        let points = raw
            .qrcode_size_pts
            .map(|v| self.positive("qrcode_size_pts", Some(v)).map(Pt))
            .transpose()?;

        Ok(match mode {
            OffsetMode::Inches => inches.or(percent),
            OffsetMode::Percentage => percent.or(inches),
        }
        .or(points))
    }

    fn alignment(&self, field: &str, value: &Option<String>) -> Result<Alignment, LabelError> {
        match value.as_deref().map(str::trim) {
            None | Some("") => Ok(Alignment::Left),
            Some(a) if a.eq_ignore_ascii_case("left") => Ok(Alignment::Left),
            Some(a) if a.eq_ignore_ascii_case("centre") || a.eq_ignore_ascii_case("center") => {
                Ok(Alignment::Centre)
            }
            Some(a) if a.eq_ignore_ascii_case("right") => Ok(Alignment::Right),
            Some(a) => Err(self.err(
                field,
                format!("expected `Left`, `Centre` or `Right`, got `{a}`"),
            )),
        }
    }

    fn max_word_length(&self, field: &str, value: Option<i64>) -> Result<Option<usize>, LabelError> {
        match value {
            // zero means "not set" in stored label types
            None | Some(0) => Ok(None),
            Some(v) if v < 0 => Err(self.err(field, format!("must not be negative, got {v}"))),
            Some(v) => Ok(Some(v as usize)),
        }
    }

    fn text(
        &self,
        mode: OffsetMode,
        raw: RawText<'_>,
        label: (In, In),
        default_visible: bool,
        default_size: f64,
    ) -> Result<TextConfig, LabelError> {
        let p = raw.prefix;
        let offset = self.offset(
            mode,
            p,
            raw.x_offset,
            raw.x_offset_pct,
            raw.y_offset,
            raw.y_offset_pct,
            label,
        )?;
        let font_size = self.font_size(&format!("{p}_font_size"), raw.font_size, default_size)?;
        let max_word_length =
            self.max_word_length(&format!("{p}_max_word_length"), raw.max_word_length)?;
        let alignment = self.alignment(&format!("{p}_text_align"), raw.text_align)?;

        let auto_fit = match (raw.auto_fit_min_font_size, raw.auto_fit_max_height) {
            (None, None) => None,
            (Some(min), Some(height)) => {
                let min_field = format!("{p}_auto_fit_min_font_size");
                let min = Pt(self.positive(&min_field, Some(min))?);
                if min > font_size {
                    return Err(self.err(
                        min_field,
                        format!("must not exceed the font size ({font_size}pt)"),
                    ));
                }
                let height =
                    self.positive(&format!("{p}_auto_fit_max_height"), Some(height))?;
                Some(AutoFit {
                    min_font_size: min,
                    max_height: In(height).into(),
                })
            }
            (Some(_), None) => {
                return Err(self.err(
                    format!("{p}_auto_fit_max_height"),
                    "is required when a minimum font size is set",
                ))
            }
            (None, Some(_)) => {
                return Err(self.err(
                    format!("{p}_auto_fit_min_font_size"),
                    "is required when a maximum height is set",
                ))
            }
        };

        Ok(TextConfig {
            visible: raw.show.map(bool::from).unwrap_or(default_visible),
            offset,
            font: Self::font(raw.font_type, DEFAULT_TEXT_FONT),
            font_size,
            max_word_length,
            alignment,
            auto_fit,
        })
    }
}

/// Validate a raw label type and apply all defaults.
///
/// Fails with [`LabelError::Validation`] on the first field, in declaration order,
/// that is missing or out of range.
pub fn resolve(name: &str, raw: &RawLabelType) -> Result<LabelTypeConfig, LabelError> {
    let r = Resolver { name, raw };

    let label_width = In(r.positive("label_width", raw.label_width)?);
    let label_height = In(r.positive("label_height", raw.label_height)?);
    let labels_per_row = r.count("labels_per_row", raw.labels_per_row)?;
    let labels_per_column = r.count("labels_per_column", raw.labels_per_column)?;
    let page_width = In(r.positive("page_width_inch", raw.page_width_inch)?);
    let page_height = In(r.positive("page_height_inch", raw.page_height_inch)?);

    let margins = Margins::trbl(
        In(r.non_negative("margin_top", raw.margin_top)?).into(),
        In(r.non_negative("margin_right", raw.margin_right)?).into(),
        In(r.non_negative("margin_bottom", raw.margin_bottom)?).into(),
        In(r.non_negative("margin_left", raw.margin_left)?).into(),
    );

    let orientation = match raw.label_orientation.as_deref().map(str::trim) {
        None | Some("") => Orientation::Portrait,
        Some(o) if o.eq_ignore_ascii_case("portrait") => Orientation::Portrait,
        Some(o) if o.eq_ignore_ascii_case("landscape") => Orientation::Landscape,
        Some(o) => {
            return Err(r.err(
                "label_orientation",
                format!("expected `portrait` or `landscape`, got `{o}`"),
            ))
        }
    };

    let overflow_policy = match raw.overflow_policy.as_deref().map(str::trim) {
        None | Some("") => OverflowPolicy::Fail,
        Some(p) if p.eq_ignore_ascii_case("fail") => OverflowPolicy::Fail,
        Some(p) if p.eq_ignore_ascii_case("clamp") => OverflowPolicy::Clamp,
        Some(p) => {
            return Err(r.err(
                "overflow_policy",
                format!("expected `fail` or `clamp`, got `{p}`"),
            ))
        }
    };

    let mode = r.offset_mode()?;
    let label = (label_width, label_height);

    let qr = QrConfig {
        visible: raw.show_qr_code.map(bool::from).unwrap_or(true),
        offset: r.offset(
            mode,
            "qrcode",
            raw.qrcode_x_offset,
            raw.qrcode_x_offset_pct,
            raw.qrcode_y_offset,
            raw.qrcode_y_offset_pct,
            label,
        )?,
        size: r.qr_size(mode, label_width)?,
    };

    let sku = r.text(mode, raw.sku(), label, true, DEFAULT_SKU_FONT_SIZE)?;
    let product_name = r.text(
        mode,
        raw.product_name(),
        label,
        false,
        DEFAULT_PRODUCT_NAME_FONT_SIZE,
    )?;

    let rotation_degrees = match (orientation, raw.price_rotation) {
        (_, Some(v)) if !v.is_finite() => {
            return Err(r.err("price_rotation", format!("must be a finite angle, got {v}")))
        }
        (_, Some(v)) => v,
        (Orientation::Landscape, None) => DEFAULT_LANDSCAPE_PRICE_ROTATION,
        (Orientation::Portrait, None) => 0.0,
    };

    let price = PriceConfig {
        visible: raw.show_price.map(bool::from).unwrap_or(true),
        offset: r.offset(
            mode,
            "price",
            raw.price_x_offset,
            raw.price_x_offset_pct,
            raw.price_y_offset,
            raw.price_y_offset_pct,
            label,
        )?,
        font: Resolver::font(&raw.price_font_type, DEFAULT_PRICE_FONT),
        font_size: r.font_size("price_font_size", raw.price_font_size, DEFAULT_PRICE_FONT_SIZE)?,
        rotation_degrees,
    };

    let price_sample = match raw.price_sample {
        None => Price::from_cents(DEFAULT_PRICE_SAMPLE_CENTS),
        Some(v) => Price::from_f64(v)
            .ok_or_else(|| r.err("price_sample", format!("must be a number, got {v}")))?,
    };

    let non_empty = |value: &Option<String>, default: &str| match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    };

    Ok(LabelTypeConfig {
        name: name.to_string(),
        display_name: non_empty(&raw.display_name, name),
        file_name: non_empty(&raw.file_name, DEFAULT_FILE_NAME),
        label_width: label_width.into(),
        label_height: label_height.into(),
        labels_per_row,
        labels_per_column,
        page_width: page_width.into(),
        page_height: page_height.into(),
        margins,
        orientation,
        overflow_policy,
        qr,
        sku,
        product_name,
        price,
        currency: non_empty(&raw.currency, DEFAULT_CURRENCY).to_ascii_uppercase(),
        samples: Samples {
            sku: non_empty(&raw.sku_sample, DEFAULT_SKU_SAMPLE),
            product_name: non_empty(&raw.product_name_sample, DEFAULT_PRODUCT_NAME_SAMPLE),
            price: price_sample,
        },
    })
}
