use crate::config::{LabelTypeConfig, OverflowPolicy};
use crate::records::LabelRecord;
use crate::units::Pt;
use crate::{Axis, LabelError};

/// Remaining area below this is treated as exactly zero
const OVERFLOW_TOLERANCE: f64 = 1e-6;

/// Recorded when a grid that doesn't fit the page was laid out anyway
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverflowWarning {
    pub axis: Axis,
    /// The negative spacing that was clamped to zero
    pub spacing: Pt,
}

/// Where every label on a sheet goes.
///
/// Labels are spread evenly so that the outer labels touch the margins:
/// `n·label + (n − 1)·spacing = usable` on each axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    pub page_width: Pt,
    pub page_height: Pt,
    pub usable_width: Pt,
    pub usable_height: Pt,
    pub label_width: Pt,
    pub label_height: Pt,
    pub columns: usize,
    pub rows: usize,
    pub horizontal_spacing: Pt,
    pub vertical_spacing: Pt,
    left: Pt,
    top: Pt,
    pub overflow: Vec<OverflowWarning>,
}

/// Spacing between `count` labels of `label` size in `usable` room, and whether
/// they overflow it
fn spacing(usable: Pt, label: Pt, count: usize) -> (Pt, bool) {
    let remaining = usable - label * count as f64;
    let overflow = remaining.0 < -OVERFLOW_TOLERANCE;
    if count > 1 {
        (remaining / (count - 1) as f64, overflow)
    } else if overflow {
        (remaining, overflow)
    } else {
        (Pt::ZERO, overflow)
    }
}

impl GridGeometry {
    /// Compute the grid for a label type, applying its overflow policy
    pub fn new(config: &LabelTypeConfig) -> Result<GridGeometry, LabelError> {
        let margins = &config.margins;
        let usable_width = config.page_width - margins.horizontal();
        let usable_height = config.page_height - margins.vertical();

        let (horizontal, h_overflow) =
            spacing(usable_width, config.label_width, config.labels_per_row);
        let (vertical, v_overflow) =
            spacing(usable_height, config.label_height, config.labels_per_column);

        let mut overflow = Vec::new();
        for (axis, spacing, overflowed) in [
            (Axis::Horizontal, horizontal, h_overflow),
            (Axis::Vertical, vertical, v_overflow),
        ] {
            if !overflowed {
                continue;
            }
            match config.overflow_policy {
                OverflowPolicy::Fail => {
                    return Err(LabelError::OverflowLayout {
                        label_type: config.name.clone(),
                        axis,
                        spacing: spacing.0,
                    })
                }
                OverflowPolicy::Clamp => {
                    log::warn!(
                        "label type `{}`: labels overflow the page {axis}ly \
                         (spacing {spacing}pt), clamping spacing to 0",
                        config.name
                    );
                    overflow.push(OverflowWarning { axis, spacing });
                }
            }
        }

        Ok(GridGeometry {
            page_width: config.page_width,
            page_height: config.page_height,
            usable_width,
            usable_height,
            label_width: config.label_width,
            label_height: config.label_height,
            columns: config.labels_per_row,
            rows: config.labels_per_column,
            horizontal_spacing: horizontal.max(Pt::ZERO),
            vertical_spacing: vertical.max(Pt::ZERO),
            left: margins.left,
            top: config.page_height - margins.top,
            overflow,
        })
    }

    /// Labels per page
    pub fn capacity(&self) -> usize {
        self.rows * self.columns
    }

    /// Top-left corner of the label at `row`, `column`. `y` is measured from the
    /// bottom of the page.
    pub fn origin(&self, row: usize, column: usize) -> (Pt, Pt) {
        let x = self.left + (self.label_width + self.horizontal_spacing) * column as f64;
        let y = self.top - (self.label_height + self.vertical_spacing) * row as f64;
        (x, y)
    }

    /// Page, row and column of the `index`th label, filling rows left to right
    /// and pages top to bottom
    pub fn locate(&self, index: usize) -> (usize, usize, usize) {
        let capacity = self.capacity();
        let slot = index % capacity;
        (index / capacity, slot / self.columns, slot % self.columns)
    }

    /// Number of pages `labels` labels take up
    pub fn pages_for(&self, labels: usize) -> usize {
        labels.div_ceil(self.capacity())
    }
}

/// One physical copy of a record, positioned on the sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementInstance<'a> {
    /// Position of this copy in the whole run, from 0
    pub index: usize,
    pub page_index: usize,
    pub row: usize,
    pub column: usize,
    /// Left edge of the label
    pub x: Pt,
    /// Top edge of the label, from the bottom of the page
    pub y: Pt,
    pub record: &'a LabelRecord,
}

/// Lazily walks every copy of every record in order. See [plan].
#[derive(Debug, Clone)]
pub struct Placements<'a> {
    geometry: &'a GridGeometry,
    records: std::slice::Iter<'a, LabelRecord>,
    current: Option<&'a LabelRecord>,
    copies_left: u32,
    next_index: usize,
}

/// Lay out `records`, each repeated `quantity` times, over as many pages as needed
pub fn plan<'a>(records: &'a [LabelRecord], geometry: &'a GridGeometry) -> Placements<'a> {
    Placements {
        geometry,
        records: records.iter(),
        current: None,
        copies_left: 0,
        next_index: 0,
    }
}

impl<'a> Iterator for Placements<'a> {
    type Item = PlacementInstance<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.copies_left == 0 {
            let record = self.records.next()?;
            self.current = Some(record);
            self.copies_left = record.quantity;
        }
        let record = self.current?;
        self.copies_left -= 1;

        let index = self.next_index;
        self.next_index += 1;
        let (page_index, row, column) = self.geometry.locate(index);
        let (x, y) = self.geometry.origin(row, column);

        Some(PlacementInstance {
            index,
            page_index,
            row,
            column,
            x,
            y,
            record,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest: usize = self
            .records
            .as_slice()
            .iter()
            .map(|r| r.quantity as usize)
            .sum();
        let n = rest + self.copies_left as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Placements<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, RawLabelType};
    use crate::currency::Price;

    fn config(raw: RawLabelType) -> LabelTypeConfig {
        resolve("test", &raw).unwrap()
    }

    fn letter_30_up() -> RawLabelType {
        RawLabelType {
            label_width: Some(2.625),
            label_height: Some(1.0),
            labels_per_row: Some(3),
            labels_per_column: Some(10),
            page_width_inch: Some(8.5),
            page_height_inch: Some(11.0),
            margin_top: Some(0.5),
            margin_bottom: Some(0.5),
            margin_left: Some(0.1875),
            margin_right: Some(0.1875),
            ..Default::default()
        }
    }

    fn record(quantity: u32) -> LabelRecord {
        LabelRecord {
            sku: "SKU".into(),
            product: "Product".into(),
            display_price: Price::from_cents(100),
            quantity,
        }
    }

    #[test]
    fn spacing_fills_the_usable_area() {
        for raw in [
            letter_30_up(),
            RawLabelType {
                labels_per_row: Some(1),
                labels_per_column: Some(1),
                ..letter_30_up()
            },
            RawLabelType {
                label_width: Some(1.75),
                label_height: Some(0.5),
                labels_per_row: Some(4),
                labels_per_column: Some(20),
                margin_left: Some(0.28),
                margin_right: Some(0.28),
                ..letter_30_up()
            },
        ] {
            let geometry = GridGeometry::new(&config(raw)).unwrap();
            if geometry.columns > 1 {
                let used = geometry.label_width * geometry.columns as f64
                    + geometry.horizontal_spacing * (geometry.columns - 1) as f64;
                assert!(used.approx_eq(geometry.usable_width, 1e-6), "{used} vs {}", geometry.usable_width);
            }
            if geometry.rows > 1 {
                let used = geometry.label_height * geometry.rows as f64
                    + geometry.vertical_spacing * (geometry.rows - 1) as f64;
                assert!(used.approx_eq(geometry.usable_height, 1e-6), "{used} vs {}", geometry.usable_height);
            }
        }
    }

    #[test]
    fn single_column_has_no_spacing() {
        let geometry = GridGeometry::new(&config(RawLabelType {
            labels_per_row: Some(1),
            ..letter_30_up()
        }))
        .unwrap();
        assert_eq!(geometry.horizontal_spacing, Pt::ZERO);
    }

    #[test]
    fn overflow_fails_by_default() {
        let err = GridGeometry::new(&config(RawLabelType {
            labels_per_row: Some(4),
            ..letter_30_up()
        }))
        .unwrap_err();
        match err {
            LabelError::OverflowLayout { axis, spacing, .. } => {
                assert_eq!(axis, Axis::Horizontal);
                assert!(spacing < 0.0);
            }
            other => panic!("unexpected error {other:?}"),
        }

        // a single label wider than the page still overflows
        let err = GridGeometry::new(&config(RawLabelType {
            label_width: Some(9.0),
            labels_per_row: Some(1),
            ..letter_30_up()
        }))
        .unwrap_err();
        assert!(matches!(err, LabelError::OverflowLayout { .. }));
    }

    #[test]
    fn overflow_can_be_clamped() {
        let geometry = GridGeometry::new(&config(RawLabelType {
            labels_per_column: Some(11),
            overflow_policy: Some("clamp".into()),
            ..letter_30_up()
        }))
        .unwrap();
        assert_eq!(geometry.vertical_spacing, Pt::ZERO);
        assert_eq!(geometry.overflow.len(), 1);
        assert_eq!(geometry.overflow[0].axis, Axis::Vertical);
        assert!(geometry.overflow[0].spacing < Pt::ZERO);
    }

    #[test]
    fn copies_map_to_page_row_and_column() {
        let geometry = GridGeometry::new(&config(RawLabelType {
            labels_per_column: Some(2),
            overflow_policy: Some("clamp".into()),
            ..letter_30_up()
        }))
        .unwrap();
        let records = [record(4), record(0), record(5)];
        let placements: Vec<_> = plan(&records, &geometry).collect();
        assert_eq!(placements.len(), 9);

        let capacity = geometry.capacity();
        for (i, p) in placements.iter().enumerate() {
            assert_eq!(p.index, i);
            assert_eq!(p.page_index, i / capacity);
            assert_eq!(p.row, (i % capacity) / geometry.columns);
            assert_eq!(p.column, (i % capacity) % geometry.columns);
            assert_eq!((p.x, p.y), geometry.origin(p.row, p.column));
        }
        assert!(std::ptr::eq(placements[3].record, &records[0]));
        assert!(std::ptr::eq(placements[4].record, &records[2]));
        assert_eq!(geometry.pages_for(placements.len()), 2);
    }

    #[test]
    fn first_label_sits_in_the_top_left_margin_corner() {
        let geometry = GridGeometry::new(&config(letter_30_up())).unwrap();
        assert_eq!(geometry.origin(0, 0), (Pt(13.5), Pt(756.0)));
        let (_, y) = geometry.origin(9, 0);
        // the bottom row's lower edge rests on the bottom margin
        assert!((y - geometry.label_height).approx_eq(Pt(36.0), 1e-6));
    }

    #[test]
    fn size_hint_counts_remaining_copies() {
        let geometry = GridGeometry::new(&config(letter_30_up())).unwrap();
        let records = [record(2), record(3)];
        let mut placements = plan(&records, &geometry);
        assert_eq!(placements.len(), 5);
        placements.next();
        placements.next();
        placements.next();
        assert_eq!(placements.len(), 2);
    }
}
