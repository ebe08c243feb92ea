//! Driving a whole generation run: grid, placer and renderer together.

use log::{debug, info};

use crate::config::LabelTypeConfig;
use crate::currency::{resolve_currency, CurrencyLookup};
use crate::layout::{plan, GridGeometry, LabelPlacer, OverflowWarning, TextMeasure};
use crate::primitives::Renderer;
use crate::qr::QrSource;
use crate::records::LabelRecord;
use crate::units::Pt;
use crate::LabelError;

/// What a call to [LabelSheet::generate] produced
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSummary {
    /// Physical labels drawn, counting every copy
    pub labels: usize,
    pub pages: usize,
    /// Axes whose spacing had to be clamped to fit the page
    pub overflow: Vec<OverflowWarning>,
}

/// Lays out and draws labels of one type
pub struct LabelSheet<'a, M: ?Sized, Q: ?Sized> {
    config: &'a LabelTypeConfig,
    placer: LabelPlacer<'a, M, Q>,
}

impl<'a, M, Q> LabelSheet<'a, M, Q>
where
    M: TextMeasure + ?Sized,
    Q: QrSource + ?Sized,
{
    /// Prepare to draw `config` labels; the label type's currency is looked up in `currency`
    pub fn new<C: CurrencyLookup + ?Sized>(
        config: &'a LabelTypeConfig,
        measure: &'a M,
        qr: &'a Q,
        currency: &C,
    ) -> LabelSheet<'a, M, Q> {
        let currency = resolve_currency(currency, &config.currency);
        LabelSheet {
            config,
            placer: LabelPlacer::new(config, measure, qr, currency),
        }
    }

    pub fn config(&self) -> &LabelTypeConfig {
        self.config
    }

    /// Draw every copy of every record, filling pages in row-major order
    pub fn generate<R: Renderer + ?Sized>(
        &self,
        records: &[LabelRecord],
        renderer: &mut R,
    ) -> Result<SheetSummary, LabelError> {
        let geometry = GridGeometry::new(self.config)?;
        let mut labels = 0;
        let mut pages = 0;

        for instance in plan(records, &geometry) {
            if instance.page_index + 1 > pages {
                if pages > 0 {
                    renderer.start_new_page()?;
                }
                pages = instance.page_index + 1;
                debug!(
                    "label type `{}`: starting page {pages}",
                    self.config.name
                );
            }
            for primitive in self.placer.place(&instance)? {
                primitive.apply(renderer)?;
            }
            labels += 1;
        }

        info!(
            "label type `{}`: drew {labels} label(s) on {pages} page(s)",
            self.config.name
        );
        Ok(SheetSummary {
            labels,
            pages,
            overflow: geometry.overflow,
        })
    }

    /// Draw a single label from the label type's sample values onto a label-sized page
    pub fn preview<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), LabelError> {
        let samples = &self.config.samples;
        let record = LabelRecord {
            sku: samples.sku.clone(),
            product: samples.product_name.clone(),
            display_price: samples.price,
            quantity: 1,
        };
        debug!("label type `{}`: drawing preview", self.config.name);
        for primitive in self
            .placer
            .place_at(Pt::ZERO, self.config.label_height, &record)?
        {
            primitive.apply(renderer)?;
        }
        Ok(())
    }
}
