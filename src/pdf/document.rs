use super::font::{Font, FontBook, UsedGlyphs};
use super::image::Image;
use super::info::Info;
use super::page::{ImageLayout, Page, PageResources, SpanFont, SpanLayout};
use super::refs::{ObjectReferences, RefType};
use super::transform::Transform;
use crate::config::LabelTypeConfig;
use crate::primitives::{FontSpec, Renderer};
use crate::qr::ImageHandle;
use crate::units::Pt;
use crate::LabelError;
use id_arena::{Arena, Id};
use log::debug;
use pdf_writer::{Finish, Pdf, Rect, Ref};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Draws primitives onto fixed-size PDF pages, then renders them all out with a call
/// to [PdfRenderer::write].
///
/// Fonts come from a borrowed [FontBook] so the same book can measure text while the
/// renderer draws it. Only fonts that were drawn with end up embedded, and each image
/// is embedded once no matter how many labels share it.
pub struct PdfRenderer<'f> {
    page_width: Pt,
    page_height: Pt,
    fonts: &'f FontBook,
    used: HashMap<Id<Font>, UsedGlyphs>,
    images: Arena<Image>,
    image_keys: HashMap<String, Id<Image>>,
    pages: Vec<Page>,
    info: Option<Info>,
}

impl<'f> PdfRenderer<'f> {
    /// A renderer with a single empty page of the given size
    pub fn new(page_width: Pt, page_height: Pt, fonts: &'f FontBook) -> PdfRenderer<'f> {
        PdfRenderer {
            page_width,
            page_height,
            fonts,
            used: HashMap::new(),
            images: Arena::new(),
            image_keys: HashMap::new(),
            pages: vec![Page::default()],
            info: None,
        }
    }

    /// Pages sized for a whole sheet of `config` labels
    pub fn for_sheet(config: &LabelTypeConfig, fonts: &'f FontBook) -> PdfRenderer<'f> {
        PdfRenderer::new(config.page_width, config.page_height, fonts)
    }

    /// A page the size of a single `config` label
    pub fn for_preview(config: &LabelTypeConfig, fonts: &'f FontBook) -> PdfRenderer<'f> {
        PdfRenderer::new(config.label_width, config.label_height, fonts)
    }

    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// The fonts text is drawn with, also usable as a [crate::layout::TextMeasure]
    pub fn fonts(&self) -> &'f FontBook {
        self.fonts
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn add_span(
        &mut self,
        text: &str,
        font: &FontSpec,
        coords: (Pt, Pt),
        transform: Option<Transform>,
    ) -> Result<(), LabelError> {
        let fonts = self.fonts;
        let (id, face) = fonts.require(&font.family)?;
        let glyphs = face.encode(text, self.used.entry(id).or_default());
        self.current_page().add_span(SpanLayout {
            glyphs,
            font: SpanFont {
                id,
                size: font.size,
            },
            coords,
            transform,
        });
        Ok(())
    }

    /// Write the entire document to the writer. The whole document is rendered in
    /// memory first, pdf-writer has no streaming output.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), LabelError> {
        let PdfRenderer {
            page_width,
            page_height,
            fonts,
            used,
            images,
            pages,
            info,
            ..
        } = self;

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..pages.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs.iter().copied());

        let mut used: Vec<(Id<Font>, UsedGlyphs)> = used.into_iter().collect();
        used.sort_by_key(|(id, _)| id.index());
        let mut font_refs: Vec<(usize, Ref)> = Vec::with_capacity(used.len());
        for (id, glyphs) in used.iter() {
            if let Some(font) = fonts.get(*id) {
                font_refs.push((id.index(), font.write(&mut refs, *id, glyphs, &mut writer)));
            }
        }

        let image_refs: Vec<(usize, Ref)> = images
            .iter()
            .map(|(id, image)| (id.index(), image.write(&mut refs, id.index(), &mut writer)))
            .collect();

        let media_box = Rect::new(0.0, 0.0, page_width.into(), page_height.into());
        let resources = PageResources {
            parent: page_tree_id,
            fonts: &font_refs,
            images: &image_refs,
        };
        for (page_index, page) in pages.iter().enumerate() {
            let content_id = refs.gen(RefType::ContentForPage(page_index));
            page.write(
                page_refs[page_index],
                content_id,
                media_box,
                &resources,
                &mut writer,
            )?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        debug!(
            "wrote PDF with {} page(s), {} font(s), {} image(s)",
            pages.len(),
            font_refs.len(),
            image_refs.len()
        );
        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }

    /// Write the document to a file at `path`, replacing it if it exists
    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<(), LabelError> {
        let mut w = BufWriter::new(File::create(path)?);
        self.write(&mut w)?;
        w.flush()?;
        Ok(())
    }
}

impl Renderer for PdfRenderer<'_> {
    fn place_image(
        &mut self,
        image: &ImageHandle,
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
    ) -> Result<(), LabelError> {
        let id = match self.image_keys.get(&image.key) {
            Some(id) => *id,
            None => {
                let id = self.images.alloc(Image::new(image.load()?));
                self.image_keys.insert(image.key.clone(), id);
                id
            }
        };
        self.current_page().add_image(ImageLayout {
            image: id,
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn draw_text_line(
        &mut self,
        text: &str,
        x: Pt,
        y: Pt,
        font: &FontSpec,
    ) -> Result<(), LabelError> {
        self.add_span(text, font, (x, y), None)
    }

    fn draw_rotated_text(
        &mut self,
        text: &str,
        center_x: Pt,
        center_y: Pt,
        angle_degrees: f64,
        font: &FontSpec,
    ) -> Result<(), LabelError> {
        let fonts = self.fonts;
        let (_, face) = fonts.require(&font.family)?;
        let half_width = Pt(face.width_of(text, font.size).0 / 2.0);
        let half_size = Pt(font.size.0 / 2.0);
        let transform = Transform::rotate_degrees(angle_degrees).with_translate(center_x, center_y);
        self.add_span(
            text,
            font,
            (Pt(-half_width.0), Pt(-half_size.0)),
            Some(transform),
        )
    }

    fn start_new_page(&mut self) -> Result<(), LabelError> {
        self.pages.push(Page::default());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::page::PageContents;
    use crate::qr::ImageSource;
    use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma};
    use std::io::Cursor;
    use std::sync::Arc;

    fn book() -> FontBook {
        let mut book = FontBook::new();
        book.load(
            "Helvetica",
            include_bytes!("../../assets/DejaVuSans.ttf").to_vec(),
        )
        .unwrap();
        book
    }

    fn png_handle(key: &str) -> ImageHandle {
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([0])))
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        ImageHandle {
            key: key.to_string(),
            source: ImageSource::Memory(Arc::new(bytes)),
        }
    }

    #[test]
    fn missing_fonts_are_reported() {
        let empty = FontBook::new();
        let mut renderer = PdfRenderer::new(Pt(100.0), Pt(100.0), &empty);
        let err = renderer
            .draw_text_line("A-1", Pt(0.0), Pt(0.0), &FontSpec::new("Helvetica", Pt(7.0)))
            .unwrap_err();
        assert!(matches!(err, LabelError::MissingFont(family) if family == "Helvetica"));
    }

    #[test]
    fn shared_images_are_loaded_once() {
        let fonts = book();
        let mut renderer = PdfRenderer::new(Pt(100.0), Pt(100.0), &fonts);
        let handle = png_handle("A-1");
        renderer
            .place_image(&handle, Pt(0.0), Pt(0.0), Pt(10.0), Pt(10.0))
            .unwrap();
        renderer.start_new_page().unwrap();
        renderer
            .place_image(&handle, Pt(5.0), Pt(5.0), Pt(10.0), Pt(10.0))
            .unwrap();

        assert_eq!(renderer.images.len(), 1);
        assert_eq!(renderer.page_count(), 2);
        assert_eq!(renderer.pages[1].contents.len(), 1);
    }

    #[test]
    fn rotated_text_is_centred_on_its_anchor() {
        let fonts = book();
        let mut renderer = PdfRenderer::new(Pt(100.0), Pt(100.0), &fonts);
        let spec = FontSpec::new("Helvetica", Pt(10.0));
        renderer
            .draw_rotated_text("$5.00", Pt(50.0), Pt(40.0), 90.0, &spec)
            .unwrap();

        let width = fonts.require("Helvetica").unwrap().1.width_of("$5.00", Pt(10.0));
        match &renderer.pages[0].contents[0] {
            PageContents::Text(span) => {
                assert!(span.coords.0.approx_eq(Pt(-width.0 / 2.0), 1e-9));
                assert!(span.coords.1.approx_eq(Pt(-5.0), 1e-9));
                let transform = span.transform.unwrap();
                assert!((transform.e - 50.0).abs() < 1e-4);
                assert!((transform.f - 40.0).abs() < 1e-4);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn writes_a_pdf_with_only_used_fonts() {
        let mut fonts = book();
        fonts
            .load(
                "Helvetica-Bold",
                include_bytes!("../../assets/DejaVuSans-Bold.ttf").to_vec(),
            )
            .unwrap();
        let mut renderer = PdfRenderer::new(Pt(144.0), Pt(72.0), &fonts);
        renderer
            .draw_text_line("A-1", Pt(2.0), Pt(2.0), &FontSpec::new("Helvetica", Pt(7.0)))
            .unwrap();
        assert_eq!(renderer.used.len(), 1);

        let mut out = Vec::new();
        renderer.write(&mut out).unwrap();
        assert!(out.starts_with(b"%PDF"));
    }
}
