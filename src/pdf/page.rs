use super::content::render_contents;
use super::font::Font;
use super::image::Image;
use super::transform::Transform;
use crate::units::Pt;
use id_arena::Id;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Name, Pdf, Rect, Ref};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: Pt,
}

/// A run of glyphs starting at `coords`, optionally drawn in a transformed frame
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub glyphs: Vec<u16>,
    pub font: SpanFont,
    pub coords: (Pt, Pt),
    pub transform: Option<Transform>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image: Id<Image>,
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub height: Pt,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(SpanLayout),
    Image(ImageLayout),
}

/// Resources a page's content stream can refer to, by resource index
pub(crate) struct PageResources<'a> {
    pub parent: Ref,
    pub fonts: &'a [(usize, Ref)],
    pub images: &'a [(usize, Ref)],
}

#[derive(Default)]
pub struct Page {
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn add_span(&mut self, span: SpanLayout) {
        self.contents.push(PageContents::Text(span));
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(PageContents::Image(image));
    }

    pub(crate) fn write(
        &self,
        id: Ref,
        content_id: Ref,
        media_box: Rect,
        resources: &PageResources<'_>,
        writer: &mut Pdf,
    ) -> Result<(), std::io::Error> {
        let mut page = writer.page(id);
        page.media_box(media_box);
        page.parent(resources.parent);

        let mut page_resources = page.resources();
        let mut resource_fonts = page_resources.fonts();
        for (i, font_ref) in resources.fonts {
            resource_fonts.pair(Name(format!("F{i}").as_bytes()), *font_ref);
        }
        resource_fonts.finish();
        let mut resource_xobjects = page_resources.x_objects();
        for (i, image_ref) in resources.images {
            resource_xobjects.pair(Name(format!("I{i}").as_bytes()), *image_ref);
        }
        resource_xobjects.finish();
        page_resources.finish();

        page.contents(content_id);
        page.finish();

        let rendered = render_contents(&self.contents)?;
        let compressed = compress_to_vec_zlib(&rendered, CompressionLevel::DefaultLevel as u8);
        writer
            .stream(content_id, compressed.as_slice())
            .filter(Filter::FlateDecode);
        Ok(())
    }
}
