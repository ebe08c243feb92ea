//! Page contents to PDF content stream operators.

use super::page::{ImageLayout, PageContents, SpanLayout};
use std::io::Write;

#[allow(clippy::write_with_newline)]
pub(crate) fn render_contents(contents: &[PageContents]) -> Result<Vec<u8>, std::io::Error> {
    let mut content: Vec<u8> = Vec::default();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(span) => render_span(&mut content, span)?,
            PageContents::Image(image) => render_image(&mut content, image)?,
        }
    }

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_span(content: &mut Vec<u8>, span: &SpanLayout) -> Result<(), std::io::Error> {
    if span.glyphs.is_empty() {
        return Ok(());
    }

    write!(content, "q\n")?;
    if let Some(t) = &span.transform {
        write!(content, "{} {} {} {} {} {} cm\n", t.a, t.b, t.c, t.d, t.e, t.f)?;
    }
    write!(content, "BT\n")?;
    write!(content, "/F{} {} Tf\n", span.font.id.index(), span.font.size.0 as f32)?;
    write!(content, "{} {} Td\n", span.coords.0 .0 as f32, span.coords.1 .0 as f32)?;
    write!(content, "<")?;
    for glyph in span.glyphs.iter() {
        write!(content, "{glyph:04x}")?;
    }
    write!(content, "> Tj\n")?;
    write!(content, "ET\n")?;
    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn render_image(content: &mut Vec<u8>, image: &ImageLayout) -> Result<(), std::io::Error> {
    write!(content, "q\n")?;
    write!(
        content,
        "{} 0 0 {} {} {} cm\n",
        image.width.0 as f32, image.height.0 as f32, image.x.0 as f32, image.y.0 as f32
    )?;
    write!(content, "/I{} Do\n", image.image.index())?;
    write!(content, "Q\n")?;
    Ok(())
}
