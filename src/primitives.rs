//! Renderer-neutral drawing commands.
//!
//! All coordinates are PDF points with the origin at the bottom-left of the
//! page; `y` for text is the baseline.

use crate::qr::ImageHandle;
use crate::units::Pt;
use crate::LabelError;

/// A font family at a size
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: Pt,
}

impl FontSpec {
    pub fn new<S: ToString>(family: S, size: Pt) -> FontSpec {
        FontSpec {
            family: family.to_string(),
            size,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawPrimitive {
    /// Draw an image with its lower-left corner at `x`, `y`
    PlaceImage {
        image: ImageHandle,
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
    },
    /// A single line of text starting at `x` on the baseline `y`
    TextLine {
        text: String,
        x: Pt,
        y: Pt,
        font: FontSpec,
    },
    /// Text centred on (`center_x`, `center_y`) after rotating counter-clockwise
    /// about that point
    RotatedText {
        text: String,
        center_x: Pt,
        center_y: Pt,
        angle_degrees: f64,
        font: FontSpec,
    },
    /// Finish the current page and start a fresh one
    NewPage,
}

/// A drawing surface primitives can be replayed onto
pub trait Renderer {
    fn place_image(
        &mut self,
        image: &ImageHandle,
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
    ) -> Result<(), LabelError>;

    fn draw_text_line(&mut self, text: &str, x: Pt, y: Pt, font: &FontSpec)
        -> Result<(), LabelError>;

    fn draw_rotated_text(
        &mut self,
        text: &str,
        center_x: Pt,
        center_y: Pt,
        angle_degrees: f64,
        font: &FontSpec,
    ) -> Result<(), LabelError>;

    fn start_new_page(&mut self) -> Result<(), LabelError>;
}

impl DrawPrimitive {
    /// Replay this primitive onto `renderer`
    pub fn apply<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), LabelError> {
        match self {
            DrawPrimitive::PlaceImage {
                image,
                x,
                y,
                width,
                height,
            } => renderer.place_image(image, *x, *y, *width, *height),
            DrawPrimitive::TextLine { text, x, y, font } => {
                renderer.draw_text_line(text, *x, *y, font)
            }
            DrawPrimitive::RotatedText {
                text,
                center_x,
                center_y,
                angle_degrees,
                font,
            } => renderer.draw_rotated_text(text, *center_x, *center_y, *angle_degrees, font),
            DrawPrimitive::NewPage => renderer.start_new_page(),
        }
    }
}

/// Records primitives in order instead of drawing them
impl Renderer for Vec<DrawPrimitive> {
    fn place_image(
        &mut self,
        image: &ImageHandle,
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
    ) -> Result<(), LabelError> {
        self.push(DrawPrimitive::PlaceImage {
            image: image.clone(),
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
        self.push(DrawPrimitive::TextLine {
            text: text.to_string(),
            x,
            y,
            font: font.clone(),
        });
        Ok(())
    }

    fn draw_rotated_text(
        &mut self,
        text: &str,
        center_x: Pt,
        center_y: Pt,
        angle_degrees: f64,
        font: &FontSpec,
    ) -> Result<(), LabelError> {
        self.push(DrawPrimitive::RotatedText {
            text: text.to_string(),
            center_x,
            center_y,
            angle_degrees,
            font: font.clone(),
        });
        Ok(())
    }

    fn start_new_page(&mut self) -> Result<(), LabelError> {
        self.push(DrawPrimitive::NewPage);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaying_onto_a_recorder_is_lossless() {
        let primitives = vec![
            DrawPrimitive::TextLine {
                text: "A-1".into(),
                x: Pt(1.0),
                y: Pt(2.0),
                font: FontSpec::new("Helvetica", Pt(7.0)),
            },
            DrawPrimitive::NewPage,
            DrawPrimitive::RotatedText {
                text: "$1.00".into(),
                center_x: Pt(3.0),
                center_y: Pt(4.0),
                angle_degrees: 90.0,
                font: FontSpec::new("Helvetica-Bold", Pt(10.0)),
            },
        ];

        let mut recorded: Vec<DrawPrimitive> = Vec::new();
        for primitive in &primitives {
            primitive.apply(&mut recorded).unwrap();
        }
        assert_eq!(recorded, primitives);
    }
}
