//! PDF output for label sheets.
//!
//! [PdfRenderer] is a [crate::Renderer] that draws onto pages of a fixed size and
//! writes them out with [pdf_writer]. Fonts are TrueType / OpenType faces registered
//! in a [FontBook] under the family names label types refer to.

mod content;
mod document;
mod font;
mod image;
mod info;
mod page;
mod refs;
mod transform;

pub use document::*;
pub use font::{Font, FontBook};
pub use info::Info;
pub use transform::Transform;
