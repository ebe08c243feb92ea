//! Where labels go on a sheet, and where each label's elements go.
//!
//! - [GridGeometry] spreads a label type's rows and columns evenly over the
//!   usable page area, and [plan] walks every copy of every record across pages.
//! - [LabelPlacer] turns one placed copy into drawing primitives.
//! - [wrap_text] and [fit_font_size] fit text into the room a label leaves it,
//!   using any [TextMeasure].

mod grid;
mod margins;
mod placer;
mod text;

pub use grid::*;
pub use margins::*;
pub use placer::*;
pub use text::*;
