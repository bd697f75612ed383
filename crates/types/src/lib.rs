pub mod color;
pub mod geometry;
pub mod ids;
pub mod page;

pub use color::Color;
pub use geometry::{Point, Rect, Size};
pub use ids::{AnchorName, FontId, ImageId};
pub use page::{Margins, Orientation, PageSize};
