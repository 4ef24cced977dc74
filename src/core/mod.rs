pub mod colormap;
pub mod grid;
pub mod histogram;
pub mod layout;
pub mod projection;
pub mod scale;
pub mod types;

pub use colormap::{Colormap, ColormapFamily, category_color};
pub use grid::StructuredGrid;
pub use histogram::{HistogramBin, bin_equal_width};
pub use layout::{LayoutSeedPolicy, SpringLayoutParams, spring_layout};
pub use projection::{Camera, CubeNormalizer, Projected};
pub use scale::{LinearScale, format_tick, nice_ticks};
pub use types::{DataPoint, Extent, Point3, Viewport};
