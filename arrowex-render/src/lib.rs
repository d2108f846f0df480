pub mod chart;
pub mod render;
pub mod text;

pub use chart::{render_chart, ChartView};
pub use render::{FrameStats, SkiaRenderer};
pub use text::{load_font, render_text_pixmap, LabelCache};
