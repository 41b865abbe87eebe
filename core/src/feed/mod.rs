pub mod layer;
pub mod marker;
pub mod renderer;
pub mod timestamp;

pub use layer::{Layer, LayerKind, LayerSet};
pub use marker::{format_confidence, Marker, MarkerStyle, Popup, Rgb};
pub use renderer::{FeedRenderer, RefreshStatus};
pub use timestamp::{DisplayZone, TimestampFormatter};
