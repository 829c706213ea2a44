//! Charts module - chart requests, styles and PNG rendering

mod renderer;
mod request;
mod style;

pub use renderer::{
    BoxError, ChartError, ChartRenderer, RenderedPlot, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
pub use request::{ChartKind, ChartRequest, ChartType};
pub use style::{PlotStyle, Theme, UnknownStyle};
