//! Tweet Pulse - Common Types & Logic

pub mod color;
pub mod config;
pub mod layout;
pub mod live;
pub mod window;

pub use color::{colors, Color};
pub use config::{ChartConfig, ChartKind};
pub use layout::{ChartLayout, Padding, PlotArea, PlotPoint, Tick};
pub use live::{ConnectionState, FrameError, Notice, ValueFrame, WsCommand};
pub use window::SampleWindow;
