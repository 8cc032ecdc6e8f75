pub mod board;
pub mod presenter;
pub mod source;

pub use board::{AnomalyDistribution, Dashboard};
pub use presenter::{present, ChannelSeries, ChartPoint, DashboardSnapshot, WindowSummary};
pub use source::{DataSource, SourceKind};
