#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod palette;
pub mod render;
pub mod repo;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use ir::{Adjacency, ChangeStats, Commit, History};
pub use layout::{Connector, ConnectorPath, Layout, RouteKind, TurnSide, compute_layout};
pub use render::render_svg;
pub use repo::{GitSource, HistorySource, JsonSource, RepoError};
pub use theme::Theme;
