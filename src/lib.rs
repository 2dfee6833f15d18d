pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::memory::{InMemoryLineRepository, InMemoryStationRepository};
pub use config::scenario::LineConfig;
pub use crate::core::{
    line::Line,
    replay::ScenarioRunner,
    report::{OutputFormat, StationReport},
    sections::Sections,
    service::LineService,
};
pub use domain::model::{Distance, LineId, Section, Station, StationId};
pub use utils::error::{Result, SubwayError};
