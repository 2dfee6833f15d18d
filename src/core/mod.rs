pub mod line;
pub mod replay;
pub mod report;
pub mod sections;
pub mod service;

pub use crate::domain::model::{Distance, LineId, Section, Station, StationId};
pub use crate::domain::ports::{LineRepository, StationRepository};
pub use crate::utils::error::Result;
