use crate::core::line::Line;
use crate::domain::model::{LineId, Station, StationId};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persistence for lines and the section chains they own.
///
/// `find` hands out an owned copy; nothing is stored until `save` is called,
/// so a failed chain mutation never reaches storage.
#[async_trait]
pub trait LineRepository: Send + Sync {
    async fn next_id(&self) -> Result<LineId>;
    async fn find(&self, id: LineId) -> Result<Option<Line>>;
    async fn save(&self, line: Line) -> Result<()>;
    async fn delete(&self, id: LineId) -> Result<bool>;
}

#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn find(&self, id: StationId) -> Result<Option<Station>>;
    async fn save(&self, station: Station) -> Result<()>;
}
