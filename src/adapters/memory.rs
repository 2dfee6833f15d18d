use crate::core::line::Line;
use crate::domain::model::{LineId, Station, StationId};
use crate::domain::ports::{LineRepository, StationRepository};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryLineRepository {
    lines: RwLock<HashMap<LineId, Line>>,
    sequence: AtomicU64,
}

impl InMemoryLineRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.lines.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.lines.read().await.is_empty()
    }
}

#[async_trait]
impl LineRepository for InMemoryLineRepository {
    async fn next_id(&self) -> Result<LineId> {
        Ok(LineId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1))
    }

    async fn find(&self, id: LineId) -> Result<Option<Line>> {
        Ok(self.lines.read().await.get(&id).cloned())
    }

    async fn save(&self, line: Line) -> Result<()> {
        tracing::debug!("Storing {} with {} sections", line.id(), line.sections().len());
        self.lines.write().await.insert(line.id(), line);
        Ok(())
    }

    async fn delete(&self, id: LineId) -> Result<bool> {
        Ok(self.lines.write().await.remove(&id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStationRepository {
    stations: RwLock<HashMap<StationId, Station>>,
}

impl InMemoryStationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stations(stations: impl IntoIterator<Item = Station>) -> Self {
        let stations = stations.into_iter().map(|s| (s.id, s)).collect();
        Self {
            stations: RwLock::new(stations),
        }
    }
}

#[async_trait]
impl StationRepository for InMemoryStationRepository {
    async fn find(&self, id: StationId) -> Result<Option<Station>> {
        Ok(self.stations.read().await.get(&id).cloned())
    }

    async fn save(&self, station: Station) -> Result<()> {
        self.stations.write().await.insert(station.id, station);
        Ok(())
    }
}
