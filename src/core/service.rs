use crate::core::line::Line;
use crate::domain::model::{LineId, Section, Station, StationId};
use crate::domain::ports::{LineRepository, StationRepository};
use crate::utils::error::{Result, SubwayError};
use tokio::sync::Mutex;

/// Line management commands, one load/mutate/save cycle each.
///
/// The line is loaded as an owned copy and only written back after the chain
/// operation succeeded, so a rejected command leaves storage untouched.
/// Mutating commands hold `writer` for the whole cycle; the chain itself has no
/// synchronisation of its own.
pub struct LineService<L: LineRepository, S: StationRepository> {
    lines: L,
    stations: S,
    writer: Mutex<()>,
}

impl<L: LineRepository, S: StationRepository> LineService<L, S> {
    pub fn new(lines: L, stations: S) -> Self {
        Self {
            lines,
            stations,
            writer: Mutex::new(()),
        }
    }

    pub fn lines(&self) -> &L {
        &self.lines
    }

    pub fn stations(&self) -> &S {
        &self.stations
    }

    pub async fn create_line(
        &self,
        name: &str,
        color: &str,
        up: StationId,
        down: StationId,
        distance: i64,
    ) -> Result<LineId> {
        let first = self.section(up, down, distance).await?;
        let _guard = self.writer.lock().await;
        let id = self.lines.next_id().await?;
        tracing::info!("Creating {} '{}' with first section {}", id, name, first);

        self.lines.save(Line::new(id, name, color, first)).await?;
        Ok(id)
    }

    pub async fn add_section(
        &self,
        line_id: LineId,
        up: StationId,
        down: StationId,
        distance: i64,
    ) -> Result<()> {
        let _guard = self.writer.lock().await;
        let mut line = self.load(line_id).await?;
        let section = self.section(up, down, distance).await?;
        tracing::info!("Adding section {} to {}", section, line_id);

        line.add_section(section)?;
        self.lines.save(line).await
    }

    pub async fn remove_station(&self, line_id: LineId, station_id: StationId) -> Result<()> {
        let _guard = self.writer.lock().await;
        let mut line = self.load(line_id).await?;
        let station = self.station(station_id).await?;
        tracing::info!("Removing {} from {}", station, line_id);

        line.remove_station(&station)?;
        self.lines.save(line).await
    }

    pub async fn line_stations(&self, line_id: LineId) -> Result<Vec<Station>> {
        self.load(line_id).await?.stations()
    }

    pub async fn line(&self, line_id: LineId) -> Result<Line> {
        self.load(line_id).await
    }

    /// Deleting a whole line is the only way to drop its last section.
    pub async fn delete_line(&self, line_id: LineId) -> Result<()> {
        let _guard = self.writer.lock().await;
        if !self.lines.delete(line_id).await? {
            return Err(SubwayError::LineNotFound {
                line: line_id.to_string(),
            });
        }
        tracing::info!("Deleted {}", line_id);
        Ok(())
    }

    async fn load(&self, line_id: LineId) -> Result<Line> {
        self.lines
            .find(line_id)
            .await?
            .ok_or_else(|| SubwayError::LineNotFound {
                line: line_id.to_string(),
            })
    }

    async fn station(&self, id: StationId) -> Result<Station> {
        self.stations
            .find(id)
            .await?
            .ok_or_else(|| SubwayError::StationNotFound {
                station: id.to_string(),
            })
    }

    async fn section(&self, up: StationId, down: StationId, distance: i64) -> Result<Section> {
        let up = self.station(up).await?;
        let down = self.station(down).await?;
        Section::new(up, down, distance)
    }
}
