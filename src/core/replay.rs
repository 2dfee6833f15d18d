use crate::config::scenario::{LineConfig, Operation};
use crate::core::report::StationReport;
use crate::core::service::LineService;
use crate::domain::model::{LineId, Station, StationId};
use crate::domain::ports::{LineRepository, StationRepository};
use crate::utils::error::{Result, SubwayError};

/// Drives a [`LineConfig`] through a [`LineService`].
pub struct ScenarioRunner<L: LineRepository, S: StationRepository> {
    service: LineService<L, S>,
}

impl<L: LineRepository, S: StationRepository> ScenarioRunner<L, S> {
    pub fn new(service: LineService<L, S>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &LineService<L, S> {
        &self.service
    }

    /// Registers the stations, creates the line from its first section, adds
    /// the remaining sections and applies the operations in order. Stops at the
    /// first rejected step.
    pub async fn run(&self, config: &LineConfig) -> Result<StationReport> {
        for station in &config.stations {
            self.service
                .stations()
                .save(Station::new(station.id, station.name.clone()))
                .await?;
        }
        tracing::info!("Registered {} stations", config.stations.len());

        let (first, rest) = config
            .sections
            .split_first()
            .ok_or_else(|| SubwayError::MissingConfigError {
                field: "sections".to_string(),
            })?;

        let line_id = self
            .service
            .create_line(
                &config.line.name,
                config.color(),
                StationId(first.up),
                StationId(first.down),
                first.distance,
            )
            .await?;

        for section in rest {
            self.service
                .add_section(
                    line_id,
                    StationId(section.up),
                    StationId(section.down),
                    section.distance,
                )
                .await?;
        }

        for (index, operation) in config.operations.iter().enumerate() {
            tracing::debug!("Applying operation {}: {:?}", index, operation);
            self.apply(line_id, *operation).await?;
        }

        let line = self.service.line(line_id).await?;
        let report = StationReport::from_line(&line)?;
        tracing::info!(
            "Line '{}' has {} stations over {} sections",
            report.line,
            report.stations.len(),
            report.section_count
        );
        Ok(report)
    }

    async fn apply(&self, line_id: LineId, operation: Operation) -> Result<()> {
        match operation {
            Operation::AddSection { up, down, distance } => {
                self.service
                    .add_section(line_id, StationId(up), StationId(down), distance)
                    .await
            }
            Operation::RemoveStation { station } => {
                self.service
                    .remove_station(line_id, StationId(station))
                    .await
            }
        }
    }
}
