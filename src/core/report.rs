use crate::core::line::Line;
use crate::domain::model::Station;
use crate::utils::error::{Result, SubwayError};
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 3] = ["text", "json", "csv"];
}

impl FromStr for OutputFormat {
    type Err = SubwayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(SubwayError::InvalidConfigValueError {
                field: "output.format".to_string(),
                value: other.to_string(),
                reason: format!("Valid formats: {}", Self::NAMES.join(", ")),
            }),
        }
    }
}

/// Ordered station listing of one line, ready to print.
#[derive(Debug, Clone, Serialize)]
pub struct StationReport {
    pub line: String,
    pub color: String,
    pub section_count: usize,
    pub stations: Vec<Station>,
}

impl StationReport {
    pub fn from_line(line: &Line) -> Result<Self> {
        Ok(Self {
            line: line.name().to_string(),
            color: line.color().to_string(),
            section_count: line.sections().len(),
            stations: line.stations()?,
        })
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Csv => self.to_csv(),
        }
    }

    fn to_text(&self) -> String {
        let mut out = format!("{} ({} sections)\n", self.line, self.section_count);
        for (position, station) in self.stations.iter().enumerate() {
            let _ = writeln!(out, "{:>3}. {}", position + 1, station.name);
        }
        out
    }

    fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["position", "station_id", "station_name"])?;
        for (position, station) in self.stations.iter().enumerate() {
            writer.write_record([
                (position + 1).to_string(),
                station.id.0.to_string(),
                station.name.clone(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| SubwayError::IoError(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| SubwayError::ConfigValidationError {
            field: "output".to_string(),
            message: format!("CSV output is not valid UTF-8: {}", e),
        })
    }
}
