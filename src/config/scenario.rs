use crate::core::report::OutputFormat;
use crate::utils::error::{Result, SubwayError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A line described in TOML: its stations, its sections and an optional list of
/// edits replayed after the sections are in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineConfig {
    pub line: LineSettings,
    pub stations: Vec<StationConfig>,
    pub sections: Vec<SectionConfig>,
    #[serde(default)]
    pub operations: Vec<Operation>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSettings {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SectionConfig {
    pub up: u64,
    pub down: u64,
    pub distance: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    AddSection { up: u64, down: u64, distance: i64 },
    RemoveStation { station: u64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<String>,
}

impl LineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed)?)
    }

    /// Replaces `${VAR}` with the environment value, leaving unknown names as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SubwayError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("line.name", &self.line.name)?;
        validation::validate_non_empty_list("stations", &self.stations)?;
        validation::validate_non_empty_list("sections", &self.sections)?;
        validation::validate_unique("stations.id", self.stations.iter().map(|s| s.id))?;

        for (index, station) in self.stations.iter().enumerate() {
            validation::validate_non_empty_string(&format!("stations[{}].name", index), &station.name)?;
        }

        let declared: HashSet<u64> = self.stations.iter().map(|s| s.id).collect();
        let check_station = |field: String, id: u64| -> Result<()> {
            if declared.contains(&id) {
                Ok(())
            } else {
                Err(SubwayError::InvalidConfigValueError {
                    field,
                    value: id.to_string(),
                    reason: "Station is not declared in [[stations]]".to_string(),
                })
            }
        };

        for (index, section) in self.sections.iter().enumerate() {
            check_station(format!("sections[{}].up", index), section.up)?;
            check_station(format!("sections[{}].down", index), section.down)?;
            validation::validate_positive_number(
                &format!("sections[{}].distance", index),
                section.distance,
                1,
            )?;
        }

        for (index, operation) in self.operations.iter().enumerate() {
            match *operation {
                Operation::AddSection { up, down, distance } => {
                    check_station(format!("operations[{}].up", index), up)?;
                    check_station(format!("operations[{}].down", index), down)?;
                    validation::validate_positive_number(
                        &format!("operations[{}].distance", index),
                        distance,
                        1,
                    )?;
                }
                Operation::RemoveStation { station } => {
                    check_station(format!("operations[{}].station", index), station)?;
                }
            }
        }

        if let Some(format) = self.output.as_ref().and_then(|o| o.format.as_deref()) {
            validation::validate_one_of(
                "output.format",
                &format.to_ascii_lowercase(),
                &OutputFormat::NAMES,
            )?;
        }

        Ok(())
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        match self.output.as_ref().and_then(|o| o.format.as_deref()) {
            Some(format) => format.parse(),
            None => Ok(OutputFormat::default()),
        }
    }

    pub fn color(&self) -> &str {
        self.line.color.as_deref().unwrap_or("")
    }
}

impl Validate for LineConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
