use crate::core::sections::Sections;
use crate::domain::model::{LineId, Section, Station};
use crate::utils::error::Result;

/// A subway line and the section chain it owns.
///
/// A line always starts life with one section; the chain manager refuses to
/// remove the last one, so a stored line never has an empty chain.
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    name: String,
    color: String,
    sections: Sections,
}

impl Line {
    pub fn new(
        id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
        first: Section,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            sections: Sections::from_sections([first]),
        }
    }

    /// Reassembles a line loaded from storage.
    pub fn with_sections(
        id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
        sections: Sections,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            sections,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn add_section(&mut self, section: Section) -> Result<()> {
        self.sections.add_section(section)
    }

    pub fn remove_station(&mut self, station: &Station) -> Result<()> {
        self.sections.delete_section(station)
    }

    pub fn stations(&self) -> Result<Vec<Station>> {
        self.sections.all_stations()
    }
}
