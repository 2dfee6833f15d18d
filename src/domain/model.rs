use crate::utils::error::{Result, SubwayError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::NonZeroU32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u64);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line#{}", self.0)
    }
}

/// A stop on a line. Two stations are the same station iff their ids match;
/// the name is display data only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

impl Station {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: StationId(id),
            name: name.into(),
        }
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Length of a section. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Distance(NonZeroU32);

impl Distance {
    pub fn new(value: i64) -> Result<Self> {
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(SubwayError::InvalidDistance { value })
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn checked_add(self, other: Distance) -> Result<Distance> {
        self.0
            .checked_add(other.get())
            .map(Self)
            .ok_or(SubwayError::DistanceOverflow)
    }
}

impl TryFrom<i64> for Distance {
    type Error = SubwayError;

    fn try_from(value: i64) -> Result<Self> {
        Distance::new(value)
    }
}

impl From<Distance> for u32 {
    fn from(distance: Distance) -> Self {
        distance.get()
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed edge between two adjacent stations of a line.
///
/// Endpoints and distance are only rewritten by [`crate::core::sections::Sections`]
/// while splitting or merging, which is why the fields are crate-private.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub(crate) up_station: Station,
    pub(crate) down_station: Station,
    pub(crate) distance: Distance,
}

impl Section {
    pub fn new(up_station: Station, down_station: Station, distance: i64) -> Result<Self> {
        if up_station == down_station {
            return Err(SubwayError::IdenticalEndpoints {
                station: up_station.to_string(),
            });
        }

        Ok(Self {
            up_station,
            down_station,
            distance: Distance::new(distance)?,
        })
    }

    pub fn up_station(&self) -> &Station {
        &self.up_station
    }

    pub fn down_station(&self) -> &Station {
        &self.down_station
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    pub fn is_up_station(&self, station: &Station) -> bool {
        self.up_station == *station
    }

    pub fn is_down_station(&self, station: &Station) -> bool {
        self.down_station == *station
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({})",
            self.up_station.name, self.down_station.name, self.distance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_equality_ignores_name() {
        assert_eq!(Station::new(1, "Gangnam"), Station::new(1, "Gangnam Stn."));
        assert_ne!(Station::new(1, "Gangnam"), Station::new(2, "Gangnam"));
    }

    #[test]
    fn test_distance_rejects_non_positive() {
        assert!(matches!(
            Distance::new(0),
            Err(SubwayError::InvalidDistance { value: 0 })
        ));
        assert!(Distance::new(-4).is_err());
        assert!(Distance::new(i64::from(u32::MAX) + 1).is_err());
        assert_eq!(Distance::new(7).unwrap().get(), 7);
    }

    #[test]
    fn test_distance_checked_add() {
        let a = Distance::new(3).unwrap();
        let b = Distance::new(4).unwrap();
        assert_eq!(a.checked_add(b).unwrap().get(), 7);

        let max = Distance::new(i64::from(u32::MAX)).unwrap();
        assert!(matches!(
            max.checked_add(a),
            Err(SubwayError::DistanceOverflow)
        ));
    }

    #[test]
    fn test_section_rejects_loop() {
        let a = Station::new(1, "A");
        let err = Section::new(a.clone(), a, 5).unwrap_err();
        assert!(matches!(err, SubwayError::IdenticalEndpoints { .. }));
    }

    #[test]
    fn test_distance_deserializes_with_validation() {
        let ok: Distance = serde_json::from_str("12").unwrap();
        assert_eq!(ok.get(), 12);
        assert!(serde_json::from_str::<Distance>("0").is_err());
    }
}
