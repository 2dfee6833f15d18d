//! The section chain of a single line.
//!
//! Sections live in an arena keyed by [`SectionId`]. Ids are handed out in
//! increasing order and never reused, so iterating the arena yields sections in
//! insertion order. Two indexes map a station to the sections starting and ending
//! there; "the" section for an endpoint is always the lowest id in its set, which
//! keeps lookups identical to a first-match scan over the stored sections.

use crate::domain::model::{Section, Station, StationId};
use crate::utils::error::{Result, SubwayError};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(u64);

type StationIndex = HashMap<StationId, BTreeSet<SectionId>>;

fn first_id(index: &StationIndex, station: &Station) -> Option<SectionId> {
    index
        .get(&station.id)
        .and_then(|ids| ids.first())
        .copied()
}

fn link(index: &mut StationIndex, station: &Station, id: SectionId) {
    index.entry(station.id).or_default().insert(id);
}

fn unlink(index: &mut StationIndex, station: &Station, id: SectionId) {
    if let Some(ids) = index.get_mut(&station.id) {
        ids.remove(&id);
        if ids.is_empty() {
            index.remove(&station.id);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sections {
    arena: BTreeMap<SectionId, Section>,
    by_up: StationIndex,
    by_down: StationIndex,
    next_id: u64,
}

impl Sections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a chain from stored sections, in their stored order.
    ///
    /// No invariant is checked here: a malformed chain surfaces later as
    /// `FirstSectionNotFound` or `CycleDetected` from [`Sections::all_stations`].
    pub fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        let mut chain = Self::new();
        for section in sections {
            chain.push(section);
        }
        chain
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Sections in storage order, which is not necessarily path order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.arena.values()
    }

    pub fn section_from_up_station(&self, station: &Station) -> Option<&Section> {
        first_id(&self.by_up, station).and_then(|id| self.arena.get(&id))
    }

    pub fn section_from_down_station(&self, station: &Station) -> Option<&Section> {
        first_id(&self.by_down, station).and_then(|id| self.arena.get(&id))
    }

    /// True when the section's up-station starts the whole line.
    pub fn is_first_station_from(&self, section: &Section) -> bool {
        let station = section.up_station();
        self.by_up.contains_key(&station.id) && !self.by_down.contains_key(&station.id)
    }

    /// True when the section's down-station ends the whole line.
    pub fn is_last_station_from(&self, section: &Section) -> bool {
        let station = section.down_station();
        !self.by_up.contains_key(&station.id) && self.by_down.contains_key(&station.id)
    }

    /// Adds a section to the chain.
    ///
    /// When a stored section already ends at the new section's down-station, the
    /// new section is placed in front of that station: the stored section must be
    /// strictly longer, and its up-station is moved to the new up-station. Its
    /// distance is kept as is. Sections are only ever matched on the down-station.
    pub fn add_section(&mut self, section: Section) -> Result<()> {
        if let Some(id) = first_id(&self.by_down, section.down_station()) {
            if let Some(existing) = self.arena.get_mut(&id) {
                if existing.distance <= section.distance {
                    return Err(SubwayError::InsufficientSplitDistance {
                        existing: existing.distance.get(),
                        requested: section.distance.get(),
                    });
                }

                let previous_up =
                    std::mem::replace(&mut existing.up_station, section.up_station.clone());
                tracing::debug!(
                    "Split {}: up-station moved from {} to {}",
                    existing,
                    previous_up,
                    section.up_station
                );
                unlink(&mut self.by_up, &previous_up, id);
                link(&mut self.by_up, &section.up_station, id);
            }
        }

        tracing::debug!("Adding section {}", section);
        self.push(section);
        Ok(())
    }

    /// Ordered stations from the start of the line to its end.
    pub fn all_stations(&self) -> Result<Vec<Station>> {
        let first = self
            .find_first_section()
            .ok_or(SubwayError::FirstSectionNotFound)?;

        let mut stations = vec![first.up_station.clone(), first.down_station.clone()];
        let mut visited: HashSet<StationId> = stations.iter().map(|s| s.id).collect();
        let mut current = &first.down_station;

        while let Some(next) = self.section_from_up_station(current) {
            if !visited.insert(next.down_station.id) {
                return Err(SubwayError::CycleDetected {
                    station: next.down_station.to_string(),
                });
            }
            tracing::trace!("Visiting {}", next);
            stations.push(next.down_station.clone());
            current = &next.down_station;
        }

        Ok(stations)
    }

    /// Removes a station from the line.
    ///
    /// A terminal station takes its only section with it. An interior station
    /// joins its two sections: the section leaving the station is stretched back
    /// to where the section entering it started, with both distances added, and
    /// the entering section is dropped.
    pub fn delete_section(&mut self, station: &Station) -> Result<()> {
        if self.len() <= 1 {
            return Err(SubwayError::SingleSectionDeletionDenied);
        }

        let outbound = first_id(&self.by_up, station);
        let inbound = first_id(&self.by_down, station);

        if let Some(id) = outbound {
            if self
                .arena
                .get(&id)
                .is_some_and(|section| self.is_first_station_from(section))
            {
                tracing::debug!("Removing first station {}", station);
                self.remove(id);
                return Ok(());
            }
        }

        if let Some(id) = inbound {
            if self
                .arena
                .get(&id)
                .is_some_and(|section| self.is_last_station_from(section))
            {
                tracing::debug!("Removing last station {}", station);
                self.remove(id);
                return Ok(());
            }
        }

        let not_found = || SubwayError::SectionNotFound {
            station: station.to_string(),
        };
        let inbound_id = inbound.ok_or_else(not_found)?;
        let outbound_id = outbound.ok_or_else(not_found)?;

        let entering = self.arena.get(&inbound_id).cloned().ok_or_else(not_found)?;
        let leaving = self.arena.get_mut(&outbound_id).ok_or_else(not_found)?;
        let merged_distance = leaving.distance.checked_add(entering.distance)?;

        let previous_up = std::mem::replace(&mut leaving.up_station, entering.up_station.clone());
        leaving.distance = merged_distance;
        tracing::debug!("Merged sections around {} into {}", station, leaving);

        unlink(&mut self.by_up, &previous_up, outbound_id);
        self.remove(inbound_id);
        link(&mut self.by_up, &entering.up_station, outbound_id);
        Ok(())
    }

    fn find_first_section(&self) -> Option<&Section> {
        self.arena
            .values()
            .find(|section| !self.by_down.contains_key(&section.up_station.id))
    }

    fn push(&mut self, section: Section) {
        let id = SectionId(self.next_id);
        self.next_id += 1;
        link(&mut self.by_up, &section.up_station, id);
        link(&mut self.by_down, &section.down_station, id);
        self.arena.insert(id, section);
    }

    fn remove(&mut self, id: SectionId) -> Option<Section> {
        let section = self.arena.remove(&id)?;
        unlink(&mut self.by_up, &section.up_station, id);
        unlink(&mut self.by_down, &section.down_station, id);
        Some(section)
    }
}

impl FromIterator<Section> for Sections {
    fn from_iter<T: IntoIterator<Item = Section>>(iter: T) -> Self {
        Self::from_sections(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: u64, name: &str) -> Station {
        Station::new(id, name)
    }

    fn section(up: &Station, down: &Station, distance: i64) -> Section {
        Section::new(up.clone(), down.clone(), distance).unwrap()
    }

    fn names(stations: &[Station]) -> Vec<&str> {
        stations.iter().map(|s| s.name.as_str()).collect()
    }

    /// A -5-> B -3-> C
    fn abc() -> (Sections, Station, Station, Station) {
        let (a, b, c) = (station(1, "A"), station(2, "B"), station(3, "C"));
        let mut chain = Sections::new();
        chain.add_section(section(&a, &b, 5)).unwrap();
        chain.add_section(section(&b, &c, 3)).unwrap();
        (chain, a, b, c)
    }

    #[test]
    fn test_empty_chain_has_no_first_section() {
        let chain = Sections::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert!(matches!(
            chain.all_stations(),
            Err(SubwayError::FirstSectionNotFound)
        ));
    }

    #[test]
    fn test_all_stations_follows_path_not_storage_order() {
        let (a, b, c, d) = (
            station(1, "A"),
            station(2, "B"),
            station(3, "C"),
            station(4, "D"),
        );
        let chain = Sections::from_sections(vec![
            section(&c, &d, 2),
            section(&a, &b, 5),
            section(&b, &c, 3),
        ]);

        let stations = chain.all_stations().unwrap();
        assert_eq!(names(&stations), vec!["A", "B", "C", "D"]);
        assert_eq!(stations.len(), chain.len() + 1);
    }

    #[test]
    fn test_endpoint_lookups() {
        let (chain, a, b, c) = abc();

        assert_eq!(chain.section_from_up_station(&a).unwrap().down_station(), &b);
        assert_eq!(chain.section_from_down_station(&c).unwrap().up_station(), &b);
        assert!(chain.section_from_up_station(&c).is_none());
        assert!(chain.section_from_down_station(&a).is_none());

        let first = chain.section_from_up_station(&a).unwrap();
        let last = chain.section_from_down_station(&c).unwrap();
        assert!(chain.is_first_station_from(first));
        assert!(!chain.is_last_station_from(first));
        assert!(chain.is_last_station_from(last));
        assert!(!chain.is_first_station_from(last));
    }

    #[test]
    fn test_split_places_new_up_station_before_shared_down_station() {
        let (mut chain, _a, b, _c) = abc();
        let x = station(9, "X");

        chain.add_section(section(&x, &b, 2)).unwrap();

        assert_eq!(chain.len(), 3);
        let stations = chain.all_stations().unwrap();
        let position_x = stations.iter().position(|s| *s == x).unwrap();
        assert_eq!(stations[position_x + 1], b);
    }

    #[test]
    fn test_split_keeps_existing_distance_and_duplicates_endpoints() {
        // Documents current behaviour: the split section keeps its full
        // distance and ends up with the same endpoints as the new section.
        let (mut chain, a, b, _c) = abc();
        let x = station(9, "X");

        chain.add_section(section(&x, &b, 2)).unwrap();

        assert!(chain.section_from_up_station(&a).is_none());
        let matching: Vec<&Section> = chain
            .iter()
            .filter(|s| s.is_up_station(&x) && s.is_down_station(&b))
            .collect();
        assert_eq!(matching.len(), 2);
        assert_eq!(matching[0].distance().get(), 5);
        assert_eq!(matching[1].distance().get(), 2);
        assert_eq!(names(&chain.all_stations().unwrap()), vec!["X", "B", "C"]);
    }

    #[test]
    fn test_split_requires_strictly_shorter_section() {
        let (mut chain, _a, b, _c) = abc();
        let before = chain.all_stations().unwrap();

        for distance in [5, 8] {
            let err = chain
                .add_section(section(&station(9, "X"), &b, distance))
                .unwrap_err();
            assert!(matches!(
                err,
                SubwayError::InsufficientSplitDistance { existing: 5, .. }
            ));
        }

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.all_stations().unwrap(), before);
    }

    #[test]
    fn test_up_station_match_is_appended_without_split() {
        let (mut chain, a, _b, _c) = abc();
        let d = station(4, "D");

        chain.add_section(section(&a, &d, 2)).unwrap();

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.section_from_up_station(&a).unwrap().distance().get(), 5);
        assert_eq!(names(&chain.all_stations().unwrap()), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_delete_first_and_last_station() {
        let (mut chain, a, _b, c) = abc();
        let d = station(4, "D");
        chain.add_section(section(&c, &d, 4)).unwrap();

        chain.delete_section(&a).unwrap();
        assert_eq!(names(&chain.all_stations().unwrap()), vec!["B", "C", "D"]);

        chain.delete_section(&d).unwrap();
        assert_eq!(names(&chain.all_stations().unwrap()), vec!["B", "C"]);
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_delete_interior_station_merges_sections() {
        let (mut chain, a, b, c) = abc();

        chain.delete_section(&b).unwrap();

        assert_eq!(chain.len(), 1);
        let merged = chain.section_from_up_station(&a).unwrap();
        assert_eq!(merged.down_station(), &c);
        assert_eq!(merged.distance().get(), 8);
        assert!(chain.section_from_up_station(&b).is_none());
        assert!(chain.section_from_down_station(&b).is_none());
        assert_eq!(names(&chain.all_stations().unwrap()), vec!["A", "C"]);
    }

    #[test]
    fn test_delete_from_single_section_is_denied() {
        let (a, b) = (station(1, "A"), station(2, "B"));
        let mut chain = Sections::new();
        chain.add_section(section(&a, &b, 5)).unwrap();

        for target in [&a, &b] {
            assert!(matches!(
                chain.delete_section(target),
                Err(SubwayError::SingleSectionDeletionDenied)
            ));
        }
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_delete_unknown_station() {
        let (mut chain, ..) = abc();
        let err = chain.delete_section(&station(42, "Nowhere")).unwrap_err();
        assert!(matches!(err, SubwayError::SectionNotFound { .. }));
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_merge_overflow_leaves_chain_untouched() {
        let (a, b, c) = (station(1, "A"), station(2, "B"), station(3, "C"));
        let mut chain = Sections::new();
        chain
            .add_section(section(&a, &b, i64::from(u32::MAX)))
            .unwrap();
        chain.add_section(section(&b, &c, 1)).unwrap();

        assert!(matches!(
            chain.delete_section(&b),
            Err(SubwayError::DistanceOverflow)
        ));
        assert_eq!(chain.len(), 2);
        assert_eq!(names(&chain.all_stations().unwrap()), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_cycle_without_start_is_reported() {
        let (a, b) = (station(1, "A"), station(2, "B"));
        let chain = Sections::from_sections(vec![section(&a, &b, 1), section(&b, &a, 1)]);
        assert!(matches!(
            chain.all_stations(),
            Err(SubwayError::FirstSectionNotFound)
        ));
    }

    #[test]
    fn test_loop_after_start_is_reported() {
        let (a, b, c) = (station(1, "A"), station(2, "B"), station(3, "C"));
        let chain = Sections::from_sections(vec![
            section(&a, &b, 1),
            section(&b, &c, 1),
            section(&c, &b, 1),
        ]);
        assert!(matches!(
            chain.all_stations(),
            Err(SubwayError::CycleDetected { .. })
        ));
    }
}
