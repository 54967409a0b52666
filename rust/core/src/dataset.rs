// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A collection of buildings loaded from one or more city model files.

use rustc_hash::FxHashMap;

use crate::building::{Building, BuildingLike, WallCounts};
use crate::error::{Error, Result};

/// Buildings keyed by id, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub name: Option<String>,
    buildings: Vec<Building>,
    index: FxHashMap<String, usize>,
}

impl Dataset {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            buildings: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Adds a building.
    ///
    /// An existing building with the same id is replaced in place when
    /// `force` is set, otherwise the call fails.
    pub fn add_building(&mut self, building: Building, force: bool) -> Result<()> {
        let id = building.id().to_string();
        match self.index.get(&id) {
            Some(&slot) if force => {
                tracing::warn!(building = %id, "Replacing existing building in dataset");
                self.buildings[slot] = building;
                Ok(())
            }
            Some(_) => Err(Error::DuplicateBuilding(id)),
            None => {
                self.index.insert(id, self.buildings.len());
                self.buildings.push(building);
                Ok(())
            }
        }
    }

    pub fn remove_building(&mut self, id: &str) -> Option<Building> {
        let slot = self.index.remove(id)?;
        let removed = self.buildings.remove(slot);
        for value in self.index.values_mut() {
            if *value > slot {
                *value -= 1;
            }
        }
        Some(removed)
    }

    pub fn building(&self, id: &str) -> Option<&Building> {
        self.index.get(id).map(|&slot| &self.buildings[slot])
    }

    pub fn building_mut(&mut self, id: &str) -> Option<&mut Building> {
        self.index.get(id).map(|&slot| &mut self.buildings[slot])
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Building> {
        self.buildings.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Looks up a building (`id`) or building part (`building/part`).
    pub fn entity(&self, qualified_id: &str) -> Option<&dyn BuildingLike> {
        if let Some(b) = self.building(qualified_id) {
            return Some(b as &dyn BuildingLike);
        }
        let (building, part) = qualified_id.split_once('/')?;
        self.building(building)?
            .part(part)
            .map(|p| p as &dyn BuildingLike)
    }

    /// Stores wall counts on the building or part named by `qualified_id`.
    pub fn set_wall_counts(&mut self, qualified_id: &str, counts: WallCounts) -> Result<()> {
        if let Some(b) = self.building_mut(qualified_id) {
            b.set_wall_counts(counts);
            return Ok(());
        }
        let (building, part) = qualified_id
            .split_once('/')
            .ok_or_else(|| Error::BuildingNotFound(qualified_id.to_string()))?;
        let b = self
            .building_mut(building)
            .ok_or_else(|| Error::BuildingNotFound(building.to_string()))?;
        let p = b.part_mut(part).ok_or_else(|| Error::BuildingPartNotFound {
            building: building.to_string(),
            part: part.to_string(),
        })?;
        p.set_wall_counts(counts);
        Ok(())
    }
}
