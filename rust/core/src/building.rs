// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Buildings and building parts.
//!
//! Both carry their boundary surfaces grouped by kind. A [`Building`] owns
//! its [`BuildingPart`]s; a part refers back to its building by id only.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::surface::{Surface, SurfaceKind};

/// Wall totals of a building-like entity, filled in by party wall detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WallCounts {
    /// Number of wall surfaces.
    pub all_walls: usize,
    /// Wall surfaces not shared with any other building or part.
    pub free_walls: usize,
}

impl WallCounts {
    /// Counts with every wall free.
    pub fn new(all_walls: usize) -> Self {
        Self {
            all_walls,
            free_walls: all_walls,
        }
    }

    /// Share of exposed walls, `None` without walls.
    pub fn free_fraction(&self) -> Option<f64> {
        if self.all_walls == 0 {
            None
        } else {
            Some(self.free_walls as f64 / self.all_walls as f64)
        }
    }
}

/// Boundary surfaces of a building-like entity, grouped by kind.
#[derive(Debug, Clone, Default)]
pub struct BoundarySurfaces {
    walls: Vec<Surface>,
    roofs: Vec<Surface>,
    grounds: Vec<Surface>,
    closures: Vec<Surface>,
    unclassified: Vec<Surface>,
}

impl BoundarySurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a surface to the collection matching its kind.
    ///
    /// `owner` only names the entity in the duplicate-id error.
    pub fn add(&mut self, owner: &str, surface: Surface) -> Result<()> {
        if self.get(surface.id()).is_some() {
            return Err(Error::DuplicateSurface {
                owner: owner.to_string(),
                surface: surface.id().to_string(),
            });
        }
        if !surface.is_valid() {
            tracing::debug!(owner, surface = surface.id(), "Adding invalid surface");
        }
        match surface.kind() {
            SurfaceKind::Wall => self.walls.push(surface),
            SurfaceKind::Roof => self.roofs.push(surface),
            SurfaceKind::Ground => self.grounds.push(surface),
            SurfaceKind::Closure => self.closures.push(surface),
            SurfaceKind::Unknown => self.unclassified.push(surface),
        }
        Ok(())
    }

    pub fn walls(&self) -> &[Surface] {
        &self.walls
    }

    pub fn roofs(&self) -> &[Surface] {
        &self.roofs
    }

    pub fn grounds(&self) -> &[Surface] {
        &self.grounds
    }

    pub fn closures(&self) -> &[Surface] {
        &self.closures
    }

    /// Invalid surfaces whose kind was neither given nor derivable.
    pub fn unclassified(&self) -> &[Surface] {
        &self.unclassified
    }

    pub fn of_kind(&self, kind: SurfaceKind) -> &[Surface] {
        match kind {
            SurfaceKind::Wall => &self.walls,
            SurfaceKind::Roof => &self.roofs,
            SurfaceKind::Ground => &self.grounds,
            SurfaceKind::Closure => &self.closures,
            SurfaceKind::Unknown => &self.unclassified,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Surface> {
        self.walls
            .iter()
            .chain(&self.roofs)
            .chain(&self.grounds)
            .chain(&self.closures)
            .chain(&self.unclassified)
    }

    pub fn len(&self) -> usize {
        self.walls.len()
            + self.roofs.len()
            + self.grounds.len()
            + self.closures.len()
            + self.unclassified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<&Surface> {
        self.iter().find(|s| s.id() == id)
    }

    /// Valid walls and closures, the surfaces compared for party walls.
    pub fn party_wall_candidates(&self) -> impl Iterator<Item = &Surface> {
        self.walls
            .iter()
            .chain(&self.closures)
            .filter(|s| s.is_valid())
    }

    /// Summed area of the valid surfaces of one kind.
    pub fn total_area(&self, kind: SurfaceKind) -> f64 {
        self.of_kind(kind).iter().filter_map(Surface::area).sum()
    }

    /// Roofs, grounds and at least one wall or closure are present.
    pub fn has_3d_geometry(&self) -> bool {
        !self.roofs.is_empty()
            && !self.grounds.is_empty()
            && (!self.walls.is_empty() || !self.closures.is_empty())
    }
}

/// Descriptive attributes carried over from the source model.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuildingAttributes {
    pub function: Option<String>,
    pub usage: Option<String>,
    pub year_of_construction: Option<i32>,
    pub roof_type: Option<String>,
    pub measured_height: Option<f64>,
    pub storeys_above_ground: Option<u32>,
}

/// Behaviour shared by buildings and building parts.
pub trait BuildingLike: Sync {
    fn id(&self) -> &str;

    /// Id of the owning building for parts, `None` for buildings.
    fn parent_id(&self) -> Option<&str>;

    fn surfaces(&self) -> &BoundarySurfaces;

    fn wall_counts(&self) -> Option<WallCounts>;

    fn is_building_part(&self) -> bool {
        self.parent_id().is_some()
    }

    /// `building` for buildings, `building/part` for parts.
    fn qualified_id(&self) -> String {
        match self.parent_id() {
            Some(parent) => format!("{}/{}", parent, self.id()),
            None => self.id().to_string(),
        }
    }

    fn has_3d_geometry(&self) -> bool {
        self.surfaces().has_3d_geometry()
    }
}

/// A building part, owned by a [`Building`].
#[derive(Debug, Clone)]
pub struct BuildingPart {
    id: String,
    parent_id: String,
    surfaces: BoundarySurfaces,
    pub attributes: BuildingAttributes,
    wall_counts: Option<WallCounts>,
}

impl BuildingPart {
    pub fn new(id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.into(),
            surfaces: BoundarySurfaces::new(),
            attributes: BuildingAttributes::default(),
            wall_counts: None,
        }
    }

    pub fn add_surface(&mut self, surface: Surface) -> Result<()> {
        let owner = self.qualified_id();
        self.surfaces.add(&owner, surface)
    }

    pub fn set_wall_counts(&mut self, counts: WallCounts) {
        self.wall_counts = Some(counts);
    }
}

impl BuildingLike for BuildingPart {
    fn id(&self) -> &str {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        Some(&self.parent_id)
    }

    fn surfaces(&self) -> &BoundarySurfaces {
        &self.surfaces
    }

    fn wall_counts(&self) -> Option<WallCounts> {
        self.wall_counts
    }
}

/// A building with its own surfaces and any number of parts.
#[derive(Debug, Clone)]
pub struct Building {
    id: String,
    surfaces: BoundarySurfaces,
    parts: Vec<BuildingPart>,
    pub attributes: BuildingAttributes,
    wall_counts: Option<WallCounts>,
}

impl Building {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            surfaces: BoundarySurfaces::new(),
            parts: Vec::new(),
            attributes: BuildingAttributes::default(),
            wall_counts: None,
        }
    }

    pub fn add_surface(&mut self, surface: Surface) -> Result<()> {
        self.surfaces.add(&self.id, surface)
    }

    /// Attaches a part. Its parent id must name this building.
    pub fn add_part(&mut self, part: BuildingPart) -> Result<()> {
        if part.parent_id != self.id {
            return Err(Error::ParentMismatch {
                part: part.id,
                expected: self.id.clone(),
                found: part.parent_id,
            });
        }
        if self.part(&part.id).is_some() {
            return Err(Error::DuplicateBuildingPart {
                building: self.id.clone(),
                part: part.id,
            });
        }
        self.parts.push(part);
        Ok(())
    }

    pub fn parts(&self) -> &[BuildingPart] {
        &self.parts
    }

    pub fn part(&self, id: &str) -> Option<&BuildingPart> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn part_mut(&mut self, id: &str) -> Option<&mut BuildingPart> {
        self.parts.iter_mut().find(|p| p.id == id)
    }

    pub fn has_building_parts(&self) -> bool {
        !self.parts.is_empty()
    }

    pub fn part_ids(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn set_wall_counts(&mut self, counts: WallCounts) {
        self.wall_counts = Some(counts);
    }
}

impl BuildingLike for Building {
    fn id(&self) -> &str {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        None
    }

    fn surfaces(&self) -> &BoundarySurfaces {
        &self.surfaces
    }

    fn wall_counts(&self) -> Option<WallCounts> {
        self.wall_counts
    }
}
