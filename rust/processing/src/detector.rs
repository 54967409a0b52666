// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dataset-level party wall detection.
//!
//! Every building and building part with 3D geometry becomes one entity.
//! Entities are paired upper-triangularly in dataset order, so a building's
//! parts meet each other, their own building body and everything that
//! comes later in the dataset exactly once. Each pair passes through the
//! ground-proximity prefilter before the wall resolver sees it.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use citymodel_core::{BuildingLike, Dataset, WallCounts};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::PartyWallConfig;
use crate::error::{Error, Result};
use crate::prefilter::GroundFootprints;
use crate::record::PartyWallRecord;
use crate::resolver::{resolve_party_walls, Resolution};

/// Counters collected during one detection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionStats {
    /// Buildings and building parts in the dataset.
    pub entities: usize,
    /// Entity pairs where both sides have ground footprints.
    pub candidate_pairs: usize,
    /// Pairs dropped because their grounds are too far apart.
    pub prefilter_rejections: usize,
    /// Pairs handed to the wall resolver.
    pub resolver_invocations: usize,
    /// Valid wall/closure pairs examined by the resolver.
    pub wall_pairs_compared: usize,
}

/// Outcome of a detection run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyWallReport {
    pub records: Vec<PartyWallRecord>,
    /// Wall counts for every building and building part, by qualified id.
    pub wall_counts: BTreeMap<String, WallCounts>,
    pub stats: DetectionStats,
}

impl PartyWallReport {
    /// Writes the wall counts back onto the buildings and parts.
    pub fn apply(&self, dataset: &mut Dataset) -> Result<()> {
        for (id, counts) in &self.wall_counts {
            dataset.set_wall_counts(id, *counts)?;
        }
        Ok(())
    }

    /// Records linking `a` and `b`, in either order.
    pub fn records_between<'a>(
        &'a self,
        a: &'a str,
        b: &'a str,
    ) -> impl Iterator<Item = &'a PartyWallRecord> + 'a {
        self.records.iter().filter(move |r| r.connects(a, b))
    }

    /// Records involving one building or part.
    pub fn records_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a PartyWallRecord> + 'a {
        self.records.iter().filter(move |r| r.involves(id))
    }

    /// Summed contact area of one building or part with all its neighbours.
    pub fn total_contact_area(&self, id: &str) -> f64 {
        self.records_for(id).map(|r| r.area).sum()
    }
}

/// Runs party wall detection over a dataset.
///
/// # Example
///
/// ```rust,ignore
/// let report = PartyWallDetector::new(PartyWallConfig::from_env()).run(&dataset)?;
/// report.apply(&mut dataset)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PartyWallDetector {
    config: PartyWallConfig,
    cancel: Option<Arc<AtomicBool>>,
}

struct Entity<'a> {
    entity: &'a dyn BuildingLike,
    qualified_id: String,
    grounds: GroundFootprints,
}

enum PairOutcome {
    Rejected,
    Resolved(Resolution),
}

impl PartyWallDetector {
    pub fn new(config: PartyWallConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Stops the run with [`Error::Cancelled`] once `flag` is set.
    ///
    /// The flag is checked before each entity pair.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &PartyWallConfig {
        &self.config
    }

    pub fn run(&self, dataset: &Dataset) -> Result<PartyWallReport> {
        self.config.validate()?;
        let start = Instant::now();

        let entities = collect_entities(dataset, self.config.ground_buffer);
        let n = entities.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .filter(|&(i, j)| !entities[i].grounds.is_empty() && !entities[j].grounds.is_empty())
            .collect();

        tracing::info!(
            buildings = dataset.len(),
            entities = n,
            candidate_pairs = pairs.len(),
            parallel = self.config.parallel,
            "Starting party wall detection"
        );

        let evaluate = |&(i, j): &(usize, usize)| -> Result<PairOutcome> {
            self.check_cancelled()?;
            let (a, b) = (&entities[i], &entities[j]);
            if !a.grounds.near(&b.grounds) {
                tracing::debug!(a = %a.qualified_id, b = %b.qualified_id, "Grounds too far apart");
                return Ok(PairOutcome::Rejected);
            }
            tracing::debug!(a = %a.qualified_id, b = %b.qualified_id, "Resolving walls");
            Ok(PairOutcome::Resolved(resolve_party_walls(
                a.entity,
                b.entity,
                &self.config,
            )))
        };

        let outcomes: Vec<PairOutcome> = if self.config.parallel {
            pairs.par_iter().map(evaluate).collect::<Result<_>>()?
        } else {
            pairs.iter().map(evaluate).collect::<Result<_>>()?
        };

        let mut stats = DetectionStats {
            entities: n,
            candidate_pairs: pairs.len(),
            ..Default::default()
        };
        let mut records = Vec::new();
        for outcome in outcomes {
            match outcome {
                PairOutcome::Rejected => stats.prefilter_rejections += 1,
                PairOutcome::Resolved(resolution) => {
                    stats.resolver_invocations += 1;
                    stats.wall_pairs_compared += resolution.wall_pairs_compared;
                    records.extend(resolution.records);
                }
            }
        }

        let wall_counts = count_walls(&entities, &records);

        tracing::info!(
            records = records.len(),
            prefilter_rejections = stats.prefilter_rejections,
            resolver_invocations = stats.resolver_invocations,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Party wall detection complete"
        );

        Ok(PartyWallReport {
            records,
            wall_counts,
            stats,
        })
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Runs detection with `config` and no cancellation.
pub fn detect_party_walls(dataset: &Dataset, config: &PartyWallConfig) -> Result<PartyWallReport> {
    PartyWallDetector::new(*config).run(dataset)
}

/// Buildings followed by their parts, in dataset order.
fn collect_entities(dataset: &Dataset, buffer: f64) -> Vec<Entity<'_>> {
    let mut entities = Vec::new();
    for building in dataset.buildings() {
        let members = std::iter::once(building as &dyn BuildingLike)
            .chain(building.parts().iter().map(|p| p as &dyn BuildingLike));
        for entity in members {
            entities.push(Entity {
                entity,
                qualified_id: entity.qualified_id(),
                grounds: GroundFootprints::of(entity, buffer),
            });
        }
    }
    entities
}

/// All walls of each entity minus the distinct walls matched on either side.
fn count_walls(entities: &[Entity<'_>], records: &[PartyWallRecord]) -> BTreeMap<String, WallCounts> {
    let matched: FxHashSet<(&str, &str)> = records
        .iter()
        .flat_map(|r| {
            [
                (r.building_a.as_str(), r.surface_a.as_str()),
                (r.building_b.as_str(), r.surface_b.as_str()),
            ]
        })
        .collect();

    entities
        .iter()
        .map(|e| {
            let walls = e.entity.surfaces().walls();
            let shared = walls
                .iter()
                .filter(|w| matched.contains(&(e.qualified_id.as_str(), w.id())))
                .count();
            let counts = WallCounts {
                all_walls: walls.len(),
                free_walls: walls.len() - shared,
            };
            (e.qualified_id.clone(), counts)
        })
        .collect()
}
