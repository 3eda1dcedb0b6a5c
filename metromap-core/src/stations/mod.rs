//! Station identifiers and merged station markers.
//!
//! Stops are keyed by display name. Each name maps to a canonical identifier
//! (see [`station_id`]) used as the drawing element key, and every distinct
//! projected position seen for that name contributes to the marker's
//! centroid. Two different names sharing an identifier would make the drawing
//! ambiguous, so the registry refuses them.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use crate::projection::PlanarPoint;

mod rewrite;

pub use rewrite::{NameRewrites, RewriteRule};

/// Network name whose stop names receive the Paris Métro clean-ups.
pub const PARIS_METRO: &str = "Métro de Paris";
/// Network name whose stop names receive the Berlin S-Bahn clean-ups.
pub const BERLIN_S_BAHN: &str = "S-Bahnlinien in Berlin";

/// Raised when two display names claim the same station identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StationError {
    /// `incoming` normalises to an identifier already held by `existing`.
    #[error("station name disagreement for id {id}: {existing:?} versus {incoming:?}")]
    Collision {
        /// Shared identifier.
        id: String,
        /// Name registered first.
        existing: String,
        /// Name that clashed with it.
        incoming: String,
    },
}

/// Canonical identifier of a station name.
///
/// The name is decomposed (NFKD), stripped of everything but alphabetic
/// characters and lowercased, so accents, spaces and punctuation vanish.
///
/// # Examples
/// ```
/// use metromap_core::station_id;
///
/// assert_eq!(station_id("Réaumur - Sébastopol"), "reaumursebastopol");
/// ```
#[must_use]
pub fn station_id(name: &str) -> String {
    name.nfkd()
        .filter(|ch| ch.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Unweighted mean of `points`, or `None` when empty.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "centroid averages a handful of canvas positions"
)]
pub fn centroid(points: &[PlanarPoint]) -> Option<PlanarPoint> {
    if points.is_empty() {
        return None;
    }
    let count = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(x, y), point| (x + point.x, y + point.y));
    Some(PlanarPoint {
        x: sum_x / count,
        y: sum_y / count,
    })
}

/// A merged station ready to draw.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationMarker {
    /// Display name.
    pub name: String,
    /// Centroid of every distinct position recorded for the name.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub position: PlanarPoint,
}

/// Accumulates station names and positions for one network.
///
/// Registries can be filled independently (one per line, say) and combined
/// with [`StationRegistry::merge`], which applies the same collision rule as
/// [`StationRegistry::record`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationRegistry {
    names_by_id: BTreeMap<String, String>,
    positions_by_name: BTreeMap<String, Vec<PlanarPoint>>,
}

impl StationRegistry {
    /// Record a stop at `position`, returning its station id.
    ///
    /// # Errors
    /// Returns [`StationError::Collision`] when a different name already
    /// holds the same identifier.
    pub fn record(&mut self, name: &str, position: PlanarPoint) -> Result<String, StationError> {
        let id = station_id(name);
        self.claim(id.clone(), name)?;
        add_distinct(
            self.positions_by_name.entry(name.to_owned()).or_default(),
            position,
        );
        Ok(id)
    }

    /// Fold `other` into this registry.
    ///
    /// # Errors
    /// Returns [`StationError::Collision`] when the two registries disagree
    /// on the name behind an identifier.
    pub fn merge(&mut self, other: Self) -> Result<(), StationError> {
        for (id, name) in other.names_by_id {
            self.claim(id, &name)?;
        }
        for (name, points) in other.positions_by_name {
            let positions = self.positions_by_name.entry(name).or_default();
            for point in points {
                add_distinct(positions, point);
            }
        }
        Ok(())
    }

    /// Distinct positions recorded for `name`.
    #[must_use]
    pub fn positions(&self, name: &str) -> &[PlanarPoint] {
        self.positions_by_name
            .get(name)
            .map_or(&[], Vec::as_slice)
    }

    /// Name registered under `id`.
    #[must_use]
    pub fn name_for(&self, id: &str) -> Option<&str> {
        self.names_by_id.get(id).map(String::as_str)
    }

    /// Number of distinct stations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names_by_id.len()
    }

    /// Whether no station has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names_by_id.is_empty()
    }

    /// Station markers keyed by station id.
    #[must_use]
    pub fn markers(&self) -> BTreeMap<String, StationMarker> {
        self.names_by_id
            .iter()
            .filter_map(|(id, name)| {
                centroid(self.positions(name)).map(|position| {
                    (
                        id.clone(),
                        StationMarker {
                            name: name.clone(),
                            position,
                        },
                    )
                })
            })
            .collect()
    }

    fn claim(&mut self, id: String, name: &str) -> Result<(), StationError> {
        match self.names_by_id.entry(id) {
            Entry::Occupied(entry) if entry.get() != name => Err(StationError::Collision {
                id: entry.key().clone(),
                existing: entry.get().clone(),
                incoming: name.to_owned(),
            }),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(entry) => {
                entry.insert(name.to_owned());
                Ok(())
            }
        }
    }
}

fn add_distinct(positions: &mut Vec<PlanarPoint>, point: PlanarPoint) {
    if !positions.contains(&point) {
        positions.push(point);
    }
}
