//! Planar projection of geographic coordinates onto a bounded canvas.
//!
//! The projector is fitted once to every node of a dataset. Longitudes are
//! compressed by the cosine of the mean latitude so a degree east and a degree
//! north cover comparable distances, then both axes share the largest uniform
//! scale that keeps the drawing inside the target envelope. The y axis is
//! flipped so north is up.

use geo::{Coord, Rect};
use log::debug;
use thiserror::Error;

use crate::model::NodeTable;

/// Default width budget of the drawing, in canvas units.
pub const DEFAULT_TARGET_WIDTH: f64 = 820.0;
/// Default height budget of the drawing, in canvas units.
pub const DEFAULT_TARGET_HEIGHT: f64 = 570.0;
/// Default margin around the drawing.
pub const DEFAULT_PADDING: f64 = 5.0;
/// Default extra margin below the drawing for the attribution caption.
pub const DEFAULT_BOTTOM_PADDING: f64 = 20.0;

/// Rough ratio between a degree of longitude at the equator and a degree of
/// latitude. Sits between the equatorial/polar radius ratio and the
/// corresponding circumference ratio.
const LONGITUDE_STRETCH: f64 = 1.002;

/// Scale used when the node set has no extent in either direction.
const DEGENERATE_SCALE: f64 = 1.0;

/// Errors raised while fitting a [`Projector`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProjectionError {
    /// The dataset contains no nodes to fit.
    #[error("cannot fit a projection to an empty node set")]
    NoCoordinates,
    /// A canvas setting is negative, zero where it must be positive, or not
    /// finite.
    #[error("canvas setting {field} is invalid: {value}")]
    InvalidCanvas {
        /// Name of the offending setting.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Target envelope and margins of the drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanvasConfig {
    /// Maximum drawing width before padding.
    pub target_width: f64,
    /// Maximum drawing height before padding.
    pub target_height: f64,
    /// Margin on every side.
    pub padding: f64,
    /// Additional bottom margin reserved for the attribution caption.
    pub bottom_padding: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            target_height: DEFAULT_TARGET_HEIGHT,
            padding: DEFAULT_PADDING,
            bottom_padding: DEFAULT_BOTTOM_PADDING,
        }
    }
}

impl CanvasConfig {
    /// Check every setting is usable.
    ///
    /// # Errors
    /// Returns [`ProjectionError::InvalidCanvas`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ProjectionError> {
        let positive = [
            ("target_width", self.target_width),
            ("target_height", self.target_height),
        ];
        let non_negative = [
            ("padding", self.padding),
            ("bottom_padding", self.bottom_padding),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ProjectionError::InvalidCanvas { field, value });
            }
        }
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ProjectionError::InvalidCanvas { field, value });
            }
        }
        Ok(())
    }
}

/// A point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanarPoint {
    /// Horizontal position, growing eastwards.
    pub x: f64,
    /// Vertical position, growing southwards.
    pub y: f64,
}

impl From<Coord<f64>> for PlanarPoint {
    fn from(coord: Coord<f64>) -> Self {
        Self {
            x: coord.x,
            y: coord.y,
        }
    }
}

/// The visible region of the canvas, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewBox {
    /// Left edge.
    pub min_x: f64,
    /// Top edge.
    pub min_y: f64,
    /// Total width including padding.
    pub width: f64,
    /// Total height including padding and the caption margin.
    pub height: f64,
}

/// Overall drawing surface handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Canvas {
    /// Visible region.
    pub view_box: ViewBox,
    /// Rendered width.
    pub width: f64,
    /// Rendered height.
    pub height: f64,
    /// Right-aligned anchor for the attribution caption.
    pub attribution: PlanarPoint,
}

/// Maps latitude/longitude to canvas coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use metromap_core::{CanvasConfig, Projector};
///
/// let projector = Projector::fit(
///     [Coord { x: 2.25, y: 48.80 }, Coord { x: 2.45, y: 48.90 }],
///     CanvasConfig::default(),
/// )
/// .unwrap();
/// let north_west = projector.project(Coord { x: 2.25, y: 48.90 });
/// assert_eq!(north_west.x, 0.0);
/// assert_eq!(north_west.y, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    bounds: Rect<f64>,
    length_ratio: f64,
    scale: f64,
    config: CanvasConfig,
}

impl Projector {
    /// Fit a projector to every node in `nodes`.
    ///
    /// # Errors
    /// See [`Projector::fit`].
    pub fn from_nodes(nodes: &NodeTable, config: CanvasConfig) -> Result<Self, ProjectionError> {
        Self::fit(nodes.iter().map(|node| node.location), config)
    }

    /// Fit a projector to `coords` (`x = longitude`, `y = latitude`).
    ///
    /// When the coordinates span no distance along one axis, that axis is
    /// ignored when choosing the scale; when they span nothing at all the
    /// scale falls back to one canvas unit per degree.
    ///
    /// # Errors
    /// Returns [`ProjectionError::NoCoordinates`] for an empty input and
    /// [`ProjectionError::InvalidCanvas`] for unusable settings.
    #[expect(
        clippy::float_arithmetic,
        reason = "projection parameters are floating-point geometry"
    )]
    pub fn fit<I>(coords: I, config: CanvasConfig) -> Result<Self, ProjectionError>
    where
        I: IntoIterator<Item = Coord<f64>>,
    {
        config.validate()?;
        let bounds = coords
            .into_iter()
            .map(|coord| Rect::new(coord, coord))
            .reduce(include_bounds)
            .ok_or(ProjectionError::NoCoordinates)?;
        let min = bounds.min();
        let max = bounds.max();

        let length_ratio =
            (std::f64::consts::PI * (min.y + max.y) / 360.0).cos() * LONGITUDE_STRETCH;
        let lat_size = max.y - min.y;
        let lon_size = (max.x - min.x) * length_ratio;

        let scale = [
            (config.target_height, lat_size),
            (config.target_width, lon_size),
        ]
        .into_iter()
        .filter(|(_, size)| *size > 0.0)
        .map(|(budget, size)| budget / size)
        .reduce(f64::min)
        .unwrap_or_else(|| {
            debug!("node set has no extent; using a scale of {DEGENERATE_SCALE}");
            DEGENERATE_SCALE
        });

        Ok(Self {
            bounds,
            length_ratio,
            scale,
            config,
        })
    }

    /// Canvas position of a geographic coordinate.
    #[must_use]
    pub fn project(&self, location: Coord<f64>) -> PlanarPoint {
        PlanarPoint {
            x: self.lon_to_x(location.x),
            y: self.lat_to_y(location.y),
        }
    }

    /// Horizontal canvas position of a longitude.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "projection is floating-point geometry")]
    pub fn lon_to_x(&self, lon: f64) -> f64 {
        (lon - self.bounds.min().x) * self.length_ratio * self.scale
    }

    /// Vertical canvas position of a latitude, north up.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "projection is floating-point geometry")]
    pub fn lat_to_y(&self, lat: f64) -> f64 {
        (self.bounds.max().y - lat) * self.scale
    }

    /// Canvas units per degree of latitude.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Longitude compression factor at the dataset's mean latitude.
    #[must_use]
    pub const fn length_ratio(&self) -> f64 {
        self.length_ratio
    }

    /// Geographic bounding box the projector was fitted to.
    #[must_use]
    pub const fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    /// Drawing surface including padding and caption margin.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "canvas extents add padding")]
    pub fn canvas(&self) -> Canvas {
        let CanvasConfig {
            padding,
            bottom_padding,
            ..
        } = self.config;
        let right = self.lon_to_x(self.bounds.max().x);
        let bottom = self.lat_to_y(self.bounds.min().y);
        let width = right + 2.0 * padding;
        let height = bottom + 2.0 * padding + bottom_padding;
        Canvas {
            view_box: ViewBox {
                min_x: -padding,
                min_y: -padding,
                width,
                height,
            },
            width,
            height,
            attribution: PlanarPoint {
                x: right + padding - 1.0,
                y: bottom + padding + bottom_padding - 4.0,
            },
        }
    }
}

fn include_bounds(existing: Rect<f64>, other: Rect<f64>) -> Rect<f64> {
    let min = Coord {
        x: existing.min().x.min(other.min().x),
        y: existing.min().y.min(other.min().y),
    };
    let max = Coord {
        x: existing.max().x.max(other.max().x),
        y: existing.max().y.max(other.max().y),
    };
    Rect::new(min, max)
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point geometry"
)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const EPSILON: f64 = 1.0e-9;

    fn assert_close(actual: f64, expected: f64) {
        let delta = (actual - expected).abs();
        assert!(
            delta <= EPSILON,
            "expected {expected}, got {actual} (|Δ| = {delta})"
        );
    }

    /// Roughly central Paris.
    #[fixture]
    fn paris() -> Projector {
        Projector::fit(
            [
                Coord { x: 2.25, y: 48.80 },
                Coord { x: 2.45, y: 48.90 },
                Coord { x: 2.35, y: 48.85 },
            ],
            CanvasConfig::default(),
        )
        .expect("fit projector")
    }

    #[rstest]
    fn parameters_follow_mean_latitude(paris: Projector) {
        let expected_ratio = (std::f64::consts::PI * (48.80 + 48.90) / 360.0).cos() * 1.002;
        assert_close(paris.length_ratio(), expected_ratio);
        let lat_size: f64 = 48.90 - 48.80;
        let lon_size: f64 = (2.45 - 2.25) * expected_ratio;
        assert_close(paris.scale(), (570.0 / lat_size).min(820.0 / lon_size));
    }

    #[rstest]
    fn drawing_fits_target_envelope(paris: Projector) {
        let south_east = paris.project(Coord { x: 2.45, y: 48.80 });
        assert!(south_east.x <= 820.0 + EPSILON);
        assert!(south_east.y <= 570.0 + EPSILON);
        assert!(
            (south_east.x - 820.0).abs() <= EPSILON || (south_east.y - 570.0).abs() <= EPSILON,
            "one dimension should fill its budget: {south_east:?}"
        );
    }

    #[rstest]
    #[case(48.81, 48.89)]
    #[case(48.80, 48.85)]
    fn northern_points_map_higher(paris: Projector, #[case] south: f64, #[case] north: f64) {
        let lower = paris.project(Coord { x: 2.3, y: south });
        let upper = paris.project(Coord { x: 2.3, y: north });
        assert!(upper.y < lower.y);
    }

    #[rstest]
    #[case(2.26, 2.44)]
    #[case(2.30, 2.31)]
    fn eastern_points_map_right(paris: Projector, #[case] west: f64, #[case] east: f64) {
        let left = paris.project(Coord { x: west, y: 48.85 });
        let right = paris.project(Coord { x: east, y: 48.85 });
        assert!(right.x > left.x);
    }

    #[rstest]
    fn canvas_adds_padding_and_caption_margin(paris: Projector) {
        let canvas = paris.canvas();
        let right = paris.lon_to_x(2.45);
        let bottom = paris.lat_to_y(48.80);
        assert_close(canvas.view_box.min_x, -5.0);
        assert_close(canvas.view_box.min_y, -5.0);
        assert_close(canvas.width, right + 10.0);
        assert_close(canvas.height, bottom + 30.0);
        assert_close(canvas.attribution.x, right + 4.0);
        assert_close(canvas.attribution.y, bottom + 21.0);
    }

    #[rstest]
    fn equator_keeps_longitudes_nearly_unscaled() {
        let projector = Projector::fit(
            [Coord { x: -1.0, y: -1.0 }, Coord { x: 1.0, y: 1.0 }],
            CanvasConfig::default(),
        )
        .expect("fit projector");
        assert_close(projector.length_ratio(), 1.002);
    }

    #[rstest]
    fn flat_latitude_uses_width_budget() {
        let projector = Projector::fit(
            [Coord { x: 0.0, y: 0.0 }, Coord { x: 2.0, y: 0.0 }],
            CanvasConfig::default(),
        )
        .expect("fit projector");
        assert_close(projector.scale(), 820.0 / (2.0 * 1.002));
    }

    #[rstest]
    fn single_point_falls_back_to_unit_scale() {
        let projector = Projector::fit([Coord { x: 13.4, y: 52.5 }], CanvasConfig::default())
            .expect("fit projector");
        assert_close(projector.scale(), 1.0);
        assert_eq!(
            projector.project(Coord { x: 13.4, y: 52.5 }),
            PlanarPoint { x: 0.0, y: 0.0 }
        );
    }

    #[rstest]
    fn empty_input_is_rejected() {
        let err = Projector::fit(std::iter::empty(), CanvasConfig::default())
            .expect_err("empty input");
        assert_eq!(err, ProjectionError::NoCoordinates);
    }

    #[rstest]
    #[case(CanvasConfig { target_width: 0.0, ..CanvasConfig::default() }, "target_width")]
    #[case(CanvasConfig { target_height: f64::NAN, ..CanvasConfig::default() }, "target_height")]
    #[case(CanvasConfig { padding: -1.0, ..CanvasConfig::default() }, "padding")]
    #[case(CanvasConfig { bottom_padding: f64::INFINITY, ..CanvasConfig::default() }, "bottom_padding")]
    fn invalid_canvas_settings_are_named(#[case] config: CanvasConfig, #[case] expected: &str) {
        let err = Projector::fit([Coord { x: 0.0, y: 0.0 }], config).expect_err("invalid config");
        match err {
            ProjectionError::InvalidCanvas { field, .. } => assert_eq!(field, expected),
            other => panic!("expected InvalidCanvas, got {other:?}"),
        }
    }
}
