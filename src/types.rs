//! Bounding box types, payload mode, and index configuration.
//!
//! Boxes are plain axis-aligned extents. The third axis of a
//! [`BoundingBox3D`] is a time window in the source's attribute unit; it is
//! never normalized against the spatial axes.

use geo::{Polygon, Rect};
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// A 2D axis-aligned bounding box `(min_x, min_y, max_x, max_y)`.
///
/// Invariant for query use: `min_x <= max_x` and `min_y <= max_y`, all
/// finite. Construction does not enforce this; [`BoundingBox2D::validate`]
/// does, and the query engines call it before touching the index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox2D {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a bounding box from a `geo::Rect`.
    pub fn from_rect(rect: &Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check that the box is well-formed: finite coordinates, `min <= max`
    /// on both axes.
    pub fn validate(&self) -> Result<(), String> {
        if ![self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err("coordinates must be finite".to_string());
        }
        if self.min_x > self.max_x {
            return Err(format!("min_x {} > max_x {}", self.min_x, self.max_x));
        }
        if self.min_y > self.max_y {
            return Err(format!("min_y {} > max_y {}", self.min_y, self.max_y));
        }
        Ok(())
    }

    /// Check if this box overlaps another (closed-interval semantics).
    pub fn intersects(&self, other: &BoundingBox2D) -> bool {
        !(self.max_x < other.min_x
            || self.min_x > other.max_x
            || self.max_y < other.min_y
            || self.min_y > other.max_y)
    }

    /// The exact rectangular footprint of this box, for geometric
    /// intersection tests against true shapes.
    ///
    /// Callers must validate the box first; `geo::Rect` normalizes swapped
    /// corners, which would silently change the query.
    pub fn footprint(&self) -> Polygon<f64> {
        Rect::new(
            geo::coord! { x: self.min_x, y: self.min_y },
            geo::coord! { x: self.max_x, y: self.max_y },
        )
        .to_polygon()
    }
}

/// A space-time axis-aligned box `(min_x, min_y, min_t, max_x, max_y, max_t)`.
///
/// The time axis carries the source's time attribute unit and is independent
/// of the spatial units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3D {
    pub min_x: f64,
    pub min_y: f64,
    pub min_t: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_t: f64,
}

impl BoundingBox3D {
    pub fn new(min_x: f64, min_y: f64, min_t: f64, max_x: f64, max_y: f64, max_t: f64) -> Self {
        Self {
            min_x,
            min_y,
            min_t,
            max_x,
            max_y,
            max_t,
        }
    }

    /// The spatial projection, discarding the time axis.
    pub fn spatial(&self) -> BoundingBox2D {
        BoundingBox2D::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// Check that the box is well-formed on all three axes.
    pub fn validate(&self) -> Result<(), String> {
        self.spatial().validate()?;
        if !self.min_t.is_finite() || !self.max_t.is_finite() {
            return Err("time bounds must be finite".to_string());
        }
        if self.min_t > self.max_t {
            return Err(format!("min_t {} > max_t {}", self.min_t, self.max_t));
        }
        Ok(())
    }

    /// Check if this box overlaps another in all three axes.
    pub fn intersects(&self, other: &BoundingBox3D) -> bool {
        self.spatial().intersects(&other.spatial())
            && !(self.max_t < other.min_t || self.min_t > other.max_t)
    }
}

/// What the index stores alongside each bounding box.
///
/// Fixed at build time and recorded in the persisted manifest: an index
/// built in one mode cannot be reused as the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PayloadMode {
    /// Store only the record id; exact refinement fetches the geometry from
    /// the source.
    #[default]
    Id,
    /// Store the full geometry in the index entry, trading index size for
    /// one fewer source lookup per candidate.
    Geometry,
}

/// Index configuration.
///
/// Serializable so deployments can load it from JSON alongside their other
/// processing settings.
///
/// # Example
///
/// ```rust
/// use geomdb::Config;
///
/// let json = r#"{
///     "time_field": "obs_time",
///     "time_window": 10.0
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.time_field, "obs_time");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the numeric attribute used as the time axis by the
    /// spacetime index.
    #[serde(default = "Config::default_time_field")]
    pub time_field: String,

    /// Full width `dt` of the time window centered on each record's time
    /// attribute: `[t - dt/2, t + dt/2]`.
    #[serde(default = "Config::default_time_window")]
    pub time_window: f64,

    /// Half-width of the degenerate box a point query expands into, in the
    /// geometry's coordinate units.
    #[serde(default = "Config::default_point_eps")]
    pub point_eps: f64,

    /// Time half-span substituted when a spacetime index answers a purely
    /// spatial query. An approximation of "no time filter", not a sentinel:
    /// records whose time attribute exceeds this magnitude fall outside the
    /// widened box.
    #[serde(default = "Config::default_large_time")]
    pub large_time: f64,
}

impl Config {
    fn default_time_field() -> String {
        "time".to_string()
    }

    const fn default_time_window() -> f64 {
        1.0
    }

    const fn default_point_eps() -> f64 {
        1e-6
    }

    const fn default_large_time() -> f64 {
        1e16
    }

    pub fn with_time_field(mut self, field: impl Into<String>) -> Self {
        self.time_field = field.into();
        self
    }

    pub fn with_time_window(mut self, dt: f64) -> Self {
        self.time_window = dt;
        self
    }

    pub fn with_point_eps(mut self, eps: f64) -> Self {
        self.point_eps = eps;
        self
    }

    pub fn with_large_time(mut self, large_time: f64) -> Self {
        self.large_time = large_time;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_field.is_empty() {
            return Err("time field name must not be empty".to_string());
        }
        if !self.time_window.is_finite() || self.time_window <= 0.0 {
            return Err("time window must be finite and positive".to_string());
        }
        if !self.point_eps.is_finite() || self.point_eps <= 0.0 {
            return Err("point epsilon must be finite and positive".to_string());
        }
        if !self.large_time.is_finite() || self.large_time <= 0.0 {
            return Err("large time must be finite and positive".to_string());
        }
        Ok(())
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_field: Self::default_time_field(),
            time_window: Self::default_time_window(),
            point_eps: Self::default_point_eps(),
            large_time: Self::default_large_time(),
        }
    }
}
