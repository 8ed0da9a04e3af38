//! Read-only access to geometries and their attributes.
//!
//! [`GeometrySource`] is the seam between the index and whatever holds the
//! actual dataset (shapefile readers, database cursors, test fixtures).
//! Records are addressed by their sequential id: 0-based, dense, and stable
//! for the lifetime of the index.

use crate::codec;
use crate::error::{GeomDbError, Result};
use crate::types::BoundingBox2D;
use geo::Geometry;
use rustc_hash::FxHashMap;

/// Read-only geometry collection consumed by the index builder and the
/// query engines.
pub trait GeometrySource {
    /// Number of records in the collection.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The planar bounding box of the record's geometry.
    fn bbox(&self, id: usize) -> Result<BoundingBox2D>;

    /// The record's full geometry, for exact intersection testing.
    fn geometry(&self, id: usize) -> Result<Geometry<f64>>;

    /// A scalar attribute of the record, by field name.
    fn attribute(&self, id: usize, field: &str) -> Result<f64>;

    /// Whether the attribute schema contains the named field.
    fn has_field(&self, field: &str) -> bool;
}

/// In-memory [`GeometrySource`] over owned geometries and named attribute
/// columns.
///
/// # Example
///
/// ```rust
/// use geomdb::MemorySource;
/// use geo::{polygon, Geometry};
///
/// let reach: Geometry<f64> = polygon![
///     (x: 0.0, y: 0.0),
///     (x: 2.0, y: 0.0),
///     (x: 2.0, y: 2.0),
///     (x: 0.0, y: 2.0),
/// ].into();
///
/// let source = MemorySource::new(vec![reach])
///     .with_attribute("time", vec![100.0])
///     .unwrap();
/// assert_eq!(source.len(), 1);
/// # use geomdb::GeometrySource;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    geometries: Vec<Geometry<f64>>,
    attributes: FxHashMap<String, Vec<f64>>,
}

impl MemorySource {
    pub fn new(geometries: Vec<Geometry<f64>>) -> Self {
        Self {
            geometries,
            attributes: FxHashMap::default(),
        }
    }

    /// Attach a named attribute column. The column must have one value per
    /// geometry.
    pub fn with_attribute(mut self, field: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        if values.len() != self.geometries.len() {
            return Err(GeomDbError::InvalidConfig(format!(
                "attribute column has {} values for {} geometries",
                values.len(),
                self.geometries.len()
            )));
        }
        let _ = self.attributes.insert(field.into(), values);
        Ok(self)
    }

    pub fn geometries(&self) -> &[Geometry<f64>] {
        &self.geometries
    }
}

impl GeometrySource for MemorySource {
    fn len(&self) -> usize {
        self.geometries.len()
    }

    fn bbox(&self, id: usize) -> Result<BoundingBox2D> {
        let geometry = self
            .geometries
            .get(id)
            .ok_or(GeomDbError::MissingRecord(id))?;
        codec::planar_box(geometry).ok_or(GeomDbError::EmptyGeometry(id))
    }

    fn geometry(&self, id: usize) -> Result<Geometry<f64>> {
        self.geometries
            .get(id)
            .cloned()
            .ok_or(GeomDbError::MissingRecord(id))
    }

    fn attribute(&self, id: usize, field: &str) -> Result<f64> {
        if id >= self.geometries.len() {
            return Err(GeomDbError::MissingRecord(id));
        }
        self.attributes
            .get(field)
            .and_then(|column| column.get(id))
            .copied()
            .ok_or_else(|| GeomDbError::MissingAttribute {
                id,
                field: field.to_string(),
            })
    }

    fn has_field(&self, field: &str) -> bool {
        self.attributes.contains_key(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Point, polygon};

    fn sample_source() -> MemorySource {
        let poly: Geometry<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 4.0, y: 0.0),
            (x: 4.0, y: 4.0),
            (x: 0.0, y: 4.0),
        ]
        .into();
        let point: Geometry<f64> = Point::new(10.0, 10.0).into();

        MemorySource::new(vec![poly, point])
            .with_attribute("time", vec![100.0, 200.0])
            .unwrap()
    }

    #[test]
    fn test_len_and_bbox() {
        let source = sample_source();
        assert_eq!(source.len(), 2);
        assert_eq!(
            source.bbox(0).unwrap(),
            BoundingBox2D::new(0.0, 0.0, 4.0, 4.0)
        );
        assert_eq!(
            source.bbox(1).unwrap(),
            BoundingBox2D::new(10.0, 10.0, 10.0, 10.0)
        );
    }

    #[test]
    fn test_missing_record() {
        let source = sample_source();
        assert!(matches!(
            source.bbox(7),
            Err(GeomDbError::MissingRecord(7))
        ));
        assert!(matches!(
            source.geometry(7),
            Err(GeomDbError::MissingRecord(7))
        ));
        assert!(matches!(
            source.attribute(7, "time"),
            Err(GeomDbError::MissingRecord(7))
        ));
    }

    #[test]
    fn test_attribute_access() {
        let source = sample_source();
        assert_eq!(source.attribute(0, "time").unwrap(), 100.0);
        assert_eq!(source.attribute(1, "time").unwrap(), 200.0);
        assert!(source.has_field("time"));
        assert!(!source.has_field("pass"));
        assert!(matches!(
            source.attribute(0, "pass"),
            Err(GeomDbError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_attribute_column_length_mismatch() {
        let point: Geometry<f64> = Point::new(0.0, 0.0).into();
        let result = MemorySource::new(vec![point]).with_attribute("time", vec![1.0, 2.0]);
        assert!(matches!(result, Err(GeomDbError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_geometry_has_no_bbox() {
        let empty: Geometry<f64> = Geometry::GeometryCollection(geo::GeometryCollection::default());
        let source = MemorySource::new(vec![empty]);
        assert!(matches!(
            source.bbox(0),
            Err(GeomDbError::EmptyGeometry(0))
        ));
    }
}
