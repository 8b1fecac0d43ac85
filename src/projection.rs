//! Coordinate transforms between geographic (WGS84) and planar metric
//! (Web Mercator) bounding boxes.

use proj::Proj;

use crate::error::{Result, TileError};

/// Bounding box in WGS84 coordinates (longitude, latitude).
#[derive(Debug, Clone, Copy)]
pub struct GeoBBox {
    /// Minimum longitude (degrees).
    pub min_lon: f64,
    /// Minimum latitude (degrees).
    pub min_lat: f64,
    /// Maximum longitude (degrees).
    pub max_lon: f64,
    /// Maximum latitude (degrees).
    pub max_lat: f64,
}

impl GeoBBox {
    /// Creates a new geographic bounding box.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Returns the width of the bbox in degrees.
    #[allow(dead_code)]
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Returns the height of the bbox in degrees.
    #[allow(dead_code)]
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Returns the center point (lon, lat).
    #[allow(dead_code)]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Returns true if `other` lies entirely inside this bbox,
    /// allowing `tolerance` degrees of slack on each edge.
    #[allow(dead_code)]
    pub fn contains(&self, other: &GeoBBox, tolerance: f64) -> bool {
        self.min_lon <= other.min_lon + tolerance
            && self.min_lat <= other.min_lat + tolerance
            && self.max_lon >= other.max_lon - tolerance
            && self.max_lat >= other.max_lat - tolerance
    }
}

/// Bounding box in EPSG:3857 meters.
///
/// Only ever derived from a [`GeoBBox`] through a [`CoordinateProjector`]
/// (or from another `MetricBBox` by padding/subdivision); never parsed
/// from user input.
#[derive(Debug, Clone, Copy)]
pub struct MetricBBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl MetricBBox {
    /// Returns the width of the bbox in meters.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bbox in meters.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the center point (x, y) in meters.
    #[allow(dead_code)]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Forward/inverse transform between WGS84 degrees and Web Mercator meters.
///
/// An explicit value passed into the planner and enumerator; there is no
/// process-wide projection state.
pub struct CoordinateProjector {
    forward: Proj,
    inverse: Proj,
}

impl CoordinateProjector {
    /// Builds the EPSG:4326 <-> EPSG:3857 transform pair.
    pub fn new() -> Result<Self> {
        let forward = Proj::new_known_crs("EPSG:4326", "EPSG:3857", None)?;
        let inverse = Proj::new_known_crs("EPSG:3857", "EPSG:4326", None)?;
        Ok(Self { forward, inverse })
    }

    /// Projects a geographic bounding box to Web Mercator meters.
    ///
    /// Fails with a domain error for latitudes at or beyond the poles,
    /// where the Mercator projection is undefined.
    pub fn to_metric(&self, bbox: &GeoBBox) -> Result<MetricBBox> {
        let (min_x, min_y) = self.project(bbox.min_lon, bbox.min_lat)?;
        let (max_x, max_y) = self.project(bbox.max_lon, bbox.max_lat)?;
        Ok(MetricBBox {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Projects a Web Mercator bounding box back to geographic degrees.
    pub fn to_geographic(&self, bbox: &MetricBBox) -> Result<GeoBBox> {
        let (min_lon, min_lat) = self.unproject(bbox.min_x, bbox.min_y)?;
        let (max_lon, max_lat) = self.unproject(bbox.max_x, bbox.max_y)?;
        Ok(GeoBBox::new(min_lon, min_lat, max_lon, max_lat))
    }

    fn project(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        if !lon.is_finite() || !lat.is_finite() || lat.abs() >= 90.0 {
            return Err(TileError::ProjectionDomain { lon, lat });
        }
        let (x, y) = self.forward.convert((lon, lat))?;
        if !x.is_finite() || !y.is_finite() {
            return Err(TileError::ProjectionDomain { lon, lat });
        }
        Ok((x, y))
    }

    fn unproject(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return Err(TileError::ProjectionDomain { lon: x, lat: y });
        }
        let (lon, lat) = self.inverse.convert((x, y))?;
        if !lon.is_finite() || !lat.is_finite() {
            return Err(TileError::ProjectionDomain { lon: x, lat: y });
        }
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_dimensions() {
        let bbox = GeoBBox::new(-74.1, 40.65, -73.83, 40.87);
        assert!((bbox.width() - 0.27).abs() < 1e-10);
        assert!((bbox.height() - 0.22).abs() < 1e-10);
    }

    #[test]
    fn test_bbox_contains() {
        let outer = GeoBBox::new(-1.0, -1.0, 1.0, 1.0);
        let inner = GeoBBox::new(-0.5, -0.5, 0.5, 0.5);
        assert!(outer.contains(&inner, 0.0));
        assert!(!inner.contains(&outer, 0.0));
        // Tolerance absorbs a slightly protruding edge.
        let slightly_larger = GeoBBox::new(-1.0000001, -1.0, 1.0, 1.0);
        assert!(outer.contains(&slightly_larger, 1e-6));
    }

    #[test]
    fn test_known_mercator_values() {
        let projector = CoordinateProjector::new().unwrap();
        let bbox = GeoBBox::new(0.0, 0.0, 180.0, 85.051128);
        let metric = projector.to_metric(&bbox).unwrap();

        assert!(metric.min_x.abs() < 1e-6);
        assert!(metric.min_y.abs() < 1e-6);
        // Web Mercator world edge.
        assert!((metric.max_x - 20037508.342789244).abs() < 1.0);
        assert!((metric.max_y - 20037508.342789244).abs() < 10.0);
    }

    #[test]
    fn test_round_trip() {
        let projector = CoordinateProjector::new().unwrap();
        let cases = [
            GeoBBox::new(-74.1, 40.65, -73.83, 40.87),
            GeoBBox::new(4.2, 50.7, 4.5, 50.9),
            GeoBBox::new(-0.001, -0.001, 0.001, 0.001),
            GeoBBox::new(170.0, -45.0, 179.0, -40.0),
        ];
        for bbox in cases {
            let metric = projector.to_metric(&bbox).unwrap();
            let back = projector.to_geographic(&metric).unwrap();
            assert!((back.min_lon - bbox.min_lon).abs() < 1e-6);
            assert!((back.min_lat - bbox.min_lat).abs() < 1e-6);
            assert!((back.max_lon - bbox.max_lon).abs() < 1e-6);
            assert!((back.max_lat - bbox.max_lat).abs() < 1e-6);
        }
    }

    #[test]
    fn test_pole_is_out_of_domain() {
        let projector = CoordinateProjector::new().unwrap();
        let bbox = GeoBBox::new(0.0, 0.0, 1.0, 90.0);
        let err = projector.to_metric(&bbox).unwrap_err();
        assert!(matches!(err, TileError::ProjectionDomain { .. }));
    }

    #[test]
    fn test_non_finite_is_out_of_domain() {
        let projector = CoordinateProjector::new().unwrap();
        let bbox = GeoBBox::new(f64::NAN, 0.0, 1.0, 1.0);
        let err = projector.to_metric(&bbox).unwrap_err();
        assert!(matches!(err, TileError::ProjectionDomain { .. }));
    }
}
