use crate::core::types::{Extent, Point3};

/// Orthographic camera orbiting the unit data cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            elevation_deg: 30.0,
            azimuth_deg: -60.0,
        }
    }
}

/// Screen-space result of projecting one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f64,
    /// Grows upwards.
    pub y: f64,
    /// Grows towards the viewer.
    pub depth: f64,
}

impl Camera {
    #[must_use]
    pub fn project(self, point: Point3) -> Projected {
        let azimuth = self.azimuth_deg.to_radians();
        let elevation = self.elevation_deg.to_radians();
        let rx = point.x * azimuth.cos() - point.y * azimuth.sin();
        let ry = point.x * azimuth.sin() + point.y * azimuth.cos();
        Projected {
            x: rx,
            y: point.z * elevation.cos() - ry * elevation.sin(),
            depth: ry * elevation.cos() + point.z * elevation.sin(),
        }
    }
}

/// Maps data coordinates into the `[-1, 1]` cube, axis by axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeNormalizer {
    pub x: Extent,
    pub y: Extent,
    pub z: Extent,
}

impl CubeNormalizer {
    /// Returns `None` when the points are empty or not finite.
    #[must_use]
    pub fn fit(points: &[Point3]) -> Option<Self> {
        Some(Self {
            x: Extent::of(points.iter().map(|point| point.x))?.padded(0.0),
            y: Extent::of(points.iter().map(|point| point.y))?.padded(0.0),
            z: Extent::of(points.iter().map(|point| point.z))?.padded(0.0),
        })
    }

    #[must_use]
    pub fn normalize(self, point: Point3) -> Point3 {
        Point3::new(
            to_unit(point.x, self.x),
            to_unit(point.y, self.y),
            to_unit(point.z, self.z),
        )
    }
}

fn to_unit(value: f64, extent: Extent) -> f64 {
    (value - extent.min) / extent.span() * 2.0 - 1.0
}
