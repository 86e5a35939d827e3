use serde::{Deserialize, Serialize};

use crate::{MeshError, ParameterSnapshot, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<(f64, f64, f64)> for Point3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

/// Number of samples along each parametric axis. Only built through
/// [`Resolution::new`], which requires at least two samples per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    u_count: usize,
    v_count: usize,
}

impl Resolution {
    pub fn new(u_count: usize, v_count: usize) -> Result<Self, MeshError> {
        if u_count <= 1 || v_count <= 1 {
            return Err(MeshError::InvalidResolution { u_count, v_count });
        }
        Ok(Self { u_count, v_count })
    }

    pub fn u_count(&self) -> usize {
        self.u_count
    }

    pub fn v_count(&self) -> usize {
        self.v_count
    }

    pub fn vertex_count(&self) -> usize {
        self.u_count * self.v_count
    }

    /// Grid edges: every horizontal and vertical neighbour pair.
    pub fn edge_count(&self) -> usize {
        self.u_count * (self.v_count - 1) + self.v_count * (self.u_count - 1)
    }
}

/// Closed sampling interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, axis: char) -> Result<(), MeshError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(MeshError::InvalidDomain {
                axis,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Sample `index` of `count` evenly spaced samples. The endpoints are exact.
    pub fn sample(&self, index: usize, count: usize) -> f64 {
        let last = count.saturating_sub(1);
        if index == 0 || last == 0 {
            return self.min;
        }
        if index >= last {
            return self.max;
        }
        self.min + (self.max - self.min) * (index as f64 / last as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Domain {
    pub u: Interval,
    pub v: Interval,
}

impl Domain {
    pub fn new(u: Interval, v: Interval) -> Result<Self, MeshError> {
        u.validate('u')?;
        v.validate('v')?;
        Ok(Self { u, v })
    }
}

/// Pair of grid indices `(i, j)` joined by one wireframe segment.
pub type Edge = ((usize, usize), (usize, usize));

/// Wireframe grid sampled from a surface. Only vertices are stored; edges
/// follow from grid adjacency and no faces are produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mesh {
    resolution: Resolution,
    domain: Domain,
    vertices: Vec<Vec<Point3>>,
}

impl Mesh {
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Vertex rows indexed `[i][j]` with `i` along `u` and `j` along `v`.
    pub fn rows(&self) -> &[Vec<Point3>] {
        &self.vertices
    }

    pub fn vertex(&self, i: usize, j: usize) -> Option<Point3> {
        self.vertices.get(i).and_then(|row| row.get(j)).copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.iter().map(Vec::len).sum()
    }

    pub fn edge_count(&self) -> usize {
        self.resolution.edge_count()
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let u_count = self.resolution.u_count;
        let v_count = self.resolution.v_count;
        (0..u_count).flat_map(move |i| {
            (0..v_count).flat_map(move |j| {
                let along_v = (j + 1 < v_count).then_some(((i, j), (i, j + 1)));
                let along_u = (i + 1 < u_count).then_some(((i, j), (i + 1, j)));
                along_v.into_iter().chain(along_u)
            })
        })
    }

    /// Axis-aligned bounds as `(min, max)` corners.
    pub fn bounds(&self) -> (Point3, Point3) {
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for point in self.vertices.iter().flatten() {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            min.z = min.z.min(point.z);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
            max.z = max.z.max(point.z);
        }
        (min, max)
    }
}

/// Samples `surface` over `domain` at `resolution`.
///
/// Memoryless: the result depends only on the arguments, so the same snapshot
/// always reproduces the same vertices bit for bit.
pub fn generate<S>(
    resolution: Resolution,
    domain: Domain,
    params: &ParameterSnapshot,
    surface: &S,
) -> Mesh
where
    S: Surface + ?Sized,
{
    let vertices = (0..resolution.u_count)
        .map(|i| {
            let u = domain.u.sample(i, resolution.u_count);
            (0..resolution.v_count)
                .map(|j| {
                    let v = domain.v.sample(j, resolution.v_count);
                    surface.evaluate(u, v, params)
                })
                .collect()
        })
        .collect();

    Mesh {
        resolution,
        domain,
        vertices,
    }
}

/// Fixed sampling layout reused for every frame of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshGenerator {
    resolution: Resolution,
    domain: Domain,
}

impl MeshGenerator {
    pub fn new(resolution: Resolution, domain: Domain) -> Self {
        Self { resolution, domain }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn generate<S>(&self, params: &ParameterSnapshot, surface: &S) -> Mesh
    where
        S: Surface + ?Sized,
    {
        generate(self.resolution, self.domain, params, surface)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    fn plane(u: f64, v: f64, params: &ParameterSnapshot) -> Point3 {
        Point3::new(u, v, params.value_or("amp", 0.0) * u * v)
    }

    fn layout(u_count: usize, v_count: usize) -> MeshGenerator {
        MeshGenerator::new(
            Resolution::new(u_count, v_count).unwrap(),
            Domain::new(Interval::new(-PI, PI), Interval::new(-1.0, 1.0)).unwrap(),
        )
    }

    #[test]
    fn rejects_degenerate_resolution() {
        assert_eq!(
            Resolution::new(1, 4),
            Err(MeshError::InvalidResolution {
                u_count: 1,
                v_count: 4
            })
        );
        assert!(Resolution::new(4, 0).is_err());
        assert!(Resolution::new(2, 2).is_ok());
    }

    #[test]
    fn rejects_inverted_domain() {
        let err = Domain::new(Interval::new(1.0, -1.0), Interval::new(0.0, 1.0)).unwrap_err();
        assert!(matches!(err, MeshError::InvalidDomain { axis: 'u', .. }));
        assert!(Domain::new(Interval::new(0.0, 1.0), Interval::new(0.0, f64::NAN)).is_err());
    }

    #[test]
    fn samples_include_exact_endpoints() {
        let interval = Interval::new(-PI, PI);
        assert_eq!(interval.sample(0, 60), -PI);
        assert_eq!(interval.sample(59, 60), PI);
        assert!((interval.sample(1, 3) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn vertex_grid_matches_resolution() {
        let mesh = layout(5, 3).generate(&ParameterSnapshot::new(), &plane);
        assert_eq!(mesh.rows().len(), 5);
        assert!(mesh.rows().iter().all(|row| row.len() == 3));
        assert_eq!(mesh.vertex_count(), 15);
        assert_eq!(mesh.vertex(0, 0), Some(Point3::new(-PI, -1.0, 0.0)));
        assert_eq!(mesh.vertex(4, 2), Some(Point3::new(PI, 1.0, 0.0)));
        assert_eq!(mesh.vertex(5, 0), None);
    }

    #[test]
    fn edges_follow_grid_adjacency() {
        let mesh = layout(4, 3).generate(&ParameterSnapshot::new(), &plane);
        let edges: Vec<_> = mesh.edges().collect();
        assert_eq!(edges.len(), mesh.edge_count());
        assert_eq!(edges.len(), 4 * 2 + 3 * 3);
        for ((i0, j0), (i1, j1)) in edges {
            assert_eq!(i1.abs_diff(i0) + j1.abs_diff(j0), 1);
        }
    }

    #[test]
    fn regeneration_is_bit_identical() {
        let generator = layout(16, 9);
        let params = ParameterSnapshot::new().with("amp", 0.123_456_789);
        let first = generator.generate(&params, &plane);
        let second = generator.generate(&params, &plane);
        for (a, b) in first.rows().iter().flatten().zip(second.rows().iter().flatten()) {
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
            assert_eq!(a.z.to_bits(), b.z.to_bits());
        }
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mesh = layout(4, 4).generate(&ParameterSnapshot::new(), &plane);
        let (min, max) = mesh.bounds();
        assert_eq!(min.x, -PI);
        assert_eq!(max.x, PI);
        assert_eq!(min.y, -1.0);
        assert_eq!(max.y, 1.0);
    }
}
