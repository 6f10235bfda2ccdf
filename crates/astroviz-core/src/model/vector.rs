// ── Cartesian 3-vector ──

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Earth-centered inertial 3-vector. Positions are km, velocities km/s.
///
/// Serializes as a bare `[x, y, z]` array, matching the wire format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3(pub [f64; 3]);

impl Vec3 {
    pub const ZERO: Self = Self([0.0; 3]);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z])
    }

    pub fn x(self) -> f64 {
        self.0[0]
    }

    pub fn y(self) -> f64 {
        self.0[1]
    }

    pub fn z(self) -> f64 {
        self.0[2]
    }

    pub fn norm(self) -> f64 {
        self.0.iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }

    /// Componentwise comparison with an absolute tolerance.
    pub fn approx_eq(self, other: Self, tolerance: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(value: [f64; 3]) -> Self {
        Self(value)
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(value: Vec3) -> Self {
        value.0
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let [x, y, z] = self.0;
        let [rx, ry, rz] = rhs.0;
        Self([x + rx, y + ry, z + rz])
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let [x, y, z] = self.0;
        let [rx, ry, rz] = rhs.0;
        Self([x - rx, y - ry, z - rz])
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        let [x, y, z] = self.0;
        Self([x * rhs, y * rhs, z * rhs])
    }
}
