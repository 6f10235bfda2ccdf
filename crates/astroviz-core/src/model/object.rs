// ── Tracked object domain types ──

use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::approach::CloseApproach;
use super::vector::Vec3;

/// Stable identity of a tracked object. Never changes once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ObjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for ObjectId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Classification. Fixed at creation; updates never change it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ObjectKind {
    Satellite,
    Debris,
    RocketBody,
}

/// Health classification, supplied by the daemon and never derived locally.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthStatus {
    Nominal,
    Warning,
    Critical,
}

/// Subsystem health. Ratios are saturations in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub status: HealthStatus,
    pub battery: f64,
    pub thermal: f64,
    pub comms: f64,
    pub last_contact: DateTime<Utc>,
}

/// A satellite, debris fragment, or rocket body with its last known state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedObject {
    pub id: ObjectId,
    pub norad_id: u32,
    pub name: String,
    pub kind: ObjectKind,
    /// km, Earth-centered inertial.
    pub position: Vec3,
    /// km/s, same frame.
    pub velocity: Vec3,
    pub health: HealthRecord,
    /// Close approaches naming this object, ordered by time.
    #[serde(default)]
    pub close_approaches: Vec<CloseApproach>,
}

impl TrackedObject {
    pub fn is_debris(&self) -> bool {
        self.kind == ObjectKind::Debris
    }

    pub fn status(&self) -> HealthStatus {
        self.health.status
    }
}
