use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BiofoulingState, Route};

/// Position label used while a vessel is between waypoints.
pub static IN_TRANSIT: &str = "In Transit";
/// Country label used while a vessel is between waypoints.
pub static INTERNATIONAL_WATERS: &str = "International Waters";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VesselId(String);

impl VesselId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VesselId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl std::fmt::Display for VesselId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub port_name: Option<String>,
    pub country_name: Option<String>,
}

impl VesselPosition {
    pub fn in_transit(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            port_name: Some(IN_TRANSIT.into()),
            country_name: Some(INTERNATIONAL_WATERS.into()),
        }
    }
}

/// Full simulation state of a single vessel. Created on the first `start`
/// and kept for the lifetime of the process; a stop/start cycle resumes from
/// the last written record.
#[derive(Debug, Clone, Serialize)]
pub struct VesselState {
    pub vessel_id: VesselId,
    pub tracking_active: bool,
    pub current_position: VesselPosition,
    pub target_waypoint_index: usize,
    pub course_degrees: f64,
    pub route_progress_percent: f64,
    pub biofouling: BiofoulingState,
    pub last_update_timestamp: DateTime<Utc>,
}

impl VesselState {
    /// Initial state for a vessel that has never been tracked: moored at the
    /// first waypoint of its route with a freshly seeded biofouling record.
    pub fn initial(route: &Route, rng: &mut impl rand::Rng, now: DateTime<Utc>) -> Self {
        let origin = &route.waypoints[0];

        Self {
            vessel_id: route.vessel_id.clone(),
            tracking_active: false,
            current_position: VesselPosition {
                latitude: origin.latitude,
                longitude: origin.longitude,
                port_name: Some(origin.port_name.clone()),
                country_name: Some(origin.country_name.clone()),
            },
            target_waypoint_index: 0,
            course_degrees: 0.0,
            route_progress_percent: 0.0,
            biofouling: BiofoulingState::seed(rng, now),
            last_update_timestamp: now,
        }
    }
}
