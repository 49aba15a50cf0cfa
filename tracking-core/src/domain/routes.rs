use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{CoreResult, VesselId, error::MalformedRouteSnafu};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub port_name: String,
    pub country_name: String,
}

/// The ordered, cyclic sequence of waypoints a vessel patrols. Immutable
/// after registry construction; after the last waypoint navigation returns
/// to index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub vessel_id: VesselId,
    pub display_name: String,
    pub waypoints: Vec<Waypoint>,
    pub cruise_speed_knots: f64,
    pub vessel_class: String,
}

impl Route {
    /// Index of the waypoint after `index`, wrapping past the end.
    pub fn next_waypoint_index(&self, index: usize) -> usize {
        (index + 1) % self.waypoints.len()
    }
}

/// Immutable vessel id to route mapping, built once at startup from static
/// configuration.
#[derive(Debug)]
pub struct RouteRegistry {
    routes: HashMap<VesselId, Route>,
}

impl RouteRegistry {
    /// Rejects any route with fewer than two waypoints, a configuration
    /// error that must be fatal at startup.
    pub fn new(routes: Vec<Route>) -> CoreResult<Self> {
        for route in &routes {
            if route.waypoints.len() < 2 {
                return MalformedRouteSnafu {
                    vessel_id: route.vessel_id.clone(),
                    num_waypoints: route.waypoints.len(),
                }
                .fail();
            }
        }

        Ok(Self {
            routes: routes
                .into_iter()
                .map(|r| (r.vessel_id.clone(), r))
                .collect(),
        })
    }

    pub fn get(&self, vessel_id: &VesselId) -> Option<&Route> {
        self.routes.get(vessel_id)
    }

    pub fn all_vessel_ids(&self) -> impl Iterator<Item = &VesselId> {
        self.routes.keys()
    }

    pub fn all_routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
