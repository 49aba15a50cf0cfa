use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracking_core::{
    Route, VesselPosition, VesselState, destination, distance_km, initial_bearing,
};

/// Knots to simulation step factor inherited from the dashboard behavior
/// this engine reproduces.
static KNOTS_TO_STEP_DEGREES: f64 = 0.0002777778;

/// Computes one simulation step for a vessel: either project it along the
/// bearing towards its next waypoint, or snap it onto the waypoint when
/// within one step of it, then grow its hull fouling by the elapsed time.
///
/// The step size is degree-valued but is compared directly against the
/// kilometre-valued haversine distance and reused (converted to radians) as
/// the angular input of the forward projection. This unit mix is the
/// observed behavior being simulated and must not be corrected here.
pub fn advance_vessel(
    state: &VesselState,
    route: &Route,
    now: DateTime<Utc>,
    tick_interval: Duration,
    rng: &mut impl Rng,
) -> VesselState {
    let next_index = route.next_waypoint_index(state.target_waypoint_index);
    let next_waypoint = &route.waypoints[next_index];

    let position = &state.current_position;
    let distance_to_next = distance_km(
        position.latitude,
        position.longitude,
        next_waypoint.latitude,
        next_waypoint.longitude,
    );

    let step_degrees =
        route.cruise_speed_knots * KNOTS_TO_STEP_DEGREES * (tick_interval.as_secs_f64() / 3600.0);

    let mut updated = state.clone();

    if distance_to_next < step_degrees {
        updated.current_position = VesselPosition {
            latitude: next_waypoint.latitude,
            longitude: next_waypoint.longitude,
            port_name: Some(next_waypoint.port_name.clone()),
            country_name: Some(next_waypoint.country_name.clone()),
        };
        updated.target_waypoint_index = next_index;
        updated.route_progress_percent = next_index as f64 / route.waypoints.len() as f64 * 100.0;
    } else {
        let bearing = initial_bearing(
            position.latitude,
            position.longitude,
            next_waypoint.latitude,
            next_waypoint.longitude,
        );
        let (latitude, longitude) = destination(
            position.latitude,
            position.longitude,
            bearing,
            step_degrees.to_radians(),
        );

        updated.current_position = VesselPosition::in_transit(latitude, longitude);
        updated.course_degrees = bearing;
    }

    let elapsed_hours = (now - state.last_update_timestamp)
        .num_milliseconds()
        .max(0) as f64
        / 3_600_000.0;
    updated.biofouling = state.biofouling.clone().advance(elapsed_hours, rng);
    updated.last_update_timestamp = now;

    updated
}
