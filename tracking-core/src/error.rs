use snafu::{Location, Snafu};

use crate::VesselId;

pub type CoreResult<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("vessel '{vessel_id}' does not exist in the route registry"))]
    UnknownVessel {
        #[snafu(implicit)]
        location: Location,
        vessel_id: VesselId,
    },
    #[snafu(display(
        "route for vessel '{vessel_id}' has {num_waypoints} waypoints, at least 2 are required"
    ))]
    MalformedRoute {
        #[snafu(implicit)]
        location: Location,
        vessel_id: VesselId,
        num_waypoints: usize,
    },
}
