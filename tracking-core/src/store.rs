use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::{Route, VesselId, VesselState};

/// Shared per-vessel simulation state. Written by each vessel's tick task
/// and read concurrently by status queries; reads always observe a complete
/// record, never a partially written one.
#[derive(Debug, Default)]
pub struct VesselStateStore {
    states: RwLock<HashMap<VesselId, VesselState>>,
}

impl VesselStateStore {
    /// Returns the vessel's state, seeding a fresh one at the route's first
    /// waypoint if none exists yet. Seeding happens at most once per vessel
    /// for the lifetime of the process, so a stop/start cycle resumes from
    /// the last written record.
    pub fn get_or_init(
        &self,
        route: &Route,
        rng: &mut impl Rng,
        now: DateTime<Utc>,
    ) -> VesselState {
        let mut states = self.states.write().unwrap();
        states
            .entry(route.vessel_id.clone())
            .or_insert_with(|| VesselState::initial(route, rng, now))
            .clone()
    }

    /// Cloned snapshot of the vessel's state.
    pub fn get(&self, vessel_id: &VesselId) -> Option<VesselState> {
        self.states.read().unwrap().get(vessel_id).cloned()
    }

    /// Atomically replaces the vessel's full record.
    pub fn put(&self, state: VesselState) {
        self.states
            .write()
            .unwrap()
            .insert(state.vessel_id.clone(), state);
    }

    /// Snapshot of every vessel record, for out-of-tick-path consumers.
    pub fn all(&self) -> Vec<VesselState> {
        self.states.read().unwrap().values().cloned().collect()
    }
}
