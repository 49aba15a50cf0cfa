use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::Display;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};
use tracking_core::{
    CoreResult, Route, RouteRegistry, UnknownVesselSnafu, VesselId, VesselState, VesselStateStore,
};

use crate::settings::BoundingBox;
use crate::updater::advance_vessel;

/// Outcome of a start command. Starting an already tracked vessel is an
/// idempotent no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartOutcome {
    #[strum(serialize = "tracking started")]
    Started,
    #[strum(serialize = "vessel is already being tracked")]
    AlreadyTracking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopOutcome {
    #[strum(serialize = "tracking stopped")]
    Stopped,
    #[strum(serialize = "vessel is not being tracked")]
    NotTracking,
}

/// Live-timer bookkeeping for one actively tracked vessel. At most one
/// exists per vessel at any time.
#[derive(Debug)]
struct TrackingHandle {
    interval: Duration,
    started_at: DateTime<Utc>,
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Combined view of a vessel for status queries: state snapshot, route
/// metadata and whether a tracking timer currently exists. `state` is `None`
/// for vessels that have never been started.
#[derive(Debug, Clone, Serialize)]
pub struct VesselStatus {
    pub vessel_id: VesselId,
    pub display_name: String,
    pub vessel_class: String,
    pub cruise_speed_knots: f64,
    pub num_waypoints: usize,
    pub tracking_active: bool,
    pub state: Option<VesselState>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackingStats {
    pub total_vessels: usize,
    pub active_count: usize,
    pub available_vessel_ids: Vec<VesselId>,
    pub waypoint_counts: HashMap<VesselId, usize>,
    pub bounding_box: Option<BoundingBox>,
}

/// Owns the per-vessel tracking timers and the shared vessel state store.
/// Start/stop mutate only the handle table; status queries only read the
/// store, so both are safe to call concurrently with ticking.
#[derive(Debug)]
pub struct TrackingScheduler {
    registry: RouteRegistry,
    store: Arc<VesselStateStore>,
    handles: Mutex<HashMap<VesselId, TrackingHandle>>,
    default_tick_interval: Duration,
    bounding_box: Option<BoundingBox>,
}

impl TrackingScheduler {
    pub fn new(
        registry: RouteRegistry,
        default_tick_interval: Duration,
        bounding_box: Option<BoundingBox>,
    ) -> TrackingScheduler {
        TrackingScheduler {
            registry,
            store: Arc::new(VesselStateStore::default()),
            handles: Mutex::new(HashMap::new()),
            default_tick_interval,
            bounding_box,
        }
    }

    /// Begins periodic tracking of a vessel, seeding its state at the first
    /// waypoint of its route if it has never been tracked before. Must be
    /// called within a tokio runtime.
    pub fn start(
        &self,
        vessel_id: &VesselId,
        interval: Option<Duration>,
    ) -> CoreResult<StartOutcome> {
        let Some(route) = self.registry.get(vessel_id) else {
            return UnknownVesselSnafu {
                vessel_id: vessel_id.clone(),
            }
            .fail();
        };
        Ok(self.start_route(route, interval))
    }

    fn start_route(&self, route: &Route, interval: Option<Duration>) -> StartOutcome {
        let interval = interval.unwrap_or(self.default_tick_interval);

        let mut handles = self.handles.lock().unwrap();
        if handles.contains_key(&route.vessel_id) {
            return StartOutcome::AlreadyTracking;
        }

        let mut state = self
            .store
            .get_or_init(route, &mut rand::rng(), Utc::now());
        state.tracking_active = true;
        self.store.put(state);

        let (cancel, cancel_rx) = watch::channel(false);
        let task = tokio::spawn(tick_loop(
            route.clone(),
            Arc::clone(&self.store),
            interval,
            cancel_rx,
        ));

        handles.insert(
            route.vessel_id.clone(),
            TrackingHandle {
                interval,
                started_at: Utc::now(),
                cancel,
                task,
            },
        );

        info!(
            vessel_id = %route.vessel_id,
            interval_secs = interval.as_secs_f64(),
            "started vessel tracking"
        );
        StartOutcome::Started
    }

    /// Stops a vessel's tracking timer and waits for its task to finish, so
    /// no tick can execute after this returns. The vessel's state is kept; a
    /// later start resumes from the last known position.
    pub async fn stop(&self, vessel_id: &VesselId) -> StopOutcome {
        let handle = self.handles.lock().unwrap().remove(vessel_id);
        let Some(handle) = handle else {
            return StopOutcome::NotTracking;
        };

        let uptime = Utc::now() - handle.started_at;
        let _ = handle.cancel.send(true);
        if let Err(e) = handle.task.await {
            if e.is_panic() {
                error!(%vessel_id, "tick task for vessel panicked: {e:?}");
            }
        }

        // The task has been joined, nothing can overwrite this record.
        if let Some(mut state) = self.store.get(vessel_id) {
            state.tracking_active = false;
            self.store.put(state);
        }

        info!(%vessel_id, uptime_secs = uptime.num_seconds(), "stopped vessel tracking");
        StopOutcome::Stopped
    }

    /// Starts every vessel in the registry, collecting a per-vessel outcome
    /// map. One vessel's outcome never affects another's.
    pub fn start_all(&self, interval: Option<Duration>) -> HashMap<VesselId, StartOutcome> {
        self.registry
            .all_routes()
            .map(|route| (route.vessel_id.clone(), self.start_route(route, interval)))
            .collect()
    }

    pub async fn stop_all(&self) -> HashMap<VesselId, StopOutcome> {
        let vessel_ids: Vec<VesselId> = self.registry.all_vessel_ids().cloned().collect();

        let mut outcomes = HashMap::with_capacity(vessel_ids.len());
        for vessel_id in vessel_ids {
            let outcome = self.stop(&vessel_id).await;
            outcomes.insert(vessel_id, outcome);
        }
        outcomes
    }

    pub fn status(&self, vessel_id: &VesselId) -> CoreResult<VesselStatus> {
        let Some(route) = self.registry.get(vessel_id) else {
            return UnknownVesselSnafu {
                vessel_id: vessel_id.clone(),
            }
            .fail();
        };
        Ok(self.route_status(route))
    }

    pub fn all_statuses(&self) -> HashMap<VesselId, VesselStatus> {
        self.registry
            .all_routes()
            .map(|route| (route.vessel_id.clone(), self.route_status(route)))
            .collect()
    }

    fn route_status(&self, route: &Route) -> VesselStatus {
        VesselStatus {
            vessel_id: route.vessel_id.clone(),
            display_name: route.display_name.clone(),
            vessel_class: route.vessel_class.clone(),
            cruise_speed_knots: route.cruise_speed_knots,
            num_waypoints: route.waypoints.len(),
            tracking_active: self.handles.lock().unwrap().contains_key(&route.vessel_id),
            state: self.store.get(&route.vessel_id),
        }
    }

    pub fn stats(&self) -> TrackingStats {
        let mut available_vessel_ids: Vec<VesselId> =
            self.registry.all_vessel_ids().cloned().collect();
        available_vessel_ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        TrackingStats {
            total_vessels: self.registry.len(),
            active_count: self.handles.lock().unwrap().len(),
            available_vessel_ids,
            waypoint_counts: self
                .registry
                .all_routes()
                .map(|r| (r.vessel_id.clone(), r.waypoints.len()))
                .collect(),
            bounding_box: self.bounding_box,
        }
    }

    /// Tick interval of a vessel's live timer, if it has one.
    pub fn tracking_interval(&self, vessel_id: &VesselId) -> Option<Duration> {
        self.handles
            .lock()
            .unwrap()
            .get(vessel_id)
            .map(|h| h.interval)
    }
}

async fn tick_loop(
    route: Route,
    store: Arc<VesselStateStore>,
    interval: Duration,
    mut cancel: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick resolves immediately; skip it so the current state
    // stands for one full interval.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.changed() => break,
            _ = ticker.tick() => run_tick(&route, &store, interval),
        }
    }
}

#[instrument(skip_all, fields(vessel_id = %route.vessel_id))]
fn run_tick(route: &Route, store: &VesselStateStore, interval: Duration) {
    let Some(state) = store.get(&route.vessel_id) else {
        warn!("no state snapshot for vessel, skipping tick");
        return;
    };

    let updated = advance_vessel(&state, route, Utc::now(), interval, &mut rand::rng());
    store.put(updated);
}
