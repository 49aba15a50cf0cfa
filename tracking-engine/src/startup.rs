use std::sync::Arc;
use std::time::Duration;

use snafu::ResultExt;
use tracing::{error, info, instrument};
use tracking_core::RouteRegistry;

use crate::error::{Result, RouteConfigurationSnafu};
use crate::scheduler::TrackingScheduler;
use crate::settings::Settings;

pub struct App {
    scheduler: Arc<TrackingScheduler>,
    status_report_interval: Duration,
}

impl App {
    pub fn build(settings: Settings) -> Result<App> {
        let registry = RouteRegistry::new(settings.routes).context(RouteConfigurationSnafu)?;

        info!(
            num_vessels = registry.len(),
            environment = %settings.environment,
            "route registry loaded"
        );

        Ok(App {
            scheduler: Arc::new(TrackingScheduler::new(
                registry,
                settings.tick_interval,
                settings.bounding_box,
            )),
            status_report_interval: settings.status_report_interval,
        })
    }

    pub fn scheduler(&self) -> &Arc<TrackingScheduler> {
        &self.scheduler
    }

    /// Starts fleet-wide tracking and logs a periodic status digest until
    /// ctrl-c, then joins every tick task before returning. The digest runs
    /// outside the tick path; it only reads store snapshots.
    pub async fn run(self) {
        let outcomes = self.scheduler.start_all(None);
        for (vessel_id, outcome) in outcomes {
            info!(%vessel_id, %outcome, "fleet startup");
        }

        let mut report = tokio::time::interval(self.status_report_interval);
        report.tick().await;

        loop {
            tokio::select! {
                _ = report.tick() => self.log_fleet_digest(),
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        error!("failed to listen for shutdown signal: {e:?}");
                    }
                    break;
                }
            }
        }

        info!("shutting down, stopping all vessel tracking");
        self.scheduler.stop_all().await;
    }

    #[instrument(skip_all)]
    fn log_fleet_digest(&self) {
        let stats = self.scheduler.stats();
        info!(
            total_vessels = stats.total_vessels,
            active_count = stats.active_count,
            "fleet status"
        );

        for (vessel_id, status) in self.scheduler.all_statuses() {
            let Some(state) = status.state else { continue };
            info!(
                %vessel_id,
                latitude = state.current_position.latitude,
                longitude = state.current_position.longitude,
                course = state.course_degrees,
                progress = state.route_progress_percent,
                fouling = state.biofouling.fouling_percent,
                fouling_class = %state.biofouling.fouling_class,
                "vessel position"
            );
        }
    }
}
