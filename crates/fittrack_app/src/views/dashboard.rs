use fittrack_client::{FitTrackClient, SummaryStats, User, Workout};
use tracing::warn;

use crate::components::{stat_card, workout_card};
use crate::error::{AppError, AppResult};

pub const DASHBOARD_ERROR: &str = "Failed to load dashboard data. Please try again later.";
pub const RECENT_WORKOUTS: u32 = 3;

#[derive(Debug, Default)]
pub struct DashboardView {
    pub loading: bool,
    pub error: Option<String>,
    pub stats: Option<SummaryStats>,
    pub recent: Vec<Workout>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Fetch the summary and the latest workouts concurrently; both must succeed.
    pub async fn load(&mut self, client: &dyn FitTrackClient) -> AppResult<()> {
        self.loading = true;
        self.error = None;
        let (stats, page) = tokio::join!(
            client.get_summary_stats(),
            client.list_workouts(1, RECENT_WORKOUTS)
        );
        self.loading = false;
        match (stats, page) {
            (Ok(stats), Ok(page)) => {
                self.stats = Some(stats);
                self.recent = page.workouts;
                Ok(())
            }
            (stats, page) => {
                self.error = Some(DASHBOARD_ERROR.to_string());
                let e = super::decisive_error(stats.err().into_iter().chain(page.err()))
                    .ok_or_else(|| AppError::NotAvailable("dashboard load failed".into()))?;
                warn!(error = %e, "dashboard load failed");
                Err(e.into())
            }
        }
    }

    pub fn render(&self, user: Option<&User>) -> String {
        let mut out = match user {
            Some(u) => format!("Welcome, {}!\n", u.username),
            None => "Welcome!\n".to_string(),
        };
        out.push_str("Track your fitness journey and achieve your goals.\n\n");
        if self.loading {
            out.push_str(super::LOADING_TEXT);
            out.push('\n');
            return out;
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("! {error}\n"));
            return out;
        }
        if let Some(stats) = &self.stats {
            out.push_str("Your Stats\n");
            out.push_str(&stat_card("Total Workouts", stats.total_workouts, None));
            out.push_str(&stat_card(
                "This Month",
                stats.workouts_last_30_days,
                Some("Workouts in the last 30 days"),
            ));
            out.push_str(&stat_card(
                "Total Minutes",
                stats.total_duration_minutes.unwrap_or(0),
                None,
            ));
            out.push_str(&stat_card(
                "Favorite Exercise",
                stats.most_frequent_exercise.as_deref().unwrap_or("None yet"),
                None,
            ));
            out.push('\n');
        }
        out.push_str("Recent Workouts (Add Workout: /workouts/new)\n");
        if self.recent.is_empty() {
            out.push_str("You haven't logged any workouts yet.\n");
        } else {
            for w in &self.recent {
                out.push_str(&workout_card(w));
            }
            out.push_str("View All Workouts: /workouts\n");
        }
        out.push_str("\nQuick Links: Exercise Library (/exercises) | Profile (/profile)\n");
        out
    }
}
