use fittrack_client::{FitTrackClient, Workout};
use tracing::warn;

use crate::components::workout_card;
use crate::error::{AppError, AppResult};

pub const WORKOUTS_ERROR: &str = "Failed to load workouts. Please try again later.";
pub const PER_PAGE: u32 = 10;

#[derive(Debug)]
pub struct WorkoutListView {
    pub loading: bool,
    pub error: Option<String>,
    pub workouts: Vec<Workout>,
    pub page: u32,
    pub pages: u32,
    pub total: u64,
}

impl Default for WorkoutListView {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            workouts: Vec::new(),
            page: 1,
            pages: 1,
            total: 0,
        }
    }
}

impl WorkoutListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, client: &dyn FitTrackClient) -> AppResult<()> {
        self.loading = true;
        let result = client.list_workouts(self.page, PER_PAGE).await;
        self.loading = false;
        match result {
            Ok(page) => {
                self.total = page.total.unwrap_or(page.workouts.len() as u64);
                self.pages = page.pages.unwrap_or(1).max(1);
                if let Some(current) = page.page {
                    self.page = current;
                }
                self.workouts = page.workouts;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, page = self.page, "workout list load failed");
                self.error = Some(WORKOUTS_ERROR.to_string());
                Err(e.into())
            }
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub async fn next_page(&mut self, client: &dyn FitTrackClient) -> AppResult<()> {
        if !self.has_next() {
            return Err(AppError::NotAvailable("already on the last page".into()));
        }
        self.page += 1;
        let result = self.load(client).await;
        if result.is_err() {
            self.page -= 1;
        }
        result
    }

    pub async fn prev_page(&mut self, client: &dyn FitTrackClient) -> AppResult<()> {
        if !self.has_prev() {
            return Err(AppError::NotAvailable("already on the first page".into()));
        }
        self.page -= 1;
        let result = self.load(client).await;
        if result.is_err() {
            self.page += 1;
        }
        result
    }

    pub fn render(&self) -> String {
        let mut out = String::from("My Workouts (Add Workout: /workouts/new)\n\n");
        if self.loading {
            out.push_str(super::LOADING_TEXT);
            out.push('\n');
            return out;
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("! {error}\n"));
        }
        if self.workouts.is_empty() && self.error.is_none() {
            out.push_str("You haven't logged any workouts yet.\n");
        }
        for w in &self.workouts {
            out.push_str(&workout_card(w));
        }
        if self.pages > 1 {
            out.push_str(&format!(
                "\nPage {} of {} ({} workouts)",
                self.page, self.pages, self.total
            ));
            if self.has_prev() {
                out.push_str("  [prev]");
            }
            if self.has_next() {
                out.push_str("  [next]");
            }
            out.push('\n');
        }
        out
    }
}
