//! The coordinator: owns the session store, the current route and page.
//!
//! Navigation runs the route guard, builds the page for the resolved route
//! and awaits its `load` in place. Every page action goes through
//! [`App::settle`], which is the single place that reacts to a rejected
//! session by signing out and moving to `/login`.

use std::sync::Arc;

use chrono::Datelike;
use fittrack_client::{FitTrackClient, Session, TokenStore, User};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::auth::SessionStore;
use crate::components::{footer, header};
use crate::error::{AppError, AppResult};
use crate::route::{AppRoute, GuardDecision, guard};
use crate::views::{
    DashboardView, ExerciseLibraryView, FormMode, LoginView, Outcome, ProfileView, RegisterView,
    WorkoutDetailView, WorkoutFormView, WorkoutListView, not_found,
};

pub const SESSION_ENDED: &str = "Your session has ended. Please sign in again.";
/// Oldest entries are dropped beyond this many.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug)]
pub enum Page {
    Login(LoginView),
    Register(RegisterView),
    Dashboard(DashboardView),
    Workouts(WorkoutListView),
    WorkoutDetail(WorkoutDetailView),
    WorkoutForm(WorkoutFormView),
    Exercises(ExerciseLibraryView),
    Profile(ProfileView),
    NotFound,
}

impl Page {
    pub fn for_route(route: &AppRoute) -> Self {
        match route {
            AppRoute::Login => Page::Login(LoginView::new()),
            AppRoute::Register => Page::Register(RegisterView::new()),
            AppRoute::Dashboard => Page::Dashboard(DashboardView::new()),
            AppRoute::Workouts => Page::Workouts(WorkoutListView::new()),
            AppRoute::WorkoutNew => Page::WorkoutForm(WorkoutFormView::new(FormMode::Create)),
            AppRoute::WorkoutDetail(id) => Page::WorkoutDetail(WorkoutDetailView::new(id.clone())),
            AppRoute::WorkoutEdit(id) => {
                Page::WorkoutForm(WorkoutFormView::new(FormMode::Edit(id.clone())))
            }
            AppRoute::Exercises => Page::Exercises(ExerciseLibraryView::new()),
            AppRoute::Profile => Page::Profile(ProfileView::new()),
            AppRoute::NotFound => Page::NotFound,
        }
    }

    pub async fn load(&mut self, client: &dyn FitTrackClient) -> AppResult<()> {
        match self {
            Page::Dashboard(v) => v.load(client).await,
            Page::Workouts(v) => v.load(client).await,
            Page::WorkoutDetail(v) => v.load(client).await,
            Page::WorkoutForm(v) => v.load(client).await,
            Page::Exercises(v) => v.load(client).await,
            Page::Profile(v) => v.load(client).await,
            Page::Login(_) | Page::Register(_) | Page::NotFound => Ok(()),
        }
    }

    /// The page's inline error message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Page::Login(v) => v.error.as_deref(),
            Page::Register(v) => v.error.as_deref(),
            Page::Dashboard(v) => v.error.as_deref(),
            Page::Workouts(v) => v.error.as_deref(),
            Page::WorkoutDetail(v) => v.error.as_deref(),
            Page::WorkoutForm(v) => v.error.as_deref(),
            Page::Exercises(v) => v.error.as_deref(),
            Page::Profile(v) => v.error.as_deref(),
            Page::NotFound => None,
        }
    }

    pub fn render(&self, user: Option<&User>) -> String {
        match self {
            Page::Login(v) => v.render(),
            Page::Register(v) => v.render(),
            Page::Dashboard(v) => v.render(user),
            Page::Workouts(v) => v.render(),
            Page::WorkoutDetail(v) => v.render(),
            Page::WorkoutForm(v) => v.render(),
            Page::Exercises(v) => v.render(),
            Page::Profile(v) => v.render(),
            Page::NotFound => not_found::render(),
        }
    }
}

pub struct App {
    client: Arc<dyn FitTrackClient>,
    auth: SessionStore,
    route: AppRoute,
    page: Page,
    history: Vec<AppRoute>,
    /// Error of the page that was left because the session ended.
    notice: Option<String>,
    session_ended: bool,
}

macro_rules! on_page {
    ($app:expr, $variant:ident) => {
        match &mut $app.page {
            Page::$variant(view) => view,
            _ => {
                return Err(AppError::NotAvailable(format!(
                    "not on the {} page",
                    stringify!($variant)
                )));
            }
        }
    };
}

impl App {
    pub fn new(
        client: Arc<dyn FitTrackClient>,
        session: Session,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let auth = SessionStore::new(Arc::clone(&client), session, tokens);
        Self {
            client,
            auth,
            route: AppRoute::Login,
            page: Page::Login(LoginView::new()),
            history: Vec::new(),
            notice: None,
            session_ended: false,
        }
    }

    /// Restore the persisted session, then open `initial_path`.
    pub async fn start(&mut self, initial_path: &str) -> AppResult<()> {
        self.auth.initialize().await;
        self.navigate(initial_path).await
    }

    pub fn route(&self) -> &AppRoute {
        &self.route
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn auth(&self) -> &SessionStore {
        &self.auth
    }

    pub fn user(&self) -> Option<&User> {
        self.auth.user()
    }

    pub fn history(&self) -> &[AppRoute] {
        &self.history
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// True after a rejected session forced the move to `/login`, until the next navigation.
    pub fn session_ended(&self) -> bool {
        self.session_ended
    }

    pub async fn navigate(&mut self, path: &str) -> AppResult<()> {
        self.navigate_to(AppRoute::from_path(path)).await
    }

    pub async fn navigate_to(&mut self, route: AppRoute) -> AppResult<()> {
        let route = self.resolve(route).await;
        debug!(route = %route, "navigate");
        self.notice = None;
        self.session_ended = false;
        self.route = route.clone();
        self.record(route.clone());
        self.page = Page::for_route(&route);
        let client = Arc::clone(&self.client);
        let result = self.page.load(client.as_ref()).await;
        self.settle(result.map(|()| Outcome::Stay)).await
    }

    /// Append to the history; repeats of the latest entry are collapsed.
    fn record(&mut self, route: AppRoute) {
        if self.history.last() == Some(&route) {
            return;
        }
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(route);
    }

    /// Re-open the previous route in the history.
    pub async fn back(&mut self) -> AppResult<()> {
        if self.history.len() < 2 {
            return Err(AppError::NotAvailable("no previous page".into()));
        }
        self.history.pop();
        let previous = self.history.pop().unwrap_or_default();
        self.navigate_to(previous).await
    }

    pub async fn reload(&mut self) -> AppResult<()> {
        let route = self.route.clone();
        self.history.pop();
        self.navigate_to(route).await
    }

    /// Run the guard until it settles, restoring the session first if it is still loading.
    async fn resolve(&mut self, mut route: AppRoute) -> AppRoute {
        loop {
            match guard(&route, self.auth.state()) {
                GuardDecision::Render => return route,
                GuardDecision::Redirect(target) => {
                    debug!(from = %route, to = %target, "guard redirect");
                    route = target;
                }
                GuardDecision::Pending => self.auth.initialize().await,
            }
        }
    }

    /// Apply the outcome of a page action, or react to its error.
    async fn settle(&mut self, result: AppResult<Outcome>) -> AppResult<()> {
        match result {
            Ok(Outcome::Stay) => Ok(()),
            Ok(Outcome::Navigate(route)) => Box::pin(self.navigate_to(route)).await,
            Err(err) if err.is_unauthenticated() => {
                let had_session = self.auth.user().is_some();
                self.auth.logout().await;
                if !had_session {
                    // Rejected credentials; the page already shows why.
                    return Err(err);
                }
                warn!(route = %self.route, "session rejected by the server; signing out");
                self.notice = self.page.error().map(str::to_string);
                self.session_ended = true;
                if self.route != AppRoute::Login {
                    self.route = AppRoute::Login;
                    self.record(AppRoute::Login);
                    self.page = Page::Login(LoginView::new());
                }
                Err(err)
            }
            Err(err) => {
                debug!(route = %self.route, error = %err, "action failed");
                Err(err)
            }
        }
    }

    // === Session ===

    pub async fn login(&mut self, username: &str, password: SecretString) -> AppResult<()> {
        if !matches!(self.page, Page::Login(_)) {
            self.navigate_to(AppRoute::Login).await?;
        }
        let view = on_page!(self, Login);
        view.username = username.to_string();
        view.password = password;
        let result = view.submit(&mut self.auth).await;
        self.settle(result).await
    }

    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: SecretString,
        confirm: SecretString,
    ) -> AppResult<()> {
        if !matches!(self.page, Page::Register(_)) {
            self.navigate_to(AppRoute::Register).await?;
        }
        let view = on_page!(self, Register);
        view.username = username.to_string();
        view.email = email.to_string();
        view.password = password;
        view.confirm = confirm;
        let result = view.submit(&mut self.auth).await;
        self.settle(result).await
    }

    pub async fn logout(&mut self) -> AppResult<()> {
        self.auth.logout().await;
        info!("logged out");
        self.navigate_to(AppRoute::auth_failure_redirect()).await
    }

    // === Workouts ===

    pub async fn next_page(&mut self) -> AppResult<()> {
        let client = Arc::clone(&self.client);
        let view = on_page!(self, Workouts);
        let result = view.next_page(client.as_ref()).await;
        self.settle(result.map(|()| Outcome::Stay)).await
    }

    pub async fn prev_page(&mut self) -> AppResult<()> {
        let client = Arc::clone(&self.client);
        let view = on_page!(self, Workouts);
        let result = view.prev_page(client.as_ref()).await;
        self.settle(result.map(|()| Outcome::Stay)).await
    }

    pub fn request_delete(&mut self) -> AppResult<()> {
        on_page!(self, WorkoutDetail).request_delete();
        Ok(())
    }

    pub fn cancel_delete(&mut self) -> AppResult<()> {
        on_page!(self, WorkoutDetail).cancel_delete();
        Ok(())
    }

    pub async fn confirm_delete(&mut self) -> AppResult<()> {
        let client = Arc::clone(&self.client);
        let view = on_page!(self, WorkoutDetail);
        let result = view.confirm_delete(client.as_ref()).await;
        self.settle(result).await
    }

    pub fn workout_form(&mut self) -> AppResult<&mut WorkoutFormView> {
        Ok(on_page!(self, WorkoutForm))
    }

    pub async fn save_workout(&mut self) -> AppResult<()> {
        let client = Arc::clone(&self.client);
        let view = on_page!(self, WorkoutForm);
        let result = view.submit(client.as_ref()).await;
        self.settle(result).await
    }

    // === Exercise library ===

    pub fn exercise_library(&mut self) -> AppResult<&mut ExerciseLibraryView> {
        Ok(on_page!(self, Exercises))
    }

    // === Profile ===

    pub fn profile(&mut self) -> AppResult<&mut ProfileView> {
        Ok(on_page!(self, Profile))
    }

    pub async fn save_profile(&mut self) -> AppResult<()> {
        let view = on_page!(self, Profile);
        let result = view.save(&mut self.auth).await;
        self.settle(result.map(|()| Outcome::Stay)).await
    }

    pub async fn change_password(
        &mut self,
        current: SecretString,
        new: SecretString,
        confirm: SecretString,
    ) -> AppResult<()> {
        let client = Arc::clone(&self.client);
        let view = on_page!(self, Profile);
        view.password.current = current;
        view.password.new = new;
        view.password.confirm = confirm;
        let result = view.change_password(client.as_ref()).await;
        self.settle(result.map(|()| Outcome::Stay)).await
    }

    pub fn render(&self) -> String {
        let mut out = header(self.auth.user());
        out.push_str(&format!("[{}]\n\n", self.route));
        if self.session_ended {
            out.push_str(&format!("! {SESSION_ENDED}\n"));
        }
        if let Some(notice) = &self.notice {
            out.push_str(&format!("! {notice}\n"));
        }
        out.push_str(&self.page.render(self.auth.user()));
        out.push('\n');
        out.push_str(&footer(chrono::Local::now().year()));
        out
    }
}
