//! Page controllers.
//!
//! # Design
//! Each page is a small state holder plus the calls it makes through
//! `AppContext`. Which controller runs is decided by an explicitly registered
//! factory for the current `Route`, which the host passes in; nothing here
//! looks at ambient location state.

mod home;
mod login;
mod nav;
mod register;
mod users;
mod wall;

use std::collections::HashMap;
use std::sync::Arc;

use crate::api::Api;
use crate::client::RequestClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::messages::error_message;
use crate::session::{KeyValueStorage, SessionStore};
use crate::toast::{Notifier, ToastHost, ToastKind};
use crate::transport::Transport;

pub use home::HomePage;
pub use login::{LoginForm, LoginPage};
pub use nav::NavBar;
pub use register::{RegisterForm, RegisterPage};
pub use users::UsersPage;
pub use wall::WallPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Register,
    Login,
    Users,
    Wall,
}

impl Route {
    /// Parse a location path. Query string, fragment, and a trailing slash
    /// are ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Home),
            "/register" => Some(Route::Register),
            "/login" => Some(Route::Login),
            "/users" => Some(Route::Users),
            "/wall" => Some(Route::Wall),
            _ => None,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Register => "/register",
            Route::Login => "/login",
            Route::Users => "/users",
            Route::Wall => "/wall",
        }
    }
}

/// Services every page reaches through.
pub struct AppContext {
    pub api: Api,
    pub session: Arc<SessionStore>,
    pub notifier: Arc<dyn Notifier + Send + Sync>,
}

impl AppContext {
    pub fn new(
        api: Api,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier + Send + Sync>,
    ) -> Self {
        Self {
            api,
            session,
            notifier,
        }
    }

    pub fn from_config(
        config: &ClientConfig,
        transport: impl Transport + Send + Sync + 'static,
        storage: Arc<dyn KeyValueStorage + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
    ) -> Self {
        let client = RequestClient::new(&config.base_url, transport);
        let session = SessionStore::with_key(storage, &config.session_key);
        Self::new(Api::new(client), Arc::new(session), notifier)
    }

    /// Like `from_config`, with a wall-clock `ToastHost` timed by
    /// `config.toast_duration()`. The host is returned for the UI to poll.
    pub fn with_toast_host(
        config: &ClientConfig,
        transport: impl Transport + Send + Sync + 'static,
        storage: Arc<dyn KeyValueStorage + Send + Sync>,
    ) -> (Self, Arc<ToastHost>) {
        let toasts = Arc::new(ToastHost::new(config.toast_duration()));
        let ctx = Self::from_config(config, transport, storage, toasts.clone());
        (ctx, toasts)
    }

    pub(crate) fn success(&self, message: &str) {
        self.notifier.notify(message, ToastKind::Success);
    }

    pub(crate) fn error(&self, message: &str) {
        self.notifier.notify(message, ToastKind::Error);
    }

    pub(crate) fn report(&self, err: &ClientError) {
        self.error(error_message(err));
    }
}

/// A mounted page.
#[derive(Debug)]
pub enum Page {
    Home(HomePage),
    Register(RegisterPage),
    Login(LoginPage),
    Users(UsersPage),
    Wall(WallPage),
}

pub type PageFactory = fn(&AppContext) -> Page;

/// Route to controller table, filled by explicit registration.
#[derive(Default)]
pub struct PageRegistry {
    factories: HashMap<Route, PageFactory>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every page of the portal.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Route::Home, |ctx| Page::Home(HomePage::mount(ctx)));
        registry.register(Route::Register, |_| Page::Register(RegisterPage::new()));
        registry.register(Route::Login, |_| Page::Login(LoginPage::new()));
        registry.register(Route::Users, |ctx| Page::Users(UsersPage::mount(ctx)));
        registry.register(Route::Wall, |ctx| Page::Wall(WallPage::mount(ctx)));
        registry
    }

    pub fn register(&mut self, route: Route, factory: PageFactory) {
        self.factories.insert(route, factory);
    }

    /// Build the controller for `route`, or `None` when nothing is registered.
    pub fn mount(&self, route: Route, ctx: &AppContext) -> Option<Page> {
        self.factories.get(&route).map(|factory| factory(ctx))
    }

    pub fn mount_path(&self, path: &str, ctx: &AppContext) -> Option<Page> {
        Route::from_path(path).and_then(|route| self.mount(route, ctx))
    }
}
