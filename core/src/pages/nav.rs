use std::sync::{Arc, Mutex};

use log::warn;

use super::AppContext;
use crate::messages::ErrorKind;

pub const LOGIN_LABEL: &str = "Iniciar sesión";
pub const LOGGED_OUT_MESSAGE: &str = "Sesión cerrada";

/// The auth link in the page header.
///
/// Follows the session store through a subscription, so a login on another
/// page or a storage event from another writer updates the label.
#[derive(Debug, Clone)]
pub struct NavBar {
    user_name: Arc<Mutex<Option<String>>>,
}

impl NavBar {
    pub fn attach(ctx: &AppContext) -> Self {
        let initial = ctx.session.get().map(|user| user.name);
        let user_name = Arc::new(Mutex::new(initial));
        let shared = user_name.clone();
        ctx.session.subscribe(move |user| {
            *shared.lock().unwrap_or_else(|p| p.into_inner()) = user.map(|u| u.name.clone());
        });
        Self { user_name }
    }

    pub fn is_signed_in(&self) -> bool {
        self.current().is_some()
    }

    pub fn label(&self) -> String {
        match self.current() {
            Some(name) => format!("Cerrar sesión ({name})"),
            None => LOGIN_LABEL.to_string(),
        }
    }

    /// Re-read the store, for hosts that do not forward storage events.
    pub fn sync(&self, ctx: &AppContext) {
        *self.user_name.lock().unwrap_or_else(|p| p.into_inner()) =
            ctx.session.get().map(|user| user.name);
    }

    pub fn logout(&self, ctx: &AppContext) {
        match ctx.session.clear() {
            Ok(()) => ctx.success(LOGGED_OUT_MESSAGE),
            Err(e) => {
                warn!("clearing session: {e}");
                ctx.error(ErrorKind::Internal.message());
            }
        }
    }

    fn current(&self) -> Option<String> {
        self.user_name
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}
