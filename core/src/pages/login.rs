use log::warn;

use super::AppContext;
use crate::error::ClientError;
use crate::messages::ErrorKind;
use crate::session::SessionUser;
use crate::types::Credentials;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Demo login. A successful login only records who is signed in for display.
#[derive(Debug, Clone, Default)]
pub struct LoginPage {
    pub form: LoginForm,
}

impl LoginPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored session user on success; failures are toasted.
    pub fn submit(&mut self, ctx: &AppContext) -> Option<SessionUser> {
        let credentials = Credentials {
            email: self.form.email.trim().to_string(),
            password: self.form.password.clone(),
        };
        let user = match ctx.api.login(&credentials).and_then(|body| {
            serde_json::from_value::<SessionUser>(body)
                .map_err(|e| ClientError::Deserialization(e.to_string()))
        }) {
            Ok(user) => user,
            Err(err) => {
                ctx.report(&err);
                return None;
            }
        };

        if let Err(e) = ctx.session.set(&user) {
            warn!("storing session: {e}");
            ctx.error(ErrorKind::Internal.message());
            return None;
        }
        self.form.password.clear();
        ctx.success(&format!("Bienvenido, {}", user.name));
        Some(user)
    }
}
