use log::info;

use super::AppContext;
use crate::error::ClientError;
use crate::types::{CreateUser, User};

pub const REGISTERED_MESSAGE: &str = "Usuario registrado";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    fn payload(&self) -> CreateUser {
        CreateUser {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Registration form. The form is reset only after the server accepts it.
#[derive(Debug, Clone, Default)]
pub struct RegisterPage {
    pub form: RegisterForm,
}

impl RegisterPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, ctx: &AppContext) -> Result<User, ClientError> {
        match ctx.api.create_user(&self.form.payload()) {
            Ok(user) => {
                info!("registered user {}", user.id);
                ctx.success(REGISTERED_MESSAGE);
                self.form = RegisterForm::default();
                Ok(user)
            }
            Err(err) => {
                ctx.report(&err);
                Err(err)
            }
        }
    }
}
