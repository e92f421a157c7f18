use super::AppContext;
use crate::types::{UpdateUser, User};

pub const DELETED_MESSAGE: &str = "Usuario eliminado";
pub const UPDATED_MESSAGE: &str = "Usuario actualizado";

/// Users table. Rows change only after the server confirms.
#[derive(Debug, Clone, Default)]
pub struct UsersPage {
    rows: Vec<User>,
}

impl UsersPage {
    pub fn mount(ctx: &AppContext) -> Self {
        let mut page = Self::default();
        page.load(ctx);
        page
    }

    pub fn rows(&self) -> &[User] {
        &self.rows
    }

    /// Refresh the table. On failure the previous rows stay.
    pub fn load(&mut self, ctx: &AppContext) -> bool {
        match ctx.api.list_users() {
            Ok(users) => {
                self.rows = users;
                true
            }
            Err(err) => {
                ctx.report(&err);
                false
            }
        }
    }

    pub fn delete(&mut self, ctx: &AppContext, id: u64) -> bool {
        match ctx.api.delete_user(id) {
            Ok(()) => {
                self.rows.retain(|user| user.id != id);
                ctx.success(DELETED_MESSAGE);
                true
            }
            Err(err) => {
                ctx.report(&err);
                false
            }
        }
    }

    pub fn rename(&mut self, ctx: &AppContext, id: u64, name: &str) -> bool {
        let input = UpdateUser {
            name: Some(name.trim().to_string()),
            ..UpdateUser::default()
        };
        match ctx.api.update_user(id, &input) {
            Ok(updated) => {
                if let Some(row) = self.rows.iter_mut().find(|user| user.id == id) {
                    *row = updated;
                }
                ctx.success(UPDATED_MESSAGE);
                true
            }
            Err(err) => {
                ctx.report(&err);
                false
            }
        }
    }
}
