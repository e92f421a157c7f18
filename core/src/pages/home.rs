use super::AppContext;

/// Landing page: greets the signed-in user, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomePage {
    greeting: Option<String>,
}

impl HomePage {
    pub fn mount(ctx: &AppContext) -> Self {
        let greeting = ctx.session.get().map(|user| format!("Hola, {}", user.name));
        Self { greeting }
    }

    pub fn greeting(&self) -> Option<&str> {
        self.greeting.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::harness;
    use crate::session::SessionUser;

    #[test]
    fn greets_session_user() {
        let h = harness();
        assert_eq!(HomePage::mount(&h.ctx).greeting(), None);

        h.ctx.session.set(&SessionUser::named("Alice")).unwrap();
        assert_eq!(HomePage::mount(&h.ctx).greeting(), Some("Hola, Alice"));
    }
}
