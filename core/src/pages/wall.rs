use super::AppContext;
use crate::types::WallPost;

pub const PUBLISHED_MESSAGE: &str = "Mensaje publicado";

/// Public wall: post list plus the draft being written.
#[derive(Debug, Clone, Default)]
pub struct WallPage {
    posts: Vec<WallPost>,
    pub draft: String,
}

impl WallPage {
    pub fn mount(ctx: &AppContext) -> Self {
        let mut page = Self::default();
        page.load(ctx);
        page
    }

    /// Newest first.
    pub fn posts(&self) -> &[WallPost] {
        &self.posts
    }

    pub fn load(&mut self, ctx: &AppContext) -> bool {
        match ctx.api.list_posts() {
            Ok(mut posts) => {
                posts.reverse();
                self.posts = posts;
                true
            }
            Err(err) => {
                ctx.report(&err);
                false
            }
        }
    }

    /// Publish the draft, signed with the session user's name when signed in.
    /// The draft survives a rejected post.
    pub fn publish(&mut self, ctx: &AppContext) -> bool {
        let author = ctx.session.get().map(|user| user.name);
        match ctx.api.create_post(&self.draft, author.as_deref()) {
            Ok(post) => {
                self.posts.insert(0, post);
                self.draft.clear();
                ctx.success(PUBLISHED_MESSAGE);
                true
            }
            Err(err) => {
                ctx.report(&err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::harness;
    use crate::session::SessionUser;
    use crate::toast::ToastKind;

    #[test]
    fn load_shows_newest_first() {
        let h = harness();
        h.script.push(
            200,
            r#"[{"id":1,"author":"A","content":"uno"},{"id":2,"author":"B","content":"dos"}]"#,
        );
        let page = WallPage::mount(&h.ctx);
        assert_eq!(page.posts()[0].id, 2);
        assert_eq!(page.posts()[1].id, 1);
    }

    #[test]
    fn publish_signs_with_session_name() {
        let h = harness();
        h.script.push(200, "[]");
        let mut page = WallPage::mount(&h.ctx);
        h.ctx.session.set(&SessionUser::named("Alice")).unwrap();
        h.script
            .push(201, r#"{"id":1,"author":"Alice","content":"Hola mundo"}"#);
        page.draft = "Hola mundo".to_string();

        assert!(page.publish(&h.ctx));
        assert_eq!(h.script.last_request().header("X-Author"), Some("Alice"));
        assert_eq!(page.posts()[0].content, "Hola mundo");
        assert!(page.draft.is_empty());
        assert_eq!(
            h.toasts.last(),
            Some((PUBLISHED_MESSAGE.to_string(), ToastKind::Success))
        );
    }

    #[test]
    fn anonymous_publish_has_no_author_header() {
        let h = harness();
        h.script
            .push(201, r#"{"id":1,"author":"Anónimo","content":"hola"}"#);
        let mut page = WallPage::default();
        page.draft = "hola".to_string();
        assert!(page.publish(&h.ctx));
        assert_eq!(h.script.last_request().header("X-Author"), None);
    }

    #[test]
    fn rejected_content_keeps_draft() {
        let h = harness();
        h.script.push(400, r#"{"error":"invalid_content"}"#);
        let mut page = WallPage::default();
        page.draft = "   ".to_string();

        assert!(!page.publish(&h.ctx));
        assert_eq!(page.draft, "   ");
        assert!(page.posts().is_empty());
        assert_eq!(
            h.toasts.last().unwrap().0,
            "El mensaje no puede estar vacío ni superar 500 caracteres"
        );
    }
}
