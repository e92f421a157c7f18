//! End-to-end flows against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the page controllers
//! over real HTTP through `UreqTransport`. Catches drift between the core's
//! DTOs and the server's schema.

use std::sync::{Arc, Mutex};

use portal_core::pages::{LoginPage, NavBar, RegisterPage, UsersPage, WallPage};
use portal_core::{
    AppContext, ClientConfig, ClientError, MemoryStorage, Notifier, PageRegistry, Route,
    ToastKind, UreqTransport,
};

#[derive(Default)]
struct Toasts(Mutex<Vec<(String, ToastKind)>>);

impl Toasts {
    fn last(&self) -> (String, ToastKind) {
        self.0.lock().unwrap().last().cloned().unwrap()
    }
}

impl Notifier for Toasts {
    fn notify(&self, message: &str, kind: ToastKind) {
        self.0.lock().unwrap().push((message.to_string(), kind));
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn context(base_url: String) -> (AppContext, Arc<Toasts>) {
    let config = ClientConfig {
        base_url,
        ..ClientConfig::default()
    };
    let toasts = Arc::new(Toasts::default());
    let ctx = AppContext::from_config(
        &config,
        UreqTransport::new(),
        Arc::new(MemoryStorage::new()),
        toasts.clone(),
    );
    (ctx, toasts)
}

#[test]
fn portal_flow() {
    let (ctx, toasts) = context(start_server());
    let nav = NavBar::attach(&ctx);

    // Step 1: register Alice.
    let mut register = RegisterPage::new();
    register.form.name = "Alice".to_string();
    register.form.email = "alice@example.com".to_string();
    register.form.password = "Secret123".to_string();
    let alice = register.submit(&ctx).unwrap();
    assert_eq!(alice.name, "Alice");
    assert!(register.form.email.is_empty(), "form resets on success");

    // Step 2: registering the same email again is a 409 with the form intact.
    register.form.name = "Alice Again".to_string();
    register.form.email = "alice@example.com".to_string();
    register.form.password = "Secret123".to_string();
    let err = register.submit(&ctx).unwrap_err();
    assert!(matches!(err, ClientError::Api(ref e) if e.status == 409));
    assert_eq!(
        toasts.last(),
        ("Ese correo ya está registrado".to_string(), ToastKind::Error)
    );
    assert_eq!(register.form.email, "alice@example.com");

    // Step 3: a wrong password is rejected and leaves no session.
    let mut login = LoginPage::new();
    login.form.email = "alice@example.com".to_string();
    login.form.password = "WrongPass".to_string();
    assert!(login.submit(&ctx).is_none());
    assert_eq!(toasts.last().0, "Credenciales inválidas");
    assert!(!nav.is_signed_in());

    // Step 4: the right password signs in and the nav bar follows.
    login.form.password = "Secret123".to_string();
    let session_user = login.submit(&ctx).unwrap();
    assert_eq!(session_user.name, "Alice");
    assert_eq!(nav.label(), "Cerrar sesión (Alice)");

    // Step 5: the wall signs posts with the session user's name.
    let mut wall = match PageRegistry::standard().mount(Route::Wall, &ctx) {
        Some(portal_core::Page::Wall(wall)) => wall,
        other => panic!("expected wall page, got {other:?}"),
    };
    assert!(wall.posts().is_empty());
    wall.draft = "Hola mundo".to_string();
    assert!(wall.publish(&ctx));
    assert_eq!(wall.posts()[0].author, "Alice");

    // Step 6: blank content is refused and the draft is kept.
    wall.draft = "   ".to_string();
    assert!(!wall.publish(&ctx));
    assert_eq!(wall.draft, "   ");
    assert_eq!(
        toasts.last().0,
        "El mensaje no puede estar vacío ni superar 500 caracteres"
    );

    // Step 7: after logout, posts are anonymous.
    nav.logout(&ctx);
    assert!(!nav.is_signed_in());
    wall.draft = "sin firma".to_string();
    assert!(wall.publish(&ctx));
    assert_eq!(wall.posts()[0].author, "Anónimo");

    let mut reloaded = WallPage::mount(&ctx);
    assert!(reloaded.load(&ctx));
    assert_eq!(reloaded.posts().len(), 2);
    assert_eq!(reloaded.posts()[0].content, "sin firma");

    // Step 8: users table rename and delete.
    let mut users = UsersPage::mount(&ctx);
    assert_eq!(users.rows().len(), 1);
    assert!(users.rename(&ctx, alice.id, "Alicia"));
    assert_eq!(users.rows()[0].name, "Alicia");
    assert!(users.delete(&ctx, alice.id));
    assert!(users.rows().is_empty());

    // Step 9: deleting again fails with not_found.
    assert!(!users.delete(&ctx, alice.id));
    assert_eq!(
        toasts.last(),
        ("Recurso no encontrado".to_string(), ToastKind::Error)
    );
}

#[test]
fn unreachable_server_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let (ctx, toasts) = context(format!("http://127.0.0.1:{port}"));

    let err = ctx.api.list_users().unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));

    let mut users = UsersPage::default();
    assert!(!users.load(&ctx));
    assert_eq!(toasts.last(), ("Error interno".to_string(), ToastKind::Error));
}
