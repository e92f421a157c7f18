//! In-memory stand-in for the portal's JSON API.
//!
//! Errors are always `{"error": "<code>"}` with the status the real service
//! uses. Request bodies that are missing or not JSON are read as an empty
//! object, so they fail validation instead of being rejected by the extractor.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

pub const MAX_POST_CHARS: usize = 500;
pub const ANONYMOUS_AUTHOR: &str = "Anónimo";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallPost {
    pub id: u64,
    pub author: String,
    pub content: String,
}

#[derive(Default, Deserialize)]
pub struct UserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Default, Deserialize)]
pub struct PostInput {
    pub content: Option<String>,
}

struct StoredUser {
    user: User,
    password: String,
}

#[derive(Default)]
pub struct Store {
    users: BTreeMap<u64, StoredUser>,
    posts: Vec<WallPost>,
    next_user_id: u64,
    next_post_id: u64,
}

impl Store {
    fn email_taken(&self, email: &str, except: Option<u64>) -> bool {
        self.users
            .values()
            .any(|s| s.user.email.eq_ignore_ascii_case(email) && Some(s.user.id) != except)
    }
}

pub type Db = Arc<RwLock<Store>>;

/// An error answer: status plus machine-readable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub code: &'static str,
}

impl ApiFailure {
    const fn new(status: StatusCode, code: &'static str) -> Self {
        Self { status, code }
    }
}

const VALIDATION: ApiFailure = ApiFailure::new(StatusCode::BAD_REQUEST, "validation_error");
const NOT_FOUND: ApiFailure = ApiFailure::new(StatusCode::NOT_FOUND, "not_found");

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.code }))).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/auth/login", post(login))
        .route("/api/wall/posts", get(list_posts).post(create_post))
        .fallback(|| async { NOT_FOUND })
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn payload<T: DeserializeOwned + Default>(body: &Bytes) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

pub fn valid_name(name: &str) -> bool {
    let name = name.trim();
    (2..=80).contains(&name.chars().count())
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '\''))
}

pub fn valid_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

pub fn valid_password(password: &str) -> bool {
    password.chars().count() >= 8
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    let store = db.read().await;
    Json(store.users.values().map(|s| s.user.clone()).collect())
}

async fn create_user(
    State(db): State<Db>,
    body: Bytes,
) -> Result<(StatusCode, Json<User>), ApiFailure> {
    let input: UserInput = payload(&body);
    let (Some(name), Some(email), Some(password)) = (input.name, input.email, input.password)
    else {
        return Err(VALIDATION);
    };
    if !valid_name(&name) || !valid_email(&email) || !valid_password(&password) {
        return Err(VALIDATION);
    }

    let mut store = db.write().await;
    let email = email.trim().to_string();
    if store.email_taken(&email, None) {
        return Err(ApiFailure::new(StatusCode::CONFLICT, "email_already_exists"));
    }
    store.next_user_id += 1;
    let user = User {
        id: store.next_user_id,
        name: name.trim().to_string(),
        email,
    };
    info!("created user {} <{}>", user.id, user.email);
    store.users.insert(
        user.id,
        StoredUser {
            user: user.clone(),
            password,
        },
    );
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<User>, ApiFailure> {
    let store = db.read().await;
    store
        .users
        .get(&id)
        .map(|s| Json(s.user.clone()))
        .ok_or(NOT_FOUND)
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    body: Bytes,
) -> Result<Json<User>, ApiFailure> {
    let mut store = db.write().await;
    if !store.users.contains_key(&id) {
        return Err(NOT_FOUND);
    }

    let input: UserInput = payload(&body);
    if input.name.is_none() && input.email.is_none() && input.password.is_none() {
        return Err(VALIDATION);
    }
    if input.name.as_deref().is_some_and(|n| !valid_name(n))
        || input.email.as_deref().is_some_and(|e| !valid_email(e))
        || input.password.as_deref().is_some_and(|p| !valid_password(p))
    {
        return Err(VALIDATION);
    }
    if let Some(email) = input.email.as_deref() {
        if store.email_taken(email.trim(), Some(id)) {
            return Err(ApiFailure::new(StatusCode::CONFLICT, "email_already_exists"));
        }
    }

    let stored = store.users.get_mut(&id).ok_or(NOT_FOUND)?;
    if let Some(name) = input.name {
        stored.user.name = name.trim().to_string();
    }
    if let Some(email) = input.email {
        stored.user.email = email.trim().to_string();
    }
    if let Some(password) = input.password {
        stored.password = password;
    }
    Ok(Json(stored.user.clone()))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, ApiFailure> {
    let mut store = db.write().await;
    store
        .users
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(NOT_FOUND)
}

async fn login(State(db): State<Db>, body: Bytes) -> Result<Json<User>, ApiFailure> {
    let input: LoginInput = payload(&body);
    let email = input.email.unwrap_or_default();
    let email = email.trim();
    let password = input.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(VALIDATION);
    }

    let store = db.read().await;
    store
        .users
        .values()
        .find(|s| s.user.email.eq_ignore_ascii_case(email) && s.password == password)
        .map(|s| Json(s.user.clone()))
        .ok_or(ApiFailure::new(StatusCode::UNAUTHORIZED, "invalid_credentials"))
}

async fn list_posts(State(db): State<Db>) -> Json<Vec<WallPost>> {
    Json(db.read().await.posts.clone())
}

async fn create_post(
    State(db): State<Db>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WallPost>), ApiFailure> {
    let input: PostInput = payload(&body);
    let content = input.content.unwrap_or_default();
    let content = content.trim();
    if content.is_empty() || content.chars().count() > MAX_POST_CHARS {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "invalid_content"));
    }
    let author = headers
        .get("x-author")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(ANONYMOUS_AUTHOR);

    let mut store = db.write().await;
    store.next_post_id += 1;
    let post = WallPost {
        id: store.next_post_id,
        author: author.to_string(),
        content: content.to_string(),
    };
    store.posts.push(post.clone());
    Ok((StatusCode::CREATED, Json(post)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rules() {
        assert!(valid_name("Alice"));
        assert!(valid_name("  José O'Neil-Smith "));
        assert!(!valid_name("A"));
        assert!(!valid_name("   "));
        assert!(!valid_name("Robert; DROP"));
        assert!(!valid_name(&"x".repeat(81)));
    }

    #[test]
    fn email_rules() {
        assert!(valid_email("a@x.com"));
        assert!(!valid_email("a.x.com"));
        assert!(!valid_email("@x.com"));
        assert!(!valid_email("a@localhost"));
    }

    #[test]
    fn password_rules() {
        assert!(valid_password("Secret123"));
        assert!(!valid_password("short"));
    }

    #[test]
    fn missing_body_reads_as_default() {
        let input: UserInput = payload(&Bytes::new());
        assert!(input.name.is_none());
        let input: PostInput = payload(&Bytes::from_static(b"not json"));
        assert!(input.content.is_none());
    }

    #[test]
    fn failure_serializes_code() {
        let response = VALIDATION.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
