//! Typed calls for each endpoint the pages use.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::{RequestClient, RequestOptions};
use crate::error::ClientError;
use crate::http::HttpMethod;
use crate::types::{CreateUser, Credentials, NewPost, UpdateUser, User, WallPost};

pub const USERS_PATH: &str = "/api/users";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const WALL_POSTS_PATH: &str = "/api/wall/posts";
pub const AUTHOR_HEADER: &str = "X-Author";

/// `RequestClient` plus endpoint paths and DTO decoding.
#[derive(Debug, Clone)]
pub struct Api {
    client: RequestClient,
}

impl Api {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    pub fn list_users(&self) -> Result<Vec<User>, ClientError> {
        decode(self.client.get(USERS_PATH)?)
    }

    pub fn get_user(&self, id: u64) -> Result<User, ClientError> {
        decode(self.client.get(&user_path(id))?)
    }

    pub fn create_user(&self, input: &CreateUser) -> Result<User, ClientError> {
        decode(self.client.post(USERS_PATH, input)?)
    }

    pub fn update_user(&self, id: u64, input: &UpdateUser) -> Result<User, ClientError> {
        decode(self.client.put(&user_path(id), input)?)
    }

    pub fn delete_user(&self, id: u64) -> Result<(), ClientError> {
        self.client.delete(&user_path(id)).map(|_| ())
    }

    pub fn login(&self, credentials: &Credentials) -> Result<Value, ClientError> {
        self.client.post(LOGIN_PATH, credentials)
    }

    pub fn list_posts(&self) -> Result<Vec<WallPost>, ClientError> {
        decode(self.client.get(WALL_POSTS_PATH)?)
    }

    /// Publish to the wall, signing with `author` through `X-Author` when given.
    pub fn create_post(
        &self,
        content: &str,
        author: Option<&str>,
    ) -> Result<WallPost, ClientError> {
        let mut options = RequestOptions::new(HttpMethod::Post).json(&NewPost {
            content: content.to_string(),
        })?;
        if let Some(author) = author {
            options = options.header(AUTHOR_HEADER, author);
        }
        decode(self.client.request(WALL_POSTS_PATH, options)?)
    }
}

fn user_path(id: u64) -> String {
    format!("{USERS_PATH}/{id}")
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::TransportError;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::transport::Transport;

    struct Recorder {
        status: u16,
        body: &'static str,
        last: Mutex<Option<HttpRequest>>,
    }

    impl Transport for Recorder {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            *self.last.lock().unwrap() = Some(request.clone());
            Ok(HttpResponse::new(self.status, self.body))
        }
    }

    fn api(status: u16, body: &'static str) -> (Api, Arc<Recorder>) {
        let recorder = Arc::new(Recorder {
            status,
            body,
            last: Mutex::new(None),
        });
        let client = RequestClient::with_shared_transport("http://h", recorder.clone());
        (Api::new(client), recorder)
    }

    #[test]
    fn create_post_sends_author_header() {
        let (api, recorder) = api(201, r#"{"id":1,"author":"Alice","content":"Hola"}"#);
        let post = api.create_post("Hola", Some("Alice")).unwrap();
        assert_eq!(post.author, "Alice");

        let req = recorder.last.lock().unwrap().clone().unwrap();
        assert_eq!(req.path, "http://h/api/wall/posts");
        assert_eq!(req.header("X-Author"), Some("Alice"));
        assert_eq!(req.body.as_deref(), Some(r#"{"content":"Hola"}"#));
    }

    #[test]
    fn create_post_without_author_has_no_header() {
        let (api, recorder) = api(201, r#"{"id":1,"author":"Anónimo","content":"x"}"#);
        api.create_post("x", None).unwrap();
        let req = recorder.last.lock().unwrap().clone().unwrap();
        assert_eq!(req.header("X-Author"), None);
    }

    #[test]
    fn delete_user_targets_id_path() {
        let (api, recorder) = api(204, "");
        api.delete_user(42).unwrap();
        let req = recorder.last.lock().unwrap().clone().unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://h/api/users/42");
    }

    #[test]
    fn wrong_shape_is_deserialization_error() {
        let (api, _) = api(200, r#"{"items":[]}"#);
        let err = api.list_users().unwrap_err();
        assert!(matches!(err, ClientError::Deserialization(_)));
    }
}
