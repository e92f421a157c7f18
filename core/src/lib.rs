//! Client core for the portal web application.
//!
//! # Overview
//! `RequestClient` talks to the same-origin JSON API through an injected
//! `Transport`, normalizes responses, and turns non-2xx statuses into
//! `ApiError`. `messages` maps those errors to the Spanish toast texts. The
//! page controllers in `pages` consume the client together with a
//! `SessionStore` and a `Notifier`, all injected through `AppContext`.
//!
//! # Design
//! - Request building and response parsing are pure; only `Transport` does
//!   I/O, so everything above it is testable with canned responses.
//! - The session is a display flag kept in a key-value store, never a
//!   credential.
//! - Pages are chosen by explicit registration against a `Route` supplied by
//!   the host.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod messages;
pub mod pages;
pub mod session;
pub mod toast;
pub mod transport;
pub mod types;

pub use api::Api;
pub use client::{parse_response, RequestBody, RequestClient, RequestOptions};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ClientError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use messages::{error_message, ErrorKind};
pub use pages::{AppContext, Page, PageRegistry, Route};
pub use session::{
    FileStorage, KeyValueStorage, MemoryStorage, SessionStore, SessionUser, StorageError,
};
pub use toast::{Notifier, Toast, ToastHost, ToastKind};
pub use transport::{Transport, UreqTransport};
pub use types::{CreateUser, Credentials, NewPost, UpdateUser, User, WallPost};
