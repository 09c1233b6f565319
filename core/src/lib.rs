//! Client core for the Momentum productivity backend.
//!
//! # Overview
//! Two layers. The API contract (`ApiClient`) builds `HttpRequest` values and
//! parses `HttpResponse` values without touching the network; `Api` pairs it
//! with a `Transport` for async round trips. On top, repositories collapse
//! failures into a tagged `RepoError`, and state publishers turn one
//! repository call into an observable cell for a presentation layer.
//!
//! # Design
//! - `ApiClient` is stateless: it holds only `base_url`.
//! - Every enveloped operation is split into `build_*` and `parse_*`, so the
//!   I/O boundary is explicit. Weather takes an absolute URL instead.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//! - View-models own a `TaskScope`; dropping one cancels its in-flight work.

pub mod alarms;
pub mod api;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod logging;
pub mod publisher;
pub mod repository;
pub mod session;
pub mod transport;
pub mod types;

pub use alarms::AlarmViewModel;
pub use api::Api;
pub use client::{ApiClient, WeatherQuery};
pub use config::{ClientConfig, ConfigError};
pub use envelope::WebResponse;
pub use error::{ApiError, BoxError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use publisher::{StatePublisher, TaskScope};
pub use repository::{
    AlarmRepository, AuthRepository, FinanceRepository, RemoteRepository, RepoError, RepoResult,
    TodoRepository, WeatherRepository,
};
pub use session::TokenStore;
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    Alarm, AlarmRequest, LoginRequest, RegisterRequest, Todo, TodoRequest, ToggleAlarmRequest,
    Transaction, TransactionRequest, TransactionType, User, Weather, WeatherDescription,
    WeatherMain,
};
