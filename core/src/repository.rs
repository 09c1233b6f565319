//! Repository layer: collapses transport and business failures into one
//! tagged `RepoError` and unwraps envelopes down to their payload.

use async_trait::async_trait;
use thiserror::Error;

use crate::api::Api;
use crate::client::WeatherQuery;
use crate::error::{ApiError, ErrorKind};
use crate::types::{
    Alarm, AlarmRequest, LoginRequest, RegisterRequest, Todo, TodoRequest, ToggleAlarmRequest,
    Transaction, TransactionRequest, User, Weather,
};

/// Shown for every transport-level failure regardless of cause.
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "could not reach the server; check the network connection";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RepoError {
    pub kind: ErrorKind,
    pub message: String,
}

impl RepoError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<ApiError> for RepoError {
    fn from(err: ApiError) -> Self {
        let kind = err.kind();
        let message = match err {
            ApiError::Transport { .. } | ApiError::Timeout => TRANSPORT_FAILURE_MESSAGE.to_string(),
            ApiError::NotFound { message } | ApiError::Business { message, .. } => message,
            other => other.to_string(),
        };
        Self { kind, message }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlarmRepository: Send + Sync {
    async fn get_alarms(&self) -> RepoResult<Vec<Alarm>>;
    async fn create_alarm(&self, request: AlarmRequest) -> RepoResult<Alarm>;
    async fn toggle_alarm(&self, id: String, is_active: bool) -> RepoResult<Alarm>;
    async fn delete_alarm(&self, id: String) -> RepoResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn get_todos(&self) -> RepoResult<Vec<Todo>>;
    async fn create_todo(&self, request: TodoRequest) -> RepoResult<Todo>;
    async fn toggle_todo(&self, id: String) -> RepoResult<Todo>;
    async fn delete_todo(&self, id: String) -> RepoResult<()>;
}

#[async_trait]
pub trait FinanceRepository: Send + Sync {
    async fn get_transactions(&self) -> RepoResult<Vec<Transaction>>;
    async fn create_transaction(&self, request: TransactionRequest) -> RepoResult<Transaction>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> RepoResult<User>;
    async fn login(&self, request: LoginRequest) -> RepoResult<User>;
}

#[async_trait]
pub trait WeatherRepository: Send + Sync {
    async fn get_weather(&self, lat: f64, lon: f64) -> RepoResult<Weather>;
}

/// All repositories, backed by the remote `Api`.
#[derive(Clone)]
pub struct RemoteRepository {
    api: Api,
    weather_api_key: Option<String>,
}

impl RemoteRepository {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            weather_api_key: None,
        }
    }

    pub fn with_weather_api_key(mut self, key: impl Into<String>) -> Self {
        self.weather_api_key = Some(key.into());
        self
    }
}

#[async_trait]
impl AlarmRepository for RemoteRepository {
    async fn get_alarms(&self) -> RepoResult<Vec<Alarm>> {
        Ok(self.api.get_alarms().await?.into_data())
    }

    async fn create_alarm(&self, request: AlarmRequest) -> RepoResult<Alarm> {
        Ok(self.api.create_alarm(&request).await?.into_data())
    }

    async fn toggle_alarm(&self, id: String, is_active: bool) -> RepoResult<Alarm> {
        let request = ToggleAlarmRequest { is_active };
        Ok(self.api.toggle_alarm(&id, &request).await?.into_data())
    }

    async fn delete_alarm(&self, id: String) -> RepoResult<()> {
        self.api.delete_alarm(&id).await?;
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for RemoteRepository {
    async fn get_todos(&self) -> RepoResult<Vec<Todo>> {
        Ok(self.api.get_todos().await?.into_data())
    }

    async fn create_todo(&self, request: TodoRequest) -> RepoResult<Todo> {
        Ok(self.api.create_todo(&request).await?.into_data())
    }

    async fn toggle_todo(&self, id: String) -> RepoResult<Todo> {
        Ok(self.api.toggle_todo(&id).await?.into_data())
    }

    async fn delete_todo(&self, id: String) -> RepoResult<()> {
        self.api.delete_todo(&id).await?;
        Ok(())
    }
}

#[async_trait]
impl FinanceRepository for RemoteRepository {
    async fn get_transactions(&self) -> RepoResult<Vec<Transaction>> {
        Ok(self.api.get_transactions().await?.into_data())
    }

    async fn create_transaction(&self, request: TransactionRequest) -> RepoResult<Transaction> {
        Ok(self.api.create_transaction(&request).await?.into_data())
    }
}

#[async_trait]
impl AuthRepository for RemoteRepository {
    async fn register(&self, request: RegisterRequest) -> RepoResult<User> {
        Ok(self.api.register(&request).await?.into_data())
    }

    async fn login(&self, request: LoginRequest) -> RepoResult<User> {
        Ok(self.api.login(&request).await?.into_data())
    }
}

#[async_trait]
impl WeatherRepository for RemoteRepository {
    async fn get_weather(&self, lat: f64, lon: f64) -> RepoResult<Weather> {
        let api_key = self
            .weather_api_key
            .clone()
            .ok_or_else(|| RepoError::new(ErrorKind::Invalid, "weather api key is not configured"))?;
        let query = WeatherQuery { lat, lon, api_key };
        Ok(self.api.get_weather(&query).await?)
    }
}
