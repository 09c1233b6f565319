//! Async facade pairing the `ApiClient` contract with a `Transport`.
//!
//! Every method is a single build → execute → parse round trip and returns
//! the raw envelope, so callers still see `message`/`errors` metadata.

use std::sync::Arc;

use crate::client::{ApiClient, WeatherQuery};
use crate::config::ClientConfig;
use crate::envelope::WebResponse;
use crate::error::ApiError;
use crate::session::TokenStore;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    Alarm, AlarmRequest, LoginRequest, RegisterRequest, Todo, TodoRequest, ToggleAlarmRequest,
    Transaction, TransactionRequest, User, Weather,
};

#[derive(Clone)]
pub struct Api {
    client: ApiClient,
    transport: Arc<dyn Transport>,
    tokens: TokenStore,
}

impl Api {
    pub fn new(client: ApiClient, transport: Arc<dyn Transport>, tokens: TokenStore) -> Self {
        Self {
            client,
            transport,
            tokens,
        }
    }

    /// Production wiring: reqwest transport sharing `tokens` with this `Api`.
    pub fn from_config(config: &ClientConfig, tokens: TokenStore) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config, tokens.clone())?;
        Ok(Self::new(
            ApiClient::new(&config.base_url),
            Arc::new(transport),
            tokens,
        ))
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub async fn register(&self, input: &RegisterRequest) -> Result<WebResponse<User>, ApiError> {
        let response = self.transport.execute(self.client.build_register(input)?).await?;
        let envelope = self.client.parse_register(response)?;
        self.remember_token(&envelope.data);
        Ok(envelope)
    }

    pub async fn login(&self, input: &LoginRequest) -> Result<WebResponse<User>, ApiError> {
        let response = self.transport.execute(self.client.build_login(input)?).await?;
        let envelope = self.client.parse_login(response)?;
        self.remember_token(&envelope.data);
        Ok(envelope)
    }

    pub async fn create_transaction(
        &self,
        input: &TransactionRequest,
    ) -> Result<WebResponse<Transaction>, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_create_transaction(input)?)
            .await?;
        self.client.parse_create_transaction(response)
    }

    pub async fn get_transactions(&self) -> Result<WebResponse<Vec<Transaction>>, ApiError> {
        let response = self.transport.execute(self.client.build_get_transactions()).await?;
        self.client.parse_get_transactions(response)
    }

    pub async fn get_todos(&self) -> Result<WebResponse<Vec<Todo>>, ApiError> {
        let response = self.transport.execute(self.client.build_get_todos()).await?;
        self.client.parse_get_todos(response)
    }

    pub async fn create_todo(&self, input: &TodoRequest) -> Result<WebResponse<Todo>, ApiError> {
        let response = self.transport.execute(self.client.build_create_todo(input)?).await?;
        self.client.parse_create_todo(response)
    }

    pub async fn toggle_todo(&self, id: &str) -> Result<WebResponse<Todo>, ApiError> {
        let response = self.transport.execute(self.client.build_toggle_todo(id)?).await?;
        self.client.parse_toggle_todo(response)
    }

    pub async fn delete_todo(&self, id: &str) -> Result<WebResponse<serde_json::Value>, ApiError> {
        let response = self.transport.execute(self.client.build_delete_todo(id)?).await?;
        self.client.parse_delete_todo(response)
    }

    pub async fn get_alarms(&self) -> Result<WebResponse<Vec<Alarm>>, ApiError> {
        let response = self.transport.execute(self.client.build_get_alarms()).await?;
        self.client.parse_get_alarms(response)
    }

    pub async fn create_alarm(&self, input: &AlarmRequest) -> Result<WebResponse<Alarm>, ApiError> {
        let response = self.transport.execute(self.client.build_create_alarm(input)?).await?;
        self.client.parse_create_alarm(response)
    }

    pub async fn toggle_alarm(
        &self,
        id: &str,
        input: &ToggleAlarmRequest,
    ) -> Result<WebResponse<Alarm>, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_toggle_alarm(id, input)?)
            .await?;
        self.client.parse_toggle_alarm(response)
    }

    pub async fn delete_alarm(&self, id: &str) -> Result<WebResponse<serde_json::Value>, ApiError> {
        let response = self.transport.execute(self.client.build_delete_alarm(id)?).await?;
        self.client.parse_delete_alarm(response)
    }

    pub async fn get_current_weather(&self, url: &str) -> Result<Weather, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_get_current_weather(url)?)
            .await?;
        self.client.parse_get_current_weather(response)
    }

    pub async fn get_weather(&self, query: &WeatherQuery) -> Result<Weather, ApiError> {
        self.get_current_weather(&query.to_url()?).await
    }

    fn remember_token(&self, user: &User) {
        if let Some(token) = &user.token {
            self.tokens.save(token.clone());
        }
    }
}
