use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    pub message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub token: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub user_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_done: bool,
    pub user_id: String,
    pub category_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub id: String,
    pub time: String,
    pub label: String,
    pub days: Vec<bool>,
    pub is_active: bool,
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct TransactionRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRequest {
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmRequest {
    pub time: String,
    pub label: String,
    pub days: Vec<bool>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleAlarmRequest {
    pub is_active: bool,
}

struct Account {
    id: String,
    username: String,
    email: String,
    password: String,
}

#[derive(Default)]
pub struct Store {
    accounts: Vec<Account>,
    sessions: HashMap<String, String>,
    transactions: Vec<Transaction>,
    todos: Vec<Todo>,
    alarms: Vec<Alarm>,
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, Json<Message>);
type Reply<T> = Result<Json<Envelope<T>>, Failure>;

fn fail(status: StatusCode, message: &str) -> Failure {
    (
        status,
        Json(Message {
            message: message.to_string(),
        }),
    )
}

fn reply<T>(data: T, message: &str) -> Reply<T> {
    Ok(Json(Envelope {
        data,
        message: Some(message.to_string()),
    }))
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Resolve the `Authorization` header (raw token or `Bearer <token>`) to a
/// user id.
fn authorize(store: &Store, headers: &HeaderMap) -> Result<String, Failure> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v))
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "missing authorization token"))?;
    store
        .sessions
        .get(token)
        .cloned()
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "invalid authorization token"))
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/users/register", post(register))
        .route("/api/users/login", post(login))
        .route("/api/finance", get(list_transactions).post(create_transaction))
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", delete(delete_todo))
        .route("/api/todos/{id}/toggle", patch(toggle_todo))
        .route("/api/alarms", get(list_alarms).post(create_alarm))
        .route("/api/alarms/{id}", delete(delete_alarm))
        .route("/api/alarms/{id}/toggle", patch(toggle_alarm))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock backend listening");
    }
    axum::serve(listener, app()).await
}

// --- auth ---

async fn register(State(db): State<Db>, Json(input): Json<RegisterRequest>) -> Reply<User> {
    if input.username.is_empty() || input.email.is_empty() || input.password.is_empty() {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            "username, email and password are required",
        ));
    }
    let mut store = db.write().await;
    if store.accounts.iter().any(|a| a.email == input.email) {
        return Err(fail(StatusCode::BAD_REQUEST, "email already registered"));
    }
    let account = Account {
        id: Uuid::new_v4().to_string(),
        username: input.username,
        email: input.email,
        password: input.password,
    };
    let user = User {
        id: account.id.clone(),
        name: account.username.clone(),
        email: account.email.clone(),
        token: None,
    };
    store.accounts.push(account);
    reply(user, "registered")
}

async fn login(State(db): State<Db>, Json(input): Json<LoginRequest>) -> Reply<User> {
    let mut store = db.write().await;
    let user = store
        .accounts
        .iter()
        .find(|a| a.email == input.email && a.password == input.password)
        .map(|a| User {
            id: a.id.clone(),
            name: a.username.clone(),
            email: a.email.clone(),
            token: Some(Uuid::new_v4().to_string()),
        })
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "invalid email or password"))?;
    if let Some(token) = &user.token {
        store.sessions.insert(token.clone(), user.id.clone());
    }
    reply(user, "logged in")
}

// --- finance ---

async fn list_transactions(State(db): State<Db>, headers: HeaderMap) -> Reply<Vec<Transaction>> {
    let store = db.read().await;
    let user_id = authorize(&store, &headers)?;
    let items = store
        .transactions
        .iter()
        .filter(|t| t.user_id == user_id)
        .cloned()
        .collect();
    reply(items, "ok")
}

async fn create_transaction(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<TransactionRequest>,
) -> Reply<Transaction> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    if input.kind != "INCOME" && input.kind != "EXPENSE" {
        return Err(fail(StatusCode::BAD_REQUEST, "type must be INCOME or EXPENSE"));
    }
    let txn = Transaction {
        id: Uuid::new_v4().to_string(),
        kind: input.kind,
        amount: input.amount,
        category: input.category,
        date: input.date,
        user_id,
    };
    store.transactions.push(txn.clone());
    reply(txn, "created")
}

// --- todos ---

async fn list_todos(State(db): State<Db>, headers: HeaderMap) -> Reply<Vec<Todo>> {
    let store = db.read().await;
    let user_id = authorize(&store, &headers)?;
    let items = store
        .todos
        .iter()
        .filter(|t| t.user_id == user_id)
        .cloned()
        .collect();
    reply(items, "ok")
}

async fn create_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<TodoRequest>,
) -> Reply<Todo> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let stamp = now();
    let todo = Todo {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        description: input.description,
        is_done: false,
        user_id,
        category_id: input.category_id,
        created_at: stamp.clone(),
        updated_at: stamp,
    };
    store.todos.push(todo.clone());
    reply(todo, "created")
}

async fn toggle_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply<Todo> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let todo = store
        .todos
        .iter_mut()
        .find(|t| t.id == id && t.user_id == user_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "todo not found"))?;
    todo.is_done = !todo.is_done;
    todo.updated_at = now();
    reply(todo.clone(), "toggled")
}

async fn delete_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply<serde_json::Value> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let before = store.todos.len();
    store.todos.retain(|t| !(t.id == id && t.user_id == user_id));
    if store.todos.len() == before {
        return Err(fail(StatusCode::NOT_FOUND, "todo not found"));
    }
    reply(serde_json::Value::Null, "deleted")
}

// --- alarms ---

async fn list_alarms(State(db): State<Db>, headers: HeaderMap) -> Reply<Vec<Alarm>> {
    let store = db.read().await;
    let user_id = authorize(&store, &headers)?;
    let items = store
        .alarms
        .iter()
        .filter(|a| a.user_id == user_id)
        .cloned()
        .collect();
    reply(items, "ok")
}

async fn create_alarm(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<AlarmRequest>,
) -> Reply<Alarm> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let alarm = Alarm {
        id: Uuid::new_v4().to_string(),
        time: input.time,
        label: input.label,
        days: input.days,
        is_active: input.is_active,
        user_id,
    };
    store.alarms.push(alarm.clone());
    reply(alarm, "created")
}

async fn toggle_alarm(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<ToggleAlarmRequest>,
) -> Reply<Alarm> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let alarm = store
        .alarms
        .iter_mut()
        .find(|a| a.id == id && a.user_id == user_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "alarm not found"))?;
    alarm.is_active = input.is_active;
    reply(alarm.clone(), "toggled")
}

async fn delete_alarm(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply<serde_json::Value> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let before = store.alarms.len();
    store.alarms.retain(|a| !(a.id == id && a.user_id == user_id));
    if store.alarms.len() == before {
        return Err(fail(StatusCode::NOT_FOUND, "alarm not found"));
    }
    reply(serde_json::Value::Null, "deleted")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alarm_serializes_camel_case() {
        let alarm = Alarm {
            id: "a1".to_string(),
            time: "07:00".to_string(),
            label: "wake".to_string(),
            days: vec![false; 7],
            is_active: true,
            user_id: "u1".to_string(),
        };
        let json = serde_json::to_value(&alarm).unwrap();
        assert_eq!(json["isActive"], true);
        assert_eq!(json["userId"], "u1");
    }

    #[test]
    fn alarm_request_defaults_active() {
        let input: AlarmRequest =
            serde_json::from_str(r#"{"time":"07:00","label":"wake","days":[]}"#).unwrap();
        assert!(input.is_active);
    }

    #[test]
    fn toggle_alarm_request_requires_flag() {
        let result: Result<ToggleAlarmRequest, _> = serde_json::from_str(r#"{}"#);
        assert!(result.is_err());
    }

    #[test]
    fn authorize_accepts_raw_and_bearer_tokens() {
        let mut store = Store::default();
        store.sessions.insert("tok".to_string(), "u1".to_string());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "tok".parse().unwrap());
        assert_eq!(authorize(&store, &headers).unwrap(), "u1");

        headers.insert(AUTHORIZATION, "Bearer tok".parse().unwrap());
        assert_eq!(authorize(&store, &headers).unwrap(), "u1");

        headers.insert(AUTHORIZATION, "other".parse().unwrap());
        let (status, _) = authorize(&store, &headers).unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn envelope_wraps_payload() {
        let json = serde_json::to_value(Envelope {
            data: vec![1, 2],
            message: Some("ok".to_string()),
        })
        .unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert_eq!(json["message"], "ok");
    }
}
