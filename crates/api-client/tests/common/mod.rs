//! In-process mock of the Plantsitter backend.
//!
//! Serves the `/auth`, `/plants` and `/plant-care` routes on a random local
//! port and records what the client sent so tests can assert on the wire
//! format (headers, form fields, multipart parts, JSON bodies, queries).

#![allow(dead_code)]

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use plantsitter_api_client::{ClientConfig, PlantsitterClient};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const EMAIL: &str = "marie@example.com";
pub const PASSWORD: &str = "s3cret";
pub const TOKEN: &str = "T";

/// An uploaded file as seen by the server
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub len: usize,
}

/// Everything the client sent
#[derive(Debug, Default)]
pub struct Recorded {
    pub authorization: Vec<Option<String>>,
    pub request_ids: Vec<Option<String>>,
    pub json_bodies: Vec<Value>,
    pub form_fields: Vec<HashMap<String, String>>,
    pub files: Vec<UploadedFile>,
    pub queries: Vec<HashMap<String, String>>,
}

pub type Shared = Arc<Mutex<Recorded>>;

pub struct MockBackend {
    pub base_url: String,
    pub recorded: Shared,
}

impl MockBackend {
    pub fn client(&self) -> PlantsitterClient {
        self.client_with(ClientConfig::new(&self.base_url))
    }

    pub fn client_with(&self, config: ClientConfig) -> PlantsitterClient {
        PlantsitterClient::with_config(config.with_base_url(&self.base_url)).unwrap()
    }

    pub async fn logged_in_client(&self) -> PlantsitterClient {
        let client = self.client();
        client
            .auth()
            .login(&plantsitter_api_client::prelude::Credentials::new(EMAIL, PASSWORD))
            .await
            .unwrap();
        client
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.recorded
            .lock()
            .unwrap()
            .authorization
            .last()
            .cloned()
            .flatten()
    }

    pub fn request_count(&self) -> usize {
        self.recorded.lock().unwrap().request_ids.len()
    }
}

pub async fn spawn() -> MockBackend {
    let recorded = Shared::default();
    let app = router(recorded.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url: format!("http://{addr}"),
        recorded,
    }
}

fn router(recorded: Shared) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/me", get(me))
        .route("/plants/", get(list_plants).post(create_plant))
        .route(
            "/plants/{id}",
            get(get_plant).put(update_plant).delete(delete_plant),
        )
        .route("/plant-care/", get(list_cares).post(create_care))
        .route("/plant-care/{id}", get(get_care))
        .route("/plant-care/{id}/status", put(update_care_status))
        .route("/plant-care/{id}/photos/{stage}", post(upload_care_photo))
        .with_state(recorded)
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

fn record_headers(state: &Shared, headers: &HeaderMap) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let mut recorded = state.lock().unwrap();
    recorded.authorization.push(header("authorization"));
    recorded.request_ids.push(header("x-request-id"));
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn unauthorized() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Not authenticated")
}

fn user_json() -> Value {
    json!({
        "id": 1,
        "nom": "Dupont",
        "prenom": "Marie",
        "email": EMAIL,
        "telephone": null,
        "localisation": "Lyon"
    })
}

fn plant_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "nom": name,
        "espece": "Ficus lyrata",
        "description": "Living room",
        "photo": format!("uploads/plant_{id}.jpg"),
        "owner_id": 1
    })
}

fn care_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "plant_id": 4,
        "owner_id": 1,
        "caretaker_id": 2,
        "start_date": "2025-07-01T09:00:00",
        "end_date": "2025-07-15T18:00:00",
        "status": status,
        "care_instructions": null,
        "localisation": "Nantes",
        "start_photo_url": null,
        "end_photo_url": null,
        "conversation_id": null,
        "created_at": "2025-06-20T12:30:00",
        "updated_at": null,
        "plant": {"id": 4, "nom": "Ficus", "espece": null, "photo": null}
    })
}

async fn read_multipart(state: &Shared, mut multipart: Multipart) {
    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap();

        if file_name.is_some() {
            state.lock().unwrap().files.push(UploadedFile {
                file_name,
                content_type,
                len: data.len(),
            });
        } else {
            fields.insert(name, String::from_utf8_lossy(&data).into_owned());
        }
    }
    state.lock().unwrap().form_fields.push(fields);
}

// ----------------------------------------------------------------------------
// /auth
// ----------------------------------------------------------------------------

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Form(form): Form<LoginForm>) -> Response {
    record_headers(&state, &headers);
    state.lock().unwrap().form_fields.push(HashMap::from([
        ("username".to_string(), form.username.clone()),
        ("password".to_string(), form.password.clone()),
    ]));

    if form.username == "tokenless@example.com" {
        return Json(json!({ "token_type": "bearer" })).into_response();
    }
    if form.username == EMAIL && form.password == PASSWORD {
        return Json(json!({ "access_token": TOKEN, "token_type": "bearer" })).into_response();
    }
    detail(StatusCode::UNAUTHORIZED, "bad credentials")
}

async fn register(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record_headers(&state, &headers);
    state.lock().unwrap().json_bodies.push(body.clone());

    match body.get("email").and_then(Value::as_str) {
        Some("taken@example.com") => {
            detail(StatusCode::BAD_REQUEST, "Cet email est déjà utilisé")
        }
        Some("crash@example.com") => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
        Some("nodetail@example.com") => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "database unavailable"})),
        )
            .into_response(),
        Some("invalid") => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "detail": [
                    {"loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error"}
                ]
            })),
        )
            .into_response(),
        _ => {
            let mut user = user_json();
            user["nom"] = body["nom"].clone();
            user["prenom"] = body["prenom"].clone();
            user["email"] = body["email"].clone();
            Json(user).into_response()
        }
    }
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record_headers(&state, &headers);
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    }
    Json(user_json()).into_response()
}

// ----------------------------------------------------------------------------
// /plants
// ----------------------------------------------------------------------------

async fn list_plants(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record_headers(&state, &headers);
    state.lock().unwrap().queries.push(query);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([plant_json(1, "Monstera"), plant_json(2, "Basil")])).into_response()
}

async fn create_plant(State(state): State<Shared>, headers: HeaderMap, multipart: Multipart) -> Response {
    record_headers(&state, &headers);
    read_multipart(&state, multipart).await;
    if !authorized(&headers) {
        return unauthorized();
    }

    let fields = state.lock().unwrap().form_fields.last().cloned().unwrap_or_default();
    let mut plant = plant_json(3, fields.get("nom").map_or("", String::as_str));
    plant["espece"] = json!(fields.get("espece"));
    plant["description"] = json!(fields.get("description"));
    Json(plant).into_response()
}

async fn get_plant(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    record_headers(&state, &headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    match id {
        1 => Json(plant_json(1, "Monstera")).into_response(),
        // Success status with a body that is not JSON
        999 => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        _ => detail(StatusCode::NOT_FOUND, "Plant not found"),
    }
}

async fn update_plant(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    record_headers(&state, &headers);
    state.lock().unwrap().json_bodies.push(body.clone());
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut plant = plant_json(id, "Monstera");
    if let Value::Object(changes) = body {
        for (key, value) in changes {
            plant[key] = value;
        }
    }
    Json(plant).into_response()
}

async fn delete_plant(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    record_headers(&state, &headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    if id != 1 {
        return detail(StatusCode::NOT_FOUND, "Plant not found");
    }
    Json(plant_json(1, "Monstera")).into_response()
}

// ----------------------------------------------------------------------------
// /plant-care
// ----------------------------------------------------------------------------

async fn create_care(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record_headers(&state, &headers);
    state.lock().unwrap().json_bodies.push(body.clone());
    if !authorized(&headers) {
        return unauthorized();
    }
    if body["plant_id"] != json!(4) {
        return detail(StatusCode::NOT_FOUND, "Plante non trouvée");
    }
    Json(care_json(9, "pending")).into_response()
}

async fn list_cares(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record_headers(&state, &headers);
    let status = query.get("status").cloned().unwrap_or_else(|| "pending".to_string());
    state.lock().unwrap().queries.push(query);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([care_json(9, &status), care_json(10, &status)])).into_response()
}

async fn get_care(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    record_headers(&state, &headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    if id != 9 {
        return detail(StatusCode::NOT_FOUND, "Garde non trouvée");
    }
    Json(care_json(9, "pending")).into_response()
}

async fn update_care_status(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record_headers(&state, &headers);
    let status = query.get("status").cloned().unwrap_or_default();
    state.lock().unwrap().queries.push(query);
    if !authorized(&headers) {
        return unauthorized();
    }
    if status == "completed" {
        return detail(StatusCode::FORBIDDEN, "Seul le gardien peut accepter ou refuser");
    }
    Json(care_json(id, &status)).into_response()
}

async fn upload_care_photo(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((id, stage)): Path<(i64, String)>,
    multipart: Multipart,
) -> Response {
    record_headers(&state, &headers);
    read_multipart(&state, multipart).await;
    if !authorized(&headers) {
        return unauthorized();
    }

    let (status, field) = match stage.as_str() {
        "start" => ("in_progress", "start_photo_url"),
        _ => ("completed", "end_photo_url"),
    };
    let mut care = care_json(id, status);
    care[field] = json!(format!("uploads/plant_care_{stage}_{id}.jpg"));
    Json(care).into_response()
}
