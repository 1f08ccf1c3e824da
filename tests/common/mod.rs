use std::collections::HashMap;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use gate_control::config::EnvironmentConfig;
use gate_control::repositories::MemoryStore;
use gate_control::storage::MemoryStorage;
use gate_control::{create_app, AppState};

pub const API_TOKEN: &str = "test-token";
pub const BRANCH_NAME: &str = "Matriz";

/// Aplicación completa sobre los backends en memoria
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub storage: Arc<MemoryStorage>,
    pub company_id: Uuid,
    pub branch_id: Option<Uuid>,
}

/// Configuración de test construida con las mismas reglas que en producción
pub fn test_config(company_id: Uuid, branch_id: Option<Uuid>) -> EnvironmentConfig {
    let mut vars = HashMap::from([
        ("COMPANY_ID".to_string(), company_id.to_string()),
        ("API_TOKEN".to_string(), API_TOKEN.to_string()),
        ("REPORT_UTC_OFFSET_MINUTES".to_string(), "0".to_string()),
    ]);
    if let Some(branch_id) = branch_id {
        vars.insert("DEFAULT_BRANCH_ID".to_string(), branch_id.to_string());
    }
    EnvironmentConfig::from_lookup(|name| vars.get(name).cloned()).unwrap()
}

impl TestApp {
    /// Empresa nueva con su filial configurada
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let storage = Arc::new(MemoryStorage::new());
        let branch_id = Uuid::new_v4();
        store.insert_branch(branch_id, BRANCH_NAME).await;
        Self::build(store, storage, Uuid::new_v4(), Some(branch_id))
    }

    /// Empresa sin `DEFAULT_BRANCH_ID`
    pub async fn without_branch() -> Self {
        let store = Arc::new(MemoryStore::new());
        let storage = Arc::new(MemoryStorage::new());
        Self::build(store, storage, Uuid::new_v4(), None)
    }

    /// Otra instancia sobre los mismos datos, con otra filial y/o empresa
    pub fn sibling(&self, company_id: Uuid, branch_id: Option<Uuid>) -> Self {
        Self::build(
            self.store.clone(),
            self.storage.clone(),
            company_id,
            branch_id,
        )
    }

    fn build(
        store: Arc<MemoryStore>,
        storage: Arc<MemoryStorage>,
        company_id: Uuid,
        branch_id: Option<Uuid>,
    ) -> Self {
        let state = AppState::new(
            store.clone(),
            storage.clone(),
            test_config(company_id, branch_id),
        );
        Self {
            router: create_app(state),
            store,
            storage,
            company_id,
            branch_id,
        }
    }

    /// Petición autenticada con el header Bearer
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {}", API_TOKEN));
        self.send(builder, body).await
    }

    pub async fn send(
        &self,
        builder: axum::http::request::Builder,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, body).await
    }

    /// Petición sin credenciales o con la cookie `token`
    pub async fn get_with_cookie(&self, uri: &str, cookie: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = cookie {
            builder = builder.header(COOKIE, format!("token={}", token));
        }
        self.send(builder, None).await
    }

    pub async fn create_vehicle(&self, plate: &str) -> Uuid {
        let (status, body) = self
            .post("/api/vehicles", serde_json::json!({ "plate": plate }))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        id_of(&body["data"])
    }

    pub async fn create_person(&self, full_name: &str) -> Uuid {
        let (status, body) = self
            .post("/api/people", serde_json::json!({ "full_name": full_name }))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        id_of(&body["data"])
    }
}

pub fn id_of(value: &Value) -> Uuid {
    value["id"].as_str().unwrap().parse().unwrap()
}
