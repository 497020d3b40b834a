//! HTTP serve endpoint for the job platform.
//!
//! - `GET`  introspection: app id and the functions served
//! - `PUT`  sync: the platform registers the functions
//! - `POST ?fnId=<id>` invocation with `{"event": {...}}`

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::jobs::{FunctionDescriptor, JobClient, JobFunction};
use crate::domain::ports::ServeAdapter;
use crate::shared::error::AppError;

/// Header carrying the signing key on invocation requests.
pub const SIGNATURE_HEADER: &str = "x-inngest-signature";

/// Default [`ServeAdapter`].
#[derive(Debug, Clone)]
pub struct InngestServe {
    signing_key: String,
}

impl InngestServe {
    pub fn new(signing_key: impl Into<String>) -> Self {
        Self {
            signing_key: signing_key.into(),
        }
    }
}

impl ServeAdapter for InngestServe {
    fn serve(&self, client: JobClient, functions: Vec<JobFunction>) -> anyhow::Result<Router> {
        let mut ids = HashSet::new();
        for function in &functions {
            anyhow::ensure!(
                ids.insert(function.id.as_str()),
                "duplicate job function id `{}`",
                function.id
            );
        }

        let state = ServeState {
            client: Arc::new(client),
            functions: Arc::new(functions),
            signing_key: Arc::from(self.signing_key.as_str()),
        };

        Ok(Router::new()
            .route("/", get(introspect).put(sync).post(invoke))
            .with_state(state))
    }
}

#[derive(Clone)]
struct ServeState {
    client: Arc<JobClient>,
    functions: Arc<Vec<JobFunction>>,
    signing_key: Arc<str>,
}

impl ServeState {
    fn descriptors(&self) -> Vec<FunctionDescriptor> {
        self.functions.iter().map(JobFunction::descriptor).collect()
    }
}

#[derive(Debug, Serialize)]
pub struct IntrospectionResponse {
    pub app_id: String,
    pub function_count: usize,
    pub functions: Vec<FunctionDescriptor>,
}

#[derive(Debug, Deserialize)]
pub struct InvokeParams {
    #[serde(rename = "fnId")]
    pub fn_id: String,
}

#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    pub event: Value,
}

#[derive(Debug, Serialize)]
pub struct InvokeResponse {
    #[serde(rename = "fnId")]
    pub fn_id: String,
    pub result: Value,
}

async fn introspect(State(state): State<ServeState>) -> Json<IntrospectionResponse> {
    let functions = state.descriptors();
    Json(IntrospectionResponse {
        app_id: state.client.app_id.clone(),
        function_count: functions.len(),
        functions,
    })
}

async fn sync(State(state): State<ServeState>) -> Json<IntrospectionResponse> {
    tracing::info!(
        app_id = %state.client.app_id,
        functions = state.functions.len(),
        "Job functions synced"
    );
    introspect(State(state)).await
}

async fn invoke(
    State(state): State<ServeState>,
    Query(params): Query<InvokeParams>,
    headers: HeaderMap,
    Json(body): Json<InvokeRequest>,
) -> Result<Json<InvokeResponse>, AppError> {
    if !state.signing_key.is_empty() {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();
        if signature != &*state.signing_key {
            return Err(AppError::Unauthorized("Invalid signature".into()));
        }
    }

    let function = state
        .functions
        .iter()
        .find(|f| f.id == params.fn_id)
        .ok_or_else(|| AppError::NotFound(format!("Unknown function `{}`", params.fn_id)))?;

    let result = function
        .invoke(body.event)
        .await
        .map_err(|e| AppError::Internal(format!("function `{}` failed: {:#}", function.id, e)))?;

    Ok(Json(InvokeResponse {
        fn_id: function.id.clone(),
        result,
    }))
}
