//! Background job model.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

/// Handle to the job platform for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobClient {
    pub app_id: String,
    pub event_key: String,
}

type JobHandler = Arc<dyn Fn(Value) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

/// A function triggered by a named event.
#[derive(Clone)]
pub struct JobFunction {
    pub id: String,
    pub name: String,
    pub trigger: String,
    handler: JobHandler,
}

impl JobFunction {
    pub fn new<F, Fut>(id: &str, name: &str, trigger: &str, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            trigger: trigger.to_string(),
            handler: Arc::new(move |event: Value| -> BoxFuture<'static, anyhow::Result<Value>> {
                Box::pin(handler(event))
            }),
        }
    }

    /// Run the function against one event payload.
    pub async fn invoke(&self, event: Value) -> anyhow::Result<Value> {
        (self.handler)(event).await
    }

    pub fn descriptor(&self) -> FunctionDescriptor {
        FunctionDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            trigger: self.trigger.clone(),
        }
    }
}

impl fmt::Debug for JobFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobFunction")
            .field("id", &self.id)
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}

/// Serializable description of a function, used for introspection.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub id: String,
    pub name: String,
    pub trigger: String,
}

/// Outcome of resolving the job module. Either part may be missing.
#[derive(Debug, Clone, Default)]
pub struct JobsConfig {
    pub client: Option<JobClient>,
    pub functions: Option<Vec<JobFunction>>,
}

impl JobsConfig {
    /// Both parts present and at least one function defined.
    pub fn into_parts(self) -> Option<(JobClient, Vec<JobFunction>)> {
        match (self.client, self.functions) {
            (Some(client), Some(functions)) if !functions.is_empty() => Some((client, functions)),
            _ => None,
        }
    }
}
