//! Job functions keeping the local user table in step with the identity
//! provider.

use std::sync::Arc;

use anyhow::anyhow;
use serde_json::json;

use crate::domain::jobs::JobFunction;
use crate::domain::user::{event_user_id, UserProfile, UserRepository};

pub const USER_CREATED_EVENT: &str = "clerk/user.created";
pub const USER_DELETED_EVENT: &str = "clerk/user.deleted";

/// `sync-user` and `delete-user-from-db`.
///
/// `users` yields the repository at invocation time; `None` means the data
/// store is not connected and the invocation fails.
pub fn user_sync_functions<F>(users: F) -> Vec<JobFunction>
where
    F: Fn() -> Option<Arc<dyn UserRepository>> + Clone + Send + Sync + 'static,
{
    let sync_users = users.clone();
    let sync = JobFunction::new("sync-user", "Sync user", USER_CREATED_EVENT, move |event| {
        let repository = sync_users();
        async move {
            let repository = repository.ok_or_else(|| anyhow!("data store is not connected"))?;
            let profile = UserProfile::from_event(&event)?;
            repository.upsert(&profile).await?;
            tracing::info!(user_id = %profile.external_id, "User synced");
            Ok::<_, anyhow::Error>(json!({ "synced": profile.external_id }))
        }
    });

    let delete = JobFunction::new(
        "delete-user-from-db",
        "Delete user from database",
        USER_DELETED_EVENT,
        move |event| {
            let repository = users();
            async move {
                let repository =
                    repository.ok_or_else(|| anyhow!("data store is not connected"))?;
                let user_id = event_user_id(&event)?;
                let deleted = repository.delete(&user_id).await?;
                tracing::info!(%user_id, deleted, "User deleted");
                Ok::<_, anyhow::Error>(json!({ "deleted": deleted, "user_id": user_id }))
            }
        },
    );

    vec![sync, delete]
}
