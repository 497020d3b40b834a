//! Registration guard.
//!
//! Runs one capability against the builder and turns any failure, returned
//! error or panic, into a single log record. The builder is restored to its
//! previous state when the action fails, so half-applied registrations never
//! leak into the server.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use anyhow::anyhow;

use super::{BootstrapError, Capability, Fatality, ServerBuilder};

/// Result of a guarded registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Registered,
    /// Failed and skipped; details were logged.
    Skipped,
}

/// Register `capability`, isolating its failure unless it is fatal.
///
/// # Errors
///
/// Returns [`BootstrapError::Registration`] only for fatal capabilities.
pub fn register(
    builder: &mut ServerBuilder,
    capability: Capability,
) -> Result<Outcome, BootstrapError> {
    let Capability {
        name,
        fatality,
        action,
    } = capability;

    let result = if builder.is_applied(name) {
        Err(anyhow!("capability `{name}` is already registered"))
    } else {
        let previous = builder.clone();
        let result = match panic::catch_unwind(AssertUnwindSafe(|| action(&mut *builder))) {
            Ok(result) => result,
            Err(payload) => Err(anyhow!(
                "panicked during registration: {}",
                panic_message(payload.as_ref())
            )),
        };
        if result.is_err() {
            *builder = previous;
        }
        result
    };

    match result {
        Ok(()) => {
            builder.mark_applied(name);
            tracing::info!(capability = name, "Registered");
            Ok(Outcome::Registered)
        }
        Err(error) => {
            if fatality == Fatality::Optional {
                tracing::warn!(
                    capability = name,
                    fatal = false,
                    error = %error,
                    details = ?error,
                    "Registration skipped"
                );
            } else {
                tracing::error!(
                    capability = name,
                    fatal = fatality.is_fatal(),
                    error = %error,
                    details = ?error,
                    "Registration failed"
                );
            }
            if fatality.is_fatal() {
                Err(BootstrapError::Registration {
                    capability: name,
                    source: error,
                })
            } else {
                Ok(Outcome::Skipped)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
