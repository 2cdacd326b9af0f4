//! Error boundary for entry points
//!
//! Every command runs through [`guarded`], which logs start and finish,
//! converts panics into [`Error::Panic`] and logs failures with their full
//! cause chain before handing them back to the caller.

use crate::error::{Error, Result};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Run `f` as a named operation, logging its outcome
pub fn guarded<T, F>(operation: &str, log_path: &Path, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    tracing::info!("Starting {}", operation);
    match isolate(f) {
        Ok(value) => {
            tracing::info!("Finished {}", operation);
            Ok(value)
        }
        Err(err) => {
            let chain = error_chain(&err);
            if err.is_warning() {
                tracing::warn!("{} did not complete: {}", operation, chain);
            } else {
                tracing::error!("{} failed: {}", operation, chain);
                tracing::error!("Details are in {}", log_path.display());
            }
            Err(err)
        }
    }
}

/// Run `f`, turning a panic into an error
pub fn isolate<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(Error::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// An error followed by each of its sources
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\n  caused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Message shown to the user for a failed operation
pub fn user_message(err: &Error, log_path: &Path) -> String {
    let label = if err.is_warning() { "Warning" } else { "Error" };
    format!(
        "{}: {}\nSee the log for details: {}",
        label,
        err,
        log_path.display()
    )
}
