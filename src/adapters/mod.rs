// Adapters layer: concrete implementations for external systems (job boards, filesystem).

pub mod headhunter;
pub mod storage;
pub mod superjob;

pub use headhunter::HeadHunterSource;
pub use storage::LocalStorage;
pub use superjob::SuperJobSource;

use crate::domain::model::Source;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

/// Pulls the item list out of a board's top-level response object.
fn unwrap_envelope(body: Value, key: &str, source: Source) -> Result<Vec<Value>> {
    let unexpected = |message: String| EtlError::UnexpectedResponse {
        source_name: source.display_name().to_string(),
        message,
    };

    match body {
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(unexpected(format!("'{}' is not a list: {}", key, other))),
            None => Err(unexpected(format!("response has no '{}' key", key))),
        },
        other => Err(unexpected(format!("expected a JSON object, got {}", other))),
    }
}

/// Turns a non-success status into `SourceUnavailable`.
fn check_status(response: &reqwest::Response, source: Source) -> Result<()> {
    let status = response.status();
    tracing::debug!("{} responded with {}", source.display_name(), status);
    if status.is_success() {
        Ok(())
    } else {
        Err(EtlError::SourceUnavailable {
            source_name: source.display_name().to_string(),
            status: status.as_u16(),
        })
    }
}
