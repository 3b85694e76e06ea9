//! Transport-facing operation outcomes.
//!
//! Every registry call maps onto exactly one of two shapes:
//!
//! ```json
//! {"status":"ok","value":...}
//! {"status":"error","kind":"not_owner","message":"..."}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, Result};

/// Serializable outcome of a registry operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Ok { value: T },
    Error { kind: ErrorKind, message: String },
}

impl<T> Response<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok { .. })
    }

    /// The error kind, if this is a failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Response::Ok { .. } => None,
            Response::Error { kind, .. } => Some(*kind),
        }
    }
}

impl<T> From<Result<T>> for Response<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Response::Ok { value },
            Err(e) => Response::Error {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}
