//! Response envelopes: every backend call normalized to `{ok, status, body}`.
//!
//! `ok` is derived from the status alone (2xx). The body is decoded as JSON
//! unconditionally; a body that is not JSON is an [`EnvelopeError`].
//!
//! On top of the raw envelope, [`Envelope::into_table`] validates a table
//! payload and keeps the three outcomes apart: a table, a rejected shape, or
//! an error response. [`Envelope::into_response`] classifies any body into a
//! success table, a generic success, or an error detail.

use serde_json::Value;
use thiserror::Error;

use crate::model::{ShapeError, TableSnapshot};

#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("response body (status {status}) is not JSON: {source}")]
    NotJson {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// 2xx statuses count as success; everything else, redirects included, does not.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// The result of one network call.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<B = Value> {
    pub ok: bool,
    pub status: u16,
    pub body: B,
}

impl Envelope<Value> {
    pub fn new(status: u16, body: Value) -> Self {
        Envelope {
            ok: is_success(status),
            status,
            body,
        }
    }

    /// Builds an envelope from a status and the raw response text.
    pub fn decode(status: u16, raw: &str) -> Result<Self, EnvelopeError> {
        let body = serde_json::from_str(raw).map_err(|source| EnvelopeError::NotJson {
            status,
            source,
        })?;
        Ok(Envelope::new(status, body))
    }

    /// Reads the body as a table load.
    ///
    /// # Returns
    /// An envelope with the same `ok` and `status` whose body is
    /// - [`TableBody::Failed`] for a non-2xx status,
    /// - [`TableBody::Invalid`] when a 2xx body is not a valid table,
    /// - [`TableBody::Table`] otherwise.
    ///
    /// A shape failure is kept apart from an empty table so the page can say
    /// what went wrong.
    pub fn into_table(self) -> TableEnvelope {
        let body = if !self.ok {
            TableBody::Failed(ErrorDetail::from_body(self.status, &self.body))
        } else {
            match TableSnapshot::from_json(&self.body) {
                Ok(snapshot) => TableBody::Table(snapshot),
                Err(err) => TableBody::Invalid(err),
            }
        };
        Envelope {
            ok: self.ok,
            status: self.status,
            body,
        }
    }

    /// Classifies the body of any call: an error detail for a non-2xx
    /// status, a table when a 2xx body has the table shape, and the raw JSON
    /// otherwise.
    pub fn into_response(self) -> Envelope<ResponseBody> {
        let body = if !self.ok {
            ResponseBody::ErrorDetail(ErrorDetail::from_body(self.status, &self.body))
        } else {
            match TableSnapshot::from_json(&self.body) {
                Ok(snapshot) => ResponseBody::Table(snapshot),
                Err(_) => ResponseBody::Generic(self.body),
            }
        };
        Envelope {
            ok: self.ok,
            status: self.status,
            body,
        }
    }
}

/// Any response body, classified once at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Table(TableSnapshot),
    Generic(Value),
    ErrorDetail(ErrorDetail),
}

/// Outcome of a table load.
#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    Table(TableSnapshot),
    /// The call succeeded but the payload is not a table.
    Invalid(ShapeError),
    /// The call returned a non-2xx status.
    Failed(ErrorDetail),
}

pub type TableEnvelope = Envelope<TableBody>;

impl Envelope<TableBody> {
    /// The table, if there is one. `None` both for a rejected shape and for
    /// an error response, so `ok && table().is_some()` is the success test.
    pub fn table(&self) -> Option<&TableSnapshot> {
        match &self.body {
            TableBody::Table(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn into_snapshot(self) -> Option<TableSnapshot> {
        match self.body {
            TableBody::Table(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// A non-2xx response reduced to something displayable.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetail {
    pub status: u16,
    pub message: String,
    pub raw: Value,
}

impl ErrorDetail {
    /// Reads `{"detail": "..."}` or the list form
    /// `{"detail": [{"msg": "..."}, ...]}`; any other body becomes its JSON text.
    pub fn from_body(status: u16, body: &Value) -> Self {
        let message = match body.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(Value::Array(issues)) => {
                let messages: Vec<String> = issues
                    .iter()
                    .map(|issue| match issue.get("msg").and_then(Value::as_str) {
                        Some(msg) => msg.to_string(),
                        None => issue.to_string(),
                    })
                    .collect();
                messages.join("; ")
            }
            Some(other) => other.to_string(),
            None => body.to_string(),
        };
        ErrorDetail {
            status,
            message,
            raw: body.clone(),
        }
    }
}
