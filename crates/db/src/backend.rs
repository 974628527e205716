//! The table-level interface every regional backend offers.

use async_trait::async_trait;
use serde_json::Value;

/// Errors from a regional backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the raw body when it has none.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Filters and ordering for a `select`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectQuery {
    /// Columns to return; empty means all.
    pub columns: Vec<String>,
    /// Equality filters, applied in order.
    pub eq: Vec<(String, String)>,
    /// Columns that must not be null.
    pub not_null: Vec<String>,
    /// `(column, descending)`.
    pub order: Option<(String, bool)>,
}

impl SelectQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.eq.push((column.into(), value.into()));
        self
    }

    pub fn not_null(mut self, column: impl Into<String>) -> Self {
        self.not_null.push(column.into());
        self
    }

    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order = Some((column.into(), true));
        self
    }

    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order = Some((column.into(), false));
        self
    }

    /// Render as PostgREST query-string pairs.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let select = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(",")
        };

        let mut pairs = vec![("select".to_string(), select)];
        for (column, value) in &self.eq {
            pairs.push((column.clone(), format!("eq.{value}")));
        }
        for column in &self.not_null {
            pairs.push((column.clone(), "not.is.null".to_string()));
        }
        if let Some((column, desc)) = &self.order {
            let dir = if *desc { "desc" } else { "asc" };
            pairs.push(("order".to_string(), format!("{column}.{dir}")));
        }
        pairs
    }
}

/// A single region's database, seen as a set of tables.
///
/// Implemented over HTTP by [`PostgrestClient`](crate::postgrest::PostgrestClient);
/// tests substitute in-memory implementations.
#[async_trait]
pub trait RegionBackend: Send + Sync {
    /// Insert one row and return it as stored.
    async fn insert(&self, table: &str, row: &Value) -> Result<Value, BackendError>;

    /// Return the rows matching `query`.
    async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Value>, BackendError>;
}
