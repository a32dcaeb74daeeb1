use anyhow::anyhow;

pub type Result<T> = std::result::Result<T, LibError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Database,
    InvalidInput,
    NotFound,
    Unknown,
}

/// Crate-wide error: a coarse kind for status mapping, a stable machine
/// code, a client-safe message, optional structured detail, and the full
/// source chain for logs.
#[derive(Debug)]
pub struct LibError {
    pub kind: ErrorKind,
    pub code: &'static str,
    pub public: &'static str,
    pub details: Option<serde_json::Value>,
    pub source: anyhow::Error,
}

impl LibError {
    pub fn database(public: &'static str, source: anyhow::Error) -> Self {
        Self {
            kind: ErrorKind::Database,
            code: "database_error",
            public,
            details: None,
            source,
        }
    }

    /// A storage constraint fired even though validation passed. Reported
    /// generically; the source chain carries the offending statement.
    pub fn integrity(source: anyhow::Error) -> Self {
        Self {
            kind: ErrorKind::Database,
            code: "integrity_error",
            public: "Stored graph consistency was violated",
            details: None,
            source,
        }
    }

    pub fn invalid(public: &'static str, source: anyhow::Error) -> Self {
        Self {
            kind: ErrorKind::InvalidInput,
            code: "invalid_input",
            public,
            details: None,
            source,
        }
    }

    pub fn invalid_with_details(
        code: &'static str,
        public: &'static str,
        details: Option<serde_json::Value>,
        source: anyhow::Error,
    ) -> Self {
        Self {
            kind: ErrorKind::InvalidInput,
            code,
            public,
            details,
            source,
        }
    }

    pub fn graph_not_found(source: anyhow::Error) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            code: "graph_not_found",
            public: "Graph not found",
            details: None,
            source,
        }
    }

    pub fn node_not_found(source: anyhow::Error) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            code: "node_not_found",
            public: "Node not found",
            details: None,
            source,
        }
    }

    pub fn unknown(public: &'static str, source: anyhow::Error) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            code: "unknown_error",
            public,
            details: None,
            source,
        }
    }

    pub fn message(public: &'static str) -> Self {
        Self::unknown(public, anyhow!(public))
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for LibError {
    fn from(value: sqlx::Error) -> Self {
        let constraint = matches!(
            &value,
            sqlx::Error::Database(db) if db.is_unique_violation() || db.is_foreign_key_violation()
        );
        if constraint {
            Self::integrity(anyhow!(value))
        } else {
            Self::database("Database request failed", anyhow!(value))
        }
    }
}
