use thiserror::Error;

pub mod access;
pub mod credential;
pub mod database;
pub mod role;

pub use access::AccessError;
pub use credential::CredentialError;
pub use database::DatabaseError;
pub use role::RoleError;

/// Internal error type for store, provider and coordinator operations
///
/// Infrastructure errors (database, crypto, parse) are shared; domain errors
/// live in their own enums. Never exposed via API - endpoints convert to
/// AuthError or AdminError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Role(#[from] RoleError),

    #[error(transparent)]
    Access(#[from] AccessError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> Self {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn transaction_begin(source: sea_orm::DbErr) -> Self {
        InternalError::Database(DatabaseError::TransactionBegin { source })
    }

    pub fn transaction_commit(source: sea_orm::DbErr) -> Self {
        InternalError::Database(DatabaseError::TransactionCommit { source })
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> Self {
        InternalError::Parse {
            value_type: value_type.to_string(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> Self {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
