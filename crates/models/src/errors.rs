use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    /// A row references a parent that does not exist (foreign key violation).
    #[error("{0}")]
    MissingReference(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ModelError {
    /// Classify a driver error: constraint violations become caller errors, the rest stay `Db`.
    pub fn from_db(err: DbErr, entity: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Self::Validation(format!("{} name already in use", entity))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                Self::MissingReference("Category not found".into())
            }
            _ => Self::Db(err.to_string()),
        }
    }
}
