use crate::models::{Person, PersonFields};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

/// The capability set the HTTP layer needs from a document store.
///
/// Lookups by id return `Ok(None)` when nothing matches; an id that is not a
/// valid ObjectId is an error.
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// All people, in whatever order the store yields them.
    async fn list_all(&self) -> Result<Vec<Person>, AppError>;

    async fn create(&self, fields: PersonFields) -> Result<Person, AppError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Person>, AppError>;

    /// Returns the person after the update.
    async fn update_by_id(
        &self,
        id: &str,
        fields: PersonFields,
    ) -> Result<Option<Person>, AppError>;

    /// Returns the person as it was just before removal.
    async fn delete_by_id(&self, id: &str) -> Result<Option<Person>, AppError>;
}

pub fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|e| {
        tracing::debug!(id = %id, "Rejected malformed person id: {}", e);
        AppError::from(e)
    })
}
