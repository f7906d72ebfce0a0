use crate::models::{Person, PersonFields};
use crate::services::store::{parse_id, PersonStore};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use std::sync::{Mutex, MutexGuard};

/// Process-local store with the same id rules as the MongoDB adapter.
///
/// People are kept in insertion order.
#[derive(Default)]
pub struct InMemoryStore {
    people: Mutex<Vec<Person>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Person>>, AppError> {
        self.people
            .lock()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("People store mutex poisoned: {}", e)))
    }
}

#[async_trait]
impl PersonStore for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Person>, AppError> {
        Ok(self.lock()?.clone())
    }

    async fn create(&self, fields: PersonFields) -> Result<Person, AppError> {
        let mut person = Person::new(fields);
        person.id = Some(ObjectId::new());
        self.lock()?.push(person.clone());
        Ok(person)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Person>, AppError> {
        let oid = parse_id(id)?;
        Ok(self.lock()?.iter().find(|p| p.id == Some(oid)).cloned())
    }

    async fn update_by_id(
        &self,
        id: &str,
        fields: PersonFields,
    ) -> Result<Option<Person>, AppError> {
        let oid = parse_id(id)?;
        let mut people = self.lock()?;
        Ok(people.iter_mut().find(|p| p.id == Some(oid)).map(|person| {
            person.apply(&fields);
            person.clone()
        }))
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Person>, AppError> {
        let oid = parse_id(id)?;
        let mut people = self.lock()?;
        let position = people.iter().position(|p| p.id == Some(oid));
        Ok(position.map(|index| people.remove(index)))
    }
}
