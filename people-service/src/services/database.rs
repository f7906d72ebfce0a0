use crate::models::{Person, PersonFields};
use crate::services::store::{parse_id, PersonStore};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

const DEFAULT_DATABASE: &str = "people";
const PEOPLE_COLLECTION: &str = "peoples";

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    /// Opens the client and pings the server so a bad connection string or an
    /// unreachable store fails startup instead of the first request.
    ///
    /// Without an explicit `database`, the default database of the connection
    /// string is used, then `people`.
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::from(e)
        })?;

        let db = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };

        let mongo = Self { client, db };
        mongo.ping().await?;
        tracing::info!(database = %mongo.db.name(), "Connected to MongoDB");
        Ok(mongo)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB ping failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    /// Closes the connection pools. Other clones of this handle become unusable.
    pub async fn shutdown(self) {
        let database = self.db.name().to_string();
        self.client.shutdown().await;
        tracing::info!(database = %database, "Disconnected from MongoDB");
    }

    pub fn people(&self) -> Collection<Person> {
        self.db.collection(PEOPLE_COLLECTION)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl PersonStore for MongoDb {
    async fn list_all(&self) -> Result<Vec<Person>, AppError> {
        let cursor = self
            .db
            .collection::<Document>(PEOPLE_COLLECTION)
            .find(doc! {}, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list people: {}", e);
                AppError::from(e)
            })?;

        let documents: Vec<Document> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect people: {}", e);
            AppError::from(e)
        })?;

        Ok(decode_people(documents))
    }

    async fn create(&self, fields: PersonFields) -> Result<Person, AppError> {
        let mut person = Person::new(fields);
        let result = self
            .people()
            .insert_one(&person, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert person: {}", e);
                AppError::from(e)
            })?;

        person.id = result.inserted_id.as_object_id();
        Ok(person)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Person>, AppError> {
        let oid = parse_id(id)?;
        self.people()
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(|e| {
                tracing::error!(id = %id, "Failed to find person: {}", e);
                AppError::from(e)
            })
    }

    async fn update_by_id(
        &self,
        id: &str,
        fields: PersonFields,
    ) -> Result<Option<Person>, AppError> {
        let oid = parse_id(id)?;

        // MongoDB rejects an empty `$set`.
        if fields.is_empty() {
            return self.get_by_id(id).await;
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.people()
            .find_one_and_update(
                doc! { "_id": oid },
                doc! { "$set": fields.to_set_document() },
                options,
            )
            .await
            .map_err(|e| {
                tracing::error!(id = %id, "Failed to update person: {}", e);
                AppError::from(e)
            })
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Person>, AppError> {
        let oid = parse_id(id)?;
        self.people()
            .find_one_and_delete(doc! { "_id": oid }, None)
            .await
            .map_err(|e| {
                tracing::error!(id = %id, "Failed to delete person: {}", e);
                AppError::from(e)
            })
    }
}

/// Decodes stored people, skipping documents whose known fields are not
/// scalars so one bad record does not hide the rest.
fn decode_people(documents: Vec<Document>) -> Vec<Person> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document.get_object_id("_id").ok();
            match mongodb::bson::from_document::<Person>(document) {
                Ok(person) => Some(person),
                Err(e) => {
                    tracing::warn!(id = ?id, "Skipping undecodable person document: {}", e);
                    None
                }
            }
        })
        .collect()
}
