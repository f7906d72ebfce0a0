use crate::models::Person;
use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire form of a person. Missing fields serialize as `null`; extra stored
/// keys follow as relaxed extended JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonResponse {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        let mut extra = match Bson::Document(person.extra).into_relaxed_extjson() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for known in ["id", "name", "image", "title"] {
            extra.remove(known);
        }

        Self {
            id: person.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: person.name,
            image: person.image,
            title: person.title,
            extra,
        }
    }
}
