use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

/// Keys a client may never write; the id belongs to the store.
const RESERVED_KEYS: [&str; 2] = ["_id", "id"];

/// A person as stored in the `peoples` collection.
///
/// Keys other than the three known fields are carried in `extra` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Person {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Person {
    /// Builds an unsaved person from request fields; the store assigns the id.
    pub fn new(fields: PersonFields) -> Self {
        let extra = fields.extra_fields().collect();
        Self {
            id: None,
            name: fields.name.flatten(),
            image: fields.image.flatten(),
            title: fields.title.flatten(),
            extra,
        }
    }

    /// Applies the fields present in `fields`, leaving the others untouched.
    pub fn apply(&mut self, fields: &PersonFields) {
        if let Some(name) = &fields.name {
            self.name = name.clone();
        }
        if let Some(image) = &fields.image {
            self.image = image.clone();
        }
        if let Some(title) = &fields.title {
            self.title = title.clone();
        }
        for (key, value) in fields.extra_fields() {
            self.extra.insert(key, value);
        }
    }
}

/// Fields accepted from clients on create and update.
///
/// The outer `Option` records whether the key was sent at all, the inner one
/// whether it was sent as `null`. Numbers and booleans are stored in their
/// text form; objects and arrays are rejected. Any other key lands in `extra`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PersonFields {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Document,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    text(deserializer).map(Some)
}

fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Bson>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => scalar_to_text(value).map_err(D::Error::custom),
    }
}

fn scalar_to_text(value: Bson) -> Result<Option<String>, String> {
    match value {
        Bson::Null => Ok(None),
        Bson::String(s) => Ok(Some(s)),
        Bson::Int32(n) => Ok(Some(n.to_string())),
        Bson::Int64(n) => Ok(Some(n.to_string())),
        Bson::Double(n) => Ok(Some(n.to_string())),
        Bson::Boolean(b) => Ok(Some(b.to_string())),
        other => Err(format!(
            "expected a string, number or boolean, found {:?}",
            other.element_type()
        )),
    }
}

impl PersonFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.image.is_none()
            && self.title.is_none()
            && self.extra_fields().next().is_none()
    }

    /// Extra keys a client may write, reserved keys dropped.
    pub fn extra_fields(&self) -> impl Iterator<Item = (String, Bson)> + '_ {
        self.extra
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
    }

    /// The `$set` body for a partial update. Explicit nulls are written as null.
    pub fn to_set_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(name) = &self.name {
            set.insert("name", name.clone());
        }
        if let Some(image) = &self.image {
            set.insert("image", image.clone());
        }
        if let Some(title) = &self.title {
            set.insert("title", title.clone());
        }
        for (key, value) in self.extra_fields() {
            set.insert(key, value);
        }
        set
    }
}
