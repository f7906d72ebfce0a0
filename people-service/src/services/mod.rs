pub mod database;
pub mod memory;
pub mod store;

pub use database::MongoDb;
pub use memory::InMemoryStore;
pub use store::{parse_id, PersonStore};
