pub mod people;
pub mod root;

pub use people::{create_person, delete_person, get_person, list_people, update_person};
pub use root::hello;
