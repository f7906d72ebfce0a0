pub mod people;

pub use people::PersonResponse;
