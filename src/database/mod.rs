//! Sea-ORM backed query execution.

pub mod select;

pub use select::{Preload, SeaOrmQuery};
