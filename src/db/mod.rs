//! Storage layer: the [`Store`] capability, typed collections and schemas

pub mod collection;
pub mod memory;
pub mod schemas;
pub mod store;

pub use collection::Collection;
pub use memory::MemoryStore;
pub use store::{Store, Table};
