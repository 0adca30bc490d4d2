// wardrobe/src/application/mod.rs
pub mod error;
pub mod services;

// Re-export the stores for easier imports
pub use services::entity_store::{ClothingStore, EntityStore, OutfitStore};
