pub mod draft;
pub mod entity;
pub mod error;
pub mod facet;
pub mod query;
pub mod repositories;
pub mod tags;
pub mod vocabulary;
