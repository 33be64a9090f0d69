pub mod error;
pub mod events;
pub mod repo;
pub mod service;
