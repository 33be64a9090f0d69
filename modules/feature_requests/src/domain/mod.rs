pub mod error;
pub mod mailer;
pub mod repo;
pub mod service;
