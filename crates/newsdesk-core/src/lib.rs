//! # Newsdesk Core
//!
//! The domain layer of the newsdesk backend: posts, subjects, votes and the
//! service that orchestrates them.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{DomainError, DomainResult, RepoError};
pub use service::PostService;
