//! Artist module: three-layer architecture (domain, repository, service).
//!
//! The domain owns the matching rules, the repository owns whole-file
//! persistence, and the service wires them into request-sized transactions.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::ArtistService;
