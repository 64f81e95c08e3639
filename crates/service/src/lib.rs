//! Service layer providing artist CRUD over a CSV dataset.
//! - Separates business logic (`artists`) from file persistence (`storage`).
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod artists;
pub mod runtime;
pub mod storage;
