//! Emargement domain core.
//!
//! Pure training decomposition, title encoding, the attendance reducer and
//! the signature gate, all written against the [`store`] ports so the HTTP
//! layer and tests can plug in PostgreSQL or the in-memory store.

pub mod attendance;
pub mod decomposer;
pub mod error;
pub mod gate;
pub mod memory;
pub mod roles;
pub mod store;
pub mod title_codec;
pub mod training;
pub mod types;
