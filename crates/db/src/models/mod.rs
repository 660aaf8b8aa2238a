//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` struct matching the table row and,
//! where the row differs from the domain type, a conversion into the
//! `emargement_core` type.

pub mod attendance;
pub mod participant;
pub mod training_day;
