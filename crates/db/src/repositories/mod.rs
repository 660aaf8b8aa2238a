//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod attendance_repo;
pub mod participant_repo;
pub mod training_day_repo;

pub use attendance_repo::AttendanceRepo;
pub use participant_repo::ParticipantRepo;
pub use training_day_repo::TrainingDayRepo;
