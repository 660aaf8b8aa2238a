pub mod signature;
pub mod training;
