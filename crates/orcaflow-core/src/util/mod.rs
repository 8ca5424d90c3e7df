pub mod digest;
pub mod profile;
