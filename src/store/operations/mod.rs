pub mod attempts;
pub mod questions;
pub mod students;
