pub mod board;
pub mod grading;
