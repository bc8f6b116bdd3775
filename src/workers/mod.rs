pub mod refresh;
pub mod scheduler;
