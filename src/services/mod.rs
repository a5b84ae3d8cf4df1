pub mod input;
pub mod report;
pub mod task;
pub mod xtream;
