pub mod input;
pub mod math;
pub mod time;
