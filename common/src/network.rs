pub mod port;
pub mod range;
