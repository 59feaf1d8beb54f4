pub mod naming;
pub mod timestamp;
