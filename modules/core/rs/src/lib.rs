pub mod loc;
pub mod num;
