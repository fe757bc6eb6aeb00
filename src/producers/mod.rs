pub mod channel;
pub mod vec;
