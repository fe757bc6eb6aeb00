pub mod running_aggregate;
pub mod validate;
