pub mod impl_json;
pub mod impl_memory;
pub mod interface;
