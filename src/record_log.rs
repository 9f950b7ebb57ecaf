pub mod impl_jsonl;
pub mod impl_memory;
pub mod interface;
