pub mod kv;
pub mod snapshot;
