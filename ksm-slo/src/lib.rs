pub mod errors;
mod id;

pub type Result<T, E = errors::WithBacktrace> = core::result::Result<T, E>;

pub use id::next_id;
