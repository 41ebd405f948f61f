mod check;
mod config;
mod schema;

pub use check::{build_path, check, Outcome};
pub use config::{load, AppConfig};
pub use schema::{RequestDocument, SchemaFile};

pub fn version() -> String {
    format!("ksmctl {}", env!("CARGO_PKG_VERSION"))
}
