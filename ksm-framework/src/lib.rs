//! Handler contract between the secrets platform and the ksm plugin.
//!
//! The platform owns routing and storage. A plugin declares [`Path`]s: a
//! schema of recognized fields plus one [`OperationHandler`] per
//! [`Operation`], and optionally an [`ExistenceCheck`] that decides whether a
//! write creates or updates.

mod field;
mod handler;
mod logical;
mod path;

pub use field::{FieldData, FieldSchema, FieldType, Schema};
pub use handler::{
    ExistenceCheck, MockExistenceCheck, MockOperationHandler, OperationHandler,
};
pub use logical::{Context, Operation, Request, Response};
pub use path::Path;

pub use serde_json::{Map, Value};
