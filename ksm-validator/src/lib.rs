//! Rejects plugin requests that carry fields the path does not declare.
//!
//! [`validate_fields`] is the check itself. The adapters put it in front of
//! an [`OperationHandler`](ksm_framework::OperationHandler) or an
//! [`ExistenceCheck`](ksm_framework::ExistenceCheck), and [`validated`] does
//! so for every entry point of a [`Path`](ksm_framework::Path).

mod adapter;
mod fields;

pub use adapter::{
    validated, with_existence_check_validator, with_field_validator,
    WithExistenceCheckValidator, WithFieldValidator,
};
pub use fields::{unknown_fields, validate_fields, FieldError};
