//! Request-field validation for the ksm secrets-engine plugin.
//!
//! ```
//! use ksm::framework::{FieldSchema, FieldType, Operation, Path, Request};
//!
//! let path = ksm::validator::validated(
//!     Path::new("config").field("path", FieldSchema::new(FieldType::String)),
//! );
//! let req = Request::new(Operation::Update, "config")
//!     .field("path", "/x")
//!     .field("bogus", "1");
//! let err = ksm::validator::validate_fields(&req, &path.field_data(&req))
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "unknown field: bogus");
//! ```

pub mod framework {
    pub use ksm_framework::*;
}

pub mod validator {
    pub use ksm_validator::*;
}

pub use ksm_slo::*;
