use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use ksm_framework::{
    Context, ExistenceCheck, FieldData, OperationHandler, Path, Request,
    Response,
};
use ksm_slo::{errors, Result};

use crate::validate_fields;

fn check_fields(req: &Request, data: &FieldData) -> Result<()> {
    validate_fields(req, data).map_err(|err| {
        debug!(
            path = %req.path,
            operation = %req.operation,
            fields = ?err.fields(),
            "rejecting request with unknown fields"
        );
        errors::bad_request(&err)
    })
}

/// Runs the field check before the wrapped handler.
#[derive(Debug, Clone)]
pub struct WithFieldValidator<H> {
    inner: H,
}

impl<H> WithFieldValidator<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

#[async_trait]
impl<H> OperationHandler for WithFieldValidator<H>
where
    H: OperationHandler,
{
    async fn handle(
        &self,
        ctx: &Context,
        req: &Request,
        data: &FieldData,
    ) -> Result<Option<Response>> {
        check_fields(req, data)?;
        self.inner.handle(ctx, req, data).await
    }
}

/// Runs the field check before the wrapped existence check.
#[derive(Debug, Clone)]
pub struct WithExistenceCheckValidator<E> {
    inner: E,
}

impl<E> WithExistenceCheckValidator<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> E {
        self.inner
    }
}

#[async_trait]
impl<E> ExistenceCheck for WithExistenceCheckValidator<E>
where
    E: ExistenceCheck,
{
    async fn exists(
        &self,
        ctx: &Context,
        req: &Request,
        data: &FieldData,
    ) -> Result<bool> {
        check_fields(req, data)?;
        self.inner.exists(ctx, req, data).await
    }
}

pub fn with_field_validator<H: OperationHandler>(
    handler: H,
) -> WithFieldValidator<H> {
    WithFieldValidator::new(handler)
}

pub fn with_existence_check_validator<E: ExistenceCheck>(
    check: E,
) -> WithExistenceCheckValidator<E> {
    WithExistenceCheckValidator::new(check)
}

/// Puts the field check in front of every handler and the existence check
/// of `path`.
pub fn validated(path: Path) -> Path {
    path.wrap_operations(|handler| -> Arc<dyn OperationHandler> {
        Arc::new(with_field_validator(handler))
    })
    .wrap_existence_check(|check| -> Arc<dyn ExistenceCheck> {
        Arc::new(with_existence_check_validator(check))
    })
}
