use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use ksm_slo::Result;

use crate::{Context, FieldData, Request, Response};

#[automock]
#[async_trait]
pub trait OperationHandler: Send + Sync {
    /// handle serves one operation on a path. `Ok(None)` means the operation
    /// succeeded with nothing to return.
    async fn handle(
        &self,
        ctx: &Context,
        req: &Request,
        data: &FieldData,
    ) -> Result<Option<Response>>;
}

#[automock]
#[async_trait]
pub trait ExistenceCheck: Send + Sync {
    /// exists reports whether the resource addressed by the request is
    /// already stored. The platform uses the answer to run a write as a
    /// create or as an update.
    async fn exists(
        &self,
        ctx: &Context,
        req: &Request,
        data: &FieldData,
    ) -> Result<bool>;
}

#[async_trait]
impl<T> OperationHandler for Arc<T>
where
    T: OperationHandler + ?Sized,
{
    async fn handle(
        &self,
        ctx: &Context,
        req: &Request,
        data: &FieldData,
    ) -> Result<Option<Response>> {
        (**self).handle(ctx, req, data).await
    }
}

#[async_trait]
impl<T> ExistenceCheck for Arc<T>
where
    T: ExistenceCheck + ?Sized,
{
    async fn exists(
        &self,
        ctx: &Context,
        req: &Request,
        data: &FieldData,
    ) -> Result<bool> {
        (**self).exists(ctx, req, data).await
    }
}
