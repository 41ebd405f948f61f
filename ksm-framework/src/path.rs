use std::{borrow::Cow, collections::HashMap, fmt, sync::Arc};

use tracing::debug;

use ksm_slo::{errors, Result};

use crate::{
    Context, ExistenceCheck, FieldData, FieldSchema, Operation,
    OperationHandler, Request, Response, Schema,
};

/// A plugin path: the fields it accepts and the handlers serving it.
pub struct Path {
    pattern: String,
    fields: Arc<Schema>,
    operations: HashMap<Operation, Arc<dyn OperationHandler>>,
    existence_check: Option<Arc<dyn ExistenceCheck>>,
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut operations = self.operations.keys().collect::<Vec<_>>();
        operations.sort();
        f.debug_struct("Path")
            .field("pattern", &self.pattern)
            .field("fields", &self.fields)
            .field("operations", &operations)
            .field("existence_check", &self.existence_check.is_some())
            .finish()
    }
}

impl Path {
    pub fn new<S: Into<String>>(pattern: S) -> Self {
        Self {
            pattern: pattern.into(),
            fields: Arc::default(),
            operations: HashMap::new(),
            existence_check: None,
        }
    }

    pub fn field<S: Into<String>>(
        mut self,
        name: S,
        schema: FieldSchema,
    ) -> Self {
        Arc::make_mut(&mut self.fields).insert(name.into(), schema);
        self
    }

    pub fn operation<H>(mut self, operation: Operation, handler: H) -> Self
    where
        H: OperationHandler + 'static,
    {
        self.operations.insert(operation, Arc::new(handler));
        self
    }

    pub fn existence_check<E>(mut self, check: E) -> Self
    where
        E: ExistenceCheck + 'static,
    {
        self.existence_check = Some(Arc::new(check));
        self
    }

    /// Replaces every registered handler with `f(handler)`.
    pub fn wrap_operations<F>(mut self, f: F) -> Self
    where
        F: Fn(Arc<dyn OperationHandler>) -> Arc<dyn OperationHandler>,
    {
        self.operations = self
            .operations
            .into_iter()
            .map(|(operation, handler)| (operation, f(handler)))
            .collect();
        self
    }

    pub fn wrap_existence_check<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Arc<dyn ExistenceCheck>) -> Arc<dyn ExistenceCheck>,
    {
        self.existence_check = self.existence_check.map(f);
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn fields(&self) -> &Schema {
        &self.fields
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.operations.contains_key(&operation)
    }

    pub fn field_data(&self, req: &Request) -> FieldData {
        FieldData::new(req.data.clone(), Arc::clone(&self.fields))
    }

    /// Runs only the existence check. `Ok(None)` when the path has none.
    pub async fn exists(
        &self,
        ctx: &Context,
        req: &Request,
    ) -> Result<Option<bool>> {
        let Some(check) = &self.existence_check else {
            return Ok(None);
        };
        let data = self.field_data(req);
        check.exists(ctx, req, &data).await.map(Some)
    }

    /// Serves a request that the platform routed to this path.
    pub async fn handle(
        &self,
        ctx: &Context,
        req: &Request,
    ) -> Result<Option<Response>> {
        let data = self.field_data(req);
        let operation = self.resolve_operation(ctx, req, &data).await?;
        let handler = self
            .operations
            .get(&operation)
            .ok_or_else(|| errors::unsupported_operation(&operation))?;

        let req = if operation == req.operation {
            Cow::Borrowed(req)
        } else {
            let mut req = req.clone();
            req.operation = operation;
            Cow::Owned(req)
        };
        debug!(
            request_id = ctx.request_id,
            path = %self.pattern,
            %operation,
            "dispatching request"
        );
        handler.handle(ctx, &req, &data).await
    }

    // Writes go through the existence check, which picks create or update.
    // A path without a create handler serves creates as updates.
    async fn resolve_operation(
        &self,
        ctx: &Context,
        req: &Request,
        data: &FieldData,
    ) -> Result<Operation> {
        let check = match (req.operation, &self.existence_check) {
            (Operation::Create | Operation::Update, Some(check)) => check,
            (operation, _) => return Ok(operation),
        };
        if check.exists(ctx, req, data).await? {
            return Ok(Operation::Update);
        }
        if self.supports(Operation::Create) {
            Ok(Operation::Create)
        } else {
            Ok(Operation::Update)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldType, MockExistenceCheck, MockOperationHandler};

    fn handler_for(operation: Operation) -> MockOperationHandler {
        let mut handler = MockOperationHandler::new();
        handler
            .expect_handle()
            .withf(move |_, req, _| req.operation == operation)
            .times(1)
            .returning(|_, req, _| {
                let mut resp = Response::default();
                resp.add_warning(req.operation.as_str());
                Ok(Some(resp))
            });
        handler
    }

    fn existence(exists: bool) -> MockExistenceCheck {
        let mut check = MockExistenceCheck::new();
        check
            .expect_exists()
            .times(1)
            .returning(move |_, _, _| Ok(exists));
        check
    }

    #[tokio::test]
    async fn dispatches_by_operation() {
        let path = Path::new("config")
            .field("path", FieldSchema::new(FieldType::String))
            .operation(Operation::Read, handler_for(Operation::Read));

        let resp = path
            .handle(
                &Context::default(),
                &Request::new(Operation::Read, "config"),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resp.warnings, vec!["read"]);
    }

    #[tokio::test]
    async fn missing_operation_is_unsupported() {
        let path = Path::new("config");
        let err = path
            .handle(
                &Context::default(),
                &Request::new(Operation::Delete, "config"),
            )
            .await
            .unwrap_err();
        assert_eq!(err, errors::unsupported_operation("delete"));
        assert_eq!(err.to_string(), "unsupported operation: delete");
    }

    #[tokio::test]
    async fn existing_resource_is_updated() {
        let path = Path::new("record")
            .operation(Operation::Create, MockOperationHandler::new())
            .operation(Operation::Update, handler_for(Operation::Update))
            .existence_check(existence(true));

        let resp = path
            .handle(
                &Context::default(),
                &Request::new(Operation::Create, "record"),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resp.warnings, vec!["update"]);
    }

    #[tokio::test]
    async fn missing_resource_is_created() {
        let path = Path::new("record")
            .operation(Operation::Create, handler_for(Operation::Create))
            .operation(Operation::Update, MockOperationHandler::new())
            .existence_check(existence(false));

        let resp = path
            .handle(
                &Context::default(),
                &Request::new(Operation::Update, "record"),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resp.warnings, vec!["create"]);
    }

    #[tokio::test]
    async fn create_falls_back_to_update() {
        let path = Path::new("record")
            .operation(Operation::Update, handler_for(Operation::Update))
            .existence_check(existence(false));

        let resp = path
            .handle(
                &Context::default(),
                &Request::new(Operation::Create, "record"),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resp.warnings, vec!["update"]);
    }

    #[tokio::test]
    async fn exists_without_check() {
        let path = Path::new("config");
        let req = Request::new(Operation::Update, "config");
        assert_eq!(path.exists(&Context::default(), &req).await.unwrap(), None);

        let path = path.existence_check(existence(true));
        assert_eq!(
            path.exists(&Context::default(), &req).await.unwrap(),
            Some(true)
        );
    }

    #[test]
    fn wrap_operations_visits_every_handler() {
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let path = Path::new("config")
            .operation(Operation::Read, MockOperationHandler::new())
            .operation(Operation::Update, MockOperationHandler::new())
            .wrap_operations(|handler| {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                handler
            });
        assert_eq!(calls.into_inner(), 2);
        assert!(path.supports(Operation::Read));
        assert!(!path.supports(Operation::Delete));
    }
}
