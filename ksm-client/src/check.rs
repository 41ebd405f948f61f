use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use ksm::{
    errors::StatusCode,
    framework::{
        Context, FieldData, Map, Operation, OperationHandler, Path, Request,
        Response,
    },
    validator::validated,
    Result,
};

use crate::schema::{RequestDocument, SchemaFile};

/// Answers every operation with the field values a plugin handler would
/// see: supplied values, else schema defaults.
#[derive(Debug, Clone, Copy, Default)]
struct Resolve;

#[async_trait]
impl OperationHandler for Resolve {
    async fn handle(
        &self,
        _ctx: &Context,
        _req: &Request,
        data: &FieldData,
    ) -> Result<Option<Response>> {
        let mut names = data.schema.keys().collect::<Vec<_>>();
        names.sort_unstable();

        let mut resolved = Map::new();
        let mut missing = Vec::new();
        for name in names {
            match data.get(name) {
                Some(value) => {
                    resolved.insert(name.clone(), value);
                }
                None if data.schema[name].required => missing.push(name),
                None => {}
            }
        }

        let mut resp = Response::with_data(resolved);
        for name in missing {
            resp.add_warning(format!("missing required field: {}", name));
        }
        Ok(Some(resp))
    }
}

pub fn build_path(schema: SchemaFile) -> Path {
    let SchemaFile { pattern, fields } = schema;
    let path = fields
        .into_iter()
        .fold(Path::new(pattern), |path, (name, field)| {
            path.field(name, field)
        });
    let path = Operation::ALL
        .into_iter()
        .fold(path, |path, operation| path.operation(operation, Resolve));
    validated(path)
}

/// Result of checking one request, rendered like an API response.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

pub async fn check(schema: SchemaFile, doc: RequestDocument) -> Outcome {
    let req = doc.into_request(&schema.pattern);
    let path = build_path(schema);
    let ctx = Context::new();

    match path.handle(&ctx, &req).await {
        Ok(resp) => {
            info!(
                request_id = ctx.request_id,
                operation = %req.operation,
                "request accepted"
            );
            let body = resp
                .map(|resp| serde_json::to_value(resp).unwrap_or_default())
                .unwrap_or_else(|| json!({}));
            Outcome {
                status: StatusCode::OK,
                body,
            }
        }
        Err(err) => {
            let (status, code) = err.code();
            info!(
                request_id = ctx.request_id,
                %status,
                "request rejected: {}",
                err
            );
            Outcome {
                status,
                body: json!({
                    "code": code,
                    "message": err.to_string(),
                }),
            }
        }
    }
}
