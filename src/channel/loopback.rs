use super::{CallInvoker, CallResult};
use crate::{
    contract::Operation,
    error::CallError,
    types::{Decode, Encode, Value},
};
use futures::{future::BoxFuture, FutureExt};
use std::{collections::BTreeMap, future::Future, sync::Arc};

/// An in-process [`CallInvoker`] that routes wire paths to local handlers.
///
/// Handlers are registered with [`route`](Self::route) and looked up by the
/// operation's wire path on every call.
#[derive(Default)]
pub struct LoopbackChannel {
    routes: BTreeMap<String, Arc<dyn DynamicHandler>>,
}

impl LoopbackChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route<Req, Resp, F, Fut>(mut self, path: impl Into<String>, handler: F) -> Self
    where
        Req: Decode + Send + 'static,
        Resp: Encode + 'static,
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, CallError>> + Send + 'static,
    {
        let typed = TypedHandler {
            handler,
            _marker: std::marker::PhantomData,
        };
        self.routes.insert(path.into(), Arc::new(typed));
        self
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }
}

impl CallInvoker for LoopbackChannel {
    fn unary(&self, operation: &Operation, request: Value) -> BoxFuture<'static, CallResult> {
        match self.routes.get(operation.path()) {
            Some(handler) => handler.call(request),
            None => {
                let path = operation.path().to_owned();
                Box::pin(async move { Err(CallError::Unimplemented(path)) })
            }
        }
    }
}

struct TypedHandler<F, Req, Resp> {
    handler: F,
    _marker: std::marker::PhantomData<fn(Req) -> Resp>,
}

/// A type-erased version of a routed handler
trait DynamicHandler: Send + Sync {
    fn call(&self, request: Value) -> BoxFuture<'static, CallResult>;
}

impl<F, Fut, Req, Resp> DynamicHandler for TypedHandler<F, Req, Resp>
where
    Req: Decode + Send + 'static,
    Resp: Encode + 'static,
    F: Fn(Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Resp, CallError>> + Send + 'static,
{
    fn call(&self, request: Value) -> BoxFuture<'static, CallResult> {
        let decoded = match Req::decode(request) {
            Ok(decoded) => decoded,
            Err(mismatch) => return Box::pin(async move { Err(CallError::Request(mismatch)) }),
        };
        (self.handler)(decoded)
            .map(|retval| retval.map(Resp::encode))
            .boxed()
    }
}
