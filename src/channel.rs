pub mod loopback;

use crate::{contract::Operation, error::CallError, types::Value};
use futures::future::BoxFuture;
use std::{fmt, sync::Arc};

pub type CallResult = Result<Value, CallError>;

/// Transport capability behind a [`Channel`].
///
/// Implementations issue one unary call per invocation. Factories never call
/// this; only adapters do.
pub trait CallInvoker: Send + Sync + 'static {
    fn unary(&self, operation: &Operation, request: Value) -> BoxFuture<'static, CallResult>;
}

/// Shared handle to a [`CallInvoker`], cloned into every adapter bound to it.
#[derive(Clone)]
pub struct Channel(Arc<dyn CallInvoker>);

impl Channel {
    pub fn new<I: CallInvoker>(invoker: I) -> Self {
        Self(Arc::new(invoker))
    }

    pub fn unary(&self, operation: &Operation, request: Value) -> BoxFuture<'static, CallResult> {
        self.0.unary(operation, request)
    }

    /// True if both handles share one invoker.
    pub fn same_channel(&self, other: &Channel) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Channel")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}
