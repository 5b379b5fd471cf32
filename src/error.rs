use crate::{contract::ContractId, types::TypeMismatch};
use thiserror::Error;

/// Failure while mapping a contract to a concrete client type.
///
/// Raised by [`ServiceContract::map`](crate::ServiceContract::map) and passed
/// through the factories unchanged. Nothing is cached for a failed mapping, so
/// the next request for the same contract tries again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("contract `{contract}` is malformed: {reason}")]
    MalformedContract {
        contract: &'static str,
        reason: String,
    },

    #[error("contract `{contract}` declares method `{method}` more than once")]
    DuplicateMethod {
        contract: &'static str,
        method: &'static str,
    },

    #[error("contract `{contract}` method `{method}` is not supported: {reason}")]
    UnsupportedMethod {
        contract: &'static str,
        method: &'static str,
        reason: String,
    },

    #[error("client was created for `{}`, not `{}`", .created.name(), .requested.name())]
    ContractMismatch {
        created: ContractId,
        requested: ContractId,
    },
}

/// Failure of a single call made through an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("client has no operation for method `{0}`")]
    NoSuchOperation(String),

    #[error("nothing is bound to `{0}`")]
    Unimplemented(String),

    #[error("request type mismatch: {0}")]
    Request(TypeMismatch),

    #[error("response type mismatch: {0}")]
    Response(TypeMismatch),

    #[error("transport: {0}")]
    Transport(String),
}
