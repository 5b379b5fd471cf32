//! Cached creation of service clients over a transport-agnostic [`Channel`].
//!
//! A service contract is a trait (`dyn Greeter`) implementing
//! [`ServiceContract`]. A [`ClientFactory`] turns a contract and a channel into
//! an `Arc<dyn Greeter>` adapter, mapping each contract at most once per
//! [`BinderConfiguration`] and handing every later caller the same
//! [`ClientType`].

mod macros;

pub mod channel;
pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod factory;
pub mod types;

pub use channel::{loopback::LoopbackChannel, CallInvoker, CallResult, Channel};
pub use client::{ContractClient, UntypedClient};
pub use config::{BinderConfiguration, BinderOptions, MethodNaming};
pub use contract::{
    Adapter, AdapterBase, CacheEntry, ClientType, ClientTypeBuilder, ContractId, DefaultSlot,
    Operation, ServiceContract,
};
pub use error::{BindError, CallError};
pub use factory::ClientFactory;
pub use futures::future::BoxFuture;
pub use types::{Decode, Encode, Type, TypeMismatch, Typed, Value};
