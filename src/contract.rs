//! Service contracts and the pieces a contract mapping hands back to the
//! factories.
//!
//! A contract is a trait object type such as `dyn Greeter`. Implementing
//! [`ServiceContract`] for it supplies the mapping from a
//! [`BinderConfiguration`] to a [`CacheEntry`]: the concrete [`ClientType`]
//! plus a function that builds an adapter over a [`Channel`].
//!
//! ```rust, ignore
//! pub trait Greeter: Adapter {
//!     fn greet(&self, name: String) -> BoxFuture<'static, Result<String, CallError>>;
//! }
//!
//! impl ServiceContract for dyn Greeter {
//!     const NAME: &'static str = "Greeter";
//!     default_slot!(dyn Greeter);
//!
//!     fn map(config: &BinderConfiguration) -> Result<CacheEntry<Self>, BindError> {
//!         let client_type = ClientType::builder::<Self>(config).method("greet").build()?;
//!         Ok(CacheEntry::new(client_type, |channel, client_type| {
//!             Arc::new(GreeterClient(AdapterBase::new(channel, client_type.clone())))
//!         }))
//!     }
//! }
//! ```

use crate::{
    channel::Channel,
    config::BinderConfiguration,
    error::{BindError, CallError},
    types::{Decode, Encode},
};
use futures::future::BoxFuture;
use once_cell::sync::OnceCell;
use std::{
    any::TypeId,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// A remotely callable interface that the factories can materialize.
///
/// # Mapping contract
///
/// `map` must be reproducible: for the same configuration it has to describe
/// the same operations every time. Concurrent first use may run it more than
/// once, and only one result is kept. It must not request a client for its own
/// contract from the default factory.
pub trait ServiceContract: Send + Sync + 'static {
    /// Service name used in wire paths.
    const NAME: &'static str;

    /// Derive the concrete client for this contract under `config`.
    fn map(config: &BinderConfiguration) -> Result<CacheEntry<Self>, BindError>;

    /// Static storage for the default configuration's entry. Use
    /// [`default_slot!`](crate::default_slot) to implement this.
    fn default_slot() -> &'static DefaultSlot<Self>;
}

/// Per-contract static holding the default configuration's [`CacheEntry`].
pub struct DefaultSlot<T: ?Sized>(OnceCell<CacheEntry<T>>);

impl<T: ?Sized> DefaultSlot<T> {
    pub const fn new() -> Self {
        Self(OnceCell::new())
    }

    pub(crate) fn get_or_try_init(
        &self,
        build: impl FnOnce() -> Result<CacheEntry<T>, BindError>,
    ) -> Result<&CacheEntry<T>, BindError> {
        self.0.get_or_try_init(build)
    }

    pub fn is_published(&self) -> bool {
        self.0.get().is_some()
    }
}

impl<T: ?Sized> Default for DefaultSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity of a contract type, for APIs that can't be generic over it.
#[derive(Clone, Copy)]
pub struct ContractId {
    type_id: TypeId,
    name: &'static str,
}

impl ContractId {
    pub fn of<T: ServiceContract + ?Sized>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::NAME,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ContractId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ContractId {}

impl Hash for ContractId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractId({})", self.name)
    }
}

/// One remote method and the wire path it was bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    method: &'static str,
    path: String,
}

impl Operation {
    pub fn new(method: &'static str, path: String) -> Self {
        Self { method, path }
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

struct ClientTypeInfo {
    contract: ContractId,
    configuration: BinderConfiguration,
    operations: Vec<Operation>,
}

/// The concrete adapter type produced for a (contract, configuration) pair.
///
/// Compared by identity: two `ClientType`s are equal only if they came from the
/// same published cache entry.
#[derive(Clone)]
pub struct ClientType(Arc<ClientTypeInfo>);

impl ClientType {
    pub fn builder<T: ServiceContract + ?Sized>(config: &BinderConfiguration) -> ClientTypeBuilder {
        ClientTypeBuilder {
            contract: ContractId::of::<T>(),
            configuration: config.clone(),
            methods: Vec::new(),
        }
    }

    pub fn contract(&self) -> ContractId {
        self.0.contract
    }

    pub fn configuration(&self) -> &BinderConfiguration {
        &self.0.configuration
    }

    pub fn operations(&self) -> &[Operation] {
        &self.0.operations
    }

    pub fn operation(&self, method: &str) -> Option<&Operation> {
        self.0.operations.iter().find(|op| op.method == method)
    }
}

impl PartialEq for ClientType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ClientType {}

impl Hash for ClientType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientType")
            .field("contract", &self.0.contract)
            .field("id", &Arc::as_ptr(&self.0))
            .field("operations", &self.0.operations)
            .finish()
    }
}

pub struct ClientTypeBuilder {
    contract: ContractId,
    configuration: BinderConfiguration,
    methods: Vec<&'static str>,
}

impl ClientTypeBuilder {
    pub fn method(mut self, name: &'static str) -> Self {
        self.methods.push(name);
        self
    }

    pub fn build(self) -> Result<ClientType, BindError> {
        let contract = self.contract.name();
        if self.methods.is_empty() {
            return Err(BindError::MalformedContract {
                contract,
                reason: "no methods declared".into(),
            });
        }

        let mut operations: Vec<Operation> = Vec::with_capacity(self.methods.len());
        for method in self.methods {
            if method.is_empty() {
                return Err(BindError::MalformedContract {
                    contract,
                    reason: "empty method name".into(),
                });
            }
            if operations.iter().any(|op| op.method == method) {
                return Err(BindError::DuplicateMethod { contract, method });
            }
            let path = self.configuration.operation_path(contract, method);
            operations.push(Operation::new(method, path));
        }

        Ok(ClientType(Arc::new(ClientTypeInfo {
            contract: self.contract,
            configuration: self.configuration,
            operations,
        })))
    }
}

/// The immutable (factory, concrete type) pair cached per contract and
/// configuration.
pub struct CacheEntry<T: ?Sized> {
    factory: Arc<dyn Fn(Channel, &ClientType) -> Arc<T> + Send + Sync>,
    client_type: ClientType,
}

impl<T: ?Sized> CacheEntry<T> {
    pub fn new<F>(client_type: ClientType, factory: F) -> Self
    where
        F: Fn(Channel, &ClientType) -> Arc<T> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            client_type,
        }
    }

    pub fn client_type(&self) -> &ClientType {
        &self.client_type
    }

    pub fn create(&self, channel: Channel) -> Arc<T> {
        (self.factory)(channel, &self.client_type)
    }
}

impl<T: ?Sized> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            client_type: self.client_type.clone(),
        }
    }
}

/// Implemented by every generated adapter.
pub trait Adapter: Send + Sync {
    fn channel(&self) -> &Channel;
    fn client_type(&self) -> &ClientType;
}

/// State shared by generated adapters: the channel and the concrete type the
/// adapter was created as.
#[derive(Clone, Debug)]
pub struct AdapterBase {
    channel: Channel,
    client_type: ClientType,
}

impl AdapterBase {
    pub fn new(channel: Channel, client_type: ClientType) -> Self {
        Self {
            channel,
            client_type,
        }
    }

    /// Encode `request`, send it to `method`'s wire path, decode the reply.
    pub fn invoke<Req, Resp>(
        &self,
        method: &str,
        request: Req,
    ) -> BoxFuture<'static, Result<Resp, CallError>>
    where
        Req: Encode,
        Resp: Decode + Send + 'static,
    {
        let call = match self.client_type.operation(method) {
            Some(operation) => self.channel.unary(operation, Req::encode(request)),
            None => {
                let method = method.to_owned();
                return Box::pin(async move { Err(CallError::NoSuchOperation(method)) });
            }
        };
        Box::pin(async move { Resp::decode(call.await?).map_err(CallError::Response) })
    }
}

impl Adapter for AdapterBase {
    fn channel(&self) -> &Channel {
        &self.channel
    }

    fn client_type(&self) -> &ClientType {
        &self.client_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BinderOptions, MethodNaming};

    trait Probe: Send + Sync {}

    impl ServiceContract for dyn Probe {
        const NAME: &'static str = "Probe";
        crate::default_slot!(dyn Probe);

        fn map(config: &BinderConfiguration) -> Result<CacheEntry<Self>, BindError> {
            let client_type = ClientType::builder::<Self>(config).method("poke").build()?;
            Ok(CacheEntry::new(client_type, |_, _| unreachable!()))
        }
    }

    #[test]
    fn builder_binds_paths_under_configuration() {
        let config = BinderConfiguration::new(BinderOptions {
            package: Some("lab".into()),
            naming: MethodNaming::PascalCase,
        });
        let ty = ClientType::builder::<dyn Probe>(&config)
            .method("poke")
            .method("read_back")
            .build()
            .unwrap();

        assert_eq!(ty.contract(), ContractId::of::<dyn Probe>());
        assert_eq!(ty.configuration(), &config);
        assert_eq!(ty.operation("read_back").unwrap().path(), "/lab.Probe/ReadBack");
        assert!(ty.operation("missing").is_none());
        assert_eq!(ty.operations().len(), 2);
    }

    #[test]
    fn builder_rejects_bad_shapes() {
        let config = BinderConfiguration::default();
        let dup = ClientType::builder::<dyn Probe>(&config)
            .method("poke")
            .method("poke")
            .build()
            .unwrap_err();
        assert_eq!(
            dup,
            BindError::DuplicateMethod {
                contract: "Probe",
                method: "poke"
            }
        );

        let empty = ClientType::builder::<dyn Probe>(&config).build().unwrap_err();
        assert!(matches!(empty, BindError::MalformedContract { .. }));
    }

    #[test]
    fn client_types_compare_by_identity() {
        let config = BinderConfiguration::default();
        let a = <dyn Probe as ServiceContract>::map(&config).unwrap();
        let b = <dyn Probe as ServiceContract>::map(&config).unwrap();

        assert_eq!(a.client_type(), a.clone().client_type());
        assert_ne!(a.client_type(), b.client_type());
        assert!(!<dyn Probe as ServiceContract>::default_slot().is_published());
    }
}
