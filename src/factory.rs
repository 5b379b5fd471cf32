//! Creating service clients.
//!
//! [`ClientFactory::default`] serves the default [`BinderConfiguration`] from
//! per-contract statics. [`ClientFactory::create`] with any other
//! configuration builds a factory owning its own cache; that is expensive, so
//! keep the returned value and clone it rather than calling `create` again.
//! Factories are never deduplicated: two `create` calls with the same
//! configuration give two independent caches.

mod configured;
mod default;

use crate::{
    channel::Channel,
    client::{ContractClient, UntypedClient},
    config::BinderConfiguration,
    contract::{ClientType, ContractId, ServiceContract},
    error::BindError,
};
use configured::ConfiguredClientFactory;
use default::DefaultClientFactory;
use std::{fmt, sync::Arc};

/// Creates adapters for service contracts over a [`Channel`].
///
/// Cloning is cheap and clones share one cache.
#[derive(Clone)]
pub struct ClientFactory(Kind);

#[derive(Clone)]
enum Kind {
    Default(&'static DefaultClientFactory),
    Configured(Arc<ConfiguredClientFactory>),
}

impl Default for ClientFactory {
    /// The process-wide factory for the default configuration.
    fn default() -> Self {
        Self(Kind::Default(&default::INSTANCE))
    }
}

impl ClientFactory {
    /// Returns the default factory for `None` or the default configuration,
    /// and a new factory with a fresh cache for anything else.
    pub fn create(configuration: Option<BinderConfiguration>) -> Self {
        match configuration {
            Some(configuration) if !configuration.is_default() => Self(Kind::Configured(
                Arc::new(ConfiguredClientFactory::new(configuration)),
            )),
            _ => Self::default(),
        }
    }

    /// The configuration this factory binds with. Fixed for its lifetime.
    pub fn binder_configuration(&self) -> &BinderConfiguration {
        match &self.0 {
            Kind::Default(_) => BinderConfiguration::default_ref(),
            Kind::Configured(factory) => factory.configuration(),
        }
    }

    /// True for the process-wide default factory.
    pub fn is_default(&self) -> bool {
        matches!(self.0, Kind::Default(_))
    }

    /// True if both handles refer to the same factory and share a cache.
    pub fn same_instance(&self, other: &ClientFactory) -> bool {
        match (&self.0, &other.0) {
            (Kind::Default(_), Kind::Default(_)) => true,
            (Kind::Configured(a), Kind::Configured(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Number of contracts with a published entry in this factory's own
    /// cache. `None` for the default factory, whose entries live in
    /// per-contract statics.
    pub fn cached_contracts(&self) -> Option<usize> {
        match &self.0 {
            Kind::Default(_) => None,
            Kind::Configured(factory) => Some(factory.cached_contracts()),
        }
    }

    /// Create an adapter for contract `T` backed by `channel`.
    ///
    /// The first request for `T` maps the contract; errors from the mapping
    /// are returned as-is and nothing is cached for them.
    pub fn create_client<T>(&self, channel: Channel) -> Result<Arc<T>, BindError>
    where
        T: ServiceContract + ?Sized,
    {
        match &self.0 {
            Kind::Default(factory) => factory.create_client::<T>(channel),
            Kind::Configured(factory) => factory.create_client::<T>(channel),
        }
    }

    /// The concrete client type [`create_client`](Self::create_client) would
    /// produce for `T`, without creating an instance.
    pub fn client_type<T>(&self) -> Result<ClientType, BindError>
    where
        T: ServiceContract + ?Sized,
    {
        match &self.0 {
            Kind::Default(factory) => factory.client_type::<T>(),
            Kind::Configured(factory) => factory.client_type::<T>(),
        }
    }

    /// Like [`create_client`](Self::create_client), wrapped together with the
    /// channel.
    pub fn contract_client<T>(&self, channel: Channel) -> Result<ContractClient<T>, BindError>
    where
        T: ServiceContract + ?Sized,
    {
        let service = self.create_client::<T>(channel.clone())?;
        Ok(ContractClient::new(channel, service))
    }

    /// Non-generic overload: records the channel, contract and this factory
    /// without mapping anything yet. See [`UntypedClient::resolve`].
    pub fn create_adapter(&self, channel: Channel, contract: ContractId) -> UntypedClient {
        UntypedClient::new(channel, contract, self.clone())
    }
}

impl From<&ClientFactory> for BinderConfiguration {
    fn from(factory: &ClientFactory) -> Self {
        factory.binder_configuration().clone()
    }
}

impl fmt::Debug for ClientFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ClientFactory");
        match &self.0 {
            Kind::Default(_) => s.field("kind", &"default"),
            Kind::Configured(factory) => s
                .field("kind", &"configured")
                .field("cached_contracts", &factory.cached_contracts()),
        };
        s.field("configuration", self.binder_configuration()).finish()
    }
}
