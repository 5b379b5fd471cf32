use crate::{
    channel::Channel,
    config::BinderConfiguration,
    contract::{ContractId, ServiceContract},
    error::BindError,
    factory::ClientFactory,
};
use std::{fmt, sync::Arc};

/// A contract-typed adapter together with the channel backing it.
///
/// This is only a carrier; calls go through [`service`](Self::service).
pub struct ContractClient<T: ?Sized> {
    channel: Channel,
    service: Arc<T>,
}

impl<T: ?Sized> ContractClient<T> {
    pub fn new(channel: Channel, service: Arc<T>) -> Self {
        Self { channel, service }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// The adapter as the contract type.
    pub fn service(&self) -> &Arc<T> {
        &self.service
    }

    pub fn into_service(self) -> Arc<T> {
        self.service
    }
}

impl<T: ?Sized> Clone for ContractClient<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
            service: Arc::clone(&self.service),
        }
    }
}

impl<T: ?Sized> fmt::Debug for ContractClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractClient")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

/// A client whose contract is only known at runtime.
///
/// Produced by [`ClientFactory::create_adapter`]. Nothing is mapped until
/// [`resolve`](Self::resolve) is called with the matching contract type.
#[derive(Clone, Debug)]
pub struct UntypedClient {
    channel: Channel,
    contract: ContractId,
    factory: ClientFactory,
}

impl UntypedClient {
    pub(crate) fn new(channel: Channel, contract: ContractId, factory: ClientFactory) -> Self {
        Self {
            channel,
            contract,
            factory,
        }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn contract(&self) -> ContractId {
        self.contract
    }

    pub fn binder_configuration(&self) -> &BinderConfiguration {
        self.factory.binder_configuration()
    }

    /// Create the adapter through the originating factory.
    pub fn resolve<T>(&self) -> Result<ContractClient<T>, BindError>
    where
        T: ServiceContract + ?Sized,
    {
        let requested = ContractId::of::<T>();
        if requested != self.contract {
            return Err(BindError::ContractMismatch {
                created: self.contract,
                requested,
            });
        }
        self.factory.contract_client::<T>(self.channel.clone())
    }
}
