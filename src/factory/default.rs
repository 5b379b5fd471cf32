use crate::{
    channel::Channel,
    config::BinderConfiguration,
    contract::{CacheEntry, ClientType, ServiceContract},
    error::BindError,
};
use std::sync::Arc;
use tracing::debug;

/// Client factory for the default configuration.
///
/// Each contract keeps its entry in its own [`DefaultSlot`](crate::DefaultSlot)
/// static, so there is no map to search. The first caller maps the contract;
/// concurrent callers wait for it and then see the same entry. A failed
/// mapping leaves the slot empty.
pub(crate) struct DefaultClientFactory;

pub(crate) static INSTANCE: DefaultClientFactory = DefaultClientFactory;

impl DefaultClientFactory {
    pub(crate) fn create_client<T>(&self, channel: Channel) -> Result<Arc<T>, BindError>
    where
        T: ServiceContract + ?Sized,
    {
        Ok(self.stub::<T>()?.create(channel))
    }

    pub(crate) fn client_type<T>(&self) -> Result<ClientType, BindError>
    where
        T: ServiceContract + ?Sized,
    {
        Ok(self.stub::<T>()?.client_type().clone())
    }

    #[inline]
    fn stub<T>(&self) -> Result<&'static CacheEntry<T>, BindError>
    where
        T: ServiceContract + ?Sized,
    {
        T::default_slot().get_or_try_init(|| {
            debug!(contract = T::NAME, "mapping contract for default factory");
            T::map(BinderConfiguration::default_ref())
        })
    }
}
