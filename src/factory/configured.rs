use crate::{
    channel::Channel,
    config::BinderConfiguration,
    contract::{CacheEntry, ClientType, ServiceContract},
    error::BindError,
};
use dashmap::{mapref::entry::Entry, DashMap};
use std::{
    any::{Any, TypeId},
    sync::Arc,
};
use tracing::{debug, trace};

type ErasedEntry = Arc<dyn Any + Send + Sync>;

/// Client factory bound to one explicit, non-default configuration.
///
/// Entries are keyed by contract `TypeId`. Building happens outside any lock;
/// when several threads miss at once each builds a candidate and the first to
/// insert wins. Losers drop their candidate and use the winner's entry, so a
/// contract has exactly one [`ClientType`] per factory.
pub(crate) struct ConfiguredClientFactory {
    configuration: BinderConfiguration,
    stubs: DashMap<TypeId, ErasedEntry>,
}

impl ConfiguredClientFactory {
    pub(crate) fn new(configuration: BinderConfiguration) -> Self {
        debug!(configuration = ?configuration.options(), "creating configured client factory");
        Self {
            configuration,
            stubs: DashMap::new(),
        }
    }

    pub(crate) fn configuration(&self) -> &BinderConfiguration {
        &self.configuration
    }

    pub(crate) fn cached_contracts(&self) -> usize {
        self.stubs.len()
    }

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
    fn stub<T>(&self) -> Result<Arc<CacheEntry<T>>, BindError>
    where
        T: ServiceContract + ?Sized,
    {
        let published = self
            .stubs
            .get(&TypeId::of::<T>())
            .map(|stub| stub.value().clone());
        match published {
            Some(stub) => Ok(downcast(stub)),
            None => self.slow_create_stub::<T>(),
        }
    }

    #[cold]
    #[inline(never)]
    fn slow_create_stub<T>(&self) -> Result<Arc<CacheEntry<T>>, BindError>
    where
        T: ServiceContract + ?Sized,
    {
        debug!(contract = T::NAME, "mapping contract for configured factory");
        let candidate: ErasedEntry = Arc::new(T::map(&self.configuration)?);

        let canonical = match self.stubs.entry(TypeId::of::<T>()) {
            Entry::Occupied(winner) => {
                trace!(contract = T::NAME, "discarding stub built by a racing caller");
                winner.get().clone()
            }
            Entry::Vacant(slot) => slot.insert(candidate).value().clone(),
        };
        Ok(downcast(canonical))
    }
}

fn downcast<T>(stub: ErasedEntry) -> Arc<CacheEntry<T>>
where
    T: ServiceContract + ?Sized,
{
    match stub.downcast::<CacheEntry<T>>() {
        Ok(entry) => entry,
        Err(_) => unreachable!("stub cache keyed by TypeId holds an entry for another contract"),
    }
}
