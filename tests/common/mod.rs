#![allow(dead_code)]

use std::sync::Arc;
use stubcache::{
    default_slot, Adapter, AdapterBase, BinderConfiguration, BindError, BoxFuture, CacheEntry,
    CallError, Channel, ClientType, LoopbackChannel, ServiceContract,
};

pub trait Greeter: Adapter {
    fn greet(&self, name: String) -> BoxFuture<'static, Result<String, CallError>>;
    fn count_letters(&self, word: String) -> BoxFuture<'static, Result<i64, CallError>>;
}

pub struct GreeterClient(AdapterBase);

impl Adapter for GreeterClient {
    fn channel(&self) -> &Channel {
        self.0.channel()
    }

    fn client_type(&self) -> &ClientType {
        self.0.client_type()
    }
}

impl Greeter for GreeterClient {
    fn greet(&self, name: String) -> BoxFuture<'static, Result<String, CallError>> {
        self.0.invoke("greet", name)
    }

    fn count_letters(&self, word: String) -> BoxFuture<'static, Result<i64, CallError>> {
        self.0.invoke("count_letters", word)
    }
}

impl ServiceContract for dyn Greeter {
    const NAME: &'static str = "Greeter";
    default_slot!(dyn Greeter);

    fn map(config: &BinderConfiguration) -> Result<CacheEntry<Self>, BindError> {
        let client_type = ClientType::builder::<Self>(config)
            .method("greet")
            .method("count_letters")
            .build()?;
        Ok(CacheEntry::new(client_type, |channel, client_type| {
            Arc::new(GreeterClient(AdapterBase::new(channel, client_type.clone()))) as Arc<dyn Greeter>
        }))
    }
}

/// A loopback channel serving `Greeter` under the paths `config` produces.
pub fn greeter_channel(config: &BinderConfiguration) -> Channel {
    let server = LoopbackChannel::new()
        .route(
            config.operation_path("Greeter", "greet"),
            |name: String| async move { Ok(format!("Hello, {name}!")) },
        )
        .route(
            config.operation_path("Greeter", "count_letters"),
            |word: String| async move { Ok(word.chars().filter(|c| c.is_alphabetic()).count() as i64) },
        );
    Channel::new(server)
}
