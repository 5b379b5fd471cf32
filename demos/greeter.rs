use std::sync::Arc;
use stubcache::{
    default_slot, Adapter, AdapterBase, BinderConfiguration, BinderOptions, BindError, BoxFuture,
    CacheEntry, CallError, Channel, ClientFactory, ClientType, LoopbackChannel, MethodNaming,
    ServiceContract,
};

pub trait Greeter: Adapter {
    fn greet(&self, name: String) -> BoxFuture<'static, Result<String, CallError>>;
}

struct GreeterClient(AdapterBase);

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
        self.0.invoke("say_hello", name)
    }
}

impl ServiceContract for dyn Greeter {
    const NAME: &'static str = "Greeter";
    default_slot!(dyn Greeter);

    fn map(config: &BinderConfiguration) -> Result<CacheEntry<Self>, BindError> {
        let client_type = ClientType::builder::<Self>(config).method("say_hello").build()?;
        Ok(CacheEntry::new(client_type, |channel, client_type| {
            Arc::new(GreeterClient(AdapterBase::new(channel, client_type.clone()))) as Arc<dyn Greeter>
        }))
    }
}

fn serve(config: &BinderConfiguration) -> Channel {
    Channel::new(LoopbackChannel::new().route(
        config.operation_path("Greeter", "say_hello"),
        |name: String| async move { Ok(format!("Hello, {name}!")) },
    ))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let default = ClientFactory::default();
    let greeter = default
        .create_client::<dyn Greeter>(serve(default.binder_configuration()))
        .unwrap();
    println!("{}", greeter.greet("world".into()).await.unwrap());

    let config = BinderConfiguration::new(BinderOptions {
        package: Some("greet.v1".into()),
        naming: MethodNaming::PascalCase,
    });
    let factory = ClientFactory::create(Some(config.clone()));
    let greeter = factory.create_client::<dyn Greeter>(serve(&config)).unwrap();
    for op in greeter.client_type().operations() {
        println!("{} -> {}", op.method(), op.path());
    }
    println!("{}", greeter.greet("configured world".into()).await.unwrap());
}
