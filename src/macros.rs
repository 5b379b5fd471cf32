/// Implements [`ServiceContract::default_slot`](crate::ServiceContract::default_slot)
/// with a `static` dedicated to the given contract type.
///
/// ```rust, ignore
/// impl ServiceContract for dyn Greeter {
///     const NAME: &'static str = "Greeter";
///     default_slot!(dyn Greeter);
///     // fn map(..)
/// }
/// ```
#[macro_export]
macro_rules! default_slot {
    ($contract:ty) => {
        fn default_slot() -> &'static $crate::DefaultSlot<$contract> {
            static SLOT: $crate::DefaultSlot<$contract> = $crate::DefaultSlot::new();
            &SLOT
        }
    };
}
