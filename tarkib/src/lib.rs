//! # Tarkib — string-keyed dependency resolution for Rust
//!
//! A lightweight resolver and service locator in the spirit of classic
//! reflection-based containers: ask for a type key, get back a
//! constructed instance with its dependencies resolved and cached.
//!
//! ```
//! use tarkib::prelude::*;
//! use tarkib::value::shared;
//!
//! struct Clock;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(TypeSpec::new("app.Clock", |_| Ok(shared(Clock))));
//!
//! let resolver = Resolver::with_registry(registry);
//! let clock = resolver.get_as::<Clock>("app.Clock", Flags::NONE).unwrap();
//! let again = resolver.get_as::<Clock>("app.Clock", Flags::NONE).unwrap();
//! assert!(std::sync::Arc::ptr_eq(&clock, &again));
//! ```

pub use tarkib_resolver::*;
pub use tarkib_support::*;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use super::value::shared;
    use std::sync::Arc;

    struct Clock;

    #[test]
    fn facade_reexports_the_resolver_surface() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeSpec::new("app.Clock", |_| Ok(shared(Clock))));

        let resolver = Resolver::with_registry(registry);
        resolver.map("tz", Binding::value(String::from("UTC")));

        assert!(resolver.get_as::<Clock>("app.Clock", Flags::NONE).is_ok());
        let tz = resolver.parameter("tz").unwrap();
        assert_eq!(tz.downcast_ref::<String>().unwrap(), "UTC");

        assert_eq!(super::shorten_key("app.Clock"), "Clock");
        let _ = Arc::ptr_eq(
            &resolver.get("app.Clock", Flags::NONE).unwrap(),
            &resolver.get("app.Clock", Flags::NONE).unwrap(),
        );
    }
}
