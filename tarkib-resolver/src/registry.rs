//! The type registry — constructor metadata for resolvable types.
//!
//! The original design leaned on runtime reflection to discover a class's
//! constructor signature. Rust has no equivalent, so each constructible
//! type registers a [`TypeSpec`] instead: a constructor function plus an
//! ordered list of parameter descriptors. The resolver consumes the
//! registry through the [`Introspect`] trait and the resolution algorithm
//! is otherwise unchanged.
//!
//! # Examples
//! ```
//! use tarkib_resolver::registry::{TypeRegistry, TypeSpec};
//! use tarkib_resolver::value::shared;
//!
//! struct Transport;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     TypeSpec::new("app.Transport", |_| Ok(shared(Transport)))
//! );
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::binding::ProducerFn;
use crate::value::{Args, BoxError, SharedValue};

/// Constructor function for a registered type.
///
/// Receives the ordered, already-resolved argument list and returns the
/// constructed instance. Shared (`Arc`) because the registry backing the
/// process-wide resolver is reachable from any thread.
pub type ConstructFn = Arc<dyn Fn(Args) -> Result<SharedValue, BoxError> + Send + Sync>;

/// Supplies constructor metadata for a type key.
///
/// This is the seam the resolver sees; [`TypeRegistry`] is the stock
/// implementation and tests can supply their own.
pub trait Introspect: Send + Sync {
    /// The spec registered under `type_key`, if any.
    fn spec(&self, type_key: &str) -> Option<&TypeSpec>;

    /// All registered type keys, for "did you mean?" suggestions.
    fn known_keys(&self) -> Vec<String>;
}

/// A single declared constructor parameter.
///
/// A parameter has a name, optionally a declared constructible type key,
/// and optionally a default value.
#[derive(Clone)]
pub struct ParamSpec {
    name: &'static str,
    type_key: Option<&'static str>,
    default: Option<SharedValue>,
}

impl ParamSpec {
    /// A parameter with no declared type and no default.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            type_key: None,
            default: None,
        }
    }

    /// Declares the parameter's constructible type.
    #[must_use]
    pub fn typed(mut self, type_key: &'static str) -> Self {
        self.type_key = Some(type_key);
        self
    }

    /// Declares a default value.
    ///
    /// Defaults are shared: every construction that falls back to the
    /// default receives the same value.
    #[must_use]
    pub fn default_value<T: std::any::Any + Send + Sync>(mut self, value: T) -> Self {
        self.default = Some(Arc::new(value));
        self
    }

    /// The declared parameter name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared type key, if any.
    pub fn type_key(&self) -> Option<&'static str> {
        self.type_key
    }

    /// The declared default value, if any.
    pub fn default(&self) -> Option<&SharedValue> {
        self.default.as_ref()
    }
}

impl fmt::Debug for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamSpec")
            .field("name", &self.name)
            .field("type_key", &self.type_key)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

/// Constructor metadata for one resolvable type.
#[derive(Clone)]
pub struct TypeSpec {
    key: &'static str,
    params: Vec<ParamSpec>,
    construct: ConstructFn,
    callables: HashMap<&'static str, ProducerFn>,
}

impl TypeSpec {
    /// A spec for `key` with the given constructor and, initially, no
    /// parameters. A type with no declared parameters is constructed
    /// with an empty argument list.
    pub fn new<F>(key: &'static str, construct: F) -> Self
    where
        F: Fn(Args) -> Result<SharedValue, BoxError> + Send + Sync + 'static,
    {
        Self {
            key,
            params: Vec::new(),
            construct: Arc::new(construct),
            callables: HashMap::new(),
        }
    }

    /// Appends a declared constructor parameter. Declaration order is
    /// argument order.
    #[must_use]
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Registers a named zero-argument callable on this type, the target
    /// of a [`Binding::CallableRef`](crate::binding::Binding).
    #[must_use]
    pub fn callable<F>(mut self, name: &'static str, producer: F) -> Self
    where
        F: Fn() -> SharedValue + Send + Sync + 'static,
    {
        self.callables.insert(name, Arc::new(producer));
        self
    }

    /// The type key this spec is registered under.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Declared parameters in declaration order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// The named callable, if registered.
    pub fn find_callable(&self, name: &str) -> Option<&ProducerFn> {
        self.callables.get(name)
    }

    /// Invokes the constructor with the given argument list.
    pub fn construct(&self, args: Args) -> Result<SharedValue, BoxError> {
        (self.construct)(args)
    }
}

impl fmt::Debug for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSpec")
            .field("key", &self.key)
            .field("params", &self.params)
            .field("callables", &self.callables.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The stock [`Introspect`] implementation: a map from type key to
/// [`TypeSpec`].
#[derive(Default)]
pub struct TypeRegistry {
    specs: HashMap<&'static str, TypeSpec>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a spec under its key. Last write wins — a registry
    /// mirrors what reflection would report, it does not arbitrate
    /// duplicates.
    pub fn register(&mut self, spec: TypeSpec) {
        debug!(key = spec.key(), "registered type");
        self.specs.insert(spec.key(), spec);
    }

    /// Builds a registry from every [`RegisteredType`] submitted through
    /// [`inventory`] (see [`submit_type!`](crate::submit_type)).
    pub fn from_inventory() -> Self {
        let mut registry = Self::new();
        for registered in inventory::iter::<RegisteredType> {
            registry.register((registered.spec)());
        }
        debug!(types = registry.len(), "collected inventory registrations");
        registry
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Introspect for TypeRegistry {
    fn spec(&self, type_key: &str) -> Option<&TypeSpec> {
        self.specs.get(type_key)
    }

    fn known_keys(&self) -> Vec<String> {
        self.specs.keys().map(|k| k.to_string()).collect()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("registered", &self.specs.len())
            .finish()
    }
}

/// A type registration submitted at link time for the process-wide
/// resolver. Holds a function producing the [`TypeSpec`] so registration
/// sites stay `const`.
pub struct RegisteredType {
    /// Produces the spec when the global registry is assembled.
    pub spec: fn() -> TypeSpec,
}

impl RegisteredType {
    pub const fn new(spec: fn() -> TypeSpec) -> Self {
        Self { spec }
    }
}

inventory::collect!(RegisteredType);

/// Submits a [`TypeSpec`] to the process-wide resolver's registry.
///
/// ```rust,ignore
/// tarkib_resolver::submit_type! {
///     TypeSpec::new("app.Transport", |_| Ok(shared(Transport)))
/// }
/// ```
#[macro_export]
macro_rules! submit_type {
    ($spec:expr) => {
        $crate::inventory::submit! {
            $crate::registry::RegisteredType::new(|| $spec)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::shared;

    struct Transport;

    fn transport_spec() -> TypeSpec {
        TypeSpec::new("app.Transport", |_| Ok(shared(Transport)))
    }

    #[test]
    fn register_and_describe() {
        let mut registry = TypeRegistry::new();
        registry.register(transport_spec());

        assert_eq!(registry.len(), 1);
        let spec = registry.spec("app.Transport").unwrap();
        assert_eq!(spec.key(), "app.Transport");
        assert!(spec.params().is_empty());
    }

    #[test]
    fn unknown_key_is_none() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.spec("app.Transport").is_none());
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = TypeRegistry::new();
        registry.register(transport_spec());
        registry.register(
            TypeSpec::new("app.Transport", |_| Ok(shared(1i32)))
                .param(ParamSpec::new("unused")),
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.spec("app.Transport").unwrap().params().len(), 1);
    }

    #[test]
    fn params_keep_declaration_order() {
        let spec = TypeSpec::new("app.Report", |_| Ok(shared(())))
            .param(ParamSpec::new("source").typed("app.Transport"))
            .param(ParamSpec::new("label").default_value(String::from("default")));

        let names: Vec<_> = spec.params().iter().map(ParamSpec::name).collect();
        assert_eq!(names, ["source", "label"]);
        assert_eq!(spec.params()[0].type_key(), Some("app.Transport"));
        assert!(spec.params()[1].default().is_some());
    }

    #[test]
    fn construct_invokes_function() {
        let spec = transport_spec();
        let value = spec.construct(Args::new(vec![])).unwrap();
        assert!(value.is::<Transport>());
    }

    #[test]
    fn callables_are_found_by_name() {
        let spec = transport_spec().callable("probe", || shared(String::from("ok")));

        assert!(spec.find_callable("probe").is_some());
        assert!(spec.find_callable("missing").is_none());

        let value = (spec.find_callable("probe").unwrap())();
        assert_eq!(value.downcast_ref::<String>().unwrap(), "ok");
    }

    #[test]
    fn known_keys_reported() {
        let mut registry = TypeRegistry::new();
        registry.register(transport_spec());
        registry.register(TypeSpec::new("app.Mailer", |_| Ok(shared(()))));

        let mut keys = registry.known_keys();
        keys.sort();
        assert_eq!(keys, ["app.Mailer", "app.Transport"]);
    }
}
