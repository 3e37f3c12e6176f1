//! Binding values.
//!
//! The binding map stores [`Binding`]s: literal values, previously
//! resolved instances, deferred producers, or references to a named
//! zero-argument callable on a registered type. A deferred producer is
//! evaluated on first lookup and memoized — the binding entry is replaced
//! with the produced value, so the producer runs at most once per process
//! lifetime unless [`clear`](crate::resolver::Resolver::clear) resets the
//! map.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::value::{self, SharedValue, shared};

/// A zero-argument producer stored as a binding value.
pub type ProducerFn = Arc<dyn Fn() -> SharedValue + Send + Sync>;

/// A value stored in the binding map.
#[derive(Clone)]
pub enum Binding {
    /// A literal value or a previously resolved instance.
    Value(SharedValue),
    /// A deferred producer, evaluated lazily and memoized.
    Deferred(ProducerFn),
    /// A named zero-argument callable on a registered type — the
    /// string-keyed rendition of a `[Type, "method"]` callable pair.
    CallableRef {
        type_key: String,
        method: String,
    },
}

impl Binding {
    /// Binds a literal value.
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Binding::Value(shared(value))
    }

    /// Binds an already-shared value, preserving its identity.
    ///
    /// Use this to map a previously resolved instance.
    pub fn instance(value: SharedValue) -> Self {
        Binding::Value(value)
    }

    /// Binds a deferred producer.
    pub fn deferred<F>(producer: F) -> Self
    where
        F: Fn() -> SharedValue + Send + Sync + 'static,
    {
        Binding::Deferred(Arc::new(producer))
    }

    /// Binds a reference to `type_key`'s callable named `method`.
    pub fn callable_ref(type_key: impl Into<String>, method: impl Into<String>) -> Self {
        Binding::CallableRef {
            type_key: type_key.into(),
            method: method.into(),
        }
    }

    /// The value handed out when a type-keyed override matches: the
    /// binding exactly as stored, with no lazy unwrapping. A deferred
    /// producer surfaces as an opaque [`ProducerFn`] value and a callable
    /// reference as an opaque [`Binding`] value.
    pub(crate) fn stored_value(&self) -> SharedValue {
        match self {
            Binding::Value(value) => value.clone(),
            Binding::Deferred(producer) => shared(producer.clone()),
            Binding::CallableRef { .. } => shared(self.clone()),
        }
    }

    /// Truthiness check for the `map` quirk. Only literal values can be
    /// falsy; producers and callable references are always stored.
    pub(crate) fn is_falsy(&self) -> bool {
        match self {
            Binding::Value(value) => value::is_falsy(value),
            Binding::Deferred(_) | Binding::CallableRef { .. } => false,
        }
    }
}

impl From<SharedValue> for Binding {
    fn from(value: SharedValue) -> Self {
        Binding::Value(value)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Value(_) => write!(f, "Binding::Value(..)"),
            Binding::Deferred(_) => write!(f, "Binding::Deferred(..)"),
            Binding::CallableRef { type_key, method } => {
                write!(f, "Binding::CallableRef({type_key}::{method})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_binding_is_stored_value() {
        let binding = Binding::value(5i32);
        let stored = binding.stored_value();
        assert_eq!(*stored.downcast_ref::<i32>().unwrap(), 5);
    }

    #[test]
    fn instance_binding_preserves_identity() {
        let original = shared(String::from("shared"));
        let binding = Binding::instance(original.clone());
        assert!(Arc::ptr_eq(&binding.stored_value(), &original));
    }

    #[test]
    fn deferred_stored_value_is_not_evaluated() {
        let binding = Binding::deferred(|| shared(1i32));
        // Handed out as the producer itself, not its result
        let stored = binding.stored_value();
        assert!(stored.is::<ProducerFn>());
    }

    #[test]
    fn callable_ref_stored_value_is_opaque() {
        let binding = Binding::callable_ref("app.Stamp", "issue");
        let stored = binding.stored_value();
        assert!(stored.is::<Binding>());
    }

    #[test]
    fn falsy_only_for_literals() {
        assert!(Binding::value("").is_falsy());
        assert!(Binding::value(0i32).is_falsy());
        assert!(!Binding::value("x").is_falsy());
        assert!(!Binding::deferred(|| shared(0i32)).is_falsy());
        assert!(!Binding::callable_ref("t", "m").is_falsy());
    }

    #[test]
    fn debug_rendering() {
        let debug = format!("{:?}", Binding::callable_ref("app.Stamp", "issue"));
        assert_eq!(debug, "Binding::CallableRef(app.Stamp::issue)");
    }
}
