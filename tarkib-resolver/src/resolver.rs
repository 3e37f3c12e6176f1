//! # The Resolver — heart of Tarkib
//!
//! Constructs instances by string type key, recursively resolving each
//! declared constructor parameter from the binding map or by
//! instantiating the parameter's declared type, and caches results for
//! reuse.
//!
//! # Architecture
//! ```text
//! TypeRegistry ──Arc<dyn Introspect>──> Resolver
//!                                          │
//!                                 ┌────────┴────────┐
//!                            instance cache    binding map
//! ```
//!
//! # Examples
//! ```rust
//! use tarkib_resolver::prelude::*;
//! use tarkib_resolver::value::shared;
//! use std::sync::Arc;
//!
//! struct Transport;
//!
//! struct Mailer {
//!     transport: Arc<Transport>,
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(TypeSpec::new("app.Transport", |_| Ok(shared(Transport))));
//! registry.register(
//!     TypeSpec::new("app.Mailer", |args| {
//!         Ok(shared(Mailer { transport: args.get::<Transport>(0)? }))
//!     })
//!     .param(ParamSpec::new("transport").typed("app.Transport")),
//! );
//!
//! let resolver = Resolver::with_registry(registry);
//! let mailer = resolver.get_as::<Mailer>("app.Mailer", Flags::NONE)
//!     .expect("failed to resolve");
//! ```

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, trace};

use tarkib_support::suggest_similar;

use crate::binding::Binding;
use crate::error::{MissingBindingError, ResolveError, Result, UnknownTypeError};
use crate::flags::Flags;
use crate::registry::{Introspect, ParamSpec, TypeRegistry};
use crate::value::{Args, Null, SharedValue};

/// Resolves instances by string key, caching results.
///
/// The instance cache and the binding map live behind one mutex, held
/// for the duration of each `get`/`map`/`clear` call. Deferred producers
/// and constructor functions run while that lock is held and MUST NOT
/// call back into the same resolver — doing so deadlocks. Resolution is
/// plain unbounded recursion over the type graph; a cyclic constructor
/// graph recurses until the stack overflows.
pub struct Resolver {
    introspect: Arc<dyn Introspect>,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    instances: HashMap<String, SharedValue>,
    bindings: HashMap<String, Binding>,
}

impl Resolver {
    /// A resolver backed by any [`Introspect`] implementation.
    pub fn new(introspect: Arc<dyn Introspect>) -> Self {
        Self {
            introspect,
            state: Mutex::new(State::default()),
        }
    }

    /// A resolver backed by a [`TypeRegistry`].
    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self::new(Arc::new(registry))
    }

    /// Gets an instance of a type, or a bound parameter value.
    ///
    /// - [`Flags::PARAM`] looks `key` up in the binding map; every other
    ///   flag is ignored on that path.
    /// - Otherwise a cached instance is returned unless
    ///   [`Flags::NEW_INSTANCE`] or [`Flags::DEEP`] forces a fresh
    ///   construction. The fresh instance overwrites the cache entry.
    ///
    /// Repeated unflagged calls return the identical `Arc`.
    pub fn get(&self, key: &str, flags: Flags) -> Result<SharedValue> {
        let mut state = self.state.lock();
        self.get_locked(&mut state, key, flags)
    }

    /// Like [`get`](Resolver::get), downcast to `T`.
    ///
    /// # Errors
    /// [`ResolveError::MismatchedValue`] if the resolved value is not a `T`.
    pub fn get_as<T: std::any::Any + Send + Sync>(
        &self,
        key: &str,
        flags: Flags,
    ) -> Result<Arc<T>> {
        self.get(key, flags)?.downcast::<T>().map_err(|_| {
            ResolveError::MismatchedValue {
                key: key.to_owned(),
                expected: type_name::<T>(),
            }
        })
    }

    /// Shorthand for `get(key, Flags::PARAM)`.
    pub fn parameter(&self, key: &str) -> Result<SharedValue> {
        self.get(key, Flags::PARAM)
    }

    /// Maps a value for use when resolving constructor parameters.
    ///
    /// Insertion is last-write-wins per key. A falsy literal (empty
    /// string, zero, `false`, unit, [`Null`]) is silently dropped, not
    /// stored — a quirk kept from the original truthiness check; callers
    /// binding "empty" values observe a missing-parameter failure
    /// instead.
    pub fn map(&self, key: impl Into<String>, binding: impl Into<Binding>) {
        let mut state = self.state.lock();
        Self::map_locked(&mut state, key.into(), binding.into());
    }

    /// Maps a batch of entries through the same path as
    /// [`map`](Resolver::map), one lock for the whole batch.
    pub fn map_all<K, B, I>(&self, entries: I)
    where
        K: Into<String>,
        B: Into<Binding>,
        I: IntoIterator<Item = (K, B)>,
    {
        let mut state = self.state.lock();
        for (key, binding) in entries {
            Self::map_locked(&mut state, key.into(), binding.into());
        }
    }

    /// Empties the instance cache and the binding map.
    ///
    /// Intended for test isolation and process reset, not as a normal
    /// runtime operation.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        debug!(
            instances = state.instances.len(),
            bindings = state.bindings.len(),
            "clearing resolver"
        );
        state.instances.clear();
        state.bindings.clear();
    }

    fn map_locked(state: &mut State, key: String, binding: Binding) {
        if binding.is_falsy() {
            trace!(key = %key, "dropped falsy binding");
            return;
        }
        trace!(key = %key, ?binding, "mapped binding");
        state.bindings.insert(key, binding);
    }

    fn get_locked(&self, state: &mut State, key: &str, flags: Flags) -> Result<SharedValue> {
        if flags.contains(Flags::PARAM) {
            return self.parameter_locked(state, key);
        }

        if !flags.intersects(Flags::NEW_INSTANCE | Flags::DEEP) {
            if let Some(existing) = state.instances.get(key) {
                trace!(key, "cache hit");
                return Ok(existing.clone());
            }
        }

        // NEW_INSTANCE bypasses the cache at the top level only, so it is
        // stripped before recursing; DEEP stays set and keeps bypassing at
        // every level.
        let instance = self.construct_locked(state, key, flags.without(Flags::NEW_INSTANCE))?;
        state.instances.insert(key.to_owned(), instance.clone());
        Ok(instance)
    }

    /// Builds a fresh instance of `type_key`, resolving each declared
    /// parameter in order. Nothing is cached when any step fails.
    fn construct_locked(
        &self,
        state: &mut State,
        type_key: &str,
        flags: Flags,
    ) -> Result<SharedValue> {
        let spec = self
            .introspect
            .spec(type_key)
            .ok_or_else(|| self.unknown_type(type_key))?;

        trace!(key = type_key, ?flags, "constructing");

        let mut values = Vec::with_capacity(spec.params().len());
        for param in spec.params() {
            values.push(self.param_value_locked(state, param, flags)?);
        }

        spec.construct(Args::new(values))
            .map_err(|source| ResolveError::Construction {
                key: type_key.to_owned(),
                source,
            })
    }

    /// Resolves one declared parameter. Precedence, highest first:
    /// name-keyed binding, type-keyed binding, recursive construction,
    /// declared default, [`Null`].
    fn param_value_locked(
        &self,
        state: &mut State,
        param: &ParamSpec,
        flags: Flags,
    ) -> Result<SharedValue> {
        if state.bindings.contains_key(param.name()) {
            return self.parameter_locked(state, param.name());
        }

        if let Some(type_key) = param.type_key() {
            if let Some(binding) = state.bindings.get(type_key) {
                // Handed out exactly as stored: no lazy unwrapping on the
                // type-keyed path.
                return Ok(binding.stored_value());
            }
            return self.get_locked(state, type_key, flags);
        }

        if let Some(default) = param.default() {
            return Ok(default.clone());
        }

        Ok(Arc::new(Null))
    }

    /// Binding-map lookup with lazy-producer memoization.
    fn parameter_locked(&self, state: &mut State, key: &str) -> Result<SharedValue> {
        let binding = match state.bindings.get(key) {
            Some(binding) => binding.clone(),
            None => return Err(self.missing_binding(state, key)),
        };

        match binding {
            Binding::Value(value) => Ok(value),
            Binding::Deferred(producer) => {
                let value = producer();
                debug!(key, "evaluated deferred producer");
                state
                    .bindings
                    .insert(key.to_owned(), Binding::Value(value.clone()));
                Ok(value)
            }
            Binding::CallableRef { type_key, method } => {
                let spec = self
                    .introspect
                    .spec(&type_key)
                    .ok_or_else(|| self.unknown_type(&type_key))?;
                let callable = spec.find_callable(&method).ok_or_else(|| {
                    ResolveError::MissingBinding(MissingBindingError {
                        key: format!("{type_key}::{method}"),
                        suggestions: Vec::new(),
                    })
                })?;
                let value = callable();
                debug!(key, %type_key, %method, "invoked callable reference");
                state
                    .bindings
                    .insert(key.to_owned(), Binding::Value(value.clone()));
                Ok(value)
            }
        }
    }

    fn missing_binding(&self, state: &State, key: &str) -> ResolveError {
        let known: Vec<&str> = state.bindings.keys().map(String::as_str).collect();
        ResolveError::MissingBinding(MissingBindingError {
            key: key.to_owned(),
            suggestions: suggest_similar(key, &known, 3),
        })
    }

    fn unknown_type(&self, key: &str) -> ResolveError {
        let known = self.introspect.known_keys();
        let known: Vec<&str> = known.iter().map(String::as_str).collect();
        ResolveError::UnknownType(UnknownTypeError {
            key: key.to_owned(),
            suggestions: suggest_similar(key, &known, 3),
        })
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Resolver")
            .field("instances", &state.instances.len())
            .field("bindings", &state.bindings.len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Process-wide default instance
// ═══════════════════════════════════════════

static GLOBAL: Lazy<Resolver> =
    Lazy::new(|| Resolver::with_registry(TypeRegistry::from_inventory()));

/// The process-wide default resolver, backed by every type submitted
/// through [`submit_type!`](crate::submit_type).
///
/// Shared mutable state: fine for binaries and test processes, but it is
/// one cache and one binding map for the whole process.
pub fn global() -> &'static Resolver {
    &GLOBAL
}

/// [`Resolver::get`] on the process-wide instance.
pub fn get(key: &str, flags: Flags) -> Result<SharedValue> {
    global().get(key, flags)
}

/// [`Resolver::get_as`] on the process-wide instance.
pub fn get_as<T: std::any::Any + Send + Sync>(key: &str, flags: Flags) -> Result<Arc<T>> {
    global().get_as(key, flags)
}

/// [`Resolver::parameter`] on the process-wide instance.
pub fn parameter(key: &str) -> Result<SharedValue> {
    global().parameter(key)
}

/// [`Resolver::map`] on the process-wide instance.
pub fn map(key: impl Into<String>, binding: impl Into<Binding>) {
    global().map(key, binding);
}

/// [`Resolver::map_all`] on the process-wide instance.
pub fn map_all<K, B, I>(entries: I)
where
    K: Into<String>,
    B: Into<Binding>,
    I: IntoIterator<Item = (K, B)>,
{
    global().map_all(entries);
}

/// [`Resolver::clear`] on the process-wide instance.
pub fn clear() {
    global().clear();
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Resolver, global};
    pub use crate::binding::Binding;
    pub use crate::error::{ResolveError, Result};
    pub use crate::flags::Flags;
    pub use crate::registry::{Introspect, ParamSpec, TypeRegistry, TypeSpec};
    pub use crate::value::{Args, Null, SharedValue};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
