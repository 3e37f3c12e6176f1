//! Core resolution engine for Tarkib.
//!
//! A string-keyed dependency resolver: types register constructor
//! metadata in a [`registry::TypeRegistry`], and the
//! [`resolver::Resolver`] constructs instances on demand, recursively
//! resolving constructor parameters from the binding map or from other
//! registered types, caching every result until told otherwise via
//! [`flags::Flags`].

pub mod binding;
pub mod error;
pub mod flags;
pub mod registry;
pub mod resolver;
pub mod value;

// Re-exported for the `submit_type!` macro expansion.
pub use inventory;

pub use binding::{Binding, ProducerFn};
pub use error::{MissingBindingError, ResolveError, Result, UnknownTypeError};
pub use flags::Flags;
pub use registry::{ConstructFn, Introspect, ParamSpec, RegisteredType, TypeRegistry, TypeSpec};
pub use resolver::{Resolver, clear, get, get_as, global, map, map_all, parameter, prelude};
pub use value::{Args, BoxError, Null, SharedValue, shared};
