//! Shared value representation.
//!
//! Resolved instances, binding values and constructor arguments all move
//! through the resolver as [`SharedValue`] — a reference-counted,
//! type-erased value. Object identity (the "same instance" guarantee of
//! the cache) is `Arc` pointer identity.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// A type-erased, shared value.
pub type SharedValue = Arc<dyn Any + Send + Sync>;

/// Boxed error type returned by constructor functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Marker for an absent value.
///
/// A constructor parameter with no matching binding, no declared type and
/// no default resolves to a shared [`Null`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Null;

/// Wraps a concrete value into a [`SharedValue`].
///
/// ```
/// use tarkib_resolver::value::shared;
///
/// let value = shared(String::from("smtp://localhost"));
/// assert!(value.downcast_ref::<String>().is_some());
/// ```
pub fn shared<T: Any + Send + Sync>(value: T) -> SharedValue {
    Arc::new(value)
}

/// Returns `true` if the value is the [`Null`] marker.
pub fn is_null(value: &SharedValue) -> bool {
    value.is::<Null>()
}

/// Loose truthiness check backing the `map` quirk: falsy literals are
/// silently dropped instead of stored.
///
/// Checked falsy values: [`Null`], `()`, `false`, empty strings, and
/// zero for the common integer and float types. Anything else — in
/// particular deferred producers — counts as truthy.
pub(crate) fn is_falsy(value: &SharedValue) -> bool {
    if value.is::<Null>() || value.is::<()>() {
        return true;
    }
    if let Some(b) = value.downcast_ref::<bool>() {
        return !*b;
    }
    if let Some(s) = value.downcast_ref::<String>() {
        return s.is_empty();
    }
    if let Some(s) = value.downcast_ref::<&'static str>() {
        return s.is_empty();
    }
    if let Some(n) = value.downcast_ref::<i32>() {
        return *n == 0;
    }
    if let Some(n) = value.downcast_ref::<i64>() {
        return *n == 0;
    }
    if let Some(n) = value.downcast_ref::<u32>() {
        return *n == 0;
    }
    if let Some(n) = value.downcast_ref::<u64>() {
        return *n == 0;
    }
    if let Some(n) = value.downcast_ref::<usize>() {
        return *n == 0;
    }
    if let Some(n) = value.downcast_ref::<isize>() {
        return *n == 0;
    }
    if let Some(n) = value.downcast_ref::<f32>() {
        return *n == 0.0;
    }
    if let Some(n) = value.downcast_ref::<f64>() {
        return *n == 0.0;
    }
    false
}

/// Ordered constructor arguments, one per declared parameter.
///
/// Handed to the constructor function of a
/// [`TypeSpec`](crate::registry::TypeSpec). Arguments are resolved in
/// declaration order; an argument backed by no binding, no type and no
/// default holds [`Null`].
pub struct Args(Vec<SharedValue>);

impl Args {
    pub(crate) fn new(values: Vec<SharedValue>) -> Self {
        Self(values)
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw argument at `index`, if present.
    pub fn raw(&self, index: usize) -> Option<&SharedValue> {
        self.0.get(index)
    }

    /// The argument at `index` as a shared value.
    ///
    /// # Errors
    /// Fails if `index` is out of range.
    pub fn value(&self, index: usize) -> Result<SharedValue, BoxError> {
        self.0
            .get(index)
            .cloned()
            .ok_or_else(|| format!("constructor argument {index} is missing").into())
    }

    /// The argument at `index` downcast to `T`.
    ///
    /// # Errors
    /// Fails if `index` is out of range or the argument is not a `T`.
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>, BoxError> {
        let value = self.value(index)?;
        value.downcast::<T>().map_err(|_| {
            format!(
                "constructor argument {index} is not a {}",
                type_name::<T>()
            )
            .into()
        })
    }

    /// Returns `true` if the argument at `index` is the [`Null`] marker.
    pub fn is_null(&self, index: usize) -> bool {
        self.0.get(index).map(is_null).unwrap_or(false)
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Args(len={})", self.0.len())
    }
}
