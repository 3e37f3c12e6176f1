//! Resolution flags.
//!
//! Flags control how [`Resolver::get`](crate::resolver::Resolver::get)
//! treats a key:
//! - [`Flags::PARAM`] — look the key up in the binding map instead of
//!   constructing a type
//! - [`Flags::NEW_INSTANCE`] — bypass the cache for the top-level
//!   resolution only
//! - [`Flags::DEEP`] — bypass the cache at every recursion level
//!
//! The numeric bit values are not a contract; only bit independence
//! matters.

use std::fmt;
use std::ops::BitOr;

/// A set of resolution flags.
///
/// Combine flags with `|`:
///
/// ```
/// use tarkib_resolver::flags::Flags;
///
/// let flags = Flags::NEW_INSTANCE | Flags::DEEP;
/// assert!(flags.contains(Flags::DEEP));
/// assert!(!flags.contains(Flags::PARAM));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u32);

impl Flags {
    /// The empty flag set; plain cached resolution.
    pub const NONE: Flags = Flags(0);

    /// Treat the key as a binding-map lookup, not a type to construct.
    pub const PARAM: Flags = Flags(1 << 0);

    /// Bypass the instance cache for the top-level resolution. The fresh
    /// instance still overwrites the cache entry.
    pub const NEW_INSTANCE: Flags = Flags(1 << 1);

    /// Like [`Flags::NEW_INSTANCE`], but every recursively resolved
    /// dependency also bypasses its cache entry.
    pub const DEEP: Flags = Flags(1 << 2);

    /// Returns `true` if all bits of `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any bit of `other` is set in `self`.
    #[inline]
    pub const fn intersects(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `self` with the bits of `other` removed.
    #[inline]
    #[must_use]
    pub const fn without(self, other: Flags) -> Flags {
        Flags(self.0 & !other.0)
    }

    /// Returns `true` if no flag is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "NONE");
        }

        let mut first = true;
        for (flag, name) in [
            (Flags::PARAM, "PARAM"),
            (Flags::NEW_INSTANCE, "NEW_INSTANCE"),
            (Flags::DEEP, "DEEP"),
        ] {
            if self.contains(flag) {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_independent_bits() {
        assert!(!Flags::PARAM.intersects(Flags::NEW_INSTANCE));
        assert!(!Flags::PARAM.intersects(Flags::DEEP));
        assert!(!Flags::NEW_INSTANCE.intersects(Flags::DEEP));
    }

    #[test]
    fn combine_and_contain() {
        let flags = Flags::NEW_INSTANCE | Flags::DEEP;
        assert!(flags.contains(Flags::NEW_INSTANCE));
        assert!(flags.contains(Flags::DEEP));
        assert!(flags.contains(flags));
        assert!(!flags.contains(Flags::PARAM));
    }

    #[test]
    fn without_removes_bits() {
        let flags = Flags::NEW_INSTANCE | Flags::DEEP;
        let stripped = flags.without(Flags::NEW_INSTANCE);
        assert!(!stripped.contains(Flags::NEW_INSTANCE));
        assert!(stripped.contains(Flags::DEEP));
        assert_eq!(Flags::NONE.without(Flags::DEEP), Flags::NONE);
    }

    #[test]
    fn default_is_empty() {
        assert!(Flags::default().is_empty());
        assert_eq!(Flags::default(), Flags::NONE);
    }

    #[test]
    fn debug_lists_set_flags() {
        assert_eq!(format!("{:?}", Flags::NONE), "NONE");
        assert_eq!(format!("{:?}", Flags::PARAM), "PARAM");
        assert_eq!(
            format!("{:?}", Flags::NEW_INSTANCE | Flags::DEEP),
            "NEW_INSTANCE | DEEP"
        );
    }
}
