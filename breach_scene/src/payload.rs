// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A borrowed, type-erased reference with exact-type retrieval.

use core::any::{Any, type_name};
use core::fmt;

/// A type-erased reference to a value owned elsewhere.
///
/// `Payload` never owns what it points to. Copying a payload copies the reference, so both
/// copies observe the same value. The referenced value must outlive `'a`, which the borrow
/// checker enforces.
///
/// Retrieval matches the stored type exactly: a payload set from a `Derived` that embeds a
/// `Base` yields `None` for `get::<Base>()`.
///
/// ```
/// use breach_scene::Payload;
///
/// let answer = 42_u32;
/// let p = Payload::new(&answer);
/// assert_eq!(p.get::<u32>(), Some(&42));
/// assert!(p.get::<u64>().is_none());
/// ```
#[derive(Copy, Clone, Default)]
pub struct Payload<'a> {
    value: Option<(&'a dyn Any, &'static str)>,
}

impl<'a> Payload<'a> {
    /// An empty payload.
    pub const EMPTY: Self = Self { value: None };

    /// Creates a payload referring to `value`.
    pub fn new<T: Any>(value: &'a T) -> Self {
        Self {
            value: Some((value, type_name::<T>())),
        }
    }

    /// Replaces the content with a reference to `value`.
    pub fn set<T: Any>(&mut self, value: &'a T) -> &mut Self {
        *self = Self::new(value);
        self
    }

    /// Returns the referenced value if it was stored as exactly `T`.
    pub fn get<T: Any>(&self) -> Option<&'a T> {
        let (value, _) = self.value?;
        value.downcast_ref::<T>()
    }

    /// Returns `true` if the payload holds a value of exactly type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.value.is_some_and(|(value, _)| value.is::<T>())
    }

    /// Empties the payload. Idempotent.
    pub fn clear(&mut self) -> &mut Self {
        self.value = None;
        self
    }

    /// Returns `true` if a value is held.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Name of the stored type, for diagnostics.
    pub fn type_name(&self) -> Option<&'static str> {
        self.value.map(|(_, name)| name)
    }
}

impl fmt::Debug for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_name() {
            Some(name) => f.debug_tuple("Payload").field(&name).finish(),
            None => f.write_str("Payload(<empty>)"),
        }
    }
}
