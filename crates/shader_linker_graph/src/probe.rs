// SPDX-License-Identifier: MIT OR Apache-2.0
//! Capability probing over host properties.
//!
//! Host field names drift between host versions (`noise_dimensions` became
//! `noise_dimensionality`, color ramp `ipotype` became `interpolation`, ...).
//! Handlers describe each value as an ordered list of candidate fields, each
//! with its own transform, and let a [`Probe`] find the one the running host
//! actually has.

use crate::host::{HostValue, PropertySource};

/// Transform applied to a candidate field's value
pub type Transform<T> = fn(&HostValue) -> Option<T>;

/// Ordered list of `(field, transform)` candidates
pub struct Probe<T> {
    candidates: Vec<(&'static str, Transform<T>)>,
}

impl<T> Probe<T> {
    /// Create a probe with no candidates
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    /// Append a candidate field
    pub fn field(mut self, name: &'static str, transform: Transform<T>) -> Self {
        self.candidates.push((name, transform));
        self
    }

    /// Append several candidate fields sharing one transform
    pub fn fields(mut self, names: &[&'static str], transform: Transform<T>) -> Self {
        self.candidates.extend(names.iter().map(|name| (*name, transform)));
        self
    }

    /// Transform the first field that exists.
    ///
    /// The outer `None` means no candidate exists; `Some(None)` means the
    /// field exists but its value could not be transformed.
    pub fn present<S>(&self, source: &S) -> Option<Option<T>>
    where
        S: PropertySource + ?Sized,
    {
        self.candidates
            .iter()
            .find_map(|(name, transform)| source.property(name).map(|value| transform(&value)))
    }

    /// The first field that exists decides; its transform result is final.
    pub fn first_present<S>(&self, source: &S) -> Option<T>
    where
        S: PropertySource + ?Sized,
    {
        self.present(source).flatten()
    }

    /// The first field whose transform succeeds wins.
    pub fn first_match<S>(&self, source: &S) -> Option<T>
    where
        S: PropertySource + ?Sized,
    {
        self.candidates.iter().find_map(|(name, transform)| {
            source.property(name).and_then(|value| transform(&value))
        })
    }
}

impl<T> Default for Probe<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric transform
pub fn number(value: &HostValue) -> Option<f64> {
    value.as_f64()
}

/// Textual transform (strings and printable scalars)
pub fn text(value: &HostValue) -> Option<String> {
    value.to_text()
}

/// Look up `key` in a fixed `(name, index)` table
pub fn lookup(table: &[(&str, i64)], key: &str) -> Option<i64> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, index)| *index)
}
