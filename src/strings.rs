//! A small reference-counted string dictionary.
//!
//! An append-only arena of strings addressed by integer handle, giving
//! O(1) equality, with a one-time-computed lowercased sibling handle
//! for case-insensitive comparison. Strings are reference-counted so a
//! sheet can assert "every interned string reaches refcount zero on
//! destroy".
//!
//! # Adding a caller
//!
//! 1. Call [`Dictionary::intern`] with the raw text.
//! 2. Hold the returned [`StringRef`] anywhere bytecode or a token needs the
//!    text; clone it freely (`StringRef` is `Copy`).
//! 3. Call [`Dictionary::release`] exactly once per `intern` (or clone of a
//!    ref obtained some other way that bumped the count) when the holder is
//!    destroyed.

use std::collections::HashMap;

/// A handle into a [`Dictionary`]. Cheap to copy and compare; never
/// compares equal across two different dictionaries even if the text
/// matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringRef(u32);

impl StringRef {
    /// Reconstruct a handle from its raw index. Used by the bytecode reader,
    /// which stores handles as plain `u32`s in the operand stream and has no
    /// other way to hand one back to its owning `Dictionary`.
    #[must_use]
    pub fn from_raw(index: u32) -> StringRef {
        StringRef(index)
    }

    /// The raw index, for bytecode serialization.
    #[must_use]
    pub fn to_raw(self) -> u32 {
        self.0
    }
}

struct Entry {
    text: String,
    lower: StringRef,
    refcount: u32,
}

/// An append-only arena of interned strings, owned by one stylesheet.
#[derive(Default)]
pub struct Dictionary {
    entries: Vec<Entry>,
    by_text: HashMap<String, StringRef>,
}

impl Dictionary {
    /// Create an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Dictionary::default()
    }

    /// Intern `text`, returning a stable handle. Reference count starts at 1.
    pub fn intern(&mut self, text: &str) -> StringRef {
        if let Some(&existing) = self.by_text.get(text) {
            self.entries[existing.0 as usize].refcount += 1;
            return existing;
        }
        let handle = StringRef(self.entries.len() as u32);
        self.entries.push(Entry {
            text: text.to_string(),
            // Filled in below once we know whether `text` is already lower.
            lower: handle,
            refcount: 1,
        });
        self.by_text.insert(text.to_string(), handle);

        let lowered = text.to_ascii_lowercase();
        let lower_handle = if lowered == text {
            handle
        } else {
            self.intern_internal(&lowered)
        };
        self.entries[handle.0 as usize].lower = lower_handle;
        handle
    }

    /// Intern without computing a lowercase sibling (used internally to
    /// build the sibling itself, avoiding infinite recursion).
    fn intern_internal(&mut self, text: &str) -> StringRef {
        if let Some(&existing) = self.by_text.get(text) {
            self.entries[existing.0 as usize].refcount += 1;
            return existing;
        }
        let handle = StringRef(self.entries.len() as u32);
        self.entries.push(Entry {
            text: text.to_string(),
            lower: handle,
            refcount: 1,
        });
        self.by_text.insert(text.to_string(), handle);
        handle
    }

    /// Borrow the text behind a handle.
    #[must_use]
    pub fn resolve(&self, handle: StringRef) -> &str {
        &self.entries[handle.0 as usize].text
    }

    /// The case-folded sibling handle for `handle` (itself, if already
    /// lowercase).
    #[must_use]
    pub fn lower(&self, handle: StringRef) -> StringRef {
        self.entries[handle.0 as usize].lower
    }

    /// Case-insensitive equality between two handles from the same
    /// dictionary.
    #[must_use]
    pub fn eq_ignore_case(&self, a: StringRef, b: StringRef) -> bool {
        self.lower(a) == self.lower(b)
    }

    /// Bump the reference count of an already-interned handle (e.g. when
    /// bytecode copies a reference rather than re-interning).
    pub fn retain(&mut self, handle: StringRef) {
        self.entries[handle.0 as usize].refcount += 1;
    }

    /// Drop one reference to `handle`.
    pub fn release(&mut self, handle: StringRef) {
        let entry = &mut self.entries[handle.0 as usize];
        debug_assert!(entry.refcount > 0, "string refcount underflow");
        entry.refcount = entry.refcount.saturating_sub(1);
    }

    /// The current reference count of `handle`, for tests asserting the
    /// "refcount never goes negative, reaches zero on destroy" invariant.
    #[must_use]
    pub fn refcount(&self, handle: StringRef) -> u32 {
        self.entries[handle.0 as usize].refcount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_text_reuses_handle() {
        let mut dict = Dictionary::new();
        let a = dict.intern("Hello");
        let b = dict.intern("Hello");
        assert_eq!(a, b);
        assert_eq!(dict.refcount(a), 2);
    }

    #[test]
    fn case_insensitive_comparison() {
        let mut dict = Dictionary::new();
        let a = dict.intern("Serif");
        let b = dict.intern("serif");
        assert!(dict.eq_ignore_case(a, b));
    }

    #[test]
    fn release_decrements_without_going_negative() {
        let mut dict = Dictionary::new();
        let a = dict.intern("x");
        dict.release(a);
        dict.release(a);
        dict.release(a);
        assert_eq!(dict.refcount(a), 0);
    }

    #[test]
    fn resolve_round_trips_text() {
        let mut dict = Dictionary::new();
        let a = dict.intern("font-family");
        assert_eq!(dict.resolve(a), "font-family");
    }
}
