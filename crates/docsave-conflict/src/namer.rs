//! Alternative naming for colliding save names
//!
//! Generates the next free name following the pattern `base (N)`, where the
//! base is the candidate with any existing ` (N)` counter removed. Saving
//! `Report (2)` next to `Report`, `Report (1)` and `Report (2)` therefore
//! yields `Report (3)`, never `Report (2) (1)`.

use docsave_core::domain::NameSnapshot;

/// Base used when the candidate is blank or is nothing but a counter.
pub const UNTITLED: &str = "Untitled";

/// Generates alternative document names
pub struct ConflictNamer;

impl ConflictNamer {
    /// Removes one trailing ` (N)` counter, if present
    ///
    /// Only a space, an opening parenthesis, one or more ASCII digits and a
    /// closing parenthesis at the very end count as a counter. A name that
    /// would become empty is returned unchanged.
    pub fn strip_counter_suffix(name: &str) -> &str {
        let Some(inner) = name.strip_suffix(')') else {
            return name;
        };
        let Some(open) = inner.rfind(" (") else {
            return name;
        };

        let digits = &inner[open + 2..];
        let base = &inner[..open];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || base.is_empty() {
            return name;
        }
        base
    }

    /// Suggests the first `base (N)` not present in `existing`
    ///
    /// The candidate is trimmed before its counter is stripped. Counting
    /// starts at 1, so with `n` existing names at most `n + 1` names are
    /// probed.
    pub fn suggest(candidate: &str, existing: &NameSnapshot) -> String {
        Self::suggest_with(candidate, |name| existing.contains(name))
    }

    /// Same as [`ConflictNamer::suggest`] against an arbitrary existence check
    pub fn suggest_with<F>(candidate: &str, mut exists: F) -> String
    where
        F: FnMut(&str) -> bool,
    {
        let trimmed = candidate.trim();
        let base = match Self::strip_counter_suffix(trimmed) {
            "" => UNTITLED,
            base => base,
        };

        let mut counter: u64 = 1;
        loop {
            let numbered = format!("{base} ({counter})");
            if !exists(&numbered) {
                return numbered;
            }
            counter += 1;
        }
    }
}
