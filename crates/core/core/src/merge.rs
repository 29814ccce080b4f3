//! Explicit merge contract for upserts.
//!
//! Every mirrored record is updated through a patch type whose fields are
//! all optional. `merge(existing, patch)` overrides a field of `existing`
//! only when the patch defines it; an absent value never clears a value
//! that is already stored. Required fields that must always be written are
//! part of the patch as well and are simply always `Some`.

/// A record that can absorb a partial update.
pub trait Merge {
    /// The partial update applied to this record.
    type Patch;

    /// Applies every defined field of `patch` onto `self`.
    fn merge(&mut self, patch: Self::Patch);
}

/// Overwrites a required field when the patch carries a value.
pub fn merge_value<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Overwrites an optional field when the patch carries a value.
pub fn merge_option<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_value_keeps_existing_on_none() {
        let mut name = "Ada".to_string();
        merge_value(&mut name, None);
        assert_eq!(name, "Ada");
        merge_value(&mut name, Some("Grace".to_string()));
        assert_eq!(name, "Grace");
    }

    #[test]
    fn test_merge_option_never_clears() {
        let mut slug = Some("acme".to_string());
        merge_option(&mut slug, None);
        assert_eq!(slug.as_deref(), Some("acme"));

        let mut empty: Option<String> = None;
        merge_option(&mut empty, Some("new".to_string()));
        assert_eq!(empty.as_deref(), Some("new"));
    }
}
