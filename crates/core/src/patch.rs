//! Tri-state partial updates.
//!
//! Update requests distinguish three intents per optional field: leave the
//! field alone (omitted), clear it (explicit `null`), or replace it. A plain
//! `Option<T>` cannot represent all three, so updates use [`Patch<T>`].

use serde::{Deserialize, Deserializer};

/// One field of a partial update.
///
/// With `#[serde(default)]` on the field, an omitted key deserializes to
/// `Keep`, an explicit `null` to `Clear`, and a value to `Set`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    /// Apply this patch to an optional slot.
    pub fn apply(self, slot: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Clear => *slot = None,
            Patch::Set(value) => *slot = Some(value),
        }
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Keep => Patch::Keep,
            Patch::Clear => Patch::Clear,
            Patch::Set(value) => Patch::Set(value),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Update {
        #[serde(default)]
        description: Patch<String>,
    }

    #[test]
    fn omitted_field_keeps() {
        let u: Update = serde_json::from_str("{}").unwrap();
        assert_eq!(u.description, Patch::Keep);

        let mut slot = Some("old".to_string());
        u.description.apply(&mut slot);
        assert_eq!(slot.as_deref(), Some("old"));
    }

    #[test]
    fn null_field_clears() {
        let u: Update = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(u.description, Patch::Clear);

        let mut slot = Some("old".to_string());
        u.description.apply(&mut slot);
        assert_eq!(slot, None);
    }

    #[test]
    fn value_field_sets() {
        let u: Update = serde_json::from_str(r#"{"description": "new"}"#).unwrap();

        let mut slot = None;
        u.description.apply(&mut slot);
        assert_eq!(slot.as_deref(), Some("new"));
    }
}
