//! Client-side filter presets.
//!
//! Presets are named [`SearchFilters`] snapshots a client keeps in its own
//! storage (the browser's local storage in the original UI). They go
//! through exactly one encode/decode boundary, and the serialized form
//! carries an explicit schema version: decoding migrates known old
//! versions and rejects unknown ones instead of trusting ad-hoc JSON.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::filter::SearchFilters;

/// Version written by [`PresetStore::encode`].
pub const CURRENT_PRESET_VERSION: u32 = 2;

/// A named filter snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub filters: SearchFilters,
}

/// Version-1 preset shape: a bare name/keyword pair from before the
/// structured filter model existed.
#[derive(Debug, Deserialize)]
struct LegacyPreset {
    name: String,
    keywords: String,
}

/// On-disk envelope. `presets` stays raw until the version is known.
#[derive(Deserialize)]
struct PresetFileEnvelope {
    version: u32,
    presets: serde_json::Value,
}

#[derive(Serialize)]
struct PresetFile<'a> {
    version: u32,
    presets: &'a [Preset],
}

// ---------------------------------------------------------------------------
// PresetStore
// ---------------------------------------------------------------------------

/// In-memory collection of named presets, ordered by insertion.
///
/// Names are unique: saving an existing name fails unless `overwrite` is
/// requested. (The original UI enforced this only on the server-backed
/// path; the local path now matches.)
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PresetStore {
    presets: Vec<Preset>,
}

impl PresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a preset under `name`.
    ///
    /// A duplicate name is a conflict unless `overwrite` is set, in which
    /// case the existing preset is replaced in place (list position kept).
    pub fn save(
        &mut self,
        name: &str,
        filters: SearchFilters,
        overwrite: bool,
    ) -> Result<(), CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "preset name must not be blank".to_string(),
            ));
        }

        if let Some(existing) = self.presets.iter_mut().find(|p| p.name == name) {
            if !overwrite {
                return Err(CoreError::Conflict(format!(
                    "a preset named '{name}' already exists"
                )));
            }
            existing.filters = filters;
            return Ok(());
        }

        self.presets.push(Preset {
            name: name.to_string(),
            filters,
        });
        Ok(())
    }

    /// Remove the preset with the given name. Returns `true` if one existed.
    pub fn delete(&mut self, name: &str) -> bool {
        let before = self.presets.len();
        self.presets.retain(|p| p.name != name);
        self.presets.len() < before
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Serialize to the current on-disk format.
    pub fn encode(&self) -> Result<String, CoreError> {
        serde_json::to_string(&PresetFile {
            version: CURRENT_PRESET_VERSION,
            presets: &self.presets,
        })
        .map_err(|e| CoreError::Internal(format!("preset encode failed: {e}")))
    }

    /// Decode any supported on-disk version.
    ///
    /// Version 1 (name + keywords only) is migrated by lifting the keyword
    /// text into an otherwise-default filter set. Versions newer than
    /// [`CURRENT_PRESET_VERSION`] are rejected rather than guessed at.
    pub fn decode(raw: &str) -> Result<Self, CoreError> {
        let envelope: PresetFileEnvelope = serde_json::from_str(raw)
            .map_err(|e| CoreError::Validation(format!("malformed preset file: {e}")))?;

        let presets = match envelope.version {
            1 => {
                let legacy: Vec<LegacyPreset> = serde_json::from_value(envelope.presets)
                    .map_err(|e| {
                        CoreError::Validation(format!("malformed v1 preset list: {e}"))
                    })?;
                legacy
                    .into_iter()
                    .map(|p| Preset {
                        name: p.name,
                        filters: SearchFilters {
                            keywords: p.keywords,
                            ..Default::default()
                        },
                    })
                    .collect()
            }
            CURRENT_PRESET_VERSION => serde_json::from_value(envelope.presets)
                .map_err(|e| CoreError::Validation(format!("malformed preset list: {e}")))?,
            other => {
                return Err(CoreError::Validation(format!(
                    "unsupported preset file version {other}"
                )))
            }
        };

        Ok(Self { presets })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn named_filters(keywords: &str) -> SearchFilters {
        SearchFilters {
            keywords: keywords.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn duplicate_name_is_a_conflict_without_overwrite() {
        let mut store = PresetStore::new();
        store
            .save("Bodensee", named_filters("lake lights"), false)
            .unwrap();

        assert_matches!(
            store.save("Bodensee", named_filters("orbs"), false),
            Err(CoreError::Conflict(_))
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Bodensee").unwrap().filters.keywords, "lake lights");
    }

    #[test]
    fn overwrite_replaces_in_place() {
        let mut store = PresetStore::new();
        store.save("Bodensee", named_filters("lake lights"), false).unwrap();
        store.save("Alps", named_filters("glow"), false).unwrap();
        store.save("Bodensee", named_filters("orbs"), true).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("Bodensee").unwrap().filters.keywords, "orbs");
        // Position preserved.
        assert_eq!(store.iter().next().unwrap().name, "Bodensee");
    }

    #[test]
    fn delete_removes_exactly_the_named_preset() {
        let mut store = PresetStore::new();
        store.save("Bodensee", named_filters("a"), false).unwrap();
        store.save("Alps", named_filters("b"), false).unwrap();

        assert!(store.delete("Bodensee"));
        assert_eq!(store.len(), 1);
        assert!(store.get("Bodensee").is_none());
        assert!(!store.delete("Bodensee"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut store = PresetStore::new();
        assert_matches!(
            store.save("   ", named_filters("a"), false),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn encode_decode_round_trip() {
        let mut store = PresetStore::new();
        store.save("Bodensee", named_filters("lake lights"), false).unwrap();
        store.save("Alps", named_filters("glow"), false).unwrap();

        let raw = store.encode().unwrap();
        let decoded = PresetStore::decode(&raw).unwrap();
        assert_eq!(decoded, store);
    }

    #[test]
    fn v1_files_are_migrated() {
        let raw = r#"{
            "version": 1,
            "presets": [
                { "name": "Bodensee", "keywords": "lake lights" }
            ]
        }"#;
        let store = PresetStore::decode(raw).unwrap();
        assert_eq!(store.len(), 1);
        let preset = store.get("Bodensee").unwrap();
        assert_eq!(preset.filters.keywords, "lake lights");
        assert!(preset.filters.categories.is_empty());
    }

    #[test]
    fn future_versions_are_rejected() {
        let raw = r#"{ "version": 99, "presets": [] }"#;
        assert_matches!(PresetStore::decode(raw), Err(CoreError::Validation(_)));
    }

    #[test]
    fn garbage_input_is_rejected() {
        assert_matches!(
            PresetStore::decode("not json"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            PresetStore::decode(r#"{ "presets": [] }"#),
            Err(CoreError::Validation(_))
        );
    }
}
