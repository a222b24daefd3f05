// ── On-disk format for the map collection ────────────────────────────────────
//
// Current (version 1):
//
//   { "version": 1,
//     "maps":  { "<name>": { "tileMap": [[..]], "objects": [..], "player": {..} } },
//     "links": { "<name>": "<paired name>" } }
//
// The unversioned form (a bare `{ "<name>": snapshot }` object) is still
// accepted on read and upgraded in memory; it is never written.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::MapSnapshot;
use crate::grid::GridError;
use crate::tiles::TileRegistry;

pub const FORMAT_VERSION: u64 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("saved data is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("saved data has the wrong shape at `{}`: {}", .0.path(), .0.inner())]
    Shape(#[source] serde_path_to_error::Error<serde_json::Error>),
    #[error("saved data has version {found}, only version {} is supported", FORMAT_VERSION)]
    UnsupportedVersion { found: u64 },
    #[error("map {name:?} is invalid: {source}")]
    InvalidMap {
        name: String,
        #[source]
        source: GridError,
    },
    #[error("failed to encode saved data: {0}")]
    Encode(#[source] serde_json::Error),
}

/// The whole map collection as stored under one key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedMaps {
    pub version: u64,
    pub maps: BTreeMap<String, MapSnapshot>,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

/// A single-slot save of the live session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSave {
    pub version: u64,
    #[serde(flatten)]
    pub snapshot: MapSnapshot,
}

pub fn encode_maps(
    maps: &BTreeMap<String, MapSnapshot>,
    links: &BTreeMap<String, String>,
) -> Result<String, PersistError> {
    #[derive(Serialize)]
    struct Borrowed<'a> {
        version: u64,
        maps: &'a BTreeMap<String, MapSnapshot>,
        links: &'a BTreeMap<String, String>,
    }
    serde_json::to_string(&Borrowed { version: FORMAT_VERSION, maps, links }).map_err(PersistError::Encode)
}

/// Parse and validate a stored map collection. Links naming a map that is not
/// in the collection are dropped.
pub fn decode_maps(text: &str, registry: &TileRegistry) -> Result<SavedMaps, PersistError> {
    let value: Value = serde_json::from_str(text).map_err(PersistError::Syntax)?;

    // A legacy collection may hold a map named `version`, so the marker only
    // counts next to a `maps` object.
    let versioned = has_numeric_version(&value) && value.get("maps").is_some_and(Value::is_object);
    let mut saved = if versioned {
        check_version(&value)?;
        shaped::<SavedMaps>(value)?
    } else {
        tracing::info!("upgrading unversioned map collection");
        SavedMaps {
            version: FORMAT_VERSION,
            maps: shaped(value)?,
            links: BTreeMap::new(),
        }
    };

    for (name, snap) in &saved.maps {
        snap.validate(registry)
            .map_err(|source| PersistError::InvalidMap { name: name.clone(), source })?;
    }

    let SavedMaps { maps, links, .. } = &mut saved;
    links.retain(|from, to| {
        let keep = maps.contains_key(from) && maps.contains_key(to);
        if !keep {
            tracing::warn!(from = %from, to = %to, "dropping link to a missing map");
        }
        keep
    });

    Ok(saved)
}

pub fn encode_session(snapshot: &MapSnapshot) -> Result<String, PersistError> {
    let save = SessionSave { version: FORMAT_VERSION, snapshot: snapshot.clone() };
    serde_json::to_string(&save).map_err(PersistError::Encode)
}

/// Parse a session save; a bare snapshot without `version` is accepted too.
pub fn decode_session(text: &str, registry: &TileRegistry) -> Result<MapSnapshot, PersistError> {
    let value: Value = serde_json::from_str(text).map_err(PersistError::Syntax)?;
    let snapshot = if has_numeric_version(&value) {
        check_version(&value)?;
        shaped::<SessionSave>(value)?.snapshot
    } else {
        shaped::<MapSnapshot>(value)?
    };
    snapshot
        .validate(registry)
        .map_err(|source| PersistError::InvalidMap { name: "session".into(), source })?;
    Ok(snapshot)
}

fn has_numeric_version(value: &Value) -> bool {
    value.get("version").is_some_and(Value::is_number)
}

fn check_version(value: &Value) -> Result<(), PersistError> {
    match value.get("version").and_then(Value::as_u64) {
        Some(FORMAT_VERSION) => Ok(()),
        Some(found) => Err(PersistError::UnsupportedVersion { found }),
        // A non-numeric version falls through to the shape check, which
        // reports it with its path.
        None => Ok(()),
    }
}

fn shaped<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, PersistError> {
    serde_path_to_error::deserialize(value).map_err(PersistError::Shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileMap;
    use crate::state::{MapObject, Player};
    use crate::tiles::WALL;

    fn snap(w: u32, h: u32) -> MapSnapshot {
        MapSnapshot {
            tile_map: TileMap::filled(w, h, 0),
            objects: vec![MapObject { kind: "Tree".into(), x: 1, y: 0 }],
            player: Player { x: 0, y: 0 },
        }
    }

    #[test]
    fn encoded_collection_carries_version() {
        let mut maps = BTreeMap::new();
        maps.insert("a".to_string(), snap(2, 2));
        let text = encode_maps(&maps, &BTreeMap::new()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["maps"]["a"]["tileMap"], serde_json::json!([[0, 0], [0, 0]]));
        assert_eq!(value["maps"]["a"]["objects"][0]["type"], "Tree");
    }

    #[test]
    fn legacy_collection_is_accepted() {
        let text = r#"{"old":{"tileMap":[[0,1],[1,0]],"objects":[],"player":{"x":1,"y":1}}}"#;
        let saved = decode_maps(text, &TileRegistry::default()).unwrap();
        assert_eq!(saved.version, FORMAT_VERSION);
        assert_eq!(saved.maps["old"].player, Player { x: 1, y: 1 });
        assert!(saved.links.is_empty());
    }

    #[test]
    fn missing_objects_default_to_empty() {
        let text = r#"{"version":1,"maps":{"m":{"tileMap":[[0]],"player":{"x":0,"y":0}}}}"#;
        let saved = decode_maps(text, &TileRegistry::default()).unwrap();
        assert!(saved.maps["m"].objects.is_empty());
    }

    #[test]
    fn future_version_is_rejected() {
        let text = r#"{"version":7,"maps":{}}"#;
        let err = decode_maps(text, &TileRegistry::default()).unwrap_err();
        assert!(matches!(err, PersistError::UnsupportedVersion { found: 7 }));
    }

    #[test]
    fn ragged_grid_error_names_the_path() {
        let text = r#"{"version":1,"maps":{"bad":{"tileMap":[[0,0],[0]],"player":{"x":0,"y":0}}}}"#;
        let err = decode_maps(text, &TileRegistry::default()).unwrap_err();
        match err {
            PersistError::Shape(e) => assert!(e.path().to_string().contains("bad"), "path: {}", e.path()),
            other => panic!("expected a shape error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_tile_id_is_rejected() {
        let text = r#"{"version":1,"maps":{"m":{"tileMap":[[0,42]],"player":{"x":0,"y":0}}}}"#;
        let err = decode_maps(text, &TileRegistry::default()).unwrap_err();
        assert!(matches!(err, PersistError::InvalidMap { ref name, .. } if name == "m"));
    }

    #[test]
    fn syntax_error_is_reported() {
        let err = decode_maps("{not json", &TileRegistry::default()).unwrap_err();
        assert!(matches!(err, PersistError::Syntax(_)));
    }

    #[test]
    fn dangling_links_are_dropped() {
        let text = r#"{"version":1,"maps":{"a":{"tileMap":[[0]],"player":{"x":0,"y":0}}},
                      "links":{"a":"gone","gone":"a"}}"#;
        let saved = decode_maps(text, &TileRegistry::default()).unwrap();
        assert!(saved.links.is_empty());
    }

    #[test]
    fn collection_round_trips_with_links() {
        let mut maps = BTreeMap::new();
        maps.insert("startMap".to_string(), snap(4, 3));
        let mut walled = snap(2, 5);
        walled.tile_map.set(1, 4, WALL);
        walled.player = Player { x: 1, y: 3 };
        maps.insert("secondMap".to_string(), walled);
        maps.insert("loose".to_string(), snap(1, 1));
        let links: BTreeMap<String, String> = [("startMap", "secondMap"), ("secondMap", "startMap")]
            .into_iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();

        let text = encode_maps(&maps, &links).unwrap();
        let saved = decode_maps(&text, &TileRegistry::default()).unwrap();
        assert_eq!(saved, SavedMaps { version: FORMAT_VERSION, maps, links });
    }

    #[test]
    fn legacy_map_named_version_is_not_a_version_marker() {
        let text = r#"{"version":{"tileMap":[[0]],"player":{"x":0,"y":0}},
                      "other":{"tileMap":[[0,0]],"player":{"x":1,"y":0}}}"#;
        let saved = decode_maps(text, &TileRegistry::default()).unwrap();
        assert_eq!(saved.version, FORMAT_VERSION);
        assert_eq!(saved.maps.len(), 2);
        assert!(saved.maps.contains_key("version"));
    }

    #[test]
    fn player_off_the_grid_is_rejected() {
        let far = r#"{"version":1,"maps":{"far":{"tileMap":[[0,0]],"player":{"x":2147483647,"y":0}}}}"#;
        let err = decode_maps(far, &TileRegistry::default()).unwrap_err();
        assert!(matches!(
            err,
            PersistError::InvalidMap { ref name, source: GridError::PlayerOutOfBounds { x: i32::MAX, y: 0, .. } }
                if name == "far"
        ));

        let mut s = snap(2, 2);
        s.player = Player { x: 5, y: 5 };
        let text = encode_session(&s).unwrap();
        let err = decode_session(&text, &TileRegistry::default()).unwrap_err();
        assert!(matches!(err, PersistError::InvalidMap { source: GridError::PlayerOutOfBounds { .. }, .. }));
    }

    #[test]
    fn session_save_round_trips_and_accepts_bare_snapshot() {
        let s = snap(3, 2);
        let text = encode_session(&s).unwrap();
        assert_eq!(decode_session(&text, &TileRegistry::default()).unwrap(), s);

        let bare = serde_json::to_string(&s).unwrap();
        assert_eq!(decode_session(&bare, &TileRegistry::default()).unwrap(), s);
    }
}
