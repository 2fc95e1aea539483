//! Keymap configuration.
//!
//! Bindings are read from `keymap.toml`, either the path given on the command
//! line or `<config dir>/jotter/keymap.toml`. Every action is optional; the ones
//! left out keep their default keys.
//!
//! ```toml
//! [list]
//! next = ["j", "down"]
//! exit = ["q"]
//!
//! [edit]
//! save = ["ctrl+s"]
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Deserialize;

use crate::keymap::{EditAction, KeyBinding, Keymap, KeymapError, ListAction};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid keymap file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Keymap(#[from] KeymapError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeymapFile {
    #[serde(default)]
    list: ListKeys,
    #[serde(default)]
    edit: EditKeys,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListKeys {
    next: Option<Vec<String>>,
    prev: Option<Vec<String>>,
    open: Option<Vec<String>>,
    new: Option<Vec<String>>,
    delete: Option<Vec<String>>,
    exit: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EditKeys {
    next_field: Option<Vec<String>>,
    prev_field: Option<Vec<String>>,
    save: Option<Vec<String>>,
    cancel: Option<Vec<String>>,
}

pub fn keymap_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jotter").join("keymap.toml"))
}

/// Loads the keymap from `explicit` if given, otherwise from the default
/// location when that file exists, otherwise returns the default bindings.
pub fn load_keymap(explicit: Option<&Path>) -> Result<Keymap, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match keymap_path().filter(|p| p.exists()) {
            Some(path) => path,
            None => {
                debug!("no keymap file, using default bindings");
                return Ok(Keymap::default());
            }
        },
    };

    let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let keymap = parse_keymap(&contents)?;
    info!("loaded keymap from {}", path.display());
    Ok(keymap)
}

pub fn parse_keymap(contents: &str) -> Result<Keymap, ConfigError> {
    let file: KeymapFile = toml::from_str(contents)?;

    let list = [
        (ListAction::Next, file.list.next),
        (ListAction::Prev, file.list.prev),
        (ListAction::Open, file.list.open),
        (ListAction::New, file.list.new),
        (ListAction::Delete, file.list.delete),
        (ListAction::Exit, file.list.exit),
    ];
    let edit = [
        (EditAction::NextField, file.edit.next_field),
        (EditAction::PrevField, file.edit.prev_field),
        (EditAction::Save, file.edit.save),
        (EditAction::Cancel, file.edit.cancel),
    ];

    Ok(Keymap::with_overrides(overrides(list)?, overrides(edit)?)?)
}

fn overrides<A, const N: usize>(
    entries: [(A, Option<Vec<String>>); N],
) -> Result<Vec<(A, Vec<KeyBinding>)>, KeymapError> {
    entries
        .into_iter()
        .filter_map(|(action, keys)| keys.map(|keys| (action, keys)))
        .map(|(action, keys)| {
            let bindings = keys
                .iter()
                .map(|k| KeyBinding::parse(k))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((action, bindings))
        })
        .collect()
}
