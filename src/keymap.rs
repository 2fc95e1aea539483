use std::{collections::HashMap, fmt, hash::Hash};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListAction {
    Next,
    Prev,
    Open,
    New,
    Delete,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditAction {
    NextField,
    PrevField,
    Save,
    Cancel,
}

/// A semantic action bound to physical keys within one mode.
pub trait Action: Copy + Eq + Hash + fmt::Debug + 'static {
    const MODE: &'static str;

    /// Name used in keymap files.
    fn name(self) -> &'static str;

    /// Text shown in the help footer.
    fn description(self) -> &'static str;
}

impl Action for ListAction {
    const MODE: &'static str = "list";

    fn name(self) -> &'static str {
        match self {
            ListAction::Next => "next",
            ListAction::Prev => "prev",
            ListAction::Open => "open",
            ListAction::New => "new",
            ListAction::Delete => "delete",
            ListAction::Exit => "exit",
        }
    }

    fn description(self) -> &'static str {
        match self {
            ListAction::Next => "move down",
            ListAction::Prev => "move up",
            ListAction::Open => "open",
            ListAction::New => "new",
            ListAction::Delete => "delete",
            ListAction::Exit => "exit",
        }
    }
}

impl Action for EditAction {
    const MODE: &'static str = "edit";

    fn name(self) -> &'static str {
        match self {
            EditAction::NextField => "next_field",
            EditAction::PrevField => "prev_field",
            EditAction::Save => "save",
            EditAction::Cancel => "cancel",
        }
    }

    fn description(self) -> &'static str {
        match self {
            EditAction::NextField => "next field",
            EditAction::PrevField => "previous field",
            EditAction::Save => "save",
            EditAction::Cancel => "cancel",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeymapError {
    #[error("unrecognized key `{0}`")]
    InvalidKey(String),
    #[error("key `{key}` is bound to both `{first}` and `{second}` in {mode} mode")]
    Conflict {
        mode: &'static str,
        key: String,
        first: &'static str,
        second: &'static str,
    },
    #[error("`{action}` has no keys in {mode} mode")]
    Unbound {
        mode: &'static str,
        action: &'static str,
    },
}

/// A physical key, normalized so that a parsed binding and a terminal event
/// for the same key compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> KeyBinding {
        let mut modifiers =
            modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT);
        let code = match code {
            KeyCode::BackTab => {
                modifiers.remove(KeyModifiers::SHIFT);
                KeyCode::BackTab
            }
            KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => {
                modifiers.remove(KeyModifiers::SHIFT);
                KeyCode::BackTab
            }
            KeyCode::Char(c) if modifiers.contains(KeyModifiers::SHIFT) => {
                modifiers.remove(KeyModifiers::SHIFT);
                KeyCode::Char(c.to_ascii_uppercase())
            }
            code => code,
        };
        KeyBinding { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> KeyBinding {
        KeyBinding::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(c: char) -> KeyBinding {
        KeyBinding::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Parses strings like `j`, `enter`, `shift+tab` or `ctrl+c`.
    pub fn parse(text: &str) -> Result<KeyBinding, KeymapError> {
        let invalid = || KeymapError::InvalidKey(text.to_string());
        // a lone "+" is a key, not a separator
        if text == "+" {
            return Ok(KeyBinding::plain(KeyCode::Char('+')));
        }

        let mut parts: Vec<&str> = text.split('+').collect();
        let key = parts.pop().filter(|k| !k.is_empty()).ok_or_else(invalid)?;

        let mut modifiers = KeyModifiers::NONE;
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return Err(invalid()),
            }
        }

        let mut chars = key.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => match key.to_ascii_lowercase().as_str() {
                "tab" => KeyCode::Tab,
                "backtab" => KeyCode::BackTab,
                "enter" | "return" => KeyCode::Enter,
                "esc" | "escape" => KeyCode::Esc,
                "up" => KeyCode::Up,
                "down" => KeyCode::Down,
                "left" => KeyCode::Left,
                "right" => KeyCode::Right,
                "backspace" => KeyCode::Backspace,
                "delete" | "del" => KeyCode::Delete,
                "home" => KeyCode::Home,
                "end" => KeyCode::End,
                "pageup" => KeyCode::PageUp,
                "pagedown" => KeyCode::PageDown,
                "space" => KeyCode::Char(' '),
                name => {
                    let n = name
                        .strip_prefix('f')
                        .and_then(|n| n.parse::<u8>().ok())
                        .filter(|n| (1..=12).contains(n))
                        .ok_or_else(invalid)?;
                    KeyCode::F(n)
                }
            },
        };
        Ok(KeyBinding::new(code, modifiers))
    }
}

impl From<KeyEvent> for KeyBinding {
    fn from(event: KeyEvent) -> KeyBinding {
        KeyBinding::new(event.code, event.modifiers)
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::BackTab => f.write_str("shift+tab"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Up => f.write_str("up"),
            KeyCode::Down => f.write_str("down"),
            KeyCode::Left => f.write_str("left"),
            KeyCode::Right => f.write_str("right"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Delete => f.write_str("delete"),
            KeyCode::Home => f.write_str("home"),
            KeyCode::End => f.write_str("end"),
            KeyCode::PageUp => f.write_str("pageup"),
            KeyCode::PageDown => f.write_str("pagedown"),
            KeyCode::F(n) => write!(f, "f{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Bindings for one mode: the declared order (for help) plus a single lookup
/// table keyed by physical key.
#[derive(Debug, Clone)]
pub struct Table<A: Action> {
    entries: Vec<(A, Vec<KeyBinding>)>,
    lookup: HashMap<KeyBinding, A>,
}

impl<A: Action> Table<A> {
    pub fn build(entries: Vec<(A, Vec<KeyBinding>)>) -> Result<Table<A>, KeymapError> {
        let mut lookup = HashMap::new();
        for (action, keys) in &entries {
            if keys.is_empty() {
                return Err(KeymapError::Unbound {
                    mode: A::MODE,
                    action: action.name(),
                });
            }
            for key in keys {
                match lookup.insert(*key, *action) {
                    Some(previous) if previous != *action => {
                        return Err(KeymapError::Conflict {
                            mode: A::MODE,
                            key: key.to_string(),
                            first: previous.name(),
                            second: action.name(),
                        });
                    }
                    _ => {}
                }
            }
        }
        Ok(Table { entries, lookup })
    }

    pub fn resolve(&self, key: KeyBinding) -> Option<A> {
        self.lookup.get(&key).copied()
    }

    /// `("tab/j/down", "move down")` pairs in declaration order.
    pub fn help(&self) -> Vec<(String, &'static str)> {
        self.entries
            .iter()
            .map(|(action, keys)| {
                let label = keys
                    .iter()
                    .map(|k| k.to_string())
                    .collect::<Vec<_>>()
                    .join("/");
                (label, action.description())
            })
            .collect()
    }

    fn rebind(&mut self, action: A, keys: Vec<KeyBinding>) {
        match self.entries.iter_mut().find(|(a, _)| *a == action) {
            Some(entry) => entry.1 = keys,
            None => self.entries.push((action, keys)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Keymap {
    pub list: Table<ListAction>,
    pub edit: Table<EditAction>,
}

impl Keymap {
    /// Replaces the keys of the given actions, keeping defaults for the rest.
    pub fn with_overrides(
        list: Vec<(ListAction, Vec<KeyBinding>)>,
        edit: Vec<(EditAction, Vec<KeyBinding>)>,
    ) -> Result<Keymap, KeymapError> {
        let defaults = Keymap::default();
        let mut list_table = defaults.list;
        let mut edit_table = defaults.edit;
        for (action, keys) in list {
            list_table.rebind(action, keys);
        }
        for (action, keys) in edit {
            edit_table.rebind(action, keys);
        }
        Ok(Keymap {
            list: Table::build(list_table.entries)?,
            edit: Table::build(edit_table.entries)?,
        })
    }
}

fn default_list() -> Vec<(ListAction, Vec<KeyBinding>)> {
    use KeyBinding as K;
    vec![
        (
            ListAction::Next,
            vec![
                K::plain(KeyCode::Tab),
                K::plain(KeyCode::Char('j')),
                K::plain(KeyCode::Down),
            ],
        ),
        (
            ListAction::Prev,
            vec![
                K::plain(KeyCode::BackTab),
                K::plain(KeyCode::Char('k')),
                K::plain(KeyCode::Up),
            ],
        ),
        (
            ListAction::Open,
            vec![
                K::plain(KeyCode::Enter),
                K::plain(KeyCode::Char('l')),
                K::plain(KeyCode::Right),
            ],
        ),
        (ListAction::New, vec![K::plain(KeyCode::Char('n'))]),
        (ListAction::Delete, vec![K::plain(KeyCode::Char('d'))]),
        (
            ListAction::Exit,
            vec![
                K::ctrl('c'),
                K::plain(KeyCode::Char('q')),
                K::plain(KeyCode::Esc),
            ],
        ),
    ]
}

fn default_edit() -> Vec<(EditAction, Vec<KeyBinding>)> {
    use KeyBinding as K;
    vec![
        (EditAction::NextField, vec![K::plain(KeyCode::Tab)]),
        (EditAction::PrevField, vec![K::plain(KeyCode::BackTab)]),
        (EditAction::Save, vec![K::plain(KeyCode::Enter)]),
        (
            EditAction::Cancel,
            vec![K::ctrl('c'), K::plain(KeyCode::Esc)],
        ),
    ]
}

fn unchecked<A: Action>(entries: Vec<(A, Vec<KeyBinding>)>) -> Table<A> {
    let lookup = entries
        .iter()
        .flat_map(|(action, keys)| keys.iter().map(move |k| (*k, *action)))
        .collect();
    Table { entries, lookup }
}

impl Default for Keymap {
    fn default() -> Keymap {
        // the default tables are conflict free, see the tests below
        Keymap {
            list: unchecked(default_list()),
            edit: unchecked(default_edit()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_have_no_conflicts() {
        assert!(Table::build(default_list()).is_ok());
        assert!(Table::build(default_edit()).is_ok());
    }

    #[test]
    fn test_default_list_bindings() {
        let keymap = Keymap::default();
        let resolve = |code| keymap.list.resolve(KeyBinding::plain(code));
        assert_eq!(resolve(KeyCode::Char('j')), Some(ListAction::Next));
        assert_eq!(resolve(KeyCode::Down), Some(ListAction::Next));
        assert_eq!(resolve(KeyCode::BackTab), Some(ListAction::Prev));
        assert_eq!(resolve(KeyCode::Enter), Some(ListAction::Open));
        assert_eq!(resolve(KeyCode::Char('n')), Some(ListAction::New));
        assert_eq!(resolve(KeyCode::Char('d')), Some(ListAction::Delete));
        assert_eq!(resolve(KeyCode::Esc), Some(ListAction::Exit));
        assert_eq!(keymap.list.resolve(KeyBinding::ctrl('c')), Some(ListAction::Exit));
        assert_eq!(resolve(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_default_edit_bindings() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.edit.resolve(KeyBinding::plain(KeyCode::Tab)),
            Some(EditAction::NextField)
        );
        assert_eq!(
            keymap.edit.resolve(KeyBinding::plain(KeyCode::Enter)),
            Some(EditAction::Save)
        );
        assert_eq!(
            keymap.edit.resolve(KeyBinding::ctrl('c')),
            Some(EditAction::Cancel)
        );
        assert_eq!(keymap.edit.resolve(KeyBinding::plain(KeyCode::Char('q'))), None);
    }

    #[test]
    fn test_terminal_events_are_normalized() {
        let backtab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(KeyBinding::from(backtab), KeyBinding::plain(KeyCode::BackTab));

        let upper = KeyEvent::new(KeyCode::Char('J'), KeyModifiers::SHIFT);
        assert_eq!(KeyBinding::from(upper), KeyBinding::plain(KeyCode::Char('J')));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyBinding::from(ctrl_c), KeyBinding::ctrl('c'));
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(KeyBinding::parse("j"), Ok(KeyBinding::plain(KeyCode::Char('j'))));
        assert_eq!(KeyBinding::parse("ctrl+c"), Ok(KeyBinding::ctrl('c')));
        assert_eq!(KeyBinding::parse("Ctrl+c"), Ok(KeyBinding::ctrl('c')));
        assert_eq!(
            KeyBinding::parse("shift+tab"),
            Ok(KeyBinding::plain(KeyCode::BackTab))
        );
        assert_eq!(
            KeyBinding::parse("shift+v"),
            Ok(KeyBinding::plain(KeyCode::Char('V')))
        );
        assert_eq!(KeyBinding::parse("escape"), Ok(KeyBinding::plain(KeyCode::Esc)));
        assert_eq!(KeyBinding::parse("f5"), Ok(KeyBinding::plain(KeyCode::F(5))));
        assert_eq!(KeyBinding::parse("+"), Ok(KeyBinding::plain(KeyCode::Char('+'))));
        assert_eq!(
            KeyBinding::parse("space"),
            Ok(KeyBinding::plain(KeyCode::Char(' ')))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        for text in ["", "hyper+j", "f13", "banana", "ctrl+"] {
            assert_eq!(
                KeyBinding::parse(text),
                Err(KeymapError::InvalidKey(text.to_string())),
                "{text}"
            );
        }
    }

    #[test]
    fn test_display_parses_back() {
        let keymap = Keymap::default();
        for (_, keys) in &keymap.list.entries {
            for key in keys {
                assert_eq!(KeyBinding::parse(&key.to_string()), Ok(*key));
            }
        }
    }

    #[test]
    fn test_conflicting_override_is_rejected() {
        let result = Keymap::with_overrides(
            vec![(ListAction::Prev, vec![KeyBinding::plain(KeyCode::Char('j'))])],
            vec![],
        );
        assert_eq!(
            result.err(),
            Some(KeymapError::Conflict {
                mode: "list",
                key: "j".to_string(),
                first: "next",
                second: "prev",
            })
        );
    }

    #[test]
    fn test_same_key_in_different_modes_is_fine() {
        let keymap = Keymap::with_overrides(
            vec![],
            vec![(EditAction::Save, vec![KeyBinding::plain(KeyCode::Char('n'))])],
        )
        .unwrap();
        let n = KeyBinding::plain(KeyCode::Char('n'));
        assert_eq!(keymap.list.resolve(n), Some(ListAction::New));
        assert_eq!(keymap.edit.resolve(n), Some(EditAction::Save));
        assert_eq!(keymap.edit.resolve(KeyBinding::plain(KeyCode::Enter)), None);
    }

    #[test]
    fn test_empty_override_is_rejected() {
        let result = Keymap::with_overrides(vec![(ListAction::Exit, vec![])], vec![]);
        assert_eq!(
            result.err(),
            Some(KeymapError::Unbound {
                mode: "list",
                action: "exit",
            })
        );
    }

    #[test]
    fn test_help_labels_follow_declaration_order() {
        let help = Keymap::default().list.help();
        assert_eq!(help[0], ("tab/j/down".to_string(), "move down"));
        assert_eq!(help[5], ("ctrl+c/q/esc".to_string(), "exit"));
    }
}
