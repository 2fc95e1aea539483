use std::io;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info};
use ratatui::DefaultTerminal;
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{
    keymap::{EditAction, KeyBinding, Keymap, ListAction},
    store::NoteStore,
    ui,
};

pub const TITLE_CHAR_LIMIT: usize = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Title,
    Body,
}

impl Focus {
    pub fn next(self) -> Focus {
        match self {
            Focus::Title => Focus::Body,
            Focus::Body => Focus::Title,
        }
    }

    pub fn prev(self) -> Focus {
        match self {
            Focus::Title => Focus::Body,
            Focus::Body => Focus::Title,
        }
    }
}

/// Drafts for the note being edited. Dropping it discards the edit.
#[derive(Debug)]
pub struct EditSession {
    target: usize,
    title: Input,
    body: Input,
    focus: Focus,
}

impl EditSession {
    pub fn target(&self) -> usize {
        self.target
    }

    pub fn title(&self) -> &Input {
        &self.title
    }

    pub fn body(&self) -> &Input {
        &self.body
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    fn edit(&mut self, key: KeyEvent) {
        let event = Event::Key(key);
        match self.focus {
            Focus::Title => {
                let inserting = matches!(key.code, KeyCode::Char(_))
                    && !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
                if inserting && self.title.value().chars().count() >= TITLE_CHAR_LIMIT {
                    return;
                }
                self.title.handle_event(&event);
            }
            Focus::Body => {
                self.body.handle_event(&event);
            }
        }
    }
}

#[derive(Debug)]
pub enum Mode {
    List,
    Edit(EditSession),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    List(ListAction),
    Edit(EditAction),
    /// A key with no binding in the current mode, handed to the focused field.
    Text(KeyEvent),
    Resize { width: u16, height: u16 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    Quit,
}

pub struct App {
    store: NoteStore,
    mode: Mode,
    keymap: Keymap,
    viewport: Viewport,
}

impl App {
    pub fn new(store: NoteStore, keymap: Keymap) -> App {
        App {
            store,
            mode: Mode::List,
            keymap,
            viewport: Viewport::default(),
        }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        let size = terminal.size()?;
        self.update(AppEvent::Resize {
            width: size.width,
            height: size.height,
        });

        loop {
            terminal.draw(|f| ui::draw(f, self))?;
            let event = crossterm::event::read()?;

            if let Some(Directive::Quit) = self.handle_terminal_event(&event) {
                info!("exit requested");
                return Ok(());
            }
        }
    }

    pub fn handle_terminal_event(&mut self, event: &Event) -> Option<Directive> {
        let event = self.translate(event)?;
        self.update(event)
    }

    /// Maps a terminal event to a semantic event through the keymap of the
    /// current mode.
    pub fn translate(&self, event: &Event) -> Option<AppEvent> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let binding = KeyBinding::from(*key);
                let semantic = match self.mode {
                    Mode::List => self.keymap.list.resolve(binding).map(AppEvent::List),
                    Mode::Edit(_) => self.keymap.edit.resolve(binding).map(AppEvent::Edit),
                };
                Some(semantic.unwrap_or(AppEvent::Text(*key)))
            }
            Event::Resize(width, height) => Some(AppEvent::Resize {
                width: *width,
                height: *height,
            }),
            _ => None,
        }
    }

    pub fn update(&mut self, event: AppEvent) -> Option<Directive> {
        if let AppEvent::Resize { width, height } = event {
            self.viewport = Viewport { width, height };
            return None;
        }

        match self.mode {
            Mode::List => self.update_list(event),
            Mode::Edit(_) => {
                self.update_edit(event);
                None
            }
        }
    }

    fn update_list(&mut self, event: AppEvent) -> Option<Directive> {
        let AppEvent::List(action) = event else {
            return None;
        };

        match action {
            ListAction::Next => {
                self.store.move_next();
                debug!("cursor at {}", self.store.cursor());
            }
            ListAction::Prev => {
                self.store.move_prev();
                debug!("cursor at {}", self.store.cursor());
            }
            ListAction::Open => self.open(),
            ListAction::New => {
                self.store.insert_after(self.store.cursor());
                debug!("inserted note at {}", self.store.cursor());
            }
            ListAction::Delete => {
                let cursor = self.store.cursor();
                self.store.delete_at(cursor);
                debug!("deleted note at {cursor}, {} left", self.store.len());
            }
            ListAction::Exit => return Some(Directive::Quit),
        }
        None
    }

    fn open(&mut self) {
        let target = self.store.cursor();
        let Some(note) = self.store.get(target) else {
            return;
        };
        debug!("editing note {target}");
        self.mode = Mode::Edit(EditSession {
            target,
            title: Input::new(note.title),
            body: Input::new(note.body),
            focus: Focus::Title,
        });
    }

    fn update_edit(&mut self, event: AppEvent) {
        let Mode::Edit(session) = &mut self.mode else {
            return;
        };

        match event {
            AppEvent::Edit(EditAction::NextField) => session.focus = session.focus.next(),
            AppEvent::Edit(EditAction::PrevField) => session.focus = session.focus.prev(),
            AppEvent::Edit(EditAction::Save) => {
                let target = session.target();
                self.store
                    .commit(target, session.title.value(), session.body.value());
                debug!("saved note {target}");
                self.mode = Mode::List;
            }
            AppEvent::Edit(EditAction::Cancel) => {
                debug!("discarded edits to note {}", session.target());
                self.mode = Mode::List;
            }
            AppEvent::Text(key) => session.edit(key),
            AppEvent::List(_) | AppEvent::Resize { .. } => {}
        }
    }
}
