use crate::models::Note;

/// Ordered notes plus the selection cursor.
///
/// Every operation is total: on an empty list or an out of range index it
/// leaves the store untouched.
#[derive(Debug, Default)]
pub struct NoteStore {
    notes: Vec<Note>,
    cursor: usize,
}

impl NoteStore {
    pub fn new(notes: Vec<Note>) -> NoteStore {
        NoteStore { notes, cursor: 0 }
    }

    /// Placeholder notes titled "1" through `count`, with empty bodies.
    pub fn seeded(count: usize) -> NoteStore {
        NoteStore::new((1..=count).map(|i| Note::new(i.to_string(), "")).collect())
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_next(&mut self) {
        if self.notes.is_empty() {
            return;
        }
        if self.cursor >= self.notes.len() - 1 {
            self.cursor = 0;
        } else {
            self.cursor += 1;
        }
    }

    pub fn move_prev(&mut self) {
        if self.notes.is_empty() {
            return;
        }
        if self.cursor == 0 {
            self.cursor = self.notes.len() - 1;
        } else {
            self.cursor -= 1;
        }
    }

    /// Inserts an empty note right after `index` and selects it. On an empty
    /// list the note lands at 0 whatever `index` is.
    pub fn insert_after(&mut self, index: usize) {
        if self.notes.is_empty() {
            self.notes.push(Note::default());
            self.cursor = 0;
            return;
        }
        if index >= self.notes.len() {
            return;
        }
        self.notes.insert(index + 1, Note::default());
        self.cursor = index + 1;
    }

    /// Removes the note at `index`, then clamps the cursor into the new range.
    pub fn delete_at(&mut self, index: usize) {
        if index >= self.notes.len() {
            return;
        }
        self.notes.remove(index);
        self.cursor = self.cursor.min(self.notes.len().saturating_sub(1));
    }

    pub fn get(&self, index: usize) -> Option<Note> {
        self.notes.get(index).cloned()
    }

    pub fn commit(&mut self, index: usize, title: &str, body: &str) {
        if let Some(note) = self.notes.get_mut(index) {
            note.title = title.to_string();
            note.body = body.to_string();
        }
    }
}
