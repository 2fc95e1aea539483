use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, List, ListItem, Paragraph, Wrap},
};
use tui_input::Input;

use crate::{
    app::{App, EditSession, Focus, Mode},
    keymap::{Action, Table},
};

const FORM_WIDTH: u16 = 60;
const UNTITLED: &str = "Untitled";
const EMPTY_BODY: &str = "Write a note!";
const BODY_PLACEHOLDER: &str = "Type a note!";
const NO_NOTES: &str = "No notes yet";

pub fn draw(frame: &mut Frame, app: &App) {
    match app.mode() {
        Mode::List => render_list(frame, app),
        Mode::Edit(session) => render_form(frame, app, session),
    }
}

fn help_line<A: Action>(table: &Table<A>) -> Line<'static> {
    let help = table.help();
    let last = help.len().saturating_sub(1);
    Line::from_iter(help.into_iter().enumerate().flat_map(|(i, (keys, description))| {
        let separator = if i == last { "" } else { ", " };
        [
            Span::from(keys).bold().yellow(),
            Span::raw(format!(" {description}{separator}")),
        ]
    }))
    .centered()
}

fn render_list(frame: &mut Frame, app: &App) {
    let inner_list_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    let list_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(30), Constraint::Min(1)])
        .split(inner_list_layout[0]);

    let block = Block::bordered()
        .title("My Notes")
        .border_set(border::THICK);

    let store = app.store();
    let items = store.notes().iter().enumerate().map(|(i, note)| {
        let title = if note.title.is_empty() {
            UNTITLED
        } else {
            note.title.as_str()
        };
        let item = ListItem::new(Line::from(title)).bold();

        if i == store.cursor() {
            item.black().on_white()
        } else {
            item
        }
    });

    let details = match store.notes().get(store.cursor()) {
        _ if store.is_empty() => Paragraph::new(NO_NOTES).dark_gray(),
        Some(note) if !note.body.is_empty() => Paragraph::new(note.body.as_str()),
        _ => Paragraph::new(EMPTY_BODY).dark_gray(),
    };

    frame.render_widget(List::new(items).block(block), list_area[0]);
    frame.render_widget(
        details.wrap(Wrap { trim: false }).block(Block::bordered()),
        list_area[1],
    );
    frame.render_widget(help_line(&app.keymap().list), inner_list_layout[1]);
}

fn render_form(frame: &mut Frame, app: &App, session: &EditSession) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    let area = outer[0];
    let available = match app.viewport().width {
        0 => area.width,
        width => width.min(area.width),
    };
    let width = available.min(FORM_WIDTH);
    let form_area = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3), Constraint::Min(3)])
        .split(form_area);

    let mut title_block = Block::bordered().title("Title");
    let mut body_block = Block::bordered().title("Body");

    let (title_area, body_area) = (layout[0], layout[1]);
    let (focused, focused_area) = match session.focus() {
        Focus::Title => {
            title_block = title_block.border_style(Style::new().yellow());
            (session.title(), title_area)
        }
        Focus::Body => {
            body_block = body_block.border_style(Style::new().yellow());
            (session.body(), body_area)
        }
    };

    let inner_width = focused_area.width.max(3) - 3;
    let scroll = focused.visual_scroll(inner_width as usize);
    let x = focused.visual_cursor().max(scroll) - scroll + 1;
    frame.set_cursor_position((focused_area.x + x as u16, focused_area.y + 1));

    let (title_scroll, body_scroll) = match session.focus() {
        Focus::Title => (scroll, 0),
        Focus::Body => (0, scroll),
    };

    let title = field(session.title(), UNTITLED, title_scroll).bold();
    let body = field(session.body(), BODY_PLACEHOLDER, body_scroll);

    frame.render_widget(title.block(title_block), title_area);
    frame.render_widget(body.block(body_block), body_area);
    frame.render_widget(help_line(&app.keymap().edit), outer[1]);
}

fn field<'a>(input: &'a Input, placeholder: &'a str, scroll: usize) -> Paragraph<'a> {
    if input.value().is_empty() {
        Paragraph::new(placeholder).dark_gray()
    } else {
        Paragraph::new(input.value()).scroll((0, scroll as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::AppEvent,
        keymap::{EditAction, Keymap, ListAction},
        store::NoteStore,
    };
    use ratatui::{Terminal, backend::TestBackend};

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_list_shows_titles_and_help() {
        let mut app = App::new(NoteStore::seeded(3), Keymap::default());
        app.update(AppEvent::List(ListAction::New));
        let text = render(&app, 120, 12);

        assert!(text.contains("My Notes"));
        assert!(text.contains(UNTITLED));
        assert!(text.contains(EMPTY_BODY));
        assert!(text.contains("tab/j/down"));
        assert!(text.contains("move down"));
    }

    #[test]
    fn test_list_shows_selected_body() {
        let mut store = NoteStore::seeded(2);
        store.commit(0, "groceries", "milk and eggs");
        let app = App::new(store, Keymap::default());
        let text = render(&app, 100, 12);

        assert!(text.contains("groceries"));
        assert!(text.contains("milk and eggs"));
    }

    #[test]
    fn test_empty_list_renders() {
        let app = App::new(NoteStore::default(), Keymap::default());
        let text = render(&app, 80, 8);
        assert!(text.contains("My Notes"));
        assert!(text.contains(NO_NOTES));
        assert!(!text.contains(EMPTY_BODY));
    }

    #[test]
    fn test_form_shows_drafts_and_placeholders() {
        let mut app = App::new(NoteStore::seeded(1), Keymap::default());
        app.update(AppEvent::List(ListAction::Open));
        let text = render(&app, 80, 12);

        assert!(text.contains("Title"));
        assert!(text.contains("Body"));
        assert!(text.contains(BODY_PLACEHOLDER));
        assert!(text.contains("next field"));
        assert!(!text.contains("My Notes"));
    }

    #[test]
    fn test_form_survives_tiny_viewport() {
        let mut app = App::new(NoteStore::seeded(1), Keymap::default());
        app.update(AppEvent::List(ListAction::Open));
        app.update(AppEvent::Edit(EditAction::NextField));
        app.update(AppEvent::Resize {
            width: 2,
            height: 2,
        });
        render(&app, 4, 5);
    }

    #[test]
    fn test_form_is_centered_in_viewport() {
        let mut app = App::new(NoteStore::seeded(1), Keymap::default());
        app.update(AppEvent::List(ListAction::Open));
        app.update(AppEvent::Resize {
            width: 100,
            height: 10,
        });
        let mut terminal = Terminal::new(TestBackend::new(100, 10)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(19, 0)].symbol(), " ");
        assert_eq!(buffer[(20, 0)].symbol(), "┌");
    }
}
