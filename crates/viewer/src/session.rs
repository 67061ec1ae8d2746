use console::measure_text_width;
use wlpv_protocol::{render_protocol, Protocol};
use wlpv_store::ProtocolStore;

use crate::event::{Event, Flow, Key};
use crate::fit_width;
use crate::list::{FilterState, ListRow, ListView};
use crate::viewport::{Viewport, WHEEL_DELTA};
use crate::{FOOTER_HEIGHT, MARGIN_X, MARGIN_Y};

const PLACEHOLDER: &str = "Initializing...";

/// Handle into the session's item arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub(crate) usize);

impl ItemId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A listed protocol plus the scroll position last seen in its detail page.
#[derive(Debug, Clone)]
pub struct ViewItem<'a> {
    pub protocol: &'a Protocol,
    pub namespace: &'a str,
    pub y_offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Pager,
}

/// Interactive browsing state over a [`ProtocolStore`].
///
/// Owns no terminal; feed it [`Event`]s and draw what [`render`](Self::render) returns.
pub struct Session<'a> {
    items: Vec<ViewItem<'a>>,
    list: ListView,
    pager: Viewport,
    mode: Mode,
    selected: Option<ItemId>,
    width: usize,
    height: usize,
    ready: bool,
}

impl<'a> Session<'a> {
    /// Opens on the detail page of `open` when the store has a protocol by that name,
    /// otherwise on the list.
    pub fn new(store: &'a ProtocolStore, open: Option<&str>) -> Self {
        let items: Vec<ViewItem<'a>> = store
            .entries()
            .map(|entry| ViewItem {
                protocol: entry.protocol,
                namespace: entry.namespace,
                y_offset: 0,
            })
            .collect();

        let rows = items
            .iter()
            .map(|item| ListRow {
                title: item.protocol.name.clone(),
                description: item.namespace.to_string(),
            })
            .collect();
        let mut list = ListView::new(rows);

        let preselected = open.and_then(|name| store.position(name)).map(ItemId);
        if let Some(id) = preselected {
            list.select(id);
        } else if let Some(name) = open {
            log::debug!("no protocol named {name}, starting on the list");
        }

        let mode = match preselected {
            Some(_) => Mode::Pager,
            None => Mode::List,
        };

        Self {
            items,
            list,
            pager: Viewport::default(),
            mode,
            selected: preselected,
            width: 0,
            height: 0,
            ready: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn item(&self, id: ItemId) -> Option<&ViewItem<'a>> {
        self.items.get(id.0)
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn pager(&self) -> &Viewport {
        &self.pager
    }

    pub fn update(&mut self, event: Event) -> Flow {
        match event {
            Event::Quit => Flow::Quit,
            Event::Resize { width, height } => {
                self.resize(width.into(), height.into());
                Flow::Continue
            }
            Event::KeyPress(Key::Ctrl('c')) => Flow::Quit,
            Event::KeyPress(key) => match self.mode {
                Mode::List => self.list_key(key),
                Mode::Pager => {
                    self.pager_key(key);
                    Flow::Continue
                }
            },
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.list.set_size(
            width.saturating_sub(2 * MARGIN_X),
            height.saturating_sub(2 * MARGIN_Y),
        );
        self.pager.set_size(width, height.saturating_sub(FOOTER_HEIGHT));

        if !self.ready {
            self.ready = true;
            if let (Mode::Pager, Some(id)) = (self.mode, self.selected) {
                self.load(id);
            }
        }
    }

    fn list_key(&mut self, key: Key) -> Flow {
        if self.list.filter_state() == FilterState::Editing {
            match key {
                Key::Char(c) => self.list.push_filter_char(c),
                Key::Backspace => self.list.pop_filter_char(),
                Key::Enter => self.list.apply_filter(),
                Key::Esc => self.list.clear_filter(),
                Key::Up => self.list.cursor_up(),
                Key::Down => self.list.cursor_down(),
                _ => {}
            }
            return Flow::Continue;
        }

        match key {
            Key::Char('q') => return Flow::Quit,
            Key::Enter | Key::Char('l') => self.select(),
            Key::Char('j') | Key::Down | Key::WheelDown => self.list.cursor_down(),
            Key::Char('k') | Key::Up | Key::WheelUp => self.list.cursor_up(),
            Key::PageDown | Key::Right => self.list.next_page(),
            Key::PageUp | Key::Left => self.list.prev_page(),
            Key::Char('g') | Key::Home => self.list.goto_start(),
            Key::Char('G') | Key::End => self.list.goto_end(),
            Key::Char('/') => self.list.start_filter(),
            Key::Esc if self.list.filter_state() == FilterState::Applied => {
                self.list.clear_filter();
            }
            _ => {}
        }
        Flow::Continue
    }

    fn pager_key(&mut self, key: Key) {
        match key {
            Key::Esc | Key::Char('q') | Key::Char('h') => self.back(),
            Key::Char('g') | Key::Home => self.pager.goto_top(),
            Key::Char('G') | Key::End => self.pager.goto_bottom(),
            Key::Char('j') | Key::Down => self.pager.scroll_down(1),
            Key::Char('k') | Key::Up => self.pager.scroll_up(1),
            Key::WheelDown => self.pager.scroll_down(WHEEL_DELTA),
            Key::WheelUp => self.pager.scroll_up(WHEEL_DELTA),
            Key::Char('f') | Key::Char(' ') | Key::PageDown => self.pager.page_down(),
            Key::Char('b') | Key::PageUp => self.pager.page_up(),
            Key::Char('d') | Key::Ctrl('d') => self.pager.half_page_down(),
            Key::Char('u') | Key::Ctrl('u') => self.pager.half_page_up(),
            _ => {}
        }
    }

    /// Enter the detail page of the row under the cursor. No-op on an empty list.
    pub fn select(&mut self) {
        let Some(id) = self.list.selected() else {
            return;
        };
        self.selected = Some(id);
        self.mode = Mode::Pager;
        self.load(id);
    }

    /// Leave the detail page, remembering where it was scrolled to.
    pub fn back(&mut self) {
        if let Some(item) = self.selected.and_then(|id| self.items.get_mut(id.0)) {
            item.y_offset = self.pager.y_offset();
        }
        self.mode = Mode::List;
    }

    fn load(&mut self, id: ItemId) {
        let Some(item) = self.items.get(id.0) else {
            return;
        };
        self.pager.set_content(&render_protocol(item.protocol));
        self.pager.set_y_offset(item.y_offset);
    }

    /// `name ──── NNN%` spanning the window width.
    pub fn footer(&self) -> String {
        let name = self
            .selected
            .and_then(|id| self.items.get(id.0))
            .map(|item| item.protocol.name.as_str())
            .unwrap_or_default();

        let left = format!("{name} ");
        let right = format!(" {:3.0}%", self.pager.scroll_percent() * 100.0);
        let fill = self
            .width
            .saturating_sub(measure_text_width(&left) + measure_text_width(&right));

        fit_width(&format!("{left}{}{right}", "─".repeat(fill)), self.width)
    }

    /// The whole screen: at most `height` lines, none wider than `width`.
    pub fn render(&self) -> Vec<String> {
        match self.mode {
            Mode::Pager if !self.ready => vec![PLACEHOLDER.to_string()],
            Mode::Pager => {
                let mut lines = self.pager.view();
                if self.height >= FOOTER_HEIGHT {
                    lines.push(self.footer());
                }
                lines.truncate(self.height);
                lines
            }
            Mode::List => {
                let margin = " ".repeat(MARGIN_X);
                let mut lines = vec![String::new(); MARGIN_Y.min(self.height)];
                lines.extend(
                    self.list
                        .view()
                        .into_iter()
                        .map(|line| fit_width(&format!("{margin}{line}"), self.width)),
                );
                lines.resize(self.height, String::new());
                lines
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn long_protocol(name: &str) -> Protocol {
        let body: Vec<String> = (0..200).map(|i| format!("line {i}")).collect();
        Protocol {
            name: name.to_string(),
            copyright: body.join("\n"),
            ..Protocol::default()
        }
    }

    fn store() -> ProtocolStore {
        let mut map = HashMap::new();
        map.insert(
            "stable".to_string(),
            vec![long_protocol("xdg_shell"), long_protocol("viewporter")],
        );
        map.insert("staging".to_string(), vec![long_protocol("xdg_activation_v1")]);
        ProtocolStore::new(map, &["stable".to_string(), "staging".to_string()])
    }

    fn press(session: &mut Session<'_>, key: Key) -> Flow {
        session.update(Event::KeyPress(key))
    }

    #[test]
    fn direct_open_starts_on_top_of_the_page() {
        let store = store();
        let mut session = Session::new(&store, Some("xdg_shell"));
        assert_eq!(session.mode(), Mode::Pager);
        assert_eq!(session.render(), vec![PLACEHOLDER.to_string()]);

        session.update(Event::Resize { width: 60, height: 20 });
        assert_eq!(session.pager().y_offset(), 0);
        assert!(session.pager().line_count() > 0);
        assert!(session.footer().starts_with("xdg_shell "));
        assert!(session.footer().ends_with("  0%"));
    }

    #[test]
    fn unknown_name_starts_on_the_list() {
        let store = store();
        let session = Session::new(&store, Some("nonexistent"));
        assert_eq!(session.mode(), Mode::List);
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn scroll_position_survives_a_round_trip() {
        let store = store();
        let mut session = Session::new(&store, None);
        session.update(Event::Resize { width: 60, height: 20 });

        press(&mut session, Key::Char('j'));
        press(&mut session, Key::Enter);
        assert_eq!(session.selected().map(ItemId::index), Some(1));
        for _ in 0..7 {
            press(&mut session, Key::Char('j'));
        }
        assert_eq!(session.pager().y_offset(), 7);

        press(&mut session, Key::Esc);
        assert_eq!(session.mode(), Mode::List);
        assert_eq!(session.item(ItemId(1)).map(|item| item.y_offset), Some(7));
        assert_eq!(session.item(ItemId(0)).map(|item| item.y_offset), Some(0));
        press(&mut session, Key::Char('k'));
        press(&mut session, Key::Enter);
        assert_eq!(session.pager().y_offset(), 0);
        press(&mut session, Key::Char('q'));

        press(&mut session, Key::Char('j'));
        press(&mut session, Key::Char('l'));
        assert_eq!(session.pager().y_offset(), 7);
    }

    #[test]
    fn back_from_direct_open_lands_on_that_row() {
        let store = store();
        let mut session = Session::new(&store, Some("xdg_activation_v1"));
        session.update(Event::Resize { width: 60, height: 20 });

        press(&mut session, Key::Char('h'));
        assert_eq!(session.mode(), Mode::List);
        assert_eq!(session.list().selected().map(ItemId::index), Some(2));
    }

    #[test]
    fn selecting_from_an_empty_list_does_nothing() {
        let store = ProtocolStore::default();
        let mut session = Session::new(&store, None);
        session.update(Event::Resize { width: 40, height: 10 });

        press(&mut session, Key::Enter);
        assert_eq!(session.mode(), Mode::List);
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn filtered_out_list_cannot_be_selected() {
        let store = store();
        let mut session = Session::new(&store, None);
        session.update(Event::Resize { width: 40, height: 20 });

        press(&mut session, Key::Char('/'));
        for c in "zzz".chars() {
            press(&mut session, Key::Char(c));
        }
        press(&mut session, Key::Enter);
        press(&mut session, Key::Enter);
        assert_eq!(session.mode(), Mode::List);
    }

    #[test]
    fn typing_q_into_the_filter_does_not_quit() {
        let store = store();
        let mut session = Session::new(&store, None);

        press(&mut session, Key::Char('/'));
        assert_eq!(press(&mut session, Key::Char('q')), Flow::Continue);
        assert_eq!(session.list().query(), "q");

        press(&mut session, Key::Esc);
        assert_eq!(press(&mut session, Key::Char('q')), Flow::Quit);
    }

    #[test]
    fn control_c_quits_from_anywhere() {
        let store = store();
        let mut session = Session::new(&store, Some("viewporter"));
        assert_eq!(press(&mut session, Key::Ctrl('c')), Flow::Quit);
        assert_eq!(session.update(Event::Quit), Flow::Quit);
    }

    #[test]
    fn pager_keys_move_within_bounds() {
        let store = store();
        let mut session = Session::new(&store, Some("viewporter"));
        session.update(Event::Resize { width: 60, height: 21 });

        press(&mut session, Key::Char('f'));
        assert_eq!(session.pager().y_offset(), 20);
        press(&mut session, Key::Ctrl('u'));
        assert_eq!(session.pager().y_offset(), 10);
        press(&mut session, Key::WheelDown);
        assert_eq!(session.pager().y_offset(), 13);
        press(&mut session, Key::End);
        assert!(session.pager().at_bottom());
        assert!(session.footer().ends_with("100%"));
        press(&mut session, Key::Char('g'));
        assert_eq!(session.pager().y_offset(), 0);
    }

    #[test]
    fn list_frame_keeps_its_margins() {
        let store = store();
        let mut session = Session::new(&store, None);
        session.update(Event::Resize { width: 40, height: 16 });

        let frame = session.render();
        assert_eq!(frame.len(), 16);
        assert_eq!(frame[0], "");
        assert!(frame[1].starts_with("  "));
        assert_eq!(session.list().width(), 36);
        assert_eq!(session.list().height(), 14);
    }
}
