use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self as term_event, DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEventKind,
};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use crate::error::Result;
use crate::event::{Event, Flow, Key};
use crate::session::Session;

/// Raw mode, alternate screen and mouse capture for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter(out: &mut Stdout) -> Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;
        execute!(out, EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

pub(crate) fn run(session: &mut Session<'_>) -> Result<()> {
    let mut out = io::stdout();
    let _guard = TerminalGuard::enter(&mut out)?;

    let (width, height) = terminal::size()?;
    session.update(Event::Resize { width, height });
    draw(&mut out, session)?;

    loop {
        let Some(event) = translate(term_event::read()?) else {
            continue;
        };
        if session.update(event) == Flow::Quit {
            break;
        }
        draw(&mut out, session)?;
    }
    Ok(())
}

fn draw(out: &mut Stdout, session: &Session<'_>) -> Result<()> {
    let frame = session.render();
    for (row, line) in frame.iter().enumerate() {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(out, MoveTo(0, row), Print(line), Clear(ClearType::UntilNewLine))?;
    }
    let below = u16::try_from(frame.len()).unwrap_or(u16::MAX);
    queue!(out, MoveTo(0, below), Clear(ClearType::FromCursorDown))?;
    out.flush()?;
    Ok(())
}

fn translate(event: term_event::Event) -> Option<Event> {
    match event {
        term_event::Event::Key(key) => translate_key(key).map(Event::KeyPress),
        term_event::Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(Event::KeyPress(Key::WheelUp)),
            MouseEventKind::ScrollDown => Some(Event::KeyPress(Key::WheelDown)),
            _ => None,
        },
        term_event::Event::Resize(width, height) => Some(Event::Resize { width, height }),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let key = match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Key::Ctrl(c.to_ascii_lowercase())
        }
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => return None,
    };
    Some(key)
}
