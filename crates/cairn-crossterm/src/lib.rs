//! Crossterm terminal driver for cairn.
//!
//! Provides a [`CrosstermDriver`] that implements [`cairn_core::Driver`]:
//! raw-mode keyboard input, resize notifications, and batched flushing of
//! changed cells.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{self, Attribute, Color as CtColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use cairn_core::{
    app::Driver,
    grid::Frame,
    messages::{Key, ModMask, Msg},
    style::{AttrMask, Color},
};

fn to_ct_color(c: Color) -> CtColor {
    if c.is_default() {
        CtColor::Reset
    } else {
        CtColor::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        }
    }
}

fn to_mod_mask(mods: KeyModifiers) -> ModMask {
    let mut m = ModMask::NONE;
    if mods.contains(KeyModifiers::SHIFT) {
        m = m | ModMask::SHIFT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        m = m | ModMask::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        m = m | ModMask::ALT;
    }
    m
}

fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Home => Some(Key::Home),
        KeyCode::End => Some(Key::End),
        KeyCode::PageUp => Some(Key::PageUp),
        KeyCode::PageDown => Some(Key::PageDown),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        _ => None,
    }
}

/// Translate one crossterm event into a message, if it maps to one.
fn to_msg(ev: Event) -> Option<Msg> {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) => {
            if kind == KeyEventKind::Release {
                return None;
            }
            if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                return Some(Msg::Quit);
            }
            to_key(code).map(|key| Msg::KeyDown {
                key,
                modifiers: to_mod_mask(modifiers),
                time: Instant::now(),
            })
        }
        Event::Resize(w, h) => Some(Msg::Screen {
            width: w as i32,
            height: h as i32,
        }),
        _ => None,
    }
}

/// A terminal back-end using crossterm.
pub struct CrosstermDriver {
    out: Stdout,
}

impl CrosstermDriver {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(i32, i32), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        let (w, h) = terminal::size()?;
        log::info!("terminal driver ready ({w}x{h})");
        Ok((w as i32, h as i32))
    }

    fn poll_msgs(
        &mut self,
        timeout: Duration,
        out: &mut Vec<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !event::poll(timeout)? {
            return Ok(());
        }
        while event::poll(Duration::ZERO)? {
            if let Some(msg) = to_msg(event::read()?) {
                out.push(msg);
            }
        }
        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut last_style = None;
        for fc in &frame.cells {
            let (p, cell) = (fc.pos, fc.cell);
            queue!(self.out, cursor::MoveTo(p.x as u16, p.y as u16))?;
            if last_style != Some(cell.style) {
                queue!(
                    self.out,
                    style::SetAttribute(Attribute::Reset),
                    SetForegroundColor(to_ct_color(cell.style.fg)),
                    SetBackgroundColor(to_ct_color(cell.style.bg))
                )?;
                let attrs = cell.style.attrs;
                if attrs.contains(AttrMask::BOLD) {
                    queue!(self.out, style::SetAttribute(Attribute::Bold))?;
                }
                if attrs.contains(AttrMask::UNDERLINE) {
                    queue!(self.out, style::SetAttribute(Attribute::Underlined))?;
                }
                if attrs.contains(AttrMask::REVERSE) {
                    queue!(self.out, style::SetAttribute(Attribute::Reverse))?;
                }
                if attrs.contains(AttrMask::DIM) {
                    queue!(self.out, style::SetAttribute(Attribute::Dim))?;
                }
                last_style = Some(cell.style);
            }
            write!(self.out, "{}", cell.ch)?;
        }
        queue!(self.out, style::SetAttribute(Attribute::Reset))?;
        self.out.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let _ = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn space_maps_to_named_key() {
        match to_msg(press(KeyCode::Char(' '), KeyModifiers::NONE)) {
            Some(Msg::KeyDown { key, .. }) => assert_eq!(key, Key::Space),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn ctrl_c_quits() {
        assert!(matches!(
            to_msg(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Msg::Quit)
        ));
    }

    #[test]
    fn releases_are_ignored() {
        let ev = Event::Key(KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(to_msg(ev).is_none());
    }

    #[test]
    fn resize_becomes_screen_msg() {
        assert!(matches!(
            to_msg(Event::Resize(100, 40)),
            Some(Msg::Screen {
                width: 100,
                height: 40
            })
        ));
    }
}
