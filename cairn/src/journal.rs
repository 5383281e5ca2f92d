//! Player-facing message journal shown in the HUD.

/// Style of a journal entry, mapped to a display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Good,
    Bad,
    Notable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub text: String,
    pub tone: Tone,
    /// First entry written during a new turn.
    pub tick: bool,
    pub dups: u32,
}

const MAX_ENTRIES: usize = 500;

/// The game's message journal.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Vec<Entry>,
    next_tick: bool,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next entry starts a new turn.
    pub fn new_turn(&mut self) {
        self.next_tick = true;
    }

    pub fn write(&mut self, text: &str, tone: Tone) {
        let text = uppercase_first(text);
        if let Some(last) = self.entries.last_mut() {
            if last.text == text && last.tone == tone && !self.next_tick {
                last.dups += 1;
                return;
            }
        }
        self.entries.push(Entry {
            text,
            tone,
            tick: self.next_tick,
            dups: 0,
        });
        self.next_tick = false;
        if self.entries.len() > MAX_ENTRIES {
            self.entries.drain(..MAX_ENTRIES / 5);
        }
    }

    pub fn log(&mut self, text: &str) {
        self.write(text, Tone::Normal);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The last `n` entries formatted for display, oldest first.
    pub fn recent(&self, n: usize) -> Vec<(String, Tone)> {
        let start = self.entries.len().saturating_sub(n);
        self.entries[start..]
            .iter()
            .map(|e| {
                let mut s = String::new();
                if e.tick {
                    s.push_str("• ");
                }
                s.push_str(&e.text);
                if e.dups > 0 {
                    s.push_str(&format!(" ({}×)", e.dups + 1));
                }
                (s, e.tone)
            })
            .collect()
    }
}

fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().to_string() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_messages_collapse() {
        let mut j = Journal::new();
        j.log("the trap springs");
        j.log("the trap springs");
        assert_eq!(j.entries().len(), 1);
        assert_eq!(j.recent(1)[0].0, "The trap springs (2×)");
    }

    #[test]
    fn new_turn_marks_next_entry() {
        let mut j = Journal::new();
        j.log("a");
        j.new_turn();
        j.log("a");
        j.log("b");
        let lines: Vec<_> = j.recent(10).into_iter().map(|(s, _)| s).collect();
        assert_eq!(lines, ["A", "• A", "B"]);
    }

    #[test]
    fn journal_is_bounded() {
        let mut j = Journal::new();
        for i in 0..(MAX_ENTRIES + 10) {
            j.log(&i.to_string());
        }
        assert!(j.entries().len() <= MAX_ENTRIES);
    }
}
