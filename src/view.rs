use std::io::{ self, Stdout, Write };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BubbleKind {
    User,
    Ai,
}

/// Rendering sink for a conversation. Implementations only draw; they never
/// touch history.
pub trait ChatView: Send {
    fn clear(&mut self);
    fn append_bubble(&mut self, content: &str, kind: BubbleKind);
    fn show_typing(&mut self);
    fn remove_typing(&mut self);
    fn show_last_question(&mut self, question: &str);
}

pub struct TerminalView<W: Write + Send = Stdout> {
    out: W,
    typing: bool,
}

impl TerminalView<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out, typing: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ChatView for TerminalView<W> {
    fn clear(&mut self) {
        let _ = writeln!(self.out, "----------------------------------------");
    }

    fn append_bubble(&mut self, content: &str, kind: BubbleKind) {
        let label = match kind {
            BubbleKind::User => "you",
            BubbleKind::Ai => "assistant",
        };
        let _ = writeln!(self.out, "[{}] {}", label, content);
        let _ = self.out.flush();
    }

    fn show_typing(&mut self) {
        if !self.typing {
            self.typing = true;
            let _ = write!(self.out, "...");
            let _ = self.out.flush();
        }
    }

    fn remove_typing(&mut self) {
        if self.typing {
            self.typing = false;
            let _ = write!(self.out, "\r\x1b[K");
        }
    }

    fn show_last_question(&mut self, question: &str) {
        let _ = writeln!(self.out, "You asked: {}", question);
    }
}
