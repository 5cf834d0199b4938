/// Splits decoded text into `\n`-terminated lines, buffering the unfinished tail.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: String,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends text and returns every line it completed, without terminators.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        // The buffered tail holds no terminator, so only the new text is scanned.
        let mut cursor = self.pending.len();
        self.pending.push_str(text);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[cursor..].find('\n') {
            let end = cursor + offset;
            let line = &self.pending[start..end];
            lines.push(line.strip_suffix('\r').unwrap_or(line).to_string());
            start = end + 1;
            cursor = start;
        }
        self.pending.drain(..start);
        lines
    }

    /// Returns the unterminated tail left when the stream ends, if any.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        (!rest.is_empty()).then_some(rest)
    }
}
