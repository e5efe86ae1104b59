/// Forward-only cursor over the trimmed lines of a linearized document.
///
/// Continuation rows are consumed through [`LineCursor::consume_while`] so
/// the main loop never sees them again.
#[derive(Debug)]
pub(crate) struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().map(str::trim).collect(),
            pos: 0,
        }
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    /// Number of lines consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Consume lines for as long as `matcher` accepts them.
    pub fn consume_while<T>(&mut self, matcher: impl Fn(&str) -> Option<T>) -> Vec<T> {
        let mut taken = Vec::new();
        while let Some(value) = self.peek().and_then(&matcher) {
            taken.push(value);
            self.pos += 1;
        }
        taken
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }
}
