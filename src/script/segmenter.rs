//! Statement segmentation for multi-statement SQL scripts.
//!
//! Splits a script on top-level semicolons only: semicolons inside
//! single-quoted string literals or comments never terminate a statement.
//! Comment text (`--` to end of line, `/* */` including newlines) is
//! stripped from the output.

/// Lexical mode of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexMode {
    /// Top-level SQL text.
    Normal,
    /// Inside a single-quoted string literal.
    InString,
    /// Inside a `--` comment, closed by the next newline.
    InLineComment,
    /// Inside a `/* */` comment, closed by the next `*/` (no nesting).
    InBlockComment,
}

/// Single-pass scanner over an immutable script.
///
/// The input is never modified; statement text is built through the
/// `current` accumulator and flushed at each top-level semicolon.
struct Segmenter {
    chars: Vec<char>,
    pos: usize,
    mode: LexMode,
    current: String,
    statements: Vec<String>,
}

impl Segmenter {
    fn new(script: &str) -> Self {
        Self {
            chars: script.chars().collect(),
            pos: 0,
            mode: LexMode::Normal,
            current: String::new(),
            statements: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<String> {
        while self.pos < self.chars.len() {
            self.step();
        }
        // An unterminated comment has consumed everything after its opener;
        // whatever accumulated before it still counts as a final statement.
        self.flush();
        self.statements
    }

    fn step(&mut self) {
        let c = self.chars[self.pos];
        let next = self.chars.get(self.pos + 1).copied();

        match self.mode {
            LexMode::Normal => match c {
                ';' => {
                    self.flush();
                    self.pos += 1;
                }
                '\'' => {
                    // An escaped quote stays ordinary text; the escape
                    // character itself was already emitted and is retained.
                    if !self.escaped() {
                        self.mode = LexMode::InString;
                    }
                    self.current.push(c);
                    self.pos += 1;
                }
                '-' if next == Some('-') => {
                    self.mode = LexMode::InLineComment;
                    self.pos += 2;
                }
                '/' if next == Some('*') => {
                    self.mode = LexMode::InBlockComment;
                    self.pos += 2;
                }
                _ => {
                    self.current.push(c);
                    self.pos += 1;
                }
            },
            LexMode::InString => {
                self.current.push(c);
                if c == '\'' && !self.escaped() {
                    self.mode = LexMode::Normal;
                }
                self.pos += 1;
            }
            LexMode::InLineComment => {
                // The newline closes the comment and survives as ordinary
                // whitespace in the statement text.
                if c == '\n' {
                    self.mode = LexMode::Normal;
                    self.current.push('\n');
                }
                self.pos += 1;
            }
            LexMode::InBlockComment => {
                if c == '*' && next == Some('/') {
                    self.mode = LexMode::Normal;
                    self.pos += 2;
                } else {
                    self.pos += 1;
                }
            }
        }
    }

    /// True when the character at `pos` is immediately preceded by `\`.
    fn escaped(&self) -> bool {
        self.pos > 0 && self.chars[self.pos - 1] == '\\'
    }

    fn flush(&mut self) {
        let statement = self.current.trim();
        if !statement.is_empty() {
            self.statements.push(statement.to_string());
        }
        self.current.clear();
    }
}

/// Splits a SQL script into trimmed, comment-free statements.
///
/// Statement order matches source order. Whitespace-only segments are
/// discarded. Never fails: malformed input (e.g. an unterminated block
/// comment) yields a best-effort segmentation.
pub fn split_statements(script: &str) -> Vec<String> {
    Segmenter::new(script).run()
}
