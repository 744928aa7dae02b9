// ABOUTME: Hand-written lexer turning source text into a token stream with positions

use crate::error::LexError;
use crate::token::{Position, Token, TokenKind};

/// Characters that always form their own token (plus the two-char `$@`,
/// which is recognized before `$`).
const SPECIAL_CHARS: [char; 9] = ['(', ')', '[', ']', '{', '}', ':', '$', '\''];

/// Lex a complete source text. Whitespace and comments are consumed but not
/// emitted. Only unterminated strings and unclosed block comments are fatal;
/// every other irregularity is left for the parser to report.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
    indent: usize,
    tokens: Vec<Token>,
}

fn is_ident_char(c: char) -> bool {
    !c.is_whitespace() && !SPECIAL_CHARS.contains(&c)
}

impl Lexer {
    fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            index: 0,
            line: 0,
            column: 0,
            indent: 0,
            tokens: Vec::new(),
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column, self.indent)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    /// Consume one character, tracking line, column, and indent. The indent
    /// counter advances on tabs instead of the column and resets per line.
    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.index).copied()?;
        self.index += 1;
        match c {
            '\n' => {
                self.line += 1;
                self.column = 0;
                self.indent = 0;
            }
            '\t' => self.indent += 1,
            _ => self.column += 1,
        }
        Some(c)
    }

    fn push_punct(&mut self, kind: TokenKind, pos: Position) {
        self.tokens.push(Token::punct(kind, pos));
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(next) = self.peek() {
            let pos = self.position();

            if next.is_whitespace() {
                self.advance();
                continue;
            }

            match next {
                '(' => {
                    self.advance();
                    self.push_punct(TokenKind::OpenParen, pos);
                }
                ')' => {
                    self.advance();
                    self.push_punct(TokenKind::CloseParen, pos);
                }
                '[' => {
                    self.advance();
                    self.push_punct(TokenKind::OpenBracket, pos);
                }
                ']' => {
                    self.advance();
                    self.push_punct(TokenKind::CloseBracket, pos);
                }
                '{' => {
                    self.advance();
                    self.push_punct(TokenKind::OpenCurly, pos);
                }
                '}' => {
                    self.advance();
                    self.push_punct(TokenKind::CloseCurly, pos);
                }
                ':' => {
                    self.advance();
                    self.push_punct(TokenKind::Colon, pos);
                }
                '\'' => {
                    self.advance();
                    self.push_punct(TokenKind::QuoteMark, pos);
                }
                '$' => {
                    // $@ must win over $
                    self.advance();
                    if self.peek() == Some('@') {
                        self.advance();
                        self.push_punct(TokenKind::DollarAt, pos);
                    } else {
                        self.push_punct(TokenKind::Dollar, pos);
                    }
                }
                ';' => self.line_comment(),
                '|' if self.peek_at(1) == Some('{') => self.block_comment(pos)?,
                '#' => self.reader_discard(),
                '"' => self.string_literal(pos)?,
                _ => self.word(pos),
            }
        }

        Ok(self.tokens)
    }

    /// `;` comments run to the end of the line.
    fn line_comment(&mut self) {
        while let Some(c) = self.advance() {
            if c == '\n' {
                break;
            }
        }
    }

    /// `|{ ... }|` comments nest; reaching end of input inside one is fatal.
    fn block_comment(&mut self, start: Position) -> Result<(), LexError> {
        self.advance();
        self.advance();
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek() {
                Some('}') if self.peek_at(1) == Some('|') => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                }
                Some('|') if self.peek_at(1) == Some('{') => {
                    self.advance();
                    self.advance();
                    depth += 1;
                }
                Some(_) => {
                    self.advance();
                }
                None => return Err(LexError::UnclosedComment(start)),
            }
        }
        Ok(())
    }

    /// `#` swallows the identifier run that follows it, so generated symbols
    /// can never be read back from source text.
    fn reader_discard(&mut self) {
        self.advance();
        while self.peek().is_some_and(is_ident_char) {
            self.advance();
        }
    }

    /// A string runs to the next `"` not preceded by a backslash. The
    /// delimiters are excluded; escape sequences are kept verbatim.
    fn string_literal(&mut self, start: Position) -> Result<(), LexError> {
        self.advance();
        let mut contents = String::new();
        let mut prev = '"';
        loop {
            match self.advance() {
                Some('"') if prev != '\\' => break,
                Some(c) => {
                    contents.push(c);
                    prev = c;
                }
                None => return Err(LexError::UnterminatedString(start)),
            }
        }
        self.tokens
            .push(Token::with_text(TokenKind::Str, contents, start));
        Ok(())
    }

    /// Read a run of identifier characters and classify it as a number or
    /// an identifier token.
    fn word(&mut self, start: Position) {
        let mut run = String::new();
        while self.peek().is_some_and(is_ident_char) {
            if let Some(c) = self.advance() {
                run.push(c);
            }
        }

        let kind = if is_number_run(&run) {
            TokenKind::Number
        } else {
            TokenKind::Ident
        };
        self.tokens.push(Token::with_text(kind, run, start));
    }
}

/// A run is a number when it begins with a digit, or begins with `+`, `-`,
/// or `.` and the remainder forms a valid numeric body: at most one decimal
/// point, at most one `e` (not in second or final position), a trailing
/// `i`/`I` only at the very end, and a single `/` between digit runs for
/// ratio literals. Digit-led runs are always number tokens; their deeper
/// validity is checked by the numeric literal parser, which reports
/// malformed literals as parse errors.
fn is_number_run(run: &str) -> bool {
    let chars: Vec<char> = run.chars().collect();
    let Some(&first) = chars.first() else {
        return false;
    };

    if first.is_ascii_digit() {
        return true;
    }
    if !matches!(first, '+' | '-' | '.') || chars.len() < 2 {
        return false;
    }

    let mut seen_e = false;
    let mut seen_dot = first == '.';
    let mut seen_slash = false;
    for (i, &c) in chars.iter().enumerate().skip(1) {
        match c {
            'e' => {
                if i == 1 || i == chars.len() - 1 || seen_e {
                    return false;
                }
                seen_e = true;
            }
            '.' => {
                if seen_dot || seen_e {
                    return false;
                }
                seen_dot = true;
            }
            'i' | 'I' => {
                if i != chars.len() - 1 {
                    return false;
                }
            }
            '/' => {
                if seen_slash || seen_e || seen_dot || i == 1 || i == chars.len() - 1 {
                    return false;
                }
                seen_slash = true;
            }
            '+' | '-' => {
                if chars[i - 1] != 'e' {
                    return false;
                }
            }
            c if c.is_ascii_digit() => {}
            _ => return false,
        }
    }

    true
}
