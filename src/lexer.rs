use super::{Error, Result, ast::Anchor, charset::ClassKind, flags::MatchOptions};

pub mod token;

pub use token::{GroupKind, PosToken, RepeatToken, Token};

fn named_escape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'f' => Some('\x0C'),
        'v' => Some('\x0B'),
        '\\' => Some('\\'),
        _ => None,
    }
}

/// Converts a pattern string into [`Token`]s, one token of lookahead at a
/// time.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    verbose: bool,
    in_set: bool,
    set_start: bool,
    peeked: Option<PosToken>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str, options: &MatchOptions) -> Self {
        Lexer {
            input,
            pos: 0,
            verbose: options.verbose,
            in_set: false,
            set_start: false,
            peeked: None,
            failed: false,
        }
    }

    /// The offset of the next unconsumed token.
    #[must_use]
    pub fn tell(&self) -> usize {
        self.peeked.as_ref().map_or(self.pos, |token| token.pos)
    }

    /// Returns the next token without consuming it.
    pub fn peek(&mut self) -> Result<Option<&PosToken>> {
        if self.peeked.is_none() {
            self.peeked = self.lex()?;
        }
        Ok(self.peeked.as_ref())
    }

    /// Consumes and returns the next token.
    pub fn next_token(&mut self) -> Result<Option<PosToken>> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.lex(),
        }
    }

    /// Consumes the next token if it is `expected`.
    pub fn consume(&mut self, expected: &Token) -> Result<bool> {
        if self.peek()?.is_some_and(|token| token.token == *expected) {
            self.peeked = None;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char();
        if let Some(c) = c {
            self.pos += c.len_utf8();
        }
        c
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn lex(&mut self) -> Result<Option<PosToken>> {
        if self.in_set {
            return self.lex_in_set();
        }

        if self.verbose {
            self.skip_ignored();
        }

        let pos = self.pos;
        let Some(c) = self.advance() else {
            return Ok(None);
        };

        let token = match c {
            '(' => Token::Open(self.group_kind(pos)?),
            ')' => Token::RParen,
            '|' => Token::Pipe,
            '.' => Token::Any,
            '^' => Token::Caret,
            '$' => Token::Dollar,
            '*' => self.repeat(0, None),
            '+' => self.repeat(1, None),
            '?' => self.repeat(0, Some(1)),
            '{' => self.braces(pos)?,
            '[' => {
                let negated = self.eat('^');
                self.in_set = true;
                self.set_start = true;
                Token::LBracket { negated }
            }
            ']' | '}' => return Err(Error::UnexpectedChar { pos, lit: c }),
            '\\' => self.escape(pos)?,
            c => Token::Literal(c),
        };

        Ok(Some(PosToken { pos, token }))
    }

    fn lex_in_set(&mut self) -> Result<Option<PosToken>> {
        let pos = self.pos;
        let Some(c) = self.advance() else {
            return Ok(None);
        };
        let set_start = std::mem::replace(&mut self.set_start, false);

        let token = match c {
            ']' if !set_start => {
                self.in_set = false;
                Token::RBracket
            }
            '-' => Token::Minus,
            '\\' => {
                let Some(e) = self.advance() else {
                    return Err(Error::UnexpectedEnd { pos: self.pos });
                };
                if let Some(value) = named_escape(e) {
                    Token::Escaped(value)
                } else if ClassKind::from_letter(e).is_some() {
                    Token::Class(e)
                } else if e.is_ascii_alphabetic() {
                    return Err(Error::InvalidEscape { pos, lit: e });
                } else {
                    Token::Escaped(e)
                }
            }
            c => Token::Literal(c),
        };

        Ok(Some(PosToken { pos, token }))
    }

    /// Skips whitespace and `#` comments in verbose mode.
    fn skip_ignored(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '#' {
                while let Some(c) = self.advance() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn repeat(&mut self, min: usize, max: Option<usize>) -> Token {
        let greedy = !self.eat('?');
        Token::Repeat(RepeatToken { min, max, greedy })
    }

    /// Lexes the rest of `{n}`, `{n,}`, `{,m}` or `{n,m}`.
    fn braces(&mut self, pos: usize) -> Result<Token> {
        let min = self.number();
        let (min, max) = if self.eat(',') {
            (min.unwrap_or(0), self.number())
        } else {
            let Some(n) = min else {
                return Err(self.brace_error(pos));
            };
            (n, Some(n))
        };

        if !self.eat('}') {
            return Err(self.brace_error(pos));
        }

        Ok(self.repeat(min, max))
    }

    fn brace_error(&self, pos: usize) -> Error {
        if self.peek_char().is_none() {
            Error::Unterminated {
                pos,
                what: "repetition",
            }
        } else {
            Error::MalformedRepeat { pos }
        }
    }

    fn number(&mut self) -> Option<usize> {
        let mut value: Option<usize> = None;
        while let Some(digit) = self.peek_char().and_then(|c| c.to_digit(10)) {
            self.advance();
            value = Some(
                value
                    .unwrap_or(0)
                    .saturating_mul(10)
                    .saturating_add(digit as usize),
            );
        }
        value
    }

    /// Lexes what follows `(`.
    fn group_kind(&mut self, pos: usize) -> Result<GroupKind> {
        if !self.eat('?') {
            return Ok(GroupKind::Capture);
        }

        match self.advance() {
            Some(':') => Ok(GroupKind::NonCapture),
            Some('>') => match self.advance() {
                Some('=') => Ok(GroupKind::LookAhead),
                Some('!') => Ok(GroupKind::NegLookAhead),
                _ => Err(Error::InvalidGroup { pos }),
            },
            Some('<') => {
                if self.eat('=') {
                    Ok(GroupKind::LookBehind)
                } else if self.eat('!') {
                    Ok(GroupKind::NegLookBehind)
                } else {
                    Ok(GroupKind::Named(self.name(pos)?))
                }
            }
            _ => Err(Error::InvalidGroup { pos }),
        }
    }

    /// Lexes `name>` after a `<`.
    fn name(&mut self, pos: usize) -> Result<String> {
        let start = self.pos;
        while self
            .peek_char()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }
        let name = &self.input[start..self.pos];

        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) || !self.eat('>') {
            return Err(Error::InvalidGroupName { pos });
        }

        Ok(name.to_owned())
    }

    fn escape(&mut self, pos: usize) -> Result<Token> {
        let Some(c) = self.advance() else {
            return Err(Error::UnexpectedEnd { pos: self.pos });
        };

        if let Some(value) = named_escape(c) {
            return Ok(Token::Escaped(value));
        }

        Ok(match c {
            'b' => Token::Anchor(Anchor::WordBoundary),
            'B' => Token::Anchor(Anchor::NonWordBoundary),
            '<' => Token::Anchor(Anchor::WordStart),
            '>' => Token::Anchor(Anchor::WordEnd),
            'z' => match self.advance() {
                Some('s') => Token::Anchor(Anchor::MatchStart),
                Some('e') => Token::Anchor(Anchor::MatchEnd),
                _ => return Err(Error::InvalidEscape { pos, lit: 'z' }),
            },
            '%' => Token::Anchor(self.position_anchor(pos)?),
            'k' => {
                if !self.eat('<') {
                    return Err(Error::InvalidEscape { pos, lit: 'k' });
                }
                Token::NamedBackref(self.name(pos)?)
            }
            '0'..='9' => {
                let mut index = c as usize - '0' as usize;
                while let Some(digit) = self.peek_char().and_then(|c| c.to_digit(10)) {
                    self.advance();
                    index = index.saturating_mul(10).saturating_add(digit as usize);
                }
                Token::Backref(index)
            }
            c if ClassKind::from_letter(c).is_some() => Token::Class(c),
            c if c.is_ascii_alphabetic() => return Err(Error::InvalidEscape { pos, lit: c }),
            c => Token::Escaped(c),
        })
    }

    /// Lexes what follows `\%`.
    fn position_anchor(&mut self, pos: usize) -> Result<Anchor> {
        if self.eat('^') {
            return Ok(Anchor::StartOfInput);
        }
        if self.eat('$') {
            return Ok(Anchor::EndOfInput);
        }
        if self.eat('#') {
            return Ok(Anchor::AtCursor);
        }

        let Some(n) = self.number() else {
            return Err(Error::InvalidEscape { pos, lit: '%' });
        };
        match self.advance() {
            Some('l') => Ok(Anchor::AtLine(n)),
            Some('c') => Ok(Anchor::AtColumn(n)),
            _ => Err(Error::InvalidEscape { pos, lit: '%' }),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<PosToken>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
