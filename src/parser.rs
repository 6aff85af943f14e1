use super::{
    Error, Result,
    ast::{Anchor, AstRoot, CaptureInfo, LookDirection, Node, Repetition},
    charset::{CharSet, ClassKind},
    flags::MatchOptions,
    lexer::{GroupKind, Lexer, PosToken, RepeatToken, Token},
};

/// Parses a pattern string into an AST.
///
/// # Errors
///
/// If the pattern string cannot be parsed, an [`Error`] is returned.
pub fn parse_pattern(pattern: &str, options: &MatchOptions) -> Result<AstRoot> {
    Parser::new(pattern, options).parse()
}

/// A backreference that could not be resolved when it was read.
enum Unresolved {
    Index { pos: usize, index: usize },
    Name { pos: usize, name: String },
}

/// Converts a pattern string into an AST.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    capture_count: usize,
    names: Vec<(String, usize)>,
    /// Groups whose closing parenthesis has not been read yet.
    open: Vec<usize>,
    unresolved: Option<Unresolved>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given `pattern`.
    #[must_use]
    pub fn new(pattern: &'a str, options: &MatchOptions) -> Self {
        Parser {
            lexer: Lexer::new(pattern, options),
            capture_count: 0,
            names: Vec::new(),
            open: Vec::new(),
            unresolved: None,
        }
    }

    /// Converts the pattern into an [`AstRoot`], consuming the parser.
    ///
    /// # Errors
    ///
    /// If the pattern string is invalid, an [`Error`] is returned.
    pub fn parse(mut self) -> Result<AstRoot> {
        let tree = self.parse_alternation()?;

        if let Some(PosToken { pos, .. }) = self.lexer.next_token()? {
            return Err(Error::UnmatchedParen { pos });
        }

        if let Some(unresolved) = self.unresolved.take() {
            return Err(self.reference_error(unresolved));
        }

        Ok(AstRoot::new(tree, self.capture_count, self.names))
    }

    /// Classifies a reference that was unresolvable when read, now that every
    /// group is known.
    fn reference_error(&self, unresolved: Unresolved) -> Error {
        match unresolved {
            Unresolved::Index { pos, index } if index == 0 || index > self.capture_count => {
                Error::UnknownGroup { pos, index }
            }
            Unresolved::Index { pos, index } => Error::ForwardReference { pos, index },
            Unresolved::Name { pos, name } => match self.group_index(&name) {
                Some(index) => Error::ForwardReference { pos, index },
                None => Error::UnknownGroupName { pos, name },
            },
        }
    }

    fn group_index(&self, name: &str) -> Option<usize> {
        self.names
            .iter()
            .find_map(|(n, index)| (n == name).then_some(*index))
    }

    fn parse_alternation(&mut self) -> Result<Node> {
        let mut branches = vec![self.parse_concat()?];

        while self.lexer.consume(&Token::Pipe)? {
            branches.push(self.parse_concat()?);
        }

        Ok(if branches.len() == 1 {
            branches.swap_remove(0)
        } else {
            Node::Alternation(branches)
        })
    }

    fn parse_concat(&mut self) -> Result<Node> {
        let mut items = Vec::new();

        while let Some(PosToken { token, .. }) = self.lexer.peek()?
            && !matches!(token, Token::Pipe | Token::RParen)
        {
            items.push(self.parse_quantified()?);
        }

        Ok(if items.len() == 1 {
            items.swap_remove(0)
        } else {
            Node::Concat(items)
        })
    }

    fn parse_quantified(&mut self) -> Result<Node> {
        let item = self.parse_atom()?;

        let Some(&PosToken {
            pos,
            token: Token::Repeat(RepeatToken { min, max, greedy }),
        }) = self.lexer.peek()?
        else {
            return Ok(item);
        };
        self.lexer.next_token()?;

        if matches!(item, Node::Anchor(_)) {
            return Err(Error::NothingToRepeat { pos });
        }
        if let Some(max) = max
            && min > max
        {
            return Err(Error::InvalidRepeat { pos, min, max });
        }
        if let Some(PosToken {
            pos,
            token: Token::Repeat(_),
        }) = self.lexer.peek()?
        {
            return Err(Error::NothingToRepeat { pos: *pos });
        }

        Ok(Node::Quantified {
            item: Box::new(item),
            repetition: Repetition::new(min, max, greedy),
        })
    }

    fn parse_atom(&mut self) -> Result<Node> {
        let Some(PosToken { pos, token }) = self.lexer.next_token()? else {
            return Err(Error::UnexpectedEnd {
                pos: self.lexer.tell(),
            });
        };

        match token {
            Token::Literal(c) | Token::Escaped(c) => Ok(Node::Literal(c)),
            Token::Any => Ok(Node::Any),
            Token::Class(c) => {
                let (kind, negated) = ClassKind::from_letter(c).ok_or(Error::InvalidEscape {
                    pos,
                    lit: c,
                })?;
                Ok(Node::Class(kind, negated))
            }
            Token::Caret => Ok(Node::Anchor(Anchor::StartOfLine)),
            Token::Dollar => Ok(Node::Anchor(Anchor::EndOfLine)),
            Token::Anchor(anchor) => Ok(Node::Anchor(anchor)),
            Token::LBracket { negated } => self.parse_set(pos, negated),
            Token::Open(kind) => self.parse_group(pos, kind),
            Token::Backref(index) => {
                if index == 0 || index > self.capture_count || self.open.contains(&index) {
                    self.defer(Unresolved::Index { pos, index });
                }
                Ok(Node::Backreference(index))
            }
            Token::NamedBackref(name) => match self
                .group_index(&name)
                .filter(|index| !self.open.contains(index))
            {
                Some(index) => Ok(Node::Backreference(index)),
                None => {
                    self.defer(Unresolved::Name { pos, name });
                    Ok(Node::Backreference(0))
                }
            },
            Token::Repeat(_) => Err(Error::NothingToRepeat { pos }),
            Token::RParen => Err(Error::UnmatchedParen { pos }),
            Token::Pipe => Err(Error::UnexpectedChar { pos, lit: '|' }),
            Token::RBracket => Err(Error::UnexpectedChar { pos, lit: ']' }),
            Token::Minus => Err(Error::UnexpectedChar { pos, lit: '-' }),
        }
    }

    /// Keeps the first unresolvable reference; it is reported once the whole
    /// pattern is parsed.
    fn defer(&mut self, unresolved: Unresolved) {
        self.unresolved.get_or_insert(unresolved);
    }

    fn parse_group(&mut self, pos: usize, kind: GroupKind) -> Result<Node> {
        // Group numbers follow the order of the opening parentheses.
        let capture = match &kind {
            GroupKind::Capture => {
                self.capture_count += 1;
                CaptureInfo::Indexed(self.capture_count)
            }
            GroupKind::Named(name) => {
                if self.group_index(name).is_some() {
                    return Err(Error::DuplicateGroupName {
                        pos,
                        name: name.clone(),
                    });
                }
                self.capture_count += 1;
                self.names.push((name.clone(), self.capture_count));
                CaptureInfo::Named(name.clone(), self.capture_count)
            }
            _ => CaptureInfo::NonCapturing,
        };

        if let Some(index) = capture.index() {
            self.open.push(index);
        }
        let inner = self.parse_alternation()?;
        if capture.index().is_some() {
            self.open.pop();
        }

        if !self.lexer.consume(&Token::RParen)? {
            return Err(Error::Unterminated { pos, what: "group" });
        }

        Ok(match kind {
            GroupKind::Capture | GroupKind::Named(_) | GroupKind::NonCapture => {
                group(inner, capture)
            }
            GroupKind::LookAhead => look(inner, LookDirection::Ahead, false),
            GroupKind::NegLookAhead => look(inner, LookDirection::Ahead, true),
            GroupKind::LookBehind => look(inner, LookDirection::Behind, false),
            GroupKind::NegLookBehind => look(inner, LookDirection::Behind, true),
        })
    }

    fn parse_set(&mut self, pos: usize, negated: bool) -> Result<Node> {
        let mut set = CharSet::new();

        loop {
            let Some(PosToken {
                pos: item_pos,
                token,
            }) = self.lexer.next_token()?
            else {
                return Err(Error::Unterminated {
                    pos,
                    what: "character class",
                });
            };

            let start = match token {
                Token::RBracket => break,
                Token::Class(c) => {
                    set.add_class(c)
                        .map_err(|err| Error::CharSet { pos: item_pos, err })?;
                    continue;
                }
                Token::Literal(c) | Token::Escaped(c) => c,
                Token::Minus => '-',
                _ => unreachable!("the lexer only yields set tokens inside a bracket class"),
            };

            if !self.lexer.consume(&Token::Minus)? {
                set.add_char(start);
                continue;
            }

            match self.lexer.peek()?.map(|token| token.token.clone()) {
                // [a-]
                Some(Token::RBracket) => {
                    set.add_char(start);
                    set.add_char('-');
                }
                // [a-z], [!--]
                Some(Token::Literal(end) | Token::Escaped(end)) => {
                    self.lexer.next_token()?;
                    set.add_range(start, end)
                        .map_err(|err| Error::CharSet { pos: item_pos, err })?;
                }
                Some(Token::Minus) => {
                    self.lexer.next_token()?;
                    set.add_range(start, '-')
                        .map_err(|err| Error::CharSet { pos: item_pos, err })?;
                }
                // [a-\d] keeps both as members
                Some(_) => {
                    set.add_char(start);
                    set.add_char('-');
                }
                None => {
                    return Err(Error::Unterminated {
                        pos,
                        what: "character class",
                    });
                }
            }
        }

        if negated {
            set.invert();
        }

        Ok(Node::Set(set))
    }
}

fn group(inner: Node, capture: CaptureInfo) -> Node {
    Node::Group {
        inner: Box::new(inner),
        capture,
    }
}

fn look(inner: Node, direction: LookDirection, negated: bool) -> Node {
    Node::Lookaround {
        inner: Box::new(inner),
        direction,
        negated,
    }
}
