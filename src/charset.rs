//! Pattern character classes and bracket sets.

/// The error type used by [`CharSet`].
#[derive(Debug, Eq, thiserror::Error, PartialEq)]
pub enum Error {
    /// An invalid range was given.
    #[error("invalid range ({}-{})", .0.escape_debug(), .1.escape_debug())]
    Range(char, char),
    /// An invalid class letter was given.
    #[error("invalid class escape '\\{}'", .0.escape_debug())]
    Class(char),
}

/// A shorthand character class such as `\d` or `\w`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ClassKind {
    /// `\d`
    Digit,
    /// `\w`
    Word,
    /// `\s`
    Space,
    /// `\l`
    Lower,
    /// `\u`
    Upper,
    /// `\x`
    Hex,
    /// `\o`
    Octal,
    /// `\h`, a character that may start a word.
    WordHead,
    /// `\p`
    Punct,
    /// `\a`
    Alnum,
}

impl ClassKind {
    /// Resolves a class escape letter. Uppercase letters are the negated form,
    /// so `\D` yields `(Digit, true)`.
    #[must_use]
    pub fn from_letter(letter: char) -> Option<(Self, bool)> {
        let kind = match letter.to_ascii_lowercase() {
            'd' => ClassKind::Digit,
            'w' => ClassKind::Word,
            's' => ClassKind::Space,
            'l' => ClassKind::Lower,
            'u' => ClassKind::Upper,
            'x' => ClassKind::Hex,
            'o' => ClassKind::Octal,
            'h' => ClassKind::WordHead,
            'p' => ClassKind::Punct,
            'a' => ClassKind::Alnum,
            _ => return None,
        };
        Some((kind, letter.is_ascii_uppercase()))
    }

    /// The escape letter of the non-negated form.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            ClassKind::Digit => 'd',
            ClassKind::Word => 'w',
            ClassKind::Space => 's',
            ClassKind::Lower => 'l',
            ClassKind::Upper => 'u',
            ClassKind::Hex => 'x',
            ClassKind::Octal => 'o',
            ClassKind::WordHead => 'h',
            ClassKind::Punct => 'p',
            ClassKind::Alnum => 'a',
        }
    }

    /// Returns `true` if `c` belongs to the class. With `unicode`, the letter
    /// based classes use Unicode properties instead of ASCII ranges.
    #[must_use]
    pub fn contains(self, c: char, unicode: bool) -> bool {
        match self {
            ClassKind::Digit => c.is_ascii_digit(),
            ClassKind::Word if unicode => c.is_alphanumeric() || c == '_',
            ClassKind::Word => is_word_char(c),
            ClassKind::Space => matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0C' | '\x0B'),
            ClassKind::Lower if unicode => c.is_lowercase(),
            ClassKind::Lower => c.is_ascii_lowercase(),
            ClassKind::Upper if unicode => c.is_uppercase(),
            ClassKind::Upper => c.is_ascii_uppercase(),
            ClassKind::Hex => c.is_ascii_hexdigit(),
            ClassKind::Octal => matches!(c, '0'..='7'),
            ClassKind::WordHead => is_word_head(c),
            ClassKind::Punct => c.is_ascii_punctuation(),
            ClassKind::Alnum if unicode => c.is_alphanumeric(),
            ClassKind::Alnum => c.is_ascii_alphanumeric(),
        }
    }

    /// Tests `c` against the class or its complement. The complement only
    /// covers the active domain: ASCII, or every code point with `unicode`.
    #[inline]
    #[must_use]
    pub fn matches(self, c: char, negated: bool, unicode: bool) -> bool {
        in_domain(c, unicode) && self.contains(c, unicode) != negated
    }
}

/// One member of a bracket set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClassItem {
    /// An inclusive range. Single characters are stored as `c..=c`.
    Range(char, char),
    /// A shorthand class, possibly negated.
    Class(ClassKind, bool),
}

impl ClassItem {
    fn contains(&self, c: char, unicode: bool) -> bool {
        match *self {
            ClassItem::Range(start, end) => (start..=end).contains(&c),
            ClassItem::Class(kind, negated) => kind.matches(c, negated, unicode),
        }
    }
}

/// A bracket set such as `[a-z_]` or `[^\d]`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CharSet {
    items: Vec<ClassItem>,
    negated: bool,
}

impl CharSet {
    /// Creates a new empty character set.
    #[must_use]
    pub const fn new() -> Self {
        CharSet {
            items: Vec::new(),
            negated: false,
        }
    }

    /// Adds the given character to the set.
    #[inline]
    pub fn add_char(&mut self, c: char) {
        self.items.push(ClassItem::Range(c, c));
    }

    /// Adds an inclusive range of characters to the set.
    ///
    /// # Errors
    ///
    /// If the start of the range is after the end of the range, an [`Error`]
    /// is returned.
    pub fn add_range(&mut self, start: char, end: char) -> Result<(), Error> {
        if start <= end {
            self.items.push(ClassItem::Range(start, end));
            Ok(())
        } else {
            Err(Error::Range(start, end))
        }
    }

    /// Adds a shorthand class (e.g. `\d`, or `\D` for its complement) to the
    /// set.
    ///
    /// # Errors
    ///
    /// If the given `letter` is not a class letter, an [`Error`] is returned.
    pub fn add_class(&mut self, letter: char) -> Result<(), Error> {
        let (kind, negated) = ClassKind::from_letter(letter).ok_or(Error::Class(letter))?;
        self.items.push(ClassItem::Class(kind, negated));
        Ok(())
    }

    /// Inverts the character set.
    #[inline]
    pub fn invert(&mut self) {
        self.negated = !self.negated;
    }

    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    #[must_use]
    pub fn items(&self) -> &[ClassItem] {
        &self.items
    }

    /// Returns `true` if the set matches `c`. With `ignore_case`, a character
    /// is a member when any of its case variants is. A negated set only
    /// matches within the active domain.
    #[must_use]
    pub fn contains(&self, c: char, unicode: bool, ignore_case: bool) -> bool {
        if self.negated && !in_domain(c, unicode) {
            return false;
        }

        let hit = self.items.iter().any(|item| item.contains(c, unicode))
            || (ignore_case
                && case_variants(c)
                    .filter(|&v| v != c)
                    .any(|v| self.items.iter().any(|item| item.contains(v, unicode))));

        hit != self.negated
    }
}

/// The word character used by boundaries: `[a-zA-Z0-9_]`, unaffected by
/// flags.
#[inline]
#[must_use]
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A character that may start a word: `[a-zA-Z_]`.
#[inline]
#[must_use]
pub fn is_word_head(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Compares two characters, optionally ignoring case.
#[inline]
#[must_use]
pub fn chars_eq(a: char, b: char, ignore_case: bool) -> bool {
    a == b || (ignore_case && a.to_lowercase().eq(b.to_lowercase()))
}

#[inline]
fn in_domain(c: char, unicode: bool) -> bool {
    unicode || c.is_ascii()
}

fn case_variants(c: char) -> impl Iterator<Item = char> {
    c.to_lowercase().chain(c.to_uppercase())
}
