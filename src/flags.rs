//! Flag string processing.

use super::{Error, Result};

/// How the case of letters is treated, as requested by the flag string.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaseMode {
    /// Case-insensitive unless the pattern contains an uppercase letter.
    #[default]
    Smart,
    /// `i`
    Insensitive,
    /// `c`
    Sensitive,
}

/// The immutable option record derived from a flag string and its pattern.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchOptions {
    /// The requested case mode.
    pub case_mode: CaseMode,
    /// The case mode resolved against the pattern.
    pub ignore_case: bool,
    /// `m`: `^` and `$` match at line breaks.
    pub multiline: bool,
    /// `s`: `.` matches `\n`.
    pub dotall: bool,
    /// `x`: whitespace and `#` comments in the pattern are ignored.
    pub verbose: bool,
    /// `u`: classes use Unicode properties.
    pub unicode: bool,
    /// `g`: every occurrence is wanted, not only the first.
    pub global: bool,
}

impl MatchOptions {
    /// Derives the options for `pattern` from the `flags` string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFlag`] for any character that is not one of
    /// `i c m s x u g`.
    pub fn from_flags(flags: &str, pattern: &str) -> Result<Self> {
        let mut options = MatchOptions {
            case_mode: CaseMode::Smart,
            ignore_case: false,
            multiline: false,
            dotall: false,
            verbose: false,
            unicode: false,
            global: false,
        };

        for flag in flags.chars() {
            match flag {
                'i' => options.case_mode = CaseMode::Insensitive,
                'c' => options.case_mode = CaseMode::Sensitive,
                'm' => options.multiline = true,
                's' => options.dotall = true,
                'x' => options.verbose = true,
                'u' => options.unicode = true,
                'g' => options.global = true,
                _ => return Err(Error::InvalidFlag(flag)),
            }
        }

        options.ignore_case = match options.case_mode {
            CaseMode::Smart => !has_uppercase_literal(pattern, options.verbose),
            CaseMode::Insensitive => true,
            CaseMode::Sensitive => false,
        };

        Ok(options)
    }
}

/// Derives [`MatchOptions`] for `pattern` from `flags`.
///
/// # Errors
///
/// See [`MatchOptions::from_flags`].
pub fn parse_flags(flags: &str, pattern: &str) -> Result<MatchOptions> {
    MatchOptions::from_flags(flags, pattern)
}

/// Splits a `pattern/flags` string at its last `/`.
///
/// # Errors
///
/// Returns [`Error::MissingDelimiter`] if the input contains no `/`.
pub fn split_delimited(input: &str) -> Result<(&str, &str)> {
    let slash = input.rfind('/').ok_or(Error::MissingDelimiter)?;
    Ok((&input[..slash], &input[slash + 1..]))
}

/// Returns `true` if a letter of the pattern text itself is uppercase.
/// Escape letters (`\S`, `\W`, ...), group names and, in verbose mode,
/// `#` comments are not pattern text.
fn has_uppercase_literal(pattern: &str, verbose: bool) -> bool {
    let chars: Vec<char> = pattern.chars().collect();
    let mut in_set = false;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                i += 2;
                if !in_set && chars.get(i - 1) == Some(&'k') && chars.get(i) == Some(&'<') {
                    i = skip_name(&chars, i);
                }
            }
            '[' if !in_set => {
                in_set = true;
                i += 1;
                if chars.get(i) == Some(&'^') {
                    i += 1;
                }
                // a leading `]` is a member
                if chars.get(i) == Some(&']') {
                    i += 1;
                }
            }
            ']' if in_set => {
                in_set = false;
                i += 1;
            }
            '#' if verbose && !in_set => {
                i = chars[i..]
                    .iter()
                    .position(|&c| c == '\n')
                    .map_or(chars.len(), |newline| i + newline + 1);
            }
            '(' if !in_set
                && chars.get(i + 1) == Some(&'?')
                && chars.get(i + 2) == Some(&'<')
                && !matches!(chars.get(i + 3), Some('=' | '!')) =>
            {
                i = skip_name(&chars, i + 2);
            }
            c if c.is_uppercase() => return true,
            _ => i += 1,
        }
    }
    false
}

/// Skips from the `<` of a `<name>` to just after its `>`.
fn skip_name(chars: &[char], open: usize) -> usize {
    chars[open..]
        .iter()
        .position(|&c| c == '>')
        .map_or(chars.len(), |close| open + close + 1)
}
