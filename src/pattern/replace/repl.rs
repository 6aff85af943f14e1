use super::super::MatchResult;

/// The replacement for each match of a substitution.
pub enum Repl<'a> {
    /// A template. `\0` is the matched text, `\1` to `\9` are groups and `\\`
    /// is a backslash. Groups that did not participate expand to nothing.
    Template(&'a str),
    /// Computes the replacement from the match and the searched text.
    Function(Box<dyn Fn(&MatchResult, &str) -> String + 'a>),
}

impl<'a> Repl<'a> {
    /// Wraps a closure as a [`Repl::Function`].
    pub fn function(f: impl Fn(&MatchResult, &str) -> String + 'a) -> Self {
        Repl::Function(Box::new(f))
    }

    /// Produces the replacement text for `found` within `text`.
    #[must_use]
    pub fn expand(&self, found: &MatchResult, text: &str) -> String {
        match self {
            Repl::Template(template) => expand_template(template, found, text),
            Repl::Function(f) => f(found, text),
        }
    }
}

impl std::fmt::Debug for Repl<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Repl::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Repl::Function(_) => f.write_str("Function(..)"),
        }
    }
}

enum ReplToken<'a> {
    Literal(&'a str),
    Group(usize),
}

fn expand_template(template: &str, found: &MatchResult, text: &str) -> String {
    let mut result = String::with_capacity(template.len());

    for token in tokenize_template(template) {
        match token {
            ReplToken::Literal(lit) => result.push_str(lit),
            ReplToken::Group(index) => {
                if let Some(group) = found.group_str(text, index) {
                    result.push_str(group);
                }
            }
        }
    }

    result
}

fn tokenize_template(template: &str) -> Vec<ReplToken<'_>> {
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut chars = template.char_indices().peekable();

    while let Some((at, c)) = chars.next() {
        if c != '\\' {
            continue;
        }

        let token = match chars.peek() {
            Some(&(_, digit @ '0'..='9')) => ReplToken::Group(digit as usize - '0' as usize),
            Some(&(next, '\\')) => ReplToken::Literal(&template[next..=next]),
            // A lone backslash stays as written.
            _ => continue,
        };
        chars.next();

        if literal_start < at {
            tokens.push(ReplToken::Literal(&template[literal_start..at]));
        }
        tokens.push(token);
        literal_start = at + 2;
    }

    if literal_start < template.len() {
        tokens.push(ReplToken::Literal(&template[literal_start..]));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literals(template: &str) -> Vec<String> {
        tokenize_template(template)
            .into_iter()
            .map(|token| match token {
                ReplToken::Literal(lit) => lit.to_owned(),
                ReplToken::Group(index) => format!("<{index}>"),
            })
            .collect()
    }

    #[test]
    fn tokenize() {
        assert_eq!(literals(r"a\1b"), ["a", "<1>", "b"]);
        assert_eq!(literals(r"\\1"), [r"\", "1"]);
        assert_eq!(literals(r"x\q\"), [r"x\q\"]);
        assert_eq!(literals(r"\0\9"), ["<0>", "<9>"]);
        assert!(literals("").is_empty());
    }
}
