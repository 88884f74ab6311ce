//! Line reader for geometry files.
//!
//! Splits the text into cards: one per non-blank line, with comments
//! (from `#`, `*` or `!` to end of line) removed. The first word of a card
//! is its key, the remaining words its arguments.

/// Characters that start a comment.
const COMMENT: [char; 3] = ['#', '*', '!'];

/// One meaningful line of a geometry file.
#[derive(Debug, Clone, PartialEq)]
pub struct Card<'a> {
    /// Line number (1-indexed).
    pub line: usize,
    /// Line content without comment and surrounding whitespace.
    pub text: &'a str,
    /// First word.
    pub key: &'a str,
    /// Remaining words.
    pub args: Vec<&'a str>,
}

impl Card<'_> {
    /// Whether the key is `word`, ignoring case.
    pub fn is(&self, word: &str) -> bool {
        self.key.eq_ignore_ascii_case(word)
    }

    /// Key and arguments.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.key).chain(self.args.iter().copied())
    }

    /// Arguments joined by single spaces.
    pub fn rest(&self) -> String {
        self.args.join(" ")
    }
}

/// Split `text` into cards.
pub fn cards(text: &str) -> Vec<Card<'_>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let content = match raw.find(COMMENT) {
                Some(pos) => &raw[..pos],
                None => raw,
            };
            let text = content.trim();
            let mut words = text.split_whitespace();
            let key = words.next()?;
            Some(Card {
                line: i + 1,
                text,
                key,
                args: words.collect(),
            })
        })
        .collect()
}

/// Parse a numeric field. Fortran `D` exponents are accepted; infinities
/// and NaN are not.
pub fn number(token: &str) -> Option<f64> {
    let value = if token.contains(['d', 'D']) {
        token.replace(['d', 'D'], "e").parse::<f64>().ok()?
    } else {
        token.parse::<f64>().ok()?
    };
    value.is_finite().then_some(value)
}
