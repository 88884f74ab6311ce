//! Reformatting and tokenizing of zone expressions.
//!
//! A zone expression such as `+1 -2 OR +3` is first rewritten into a
//! compact, fully grouped form `(1-2)|(3)`:
//! - the whole expression is wrapped in one group;
//! - every union (`|` or the word `OR`) closes the current group and opens
//!   a new one, so unions bind weaker than `+` and `-`;
//! - user parentheses are doubled, which keeps a union inside a user group
//!   local to that group;
//! - a `+` opening a group is dropped, a `-` opening a group is an error;
//! - whitespace is removed.

use crate::CsgError;

/// A token of a reformatted zone expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Body name.
    Name(String),
    /// `+`.
    Intersect,
    /// `-`.
    Subtract,
    /// `|`.
    Union,
    /// `(`.
    Open,
    /// `)`.
    Close,
}

impl Token {
    fn from_operator(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Token::Intersect),
            '-' => Some(Token::Subtract),
            '|' => Some(Token::Union),
            '(' => Some(Token::Open),
            ')' => Some(Token::Close),
            _ => None,
        }
    }
}

fn is_operator(ch: char) -> bool {
    Token::from_operator(ch).is_some()
}

/// Whether `OR` at char index `i` stands alone as a word.
fn is_or_word(chars: &[char], i: usize) -> bool {
    if chars.get(i) != Some(&'O') || chars.get(i + 1) != Some(&'R') {
        return false;
    }
    let before = i == 0 || chars[i - 1].is_whitespace() || is_operator(chars[i - 1]);
    let after = match chars.get(i + 2) {
        None => true,
        Some(&c) => c.is_whitespace() || matches!(c, '+' | '-' | '('),
    };
    before && after
}

/// Rewrite a user expression into its grouped, whitespace-free form.
pub fn reformat(expr: &str) -> Result<String, CsgError> {
    let chars: Vec<char> = expr.chars().collect();
    let mut out = String::with_capacity(2 * chars.len() + 2);
    out.push('(');
    let mut group_start = true;
    let mut seen_term = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch.is_whitespace() {
            i += 1;
            continue;
        }
        let union_word = is_or_word(&chars, i);
        if ch == '|' || union_word {
            // A leading union has nothing to join.
            if seen_term {
                out.push_str(")|(");
                group_start = true;
            }
            i += if union_word { 2 } else { 1 };
            continue;
        }
        match ch {
            '(' => {
                out.push_str("((");
                group_start = true;
            }
            ')' => {
                out.push_str("))");
                group_start = false;
            }
            '+' if group_start => {}
            '-' if group_start => return Err(CsgError::LeadingDifference),
            _ => {
                out.push(ch);
                group_start = false;
            }
        }
        seen_term = true;
        i += 1;
    }

    out.push(')');
    Ok(out)
}

/// Split a reformatted expression into tokens. Each operator character is
/// one token; each maximal run of other characters is a name.
pub fn tokenize(formatted: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut name = String::new();
    for ch in formatted.chars() {
        match Token::from_operator(ch) {
            Some(op) => {
                if !name.is_empty() {
                    tokens.push(Token::Name(std::mem::take(&mut name)));
                }
                tokens.push(op);
            }
            None if ch.is_whitespace() => {
                if !name.is_empty() {
                    tokens.push(Token::Name(std::mem::take(&mut name)));
                }
            }
            None => name.push(ch),
        }
    }
    if !name.is_empty() {
        tokens.push(Token::Name(name));
    }
    tokens
}

/// Reverse the token order and swap every `(` with `)`.
///
/// The tree builder reads this reversed stream so that operators of equal
/// precedence fold left to right when their operands come off its stack.
pub fn reverse(mut tokens: Vec<Token>) -> Vec<Token> {
    tokens.reverse();
    for token in &mut tokens {
        *token = match token {
            Token::Open => Token::Close,
            Token::Close => Token::Open,
            _ => continue,
        };
    }
    tokens
}
