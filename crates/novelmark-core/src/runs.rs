use crate::token::Token;

/// Position of a keyword or tag line inside a block of adjacent meta lines.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetaRun {
    Single,
    First,
    Middle,
    Last,
}

impl MetaRun {
    fn new(before: bool, after: bool) -> Self {
        match (before, after) {
            (false, false) => Self::Single,
            (false, true) => Self::First,
            (true, true) => Self::Middle,
            (true, false) => Self::Last,
        }
    }

    pub fn continues_after(self) -> bool {
        matches!(self, Self::First | Self::Middle)
    }

    pub fn continues_before(self) -> bool {
        matches!(self, Self::Middle | Self::Last)
    }
}

/// Classifies every token once; non-meta tokens get `None`.
pub fn classify(tokens: &[Token]) -> Vec<Option<MetaRun>> {
    tokens
        .iter()
        .enumerate()
        .map(|(idx, token)| {
            if !token.is_meta() {
                return None;
            }
            let before = idx > 0 && tokens[idx - 1].is_meta();
            let after = tokens.get(idx + 1).is_some_and(Token::is_meta);
            Some(MetaRun::new(before, after))
        })
        .collect()
}
