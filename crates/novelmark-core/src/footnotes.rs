use crate::token::InlineSeq;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
struct Definition {
    handle: String,
    body: InlineSeq,
}

/// Footnote definitions and the order in which they were first referenced.
#[derive(Clone, Debug, Default)]
pub struct FootnoteRegistry {
    definitions: HashMap<String, Definition>,
    used: Vec<String>,
}

fn scoped_key(handle: &str, key: &str) -> String {
    format!("{}:{}", handle, key)
}

impl FootnoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, handle: &str, key: &str, body: InlineSeq) {
        let scoped = scoped_key(handle, key);
        if self.definitions.contains_key(&scoped) {
            log::debug!("footnote {} redefined", scoped);
        }
        self.definitions.insert(
            scoped,
            Definition {
                handle: handle.to_string(),
                body,
            },
        );
    }

    /// Returns the 1-based index of a defined footnote, assigning the next
    /// free index on its first reference.
    pub fn reference(&mut self, handle: &str, key: &str) -> Option<usize> {
        let scoped = scoped_key(handle, key);
        if let Some(index) = self.index_of_scoped(&scoped) {
            return Some(index);
        }
        if !self.definitions.contains_key(&scoped) {
            log::debug!("footnote {} is referenced but never defined", scoped);
            return None;
        }
        self.used.push(scoped);
        Some(self.used.len())
    }

    /// Looks up an already referenced footnote without assigning a new index.
    pub fn index_of(&self, handle: &str, key: &str) -> Option<usize> {
        self.index_of_scoped(&scoped_key(handle, key))
    }

    fn index_of_scoped(&self, scoped: &str) -> Option<usize> {
        self.used
            .iter()
            .position(|used| used == scoped)
            .map(|pos| pos + 1)
    }

    pub fn has_references(&self) -> bool {
        !self.used.is_empty()
    }

    /// Referenced footnotes as `(index, handle, body)`, in index order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str, &InlineSeq)> + '_ {
        self.used.iter().enumerate().filter_map(|(pos, scoped)| {
            self.definitions
                .get(scoped)
                .map(|def| (pos + 1, def.handle.as_str(), &def.body))
        })
    }

    pub fn clear(&mut self) {
        self.definitions.clear();
        self.used.clear();
    }
}
