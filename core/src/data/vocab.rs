use log::warn;
use std::collections::{BTreeSet, HashMap};

/// Id written for characters missing from the vocabulary.
pub const UNKNOWN_ID: usize = 0;
/// Character written for ids missing from the vocabulary.
pub const UNKNOWN_CHAR: char = '?';

/// Character vocabulary built from a corpus.
///
/// Ids follow the sorted order of the distinct characters, so the same corpus
/// always yields the same mapping regardless of character order in the text.
#[derive(Debug, Clone, PartialEq)]
pub struct CharVocab {
    chars: Vec<char>,
    index: HashMap<char, usize>,
}

impl CharVocab {
    pub fn from_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect::<BTreeSet<_>>().into_iter().collect();
        let index = chars.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { chars, index }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The vocabulary in id order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn id_of(&self, c: char) -> Option<usize> {
        self.index.get(&c).copied()
    }

    pub fn char_of(&self, id: usize) -> Option<char> {
        self.chars.get(id).copied()
    }

    /// Maps each character to its id. Unknown characters become [`UNKNOWN_ID`].
    pub fn encode(&self, text: &str) -> Vec<usize> {
        text.chars()
            .map(|c| {
                self.id_of(c).unwrap_or_else(|| {
                    warn!("unknown character {c:?}, substituting id {UNKNOWN_ID}");
                    UNKNOWN_ID
                })
            })
            .collect()
    }

    /// Maps ids back to characters. Unknown ids become [`UNKNOWN_CHAR`].
    pub fn decode(&self, ids: &[usize]) -> String {
        ids.iter()
            .map(|&id| self.char_of(id).unwrap_or(UNKNOWN_CHAR))
            .collect()
    }
}
