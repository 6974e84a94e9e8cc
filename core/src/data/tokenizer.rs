//! Character tokenizer with reserved special tokens.
//!
//! Ids `0..4` are reserved; corpus characters follow from id 4 in sorted order.
//!
//! | id | token   |
//! |----|---------|
//! | 0  | `[PAD]` |
//! | 1  | `[UNK]` |
//! | 2  | `[BOS]` |
//! | 3  | `[EOS]` |

use log::warn;

use super::vocab::CharVocab;

pub const PAD_ID: usize = 0;
pub const UNK_ID: usize = 1;
pub const BOS_ID: usize = 2;
pub const EOS_ID: usize = 3;

pub const PAD_TOKEN: &str = "[PAD]";
pub const UNK_TOKEN: &str = "[UNK]";
pub const BOS_TOKEN: &str = "[BOS]";
pub const EOS_TOKEN: &str = "[EOS]";

const NUM_SPECIAL: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Tokenizer {
    vocab: CharVocab,
}

impl Tokenizer {
    pub fn new(text: &str) -> Self {
        Self {
            vocab: CharVocab::from_text(text),
        }
    }

    /// Total number of ids, special tokens included.
    pub fn vocab_size(&self) -> usize {
        NUM_SPECIAL + self.vocab.len()
    }

    pub fn token_to_id(&self, c: char) -> Option<usize> {
        self.vocab.id_of(c).map(|id| id + NUM_SPECIAL)
    }

    /// Text form of `id`: a special token name, a single character, or `None` if unknown.
    pub fn id_to_token(&self, id: usize) -> Option<String> {
        match id {
            PAD_ID => Some(PAD_TOKEN.to_string()),
            UNK_ID => Some(UNK_TOKEN.to_string()),
            BOS_ID => Some(BOS_TOKEN.to_string()),
            EOS_ID => Some(EOS_TOKEN.to_string()),
            _ => self.vocab.char_of(id - NUM_SPECIAL).map(String::from),
        }
    }

    /// Encodes `text` as `[BOS] chars… [EOS]`, then truncates or pads with `[PAD]`
    /// to exactly `max_len` ids.
    ///
    /// Truncation can cut off `[EOS]`. Unknown characters become `[UNK]`.
    ///
    /// ```rust
    /// use attn_rs::data::Tokenizer;
    ///
    /// let tok = Tokenizer::new("ab");
    /// assert_eq!(tok.encode("ba", 6), vec![2, 5, 4, 3, 0, 0]);
    /// ```
    pub fn encode(&self, text: &str, max_len: usize) -> Vec<usize> {
        let mut ids = Vec::with_capacity(max_len.max(text.len() + 2));
        ids.push(BOS_ID);
        for c in text.chars() {
            let id = self.token_to_id(c).unwrap_or_else(|| {
                warn!("unknown character {c:?}, substituting {UNK_TOKEN}");
                UNK_ID
            });
            ids.push(id);
        }
        ids.push(EOS_ID);

        ids.resize(max_len, PAD_ID);
        ids
    }

    /// Decodes `ids`, skipping `[BOS]` and `[PAD]` and stopping at the first `[EOS]`.
    ///
    /// Ids outside the vocabulary are rendered as `[UNK]`.
    pub fn decode(&self, ids: &[usize]) -> String {
        let mut out = String::new();
        for &id in ids {
            match id {
                BOS_ID | PAD_ID => continue,
                EOS_ID => break,
                _ => match self.id_to_token(id) {
                    Some(token) => out.push_str(&token),
                    None => out.push_str(UNK_TOKEN),
                },
            }
        }
        out
    }
}
