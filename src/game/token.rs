//! Presented Tokens and Selection Tracking
//!
//! Tokens are the per-deal word instances the host presents as buttons.
//! They are rebuilt from scratch on every deal; only their IDs cross the
//! host boundary. Selection order is the player's answer.

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;

/// Unique token identifier (monotonic within a session).
///
/// IDs are never reused across deals, so a click on a button from a
/// previous deal can be detected and dropped rather than misapplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl TokenId {
    /// Create from a raw counter value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw counter value.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// A word instance presented to the player in the current deal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentedToken {
    /// Token identifier.
    pub id: TokenId,

    /// The word this token displays.
    pub word: String,

    /// Position in the selection, 1-based. 0 = unselected.
    pub selection_order: u32,
}

impl PresentedToken {
    /// True once the player has activated this token.
    #[inline]
    pub fn is_selected(&self) -> bool {
        self.selection_order != 0
    }
}

/// Activation bookkeeping for the current deal.
///
/// Holds the presented tokens in presentation order plus the selection
/// list in activation order. Re-activating a selected token re-queues it
/// at the back and renumbers the whole selection contiguously from 1, so
/// a player can revise their ordering without resetting.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SelectionTracker {
    tokens: Vec<PresentedToken>,
    selection: Vec<TokenId>,
}

impl SelectionTracker {
    /// Build a fresh tracker from already-shuffled words.
    ///
    /// Consumes IDs from the session's monotonic counter, one per word.
    pub fn deal(words: Vec<String>, next_token_id: &mut u32) -> Self {
        let tokens = words
            .into_iter()
            .map(|word| {
                let id = TokenId::new(*next_token_id);
                *next_token_id += 1;
                PresentedToken {
                    id,
                    word,
                    selection_order: 0,
                }
            })
            .collect();

        Self {
            tokens,
            selection: Vec::new(),
        }
    }

    /// Apply one activation.
    ///
    /// Unselected tokens append to the selection; already-selected tokens
    /// move to the back, after which every selected token is renumbered
    /// so orders run 1..=selected_count with no gaps. Returns false for
    /// an ID not present in this deal.
    pub fn activate(&mut self, id: TokenId) -> bool {
        let Some(pos) = self.tokens.iter().position(|t| t.id == id) else {
            return false;
        };

        if self.tokens[pos].selection_order == 0 {
            self.selection.push(id);
            self.tokens[pos].selection_order = self.selection.len() as u32;
        } else {
            self.selection.retain(|selected| *selected != id);
            self.selection.push(id);
            self.renumber();
        }
        true
    }

    fn renumber(&mut self) {
        for (position, id) in self.selection.iter().enumerate() {
            if let Some(token) = self.tokens.iter_mut().find(|t| t.id == *id) {
                token.selection_order = (position + 1) as u32;
            }
        }
    }

    /// Presented tokens, in presentation order.
    pub fn tokens(&self) -> &[PresentedToken] {
        &self.tokens
    }

    /// Number of presented tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Token IDs in activation order.
    pub fn selection(&self) -> &[TokenId] {
        &self.selection
    }

    /// Number of tokens selected so far.
    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// True once every presented token has been selected.
    pub fn is_complete(&self) -> bool {
        self.selection.len() == self.tokens.len()
    }

    /// Words in activation order, the player's assembled answer.
    pub fn selected_words(&self) -> Vec<&str> {
        self.selection
            .iter()
            .filter_map(|id| self.tokens.iter().find(|t| t.id == *id))
            .map(|token| token.word.as_str())
            .collect()
    }

    /// Hash tokens and selection for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.tokens.len() as u32);
        for token in &self.tokens {
            hasher.update_u32(token.id.raw());
            hasher.update_str(&token.word);
            hasher.update_u32(token.selection_order);
        }
        hasher.update_u32(self.selection.len() as u32);
        for id in &self.selection {
            hasher.update_u32(id.raw());
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
