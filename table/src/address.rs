//! Identifiers and classes of the elements in the table document.
//!
//! Individual elements are addressed as `<role>-<player>[-<card>]`; groups of
//! elements that are reset together share a class.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const POT_TEXT: &str = "pot-text";

pub mod class {
    pub const PLAYER_CARD_BACKGROUND: &str = "player-card-background";
    pub const PLAYER_CARD_TEXT: &str = "player-card-text";
    pub const COMMUNITY_CARD_BACKGROUND: &str = "community-card-background";
    pub const COMMUNITY_CARD_TEXT: &str = "community-card-text";
    pub const CHIPS_TEXT: &str = "chips-text";
    pub const STREET_COMMIT_TEXT: &str = "street-commit-text";
}

/// Whose cards a card element shows.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Owner {
    Player(usize),
    Community,
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Player(p) => write!(f, "{}", p),
            Owner::Community => f.write_str("community"),
        }
    }
}

/// The pair of ids making up one card on screen.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CardIds {
    pub background: String,
    pub text: String,
}

impl CardIds {
    pub fn new(owner: Owner, card: usize) -> Self {
        CardIds {
            background: format!("card-background-{}-{}", owner, card),
            text: format!("card-text-{}-{}", owner, card),
        }
    }
}

pub fn chips_text(player: usize) -> String {
    format!("chips-text-{}", player)
}

pub fn street_commit_text(player: usize) -> String {
    format!("street-commit-text-{}", player)
}

/// Which element of a seat carries the dealer highlight.
///
/// Some documents paint the button's background shape, others the button
/// element itself.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAddressing {
    Background,
    Direct,
}

impl Default for ButtonAddressing {
    fn default() -> Self {
        ButtonAddressing::Background
    }
}

impl ButtonAddressing {
    pub fn id(self, seat: usize) -> String {
        format!("{}-{}", self.class(), seat)
    }

    pub fn class(self) -> &'static str {
        match self {
            ButtonAddressing::Background => "button-background",
            ButtonAddressing::Direct => "button",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_ids_follow_role_player_card() {
        let ids = CardIds::new(Owner::Player(1), 0);
        assert_eq!(ids.background, "card-background-1-0");
        assert_eq!(ids.text, "card-text-1-0");
        let ids = CardIds::new(Owner::Community, 3);
        assert_eq!(ids.background, "card-background-community-3");
        assert_eq!(ids.text, "card-text-community-3");
    }

    #[test]
    fn button_ids_depend_on_addressing() {
        assert_eq!(ButtonAddressing::Background.id(2), "button-background-2");
        assert_eq!(ButtonAddressing::Direct.id(2), "button-2");
    }
}
