use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A two-character card token: a rank character followed by a suit.
///
/// Nothing about the token is validated up front. The rank is displayed as
/// given (except `T`, which reads "10"), and a suit that isn't recognized
/// simply yields no styling.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CardCode(pub String);

impl CardCode {
    pub fn rank(&self) -> Option<char> {
        self.0.chars().next()
    }

    /// The text shown on the card face.
    pub fn rank_text(&self) -> Cow<'_, str> {
        match self.rank() {
            Some('T') => Cow::Borrowed("10"),
            Some(c) => Cow::Owned(c.to_string()),
            None => Cow::Borrowed(""),
        }
    }

    pub fn suit(&self) -> Option<Suit> {
        self.0.chars().nth(1).and_then(Suit::from_char)
    }
}

impl From<&str> for CardCode {
    fn from(s: &str) -> Self {
        CardCode(s.into())
    }
}

impl fmt::Display for CardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Heart,
    Diamond,
}

impl Suit {
    /// Accepts the pretty glyphs as well as the plain letters, in either case.
    pub fn from_char(c: char) -> Option<Suit> {
        use Suit::*;
        match c {
            '♣' | 'c' | 'C' => Some(Club),
            '♠' | 's' | 'S' => Some(Spade),
            '♥' | 'h' | 'H' => Some(Heart),
            '♦' | 'd' | 'D' => Some(Diamond),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        use Suit::*;
        match self {
            Club => "club",
            Spade => "spade",
            Heart => "heart",
            Diamond => "diamond",
        }
    }
}

/// One complete table state, as pushed by the server.
///
/// Every field may be missing on the wire. A snapshot without `hole_cards`
/// stands for "no hand in progress" and renders as a cleared table.
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(from = "SnapshotFields", into = "SnapshotFields")]
pub struct Snapshot {
    pub hole_cards: Option<Vec<Vec<CardCode>>>,
    /// Slot 0 is reserved and never painted.
    pub community_cards: Vec<CardCode>,
    pub button: Option<usize>,
    pub pot: u64,
    pub street_commits: Option<Vec<u64>>,
    pub stacks: Option<Vec<u64>>,
}

// The wire layout. Older producers name the button seat `dealer`; when both
// keys are sent, `button` wins.
#[derive(Deserialize, Serialize)]
struct SnapshotFields {
    #[serde(default)]
    hole_cards: Option<Vec<Vec<CardCode>>>,
    #[serde(default)]
    community_cards: Vec<CardCode>,
    #[serde(default)]
    button: Option<usize>,
    #[serde(default)]
    dealer: Option<usize>,
    #[serde(default)]
    pot: u64,
    #[serde(default)]
    street_commits: Option<Vec<u64>>,
    #[serde(default)]
    stacks: Option<Vec<u64>>,
}

impl From<SnapshotFields> for Snapshot {
    fn from(f: SnapshotFields) -> Self {
        Snapshot {
            hole_cards: f.hole_cards,
            community_cards: f.community_cards,
            button: f.button.or(f.dealer),
            pot: f.pot,
            street_commits: f.street_commits,
            stacks: f.stacks,
        }
    }
}

impl From<Snapshot> for SnapshotFields {
    fn from(s: Snapshot) -> Self {
        SnapshotFields {
            hole_cards: s.hole_cards,
            community_cards: s.community_cards,
            button: s.button,
            dealer: None,
            pot: s.pot,
            street_commits: s.street_commits,
            stacks: s.stacks,
        }
    }
}

impl Snapshot {
    /// The hand data, if this snapshot carries any.
    pub fn hand(&self) -> Option<Hand<'_>> {
        let hole_cards = self.hole_cards.as_deref()?;
        Some(Hand {
            hole_cards,
            community_cards: &self.community_cards,
            button: self.button,
            pot: self.pot,
            street_commits: self.street_commits.as_deref(),
            stacks: self.stacks.as_deref(),
        })
    }
}

/// A borrowed view of a snapshot known to carry hand data.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Hand<'a> {
    pub hole_cards: &'a [Vec<CardCode>],
    pub community_cards: &'a [CardCode],
    pub button: Option<usize>,
    pub pot: u64,
    pub street_commits: Option<&'a [u64]>,
    pub stacks: Option<&'a [u64]>,
}
