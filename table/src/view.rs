use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::{self, class, CardIds, Owner};
use crate::model::Suit;
use crate::render::RenderOptions;

/// A render target: addressable nodes that can be painted.
///
/// The view holds nothing but what was last painted onto it. Lookups by id
/// fail softly with `None`; deciding whether that is fatal is up to the
/// caller.
pub trait View {
    type Node;

    fn find(&self, id: &str) -> Option<Self::Node>;

    /// Every node tagged with `class`, possibly none.
    fn select(&self, class: &str) -> Vec<Self::Node>;

    fn set_fill(&mut self, node: &Self::Node, fill: Fill);

    fn set_text(&mut self, node: &Self::Node, text: &str);

    fn set_ink(&mut self, node: &Self::Node, ink: Ink);
}

/// Background paints, each naming a pattern defined by the document.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Fill {
    /// Face-down card.
    CardBack,
    /// Empty card slot; distinct from face-down.
    CardBlank,
    Suit(Suit),
    Neutral,
    Dealer,
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fill::CardBack => f.write_str("url(#card-back)"),
            Fill::CardBlank => f.write_str("url(#card-blank)"),
            Fill::Suit(suit) => write!(f, "url(#{})", suit.name()),
            Fill::Neutral => f.write_str("transparent"),
            Fill::Dealer => f.write_str("url(#dealer)"),
        }
    }
}

/// Colour of a card's text and its outline.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Ink {
    Black,
    Red,
}

impl Ink {
    pub fn of(suit: Suit) -> Ink {
        match suit {
            Suit::Club | Suit::Spade => Ink::Black,
            Suit::Heart | Suit::Diamond => Ink::Red,
        }
    }
}

impl fmt::Display for Ink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ink::Black => f.write_str("black"),
            Ink::Red => f.write_str("red"),
        }
    }
}

/// How many seats and card slots a table document has.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct TableLayout {
    pub num_players: usize,
    pub num_hole_cards: usize,
    /// Revealed community cards; the document carries one extra hidden slot
    /// in front of them.
    pub num_community_cards: usize,
}

/// An in-memory view, standing in for the document.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ViewTree {
    elements: Vec<Element>,
    ids: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Element {
    pub id: String,
    pub classes: Vec<String>,
    pub fill: Option<Fill>,
    pub text: String,
    pub ink: Option<Ink>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree holding every element a document with the given layout
    /// is expected to provide.
    pub fn provision(layout: &TableLayout, options: &RenderOptions) -> Self {
        let mut tree = ViewTree::new();
        for p in 0..layout.num_players {
            for c in 0..layout.num_hole_cards {
                let ids = CardIds::new(Owner::Player(p), c);
                tree.insert(&ids.background, &[class::PLAYER_CARD_BACKGROUND]);
                tree.insert(&ids.text, &[class::PLAYER_CARD_TEXT]);
            }
            tree.insert(&address::chips_text(p), &[class::CHIPS_TEXT]);
            tree.insert(
                &options.button_addressing.id(p),
                &[options.button_addressing.class()],
            );
            if options.include_street_commits {
                tree.insert(
                    &address::street_commit_text(p),
                    &[class::STREET_COMMIT_TEXT],
                );
            }
        }
        for c in 0..=layout.num_community_cards {
            let ids = CardIds::new(Owner::Community, c);
            tree.insert(&ids.background, &[class::COMMUNITY_CARD_BACKGROUND]);
            tree.insert(&ids.text, &[class::COMMUNITY_CARD_TEXT]);
        }
        tree.insert(address::POT_TEXT, &[]);
        tree
    }

    /// Add an unpainted element. An existing element with the same id is
    /// replaced.
    pub fn insert(&mut self, id: &str, classes: &[&str]) -> usize {
        let element = Element {
            id: id.into(),
            classes: classes.iter().map(|&c| c.into()).collect(),
            fill: None,
            text: String::new(),
            ink: None,
        };
        match self.ids.get(id) {
            Some(&idx) => {
                self.elements[idx] = element;
                idx
            }
            None => {
                let idx = self.elements.len();
                self.elements.push(element);
                self.ids.insert(id.into(), idx);
                idx
            }
        }
    }

    /// Detach an element from the id index, as if the document lost it.
    pub fn remove(&mut self, id: &str) -> Option<Element> {
        let idx = self.ids.remove(id)?;
        let element = self.elements[idx].clone();
        self.elements[idx].classes.clear();
        Some(element)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.ids.get(id).map(|&idx| &self.elements[idx])
    }

    pub fn fill(&self, id: &str) -> Option<Fill> {
        self.element(id).and_then(|e| e.fill)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.element(id).map(|e| e.text.as_str())
    }

    pub fn ink(&self, id: &str) -> Option<Ink> {
        self.element(id).and_then(|e| e.ink)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.ids.values().map(move |&idx| &self.elements[idx])
    }

    /// Ids of every element tagged with `class`, in document order.
    pub fn ids_of(&self, class: &str) -> Vec<&str> {
        self.select(class)
            .into_iter()
            .map(|idx| self.elements[idx].id.as_str())
            .collect()
    }
}

impl View for ViewTree {
    type Node = usize;

    fn find(&self, id: &str) -> Option<usize> {
        self.ids.get(id).copied()
    }

    fn select(&self, class: &str) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.classes.iter().any(|c| c == class))
            .map(|(idx, _)| idx)
            .collect()
    }

    fn set_fill(&mut self, node: &usize, fill: Fill) {
        self.elements[*node].fill = Some(fill);
    }

    fn set_text(&mut self, node: &usize, text: &str) {
        let element = &mut self.elements[*node];
        element.text.clear();
        element.text.push_str(text);
    }

    fn set_ink(&mut self, node: &usize, ink: Ink) {
        self.elements[*node].ink = Some(ink);
    }
}
