//! The render pass.
//!
//! Every snapshot is rendered in two steps. The reset step returns the whole
//! table to a "nothing known" baseline without looking at the snapshot; the
//! apply step then paints whatever hand data the snapshot carries on top of
//! that baseline. Because the reset always runs first, nothing from an
//! earlier hand can survive a pass, and the apply step never has to clear
//! anything.
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, Snafu};

use crate::address::{self, class, ButtonAddressing, CardIds, Owner};
use crate::model::{CardCode, Hand, Snapshot};
use crate::view::{Fill, Ink, View};

#[derive(Debug, Snafu)]
pub enum RenderError {
    #[snafu(display("no element with id `{}` in the view", id))]
    MissingElement { id: String },
}

/// The ways table documents differ from one another.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderOptions {
    /// The document has a per-seat counter for chips committed this street.
    pub include_street_commits: bool,
    /// Write stack sizes into the per-seat chip counters.
    pub include_stacks: bool,
    pub button_addressing: ButtonAddressing,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            include_street_commits: true,
            include_stacks: true,
            button_addressing: ButtonAddressing::default(),
        }
    }
}

/// What a render pass ended up doing.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Pass {
    /// The snapshot had no hand data; only the reset ran.
    Cleared,
    Painted,
}

pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Renderer { options }
    }

    /// Bring `view` in line with `snapshot`, whatever it showed before.
    ///
    /// A missing element aborts the pass part-way; the view is then left
    /// half-painted until the next successful pass.
    pub fn render<V: View>(&self, view: &mut V, snapshot: &Snapshot) -> Result<Pass, RenderError> {
        self.reset(view)?;
        match snapshot.hand() {
            Some(hand) => {
                self.apply(view, &hand)?;
                debug!(
                    "painted {} seats, {} community cards, pot {}",
                    hand.hole_cards.len(),
                    hand.community_cards.len().saturating_sub(1),
                    hand.pot
                );
                Ok(Pass::Painted)
            }
            None => {
                debug!("snapshot without hand data; table cleared");
                Ok(Pass::Cleared)
            }
        }
    }

    /// Return every element to the baseline. Running it twice is the same as
    /// running it once.
    pub fn reset<V: View>(&self, view: &mut V) -> Result<(), RenderError> {
        each(view, class::PLAYER_CARD_BACKGROUND, |v, n| {
            v.set_fill(n, Fill::CardBack)
        });
        each(view, class::PLAYER_CARD_TEXT, clear_card_text);
        each(view, class::CHIPS_TEXT, |v, n| v.set_text(n, "0"));
        each(view, self.options.button_addressing.class(), |v, n| {
            v.set_fill(n, Fill::Neutral)
        });
        if self.options.include_street_commits {
            each(view, class::STREET_COMMIT_TEXT, |v, n| v.set_text(n, "0"));
        }

        each(view, class::COMMUNITY_CARD_BACKGROUND, |v, n| {
            v.set_fill(n, Fill::CardBlank)
        });
        each(view, class::COMMUNITY_CARD_TEXT, clear_card_text);
        // the reserved first slot shows face-down rather than blank
        let hidden = CardSlot::locate(view, Owner::Community, 0)?;
        view.set_fill(&hidden.background, Fill::CardBack);
        clear_card_text(view, &hidden.text);

        let pot = lookup(view, address::POT_TEXT)?;
        view.set_text(&pot, "0");
        Ok(())
    }

    /// Paint hand data over the baseline left by `reset`.
    pub fn apply<V: View>(&self, view: &mut V, hand: &Hand<'_>) -> Result<(), RenderError> {
        for (p, cards) in hand.hole_cards.iter().enumerate() {
            for (c, code) in cards.iter().enumerate() {
                let slot = CardSlot::locate(view, Owner::Player(p), c)?;
                paint_card(view, &slot, code);
            }
        }
        for (c, code) in hand.community_cards.iter().enumerate().skip(1) {
            let slot = CardSlot::locate(view, Owner::Community, c)?;
            paint_card(view, &slot, code);
        }

        if let Some(seat) = hand.button {
            let button = lookup(view, &self.options.button_addressing.id(seat))?;
            view.set_fill(&button, Fill::Dealer);
        }

        let pot = lookup(view, address::POT_TEXT)?;
        view.set_text(&pot, &hand.pot.to_string());

        if self.options.include_street_commits {
            if let Some(commits) = hand.street_commits {
                write_counters(view, commits, address::street_commit_text)?;
            }
        }
        if self.options.include_stacks {
            if let Some(stacks) = hand.stacks {
                write_counters(view, stacks, address::chips_text)?;
            }
        }
        Ok(())
    }
}

/// The background and text nodes of one card.
pub struct CardSlot<N> {
    pub background: N,
    pub text: N,
}

impl<N> CardSlot<N> {
    pub fn locate<V>(view: &V, owner: Owner, card: usize) -> Result<Self, RenderError>
    where
        V: View<Node = N>,
    {
        let ids = CardIds::new(owner, card);
        Ok(CardSlot {
            background: lookup(view, &ids.background)?,
            text: lookup(view, &ids.text)?,
        })
    }
}

/// Paint one card face. Only `slot` is touched.
///
/// The rank is always written. A suit that isn't recognized leaves the
/// background and ink as they were.
pub fn paint_card<V: View>(view: &mut V, slot: &CardSlot<V::Node>, code: &CardCode) {
    view.set_text(&slot.text, &code.rank_text());
    match code.suit() {
        Some(suit) => {
            view.set_fill(&slot.background, Fill::Suit(suit));
            view.set_ink(&slot.text, Ink::of(suit));
        }
        None => warn!("unrecognized suit in card `{}`; styling left unchanged", code),
    }
}

fn lookup<V: View>(view: &V, id: &str) -> Result<V::Node, RenderError> {
    view.find(id).context(MissingElementSnafu { id })
}

fn each<V, F>(view: &mut V, class: &str, mut paint: F)
where
    V: View,
    F: FnMut(&mut V, &V::Node),
{
    for node in view.select(class) {
        paint(view, &node);
    }
}

fn clear_card_text<V: View>(view: &mut V, node: &V::Node) {
    view.set_text(node, "");
    view.set_ink(node, Ink::Black);
}

fn write_counters<V, F>(view: &mut V, values: &[u64], id: F) -> Result<(), RenderError>
where
    V: View,
    F: Fn(usize) -> String,
{
    for (p, value) in values.iter().enumerate() {
        let node = lookup(view, &id(p))?;
        view.set_text(&node, &value.to_string());
    }
    Ok(())
}
