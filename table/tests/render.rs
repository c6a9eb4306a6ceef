use tablecast_table::address::{class, ButtonAddressing};
use tablecast_table::{
    Fill, Ink, Pass, RenderError, RenderOptions, Renderer, Snapshot, Suit, TableLayout, View,
    ViewTree,
};

fn layout(num_players: usize) -> TableLayout {
    TableLayout {
        num_players,
        num_hole_cards: 2,
        num_community_cards: 5,
    }
}

fn table(num_players: usize, options: RenderOptions) -> (Renderer, ViewTree) {
    let tree = ViewTree::provision(&layout(num_players), &options);
    (Renderer::new(options), tree)
}

fn snapshot(json: &str) -> Snapshot {
    serde_json::from_str(json).expect("snapshot to decode")
}

fn full_hand() -> Snapshot {
    snapshot(
        r#"{
            "hole_cards": [["As", "Kd"], ["Th", "2c"]],
            "community_cards": ["??", "Qs", "Jh", "9c"],
            "button": 1,
            "pot": 350
        }"#,
    )
}

// The baseline every element should show when no hand is in progress.
fn assert_cleared(tree: &ViewTree, options: &RenderOptions) {
    for id in tree.ids_of(class::PLAYER_CARD_BACKGROUND) {
        assert_eq!(tree.fill(id), Some(Fill::CardBack), "{}", id);
    }
    for id in tree.ids_of(class::PLAYER_CARD_TEXT) {
        assert_eq!(tree.text(id), Some(""), "{}", id);
    }
    for id in tree.ids_of(class::CHIPS_TEXT) {
        assert_eq!(tree.text(id), Some("0"), "{}", id);
    }
    for id in tree.ids_of(options.button_addressing.class()) {
        assert_eq!(tree.fill(id), Some(Fill::Neutral), "{}", id);
    }
    for id in tree.ids_of(class::COMMUNITY_CARD_TEXT) {
        assert_eq!(tree.text(id), Some(""), "{}", id);
    }
    assert_eq!(tree.fill("card-background-community-0"), Some(Fill::CardBack));
    for c in 1..=5 {
        let id = format!("card-background-community-{}", c);
        assert_eq!(tree.fill(&id), Some(Fill::CardBlank), "{}", id);
    }
    assert_eq!(tree.text("pot-text"), Some("0"));
}

fn assert_card(tree: &ViewTree, owner: &str, card: usize, text: &str, suit: Suit, ink: Ink) {
    let background = format!("card-background-{}-{}", owner, card);
    let label = format!("card-text-{}-{}", owner, card);
    assert_eq!(tree.text(&label), Some(text), "{}", label);
    assert_eq!(tree.ink(&label), Some(ink), "{}", label);
    assert_eq!(tree.fill(&background), Some(Fill::Suit(suit)), "{}", background);
}

#[test]
fn empty_snapshot_clears_the_table() {
    let options = RenderOptions::default();
    let (renderer, mut tree) = table(3, options);

    let pass = renderer.render(&mut tree, &snapshot("{}")).expect("render to succeed");

    assert_eq!(pass, Pass::Cleared);
    assert_cleared(&tree, &options);
}

#[test]
fn full_snapshot_paints_cards_button_and_pot() {
    let options = RenderOptions::default();
    let (renderer, mut tree) = table(2, options);

    let pass = renderer.render(&mut tree, &full_hand()).expect("render to succeed");

    assert_eq!(pass, Pass::Painted);
    assert_card(&tree, "0", 0, "A", Suit::Spade, Ink::Black);
    assert_card(&tree, "0", 1, "K", Suit::Diamond, Ink::Red);
    assert_card(&tree, "1", 0, "10", Suit::Heart, Ink::Red);
    assert_card(&tree, "1", 1, "2", Suit::Club, Ink::Black);
    assert_card(&tree, "community", 1, "Q", Suit::Spade, Ink::Black);
    assert_card(&tree, "community", 2, "J", Suit::Heart, Ink::Red);
    assert_card(&tree, "community", 3, "9", Suit::Club, Ink::Black);

    // the reserved slot and the unrevealed slots keep their baseline
    assert_eq!(tree.fill("card-background-community-0"), Some(Fill::CardBack));
    assert_eq!(tree.text("card-text-community-0"), Some(""));
    assert_eq!(tree.fill("card-background-community-4"), Some(Fill::CardBlank));
    assert_eq!(tree.fill("card-background-community-5"), Some(Fill::CardBlank));

    assert_eq!(tree.fill("button-background-1"), Some(Fill::Dealer));
    assert_eq!(tree.fill("button-background-0"), Some(Fill::Neutral));
    assert_eq!(tree.text("pot-text"), Some("350"));
}

#[test]
fn reset_is_idempotent() {
    let options = RenderOptions::default();
    let (renderer, mut tree) = table(3, options);
    renderer.render(&mut tree, &full_hand()).expect("render to succeed");

    renderer.reset(&mut tree).expect("reset to succeed");
    let once = tree.clone();
    renderer.reset(&mut tree).expect("reset to succeed");

    assert_eq!(tree, once);
    assert_cleared(&tree, &options);
}

#[test]
fn reset_clears_the_hidden_slot_even_without_its_class() {
    let options = RenderOptions::default();
    let (renderer, mut tree) = table(2, options);
    let text = tree.insert("card-text-community-0", &[]);
    tree.set_text(&text, "Q");
    tree.set_ink(&text, Ink::Red);

    renderer.render(&mut tree, &snapshot("{}")).expect("render to succeed");

    assert_eq!(tree.text("card-text-community-0"), Some(""));
    assert_eq!(tree.ink("card-text-community-0"), Some(Ink::Black));
    assert_eq!(tree.fill("card-background-community-0"), Some(Fill::CardBack));
}

#[test]
fn render_equals_reset_then_apply() {
    let options = RenderOptions::default();
    let (renderer, mut whole) = table(2, options);
    let mut stepped = whole.clone();
    let snapshot = full_hand();

    renderer.render(&mut whole, &snapshot).expect("render to succeed");
    renderer.reset(&mut stepped).expect("reset to succeed");
    let hand = snapshot.hand().expect("hand data");
    renderer.apply(&mut stepped, &hand).expect("apply to succeed");

    assert_eq!(whole, stepped);
}

#[test]
fn nothing_survives_into_the_next_hand() {
    let options = RenderOptions::default();
    let (renderer, mut tree) = table(3, options);
    let mut fresh = tree.clone();
    renderer
        .render(
            &mut tree,
            &snapshot(
                r#"{"hole_cards": [["Ah", "Ad"], ["Ks", "Kc"], ["Qh", "Qd"]],
                    "community_cards": ["??", "2h", "3h", "4h", "5h", "6h"],
                    "button": 2, "pot": 900, "street_commits": [100, 200, 300],
                    "stacks": [10, 20, 30]}"#,
            ),
        )
        .expect("render to succeed");

    let next = snapshot(
        r#"{"hole_cards": [["7c"], [], []], "community_cards": [], "button": 0, "pot": 3}"#,
    );
    renderer.render(&mut tree, &next).expect("render to succeed");
    renderer.render(&mut fresh, &next).expect("render to succeed");

    assert_eq!(tree, fresh);
    assert_eq!(tree.ink("card-text-2-1"), Some(Ink::Black));
    assert_eq!(tree.fill("button-background-2"), Some(Fill::Neutral));
}

#[test]
fn rank_and_suit_laws_hold_for_every_card() {
    let options = RenderOptions::default();
    let (renderer, mut tree) = table(1, options);
    let ranks = "23456789TJQKA";
    let suits = [
        ('c', Suit::Club, Ink::Black),
        ('s', Suit::Spade, Ink::Black),
        ('h', Suit::Heart, Ink::Red),
        ('d', Suit::Diamond, Ink::Red),
        ('♣', Suit::Club, Ink::Black),
        ('♠', Suit::Spade, Ink::Black),
        ('♥', Suit::Heart, Ink::Red),
        ('♦', Suit::Diamond, Ink::Red),
    ];
    for rank in ranks.chars() {
        for &(glyph, suit, ink) in suits.iter() {
            let code = format!("{}{}", rank, glyph);
            let mut snapshot = Snapshot::default();
            snapshot.hole_cards = Some(vec![vec![code.as_str().into()]]);
            renderer.render(&mut tree, &snapshot).expect("render to succeed");

            let expected = if rank == 'T' { "10".to_string() } else { rank.to_string() };
            assert_card(&tree, "0", 0, &expected, suit, ink);
        }
    }
}

#[test]
fn unrecognized_suit_keeps_the_baseline_styling() {
    let options = RenderOptions::default();
    let (renderer, mut tree) = table(1, options);

    renderer
        .render(&mut tree, &snapshot(r#"{"hole_cards": [["Ah", "9x"]]}"#))
        .expect("an odd suit is not an error");

    assert_eq!(tree.text("card-text-0-1"), Some("9"));
    assert_eq!(tree.fill("card-background-0-1"), Some(Fill::CardBack));
    assert_eq!(tree.ink("card-text-0-1"), Some(Ink::Black));
}

#[test]
fn street_commits_are_written_per_seat() {
    let options = RenderOptions::default();
    let (renderer, mut tree) = table(3, options);

    renderer
        .render(
            &mut tree,
            &snapshot(r#"{"hole_cards": [[], [], []], "street_commits": [25, 0, 50]}"#),
        )
        .expect("render to succeed");
    assert_eq!(tree.text("street-commit-text-0"), Some("25"));
    assert_eq!(tree.text("street-commit-text-1"), Some("0"));
    assert_eq!(tree.text("street-commit-text-2"), Some("50"));

    // leaving the field out shows the baseline again
    renderer
        .render(&mut tree, &snapshot(r#"{"hole_cards": [[], [], []]}"#))
        .expect("render to succeed");
    for p in 0..3 {
        assert_eq!(tree.text(&format!("street-commit-text-{}", p)), Some("0"));
    }
}

#[test]
fn street_commits_are_ignored_when_the_document_has_none() {
    let options = RenderOptions {
        include_street_commits: false,
        ..RenderOptions::default()
    };
    let (renderer, mut tree) = table(2, options);

    let pass = renderer
        .render(
            &mut tree,
            &snapshot(r#"{"hole_cards": [[], []], "street_commits": [5, 5]}"#),
        )
        .expect("render to succeed");

    assert_eq!(pass, Pass::Painted);
    assert!(tree.element("street-commit-text-0").is_none());
}

#[test]
fn stacks_fill_the_chip_counters() {
    let options = RenderOptions::default();
    let (renderer, mut tree) = table(2, options);

    renderer
        .render(
            &mut tree,
            &snapshot(r#"{"hole_cards": [[], []], "stacks": [190, 210]}"#),
        )
        .expect("render to succeed");
    assert_eq!(tree.text("chips-text-0"), Some("190"));
    assert_eq!(tree.text("chips-text-1"), Some("210"));

    let quiet = RenderOptions {
        include_stacks: false,
        ..RenderOptions::default()
    };
    let (renderer, mut tree) = table(2, quiet);
    renderer
        .render(
            &mut tree,
            &snapshot(r#"{"hole_cards": [[], []], "stacks": [190, 210]}"#),
        )
        .expect("render to succeed");
    assert_eq!(tree.text("chips-text-0"), Some("0"));
}

#[test]
fn direct_button_addressing_highlights_the_button_itself() {
    let options = RenderOptions {
        button_addressing: ButtonAddressing::Direct,
        ..RenderOptions::default()
    };
    let (renderer, mut tree) = table(3, options);

    renderer
        .render(&mut tree, &snapshot(r#"{"hole_cards": [[], [], []], "dealer": 2}"#))
        .expect("render to succeed");

    assert_eq!(tree.fill("button-2"), Some(Fill::Dealer));
    assert_eq!(tree.fill("button-0"), Some(Fill::Neutral));
    assert_eq!(tree.fill("button-1"), Some(Fill::Neutral));
}

#[test]
fn missing_element_aborts_the_pass() {
    let options = RenderOptions::default();
    let (renderer, mut tree) = table(2, options);

    // a third seat the document doesn't have
    let err = renderer
        .render(
            &mut tree,
            &snapshot(r#"{"hole_cards": [["As"], ["Kd"], ["Qc"]], "pot": 12}"#),
        )
        .expect_err("seat 2 is not in the document");
    match err {
        RenderError::MissingElement { id } => assert_eq!(id, "card-background-2-0"),
    }
    // the pass stopped before the pot was written
    assert_eq!(tree.text("pot-text"), Some("0"));

    tree.remove("pot-text");
    assert!(renderer.render(&mut tree, &snapshot("{}")).is_err());
}
