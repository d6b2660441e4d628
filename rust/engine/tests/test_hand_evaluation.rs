use std::cmp::Ordering;

use fivepiles_engine::cards::parse_cards;
use fivepiles_engine::hand::{compare_hands, evaluate_hand, Category, HandStrength};
use proptest::prelude::*;
use proptest::sample::subsequence;

fn eval(s: &str) -> HandStrength {
    evaluate_hand(&parse_cards(s).expect("fixture parses")).expect("fixture evaluates")
}

#[test]
fn category_ladder_fixtures() {
    let royal = eval("Ah Kh Qh Jh Th");
    let quads = eval("2h 2d 2c 2s 9h");
    let flush = eval("3h 4h 5h 6h 8h");
    let straight = eval("3h 4d 5c 6s 7h");

    assert_eq!(royal.category, Category::StraightFlush);
    assert_eq!(quads.category, Category::FourOfAKind);
    assert_eq!(flush.category, Category::Flush);
    assert_eq!(straight.category, Category::Straight);

    assert_eq!(compare_hands(&royal, &quads), Ordering::Greater);
    assert_eq!(compare_hands(&quads, &flush), Ordering::Greater);
    assert_eq!(compare_hands(&flush, &straight), Ordering::Greater);
}

#[test]
fn same_ranks_different_suits_tie() {
    let a = eval("2h 3h 4h 5h 7h");
    let b = eval("2d 3d 4d 5d 7d");
    assert_eq!(compare_hands(&a, &b), Ordering::Equal);
}

#[test]
fn every_category_is_recognised() {
    let cases = [
        ("Ah Kd 9c 7s 3h", Category::HighCard, "High Card"),
        ("Ah Ad 9c 7s 3h", Category::OnePair, "Pair"),
        ("Ah Ad 9c 9s 3h", Category::TwoPair, "Two Pair"),
        ("Ah Ad Ac 9s 3h", Category::ThreeOfAKind, "Three of a Kind"),
        ("5h 6d 7c 8s 9h", Category::Straight, "Straight"),
        ("Ah Jh 9h 7h 3h", Category::Flush, "Flush"),
        ("Ah Ad Ac 9s 9h", Category::FullHouse, "Full House"),
        ("Ah Ad Ac As 9h", Category::FourOfAKind, "Four of a Kind"),
        ("5h 6h 7h 8h 9h", Category::StraightFlush, "Straight Flush"),
    ];
    for (cards, category, name) in cases {
        let s = eval(cards);
        assert_eq!(s.category, category, "{cards}");
        assert_eq!(s.describe(), name, "{cards}");
    }
}

#[test]
fn kickers_break_ties_within_category() {
    assert!(eval("Ah Ad Kc 7s 3h") > eval("Ac As Qc 7h 3d"));
    assert!(eval("9h 9d 9c Ks Kh") > eval("8h 8d 8c As Ah"));
    assert!(eval("Ah Kh 9h 7h 4h") > eval("Ad Kd 9d 7d 3d"));
    assert!(eval("6h 7d 8c 9s Th") > eval("Ah 2d 3c 4s 5h"));
}

#[test]
fn steel_wheel_is_lowest_straight_flush() {
    let wheel = eval("Ac 2c 3c 4c 5c");
    assert_eq!(wheel.category, Category::StraightFlush);
    assert!(eval("2d 3d 4d 5d 6d") > wheel);
    assert!(wheel > eval("Ah Ad Ac As Kh"));
}

#[test]
fn partial_piles_compare_by_multiples() {
    assert!(eval("Kh Kd") > eval("Ah Qs"));
    assert!(eval("4h 4d 4c") > eval("Ah Ad Kc Ks"));
    assert_eq!(compare_hands(&eval("9h"), &eval("9s")), Ordering::Equal);
}

proptest! {
    #[test]
    fn comparison_is_antisymmetric(
        a in subsequence(fivepiles_engine::cards::full_deck(), 5),
        b in subsequence(fivepiles_engine::cards::full_deck(), 5),
    ) {
        let ha = evaluate_hand(&a).unwrap();
        let hb = evaluate_hand(&b).unwrap();
        prop_assert_eq!(compare_hands(&ha, &hb), compare_hands(&hb, &ha).reverse());
    }

    #[test]
    fn evaluation_ignores_card_order(
        mut cards in subsequence(fivepiles_engine::cards::full_deck(), 1..=5),
    ) {
        let before = evaluate_hand(&cards).unwrap();
        cards.reverse();
        prop_assert_eq!(before, evaluate_hand(&cards).unwrap());
    }
}
