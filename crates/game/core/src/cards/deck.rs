//! Draw, discard and reshuffle rules for a unit's card piles.

use crate::env::{RngSource, shuffle};
use crate::state::{CardId, UnitState};

/// What a single draw call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawReport {
    pub drawn: usize,
    pub reshuffled: bool,
}

/// Fills the unit's hand up to `hand_size`.
///
/// When the draw pile is empty and the discard pile is not, the discard pile
/// is shuffled into a fresh draw pile first. That happens at most once per
/// call, so a small deck may leave the hand short of `hand_size`.
pub fn draw_cards<R: RngSource + ?Sized>(
    unit: &mut UnitState,
    hand_size: usize,
    rng: &mut R,
) -> DrawReport {
    let piles = &mut unit.cards;
    let mut report = DrawReport::default();

    if piles.draw.is_empty() && !piles.discard.is_empty() {
        let mut recycled = std::mem::take(&mut piles.discard);
        shuffle(rng, &mut recycled);
        piles.draw = recycled;
        report.reshuffled = true;
    }

    while piles.hand.len() < hand_size && !piles.draw.is_empty() {
        let card = piles.draw.remove(0);
        piles.hand.push(card);
        report.drawn += 1;
    }

    report
}

/// Moves the whole hand to the discard pile, preserving order.
pub fn discard_hand(unit: &mut UnitState) -> usize {
    let hand = std::mem::take(&mut unit.cards.hand);
    let count = hand.len();
    unit.cards.discard.extend(hand);
    count
}

/// Removes the card at `index` from the hand and puts it on the discard pile.
pub fn take_from_hand(unit: &mut UnitState, index: usize) -> Option<CardId> {
    if index >= unit.cards.hand.len() {
        return None;
    }
    let card = unit.cards.hand.remove(index);
    unit.cards.discard.push(card.clone());
    Some(card)
}
