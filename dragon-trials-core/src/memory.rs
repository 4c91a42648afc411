//! The relic-matching stage: eight pairs face down, two flips per attempt.
//!
//! One pair swaps its sprite for the challenger's own portrait before the
//! shuffle. Mismatched cards stay up briefly so the player can read them,
//! and the board locks until they turn back over.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::schedule::Schedule;

/// The eight relics printed on the cards.
pub const PAIR_LABELS: [&str; 8] = [
    "dragon", "wizard", "sword", "shield", "potion", "fire", "diamond", "wand",
];

/// How long a mismatched pair stays face up.
pub const MISMATCH_HIDE_MS: u64 = 800;
/// Pause between the last match and the stage handing off.
pub const FINISH_HANDOFF_MS: u64 = 500;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CardArt {
    Sprite,
    Portrait,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Card {
    pub label: &'static str,
    pub art: CardArt,
    pub face_up: bool,
    pub matched: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FlipOutcome {
    /// First card of an attempt turned over.
    Flipped,
    /// Second card matched the first.
    Matched,
    /// Second card did not match; both hide after [`MISMATCH_HIDE_MS`].
    Mismatched,
    /// The flip was refused (locked board, face-up or matched card).
    Ignored,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoardStatus {
    Playing,
    Complete,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoardEvent {
    CardsHidden { a: usize, b: usize },
    BoardCleared,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum BoardTick {
    Hide(usize, usize),
    Finish,
}

/// A shuffled sixteen-card board.
#[derive(Clone, Debug)]
pub struct MemoryGame {
    cards: Vec<Card>,
    first_pick: Option<usize>,
    hiding: bool,
    moves: u32,
    status: BoardStatus,
    schedule: Schedule<BoardTick>,
}

impl MemoryGame {
    pub fn new(seed: u64) -> Self {
        Self::from_rng(&mut SmallRng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: &mut impl Rng) -> Self {
        let portrait = *PAIR_LABELS
            .choose(rng)
            .unwrap_or(&PAIR_LABELS[0]);
        let mut cards = Vec::with_capacity(PAIR_LABELS.len() * 2);
        for label in PAIR_LABELS {
            let art = if label == portrait {
                CardArt::Portrait
            } else {
                CardArt::Sprite
            };
            for _ in 0..2 {
                cards.push(Card {
                    label,
                    art,
                    face_up: false,
                    matched: false,
                });
            }
        }
        cards.shuffle(rng);
        Self {
            cards,
            first_pick: None,
            hiding: false,
            moves: 0,
            status: BoardStatus::Playing,
            schedule: Schedule::new(),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn status(&self) -> BoardStatus {
        self.status
    }

    pub fn clock_ms(&self) -> u64 {
        self.schedule.now_ms()
    }

    /// Delay until the next scheduled flip-back or handoff, if any.
    pub fn next_event_in(&self) -> Option<u64> {
        self.schedule.next_due_in()
    }

    /// Turn a card over. The second flip of each attempt costs a move
    /// whether or not it matches.
    pub fn flip(&mut self, index: usize) -> FlipOutcome {
        if self.status == BoardStatus::Complete || self.hiding {
            return FlipOutcome::Ignored;
        }
        let Some(card) = self.cards.get(index) else {
            return FlipOutcome::Ignored;
        };
        if card.face_up || card.matched {
            return FlipOutcome::Ignored;
        }
        self.cards[index].face_up = true;
        let Some(first) = self.first_pick.take() else {
            self.first_pick = Some(index);
            return FlipOutcome::Flipped;
        };
        self.moves += 1;
        if self.cards[first].label == self.cards[index].label {
            self.cards[first].matched = true;
            self.cards[index].matched = true;
            if self.cards.iter().all(|c| c.matched) {
                self.schedule.after(FINISH_HANDOFF_MS, BoardTick::Finish);
            }
            FlipOutcome::Matched
        } else {
            self.hiding = true;
            self.schedule.after(MISMATCH_HIDE_MS, BoardTick::Hide(first, index));
            FlipOutcome::Mismatched
        }
    }

    /// Run the board clock forward by `dt_ms`.
    pub fn advance(&mut self, dt_ms: u64) -> Vec<BoardEvent> {
        let target = self.schedule.now_ms() + dt_ms;
        let mut events = Vec::new();
        while let Some(tick) = self.schedule.pop_due_until(target) {
            match tick {
                BoardTick::Hide(a, b) => {
                    self.cards[a].face_up = false;
                    self.cards[b].face_up = false;
                    self.hiding = false;
                    events.push(BoardEvent::CardsHidden { a, b });
                }
                BoardTick::Finish => {
                    self.status = BoardStatus::Complete;
                    events.push(BoardEvent::BoardCleared);
                }
            }
        }
        self.schedule.settle_at(target);
        events
    }
}

/// Verdict printed once the board is cleared, keyed on total attempts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Performance {
    pub title: &'static str,
    pub remark: &'static str,
}

impl Performance {
    pub fn for_moves(moves: u32) -> Self {
        if moves < 10 {
            Self {
                title: "You're a Cheater!",
                remark: "Stop inspecting source code bruh",
            }
        } else if moves <= 14 {
            Self {
                title: "Lucker Dog!",
                remark: "Anyhow anyhow click also win",
            }
        } else if moves <= 20 {
            Self {
                title: "Not bad",
                remark: "You are normal, get good",
            }
        } else {
            Self {
                title: "Lousy",
                remark: "Welcome to dementia club",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_indices(game: &MemoryGame, label: &str) -> (usize, usize) {
        let mut found = game
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.label == label)
            .map(|(i, _)| i);
        (found.next().unwrap(), found.next().unwrap())
    }

    #[test]
    fn deck_has_eight_pairs_and_one_portrait_pair() {
        let game = MemoryGame::new(7);
        assert_eq!(game.cards().len(), 16);
        for label in PAIR_LABELS {
            let count = game.cards().iter().filter(|c| c.label == label).count();
            assert_eq!(count, 2, "label {label}");
        }
        let portraits: Vec<&Card> = game
            .cards()
            .iter()
            .filter(|c| c.art == CardArt::Portrait)
            .collect();
        assert_eq!(portraits.len(), 2);
        assert_eq!(portraits[0].label, portraits[1].label);
    }

    #[test]
    fn matching_pair_stays_up() {
        let mut game = MemoryGame::new(1);
        let (a, b) = pair_indices(&game, "sword");
        assert_eq!(game.flip(a), FlipOutcome::Flipped);
        assert_eq!(game.flip(b), FlipOutcome::Matched);
        assert!(game.cards()[a].matched);
        assert!(game.cards()[b].matched);
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn mismatch_locks_the_board_until_the_cards_hide() {
        let mut game = MemoryGame::new(1);
        let (a, _) = pair_indices(&game, "sword");
        let (b, _) = pair_indices(&game, "wand");
        assert_eq!(game.flip(a), FlipOutcome::Flipped);
        assert_eq!(game.flip(b), FlipOutcome::Mismatched);
        assert_eq!(game.moves(), 1);
        let (c, _) = pair_indices(&game, "fire");
        assert_eq!(game.flip(c), FlipOutcome::Ignored);
        assert!(game.advance(MISMATCH_HIDE_MS - 1).is_empty());
        assert_eq!(game.advance(1), vec![BoardEvent::CardsHidden { a, b }]);
        assert!(!game.cards()[a].face_up);
        assert!(!game.cards()[b].face_up);
        assert_eq!(game.flip(c), FlipOutcome::Flipped);
    }

    #[test]
    fn face_up_and_matched_cards_refuse_flips() {
        let mut game = MemoryGame::new(3);
        let (a, b) = pair_indices(&game, "potion");
        game.flip(a);
        assert_eq!(game.flip(a), FlipOutcome::Ignored);
        game.flip(b);
        assert_eq!(game.flip(a), FlipOutcome::Ignored);
        assert_eq!(game.flip(b), FlipOutcome::Ignored);
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn clearing_the_board_hands_off_after_a_pause() {
        let mut game = MemoryGame::new(11);
        for label in PAIR_LABELS {
            let (a, b) = pair_indices(&game, label);
            assert_eq!(game.flip(a), FlipOutcome::Flipped);
            assert_eq!(game.flip(b), FlipOutcome::Matched);
        }
        assert_eq!(game.moves(), 8);
        assert_eq!(game.status(), BoardStatus::Playing);
        assert_eq!(game.next_event_in(), Some(FINISH_HANDOFF_MS));
        assert_eq!(game.advance(FINISH_HANDOFF_MS), vec![BoardEvent::BoardCleared]);
        assert_eq!(game.status(), BoardStatus::Complete);
        let (a, _) = pair_indices(&game, "dragon");
        assert_eq!(game.flip(a), FlipOutcome::Ignored);
    }

    #[test]
    fn performance_tiers_follow_the_move_count() {
        assert_eq!(Performance::for_moves(8).title, "You're a Cheater!");
        assert_eq!(Performance::for_moves(9).remark, "Stop inspecting source code bruh");
        assert_eq!(Performance::for_moves(10).title, "Lucker Dog!");
        assert_eq!(Performance::for_moves(14).remark, "Anyhow anyhow click also win");
        assert_eq!(Performance::for_moves(15).title, "Not bad");
        assert_eq!(Performance::for_moves(20).remark, "You are normal, get good");
        assert_eq!(Performance::for_moves(21).title, "Lousy");
        assert_eq!(Performance::for_moves(40).remark, "Welcome to dementia club");
    }

    #[test]
    fn boards_with_the_same_seed_deal_the_same_cards() {
        let a = MemoryGame::new(99);
        let b = MemoryGame::new(99);
        assert_eq!(a.cards(), b.cards());
    }
}
