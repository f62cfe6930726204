use crate::content::BALANCE_QUESTIONS;
use std::collections::BTreeMap;
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum Side {
    Left,
    Right,
}

/// Would-you-rather answers, one side per question. Picking again switches sides.
#[derive(Debug, Clone, Default)]
pub struct BalanceGame {
    picks: BTreeMap<u32, Side>,
}

impl BalanceGame {
    pub fn pick(&mut self, question: u32, side: Side) -> bool {
        if !BALANCE_QUESTIONS.iter().any(|q| q.id == question) {
            return false;
        }
        self.picks.insert(question, side);
        true
    }

    pub fn choice(&self, question: u32) -> Option<Side> {
        self.picks.get(&question).copied()
    }

    pub fn answered(&self) -> usize {
        self.picks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_and_switch() {
        let mut game = BalanceGame::default();
        assert!(game.pick(3, Side::Left));
        assert!(game.pick(3, Side::Right));
        assert_eq!(game.choice(3), Some(Side::Right));
        assert_eq!(game.choice(4), None);
        assert!(!game.pick(99, Side::Left));
        assert_eq!(game.answered(), 1);
    }
}
