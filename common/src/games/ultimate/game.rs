use chrono::{DateTime, Local};

use crate::{MatchId, PairingId, PlayerId};
use super::error::IntegrityFault;
use super::types::{Mark, Outcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: MatchId,
    pub pairing: PairingId,
    pub cross_player: PlayerId,
    pub circle_player: PlayerId,
    pub created_at: DateTime<Local>,
    result: Option<Outcome>,
}

impl Match {
    pub fn new(
        id: MatchId,
        pairing: PairingId,
        cross_player: PlayerId,
        circle_player: PlayerId,
        created_at: DateTime<Local>,
    ) -> Self {
        Self {
            id,
            pairing,
            cross_player,
            circle_player,
            created_at,
            result: None,
        }
    }

    pub fn result(&self) -> Option<Outcome> {
        self.result
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    /// Finishes the match. A result, once set, is never replaced.
    pub fn set_result(&mut self, result: Outcome) -> Result<(), IntegrityFault> {
        if let Some(existing) = self.result {
            return Err(IntegrityFault::ResultAlreadySet { existing, attempted: result });
        }
        self.result = Some(result);
        Ok(())
    }

    pub fn mark_of(&self, player: &PlayerId) -> Option<Mark> {
        if player == &self.cross_player {
            Some(Mark::Cross)
        } else if player == &self.circle_player {
            Some(Mark::Circle)
        } else {
            None
        }
    }

    pub fn player_of(&self, mark: Mark) -> &PlayerId {
        match mark {
            Mark::Cross => &self.cross_player,
            Mark::Circle => &self.circle_player,
        }
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        self.result
            .and_then(|result| result.winner())
            .map(|mark| self.player_of(mark))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match() -> Match {
        Match::new(
            MatchId::new("m1".to_string()),
            PairingId::new("pair".to_string()),
            PlayerId::new("alice".to_string()),
            PlayerId::new("bob".to_string()),
            Local::now(),
        )
    }

    #[test]
    fn test_mark_assignment() {
        let game = sample_match();
        assert_eq!(game.mark_of(&PlayerId::new("alice".to_string())), Some(Mark::Cross));
        assert_eq!(game.mark_of(&PlayerId::new("bob".to_string())), Some(Mark::Circle));
        assert_eq!(game.mark_of(&PlayerId::new("eve".to_string())), None);
        assert_eq!(game.player_of(Mark::Circle).as_str(), "bob");
    }

    #[test]
    fn test_result_is_set_once() {
        let mut game = sample_match();
        game.set_result(Outcome::Circle).unwrap();
        assert!(game.is_finished());
        assert_eq!(game.winner().map(|p| p.as_str()), Some("bob"));

        let err = game.set_result(Outcome::Cross).unwrap_err();
        assert_eq!(
            err,
            IntegrityFault::ResultAlreadySet { existing: Outcome::Circle, attempted: Outcome::Cross }
        );
        assert_eq!(game.result(), Some(Outcome::Circle));
    }

    #[test]
    fn test_draw_has_no_winner() {
        let mut game = sample_match();
        game.set_result(Outcome::Draw).unwrap();
        assert!(game.winner().is_none());
    }
}
