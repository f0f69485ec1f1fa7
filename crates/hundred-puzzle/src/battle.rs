//! Timed two-player battles over a shared puzzle.
//!
//! Time is passed in as `Instant`s so the caller owns the clock.

use std::time::{Duration, Instant};

use crate::error::{EngineError, GameError};
use crate::game::{GameSession, MAX_ATTEMPTS};
use crate::generator::Generator;
use crate::puzzle::{Difficulty, Puzzle};

/// Time limit for matched battles
pub const RANKED_TIME_LIMIT: Duration = Duration::from_secs(30);

/// Time limit for battles between friends
pub const FRIENDLY_TIME_LIMIT: Duration = Duration::from_secs(60);

pub const WIN_POINTS: u64 = 200;
pub const WIN_TROPHIES: u64 = 10;
pub const LOSS_TROPHIES: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleStatus {
    /// Waiting for the invited player to accept
    Pending,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleResult {
    Win { winner: String },
    Draw,
}

/// Score changes owed to both players after a win
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleRewards {
    pub winner: String,
    pub loser: String,
}

impl BattleRewards {
    /// Apply the winner bonus and the loser penalty
    pub fn apply(&self, winner: &mut GameSession, loser: &mut GameSession) {
        winner.score += WIN_POINTS;
        winner.trophies += WIN_TROPHIES;
        loser.trophies = loser.trophies.saturating_sub(LOSS_TROPHIES);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleOutcome {
    /// The battle was already over
    Ended(BattleResult),
    /// The time limit passed; the battle is a draw
    TimeExpired,
    Won(BattleRewards),
    Incorrect { attempts_remaining: u32 },
}

/// A race between two players to solve the same puzzle
#[derive(Debug, Clone)]
pub struct Battle {
    pub player1: String,
    pub player2: String,
    pub puzzle: Puzzle,
    pub time_limit: Duration,
    pub status: BattleStatus,
    pub started_at: Instant,
    pub attempts: [u32; 2],
    pub result: Option<BattleResult>,
}

impl Battle {
    /// Start a battle between two matched players. The puzzle uses the
    /// lower of the two players' levels.
    pub fn ranked(
        player1: (&str, u64),
        player2: (&str, u64),
        generator: &mut Generator,
        now: Instant,
    ) -> Result<Self, EngineError> {
        let battle = Self::create(player1, player2, RANKED_TIME_LIMIT, BattleStatus::Active, generator, now)?;
        tracing::info!(player1 = %battle.player1, player2 = %battle.player2, "ranked battle started");
        Ok(battle)
    }

    /// Invite a friend. The battle starts once they [`accept`](Self::accept).
    pub fn friendly(
        creator: (&str, u64),
        friend: (&str, u64),
        generator: &mut Generator,
        now: Instant,
    ) -> Result<Self, EngineError> {
        Self::create(creator, friend, FRIENDLY_TIME_LIMIT, BattleStatus::Pending, generator, now)
    }

    fn create(
        (player1, level1): (&str, u64),
        (player2, level2): (&str, u64),
        time_limit: Duration,
        status: BattleStatus,
        generator: &mut Generator,
        now: Instant,
    ) -> Result<Self, EngineError> {
        let puzzle = generator.puzzle(Difficulty::from(level1.min(level2)))?;
        Ok(Self {
            player1: player1.to_string(),
            player2: player2.to_string(),
            puzzle,
            time_limit,
            status,
            started_at: now,
            attempts: [0, 0],
            result: None,
        })
    }

    /// Accept a friendly invitation; restarts the clock
    pub fn accept(&mut self, player: &str, now: Instant) -> Result<(), GameError> {
        if player != self.player2 {
            return Err(GameError::NotAParticipant(player.to_string()));
        }
        if self.status != BattleStatus::Pending {
            return Err(GameError::BattleNotActive);
        }
        self.status = BattleStatus::Active;
        self.started_at = now;
        Ok(())
    }

    pub fn time_remaining(&self, now: Instant) -> Duration {
        self.time_limit
            .saturating_sub(now.saturating_duration_since(self.started_at))
    }

    /// Attempts made so far by `player`
    pub fn attempts(&self, player: &str) -> Option<u32> {
        self.seat(player).map(|seat| self.attempts[seat])
    }

    /// Submit an answer on behalf of one player
    pub fn submit(&mut self, player: &str, expression: &str, now: Instant) -> Result<BattleOutcome, GameError> {
        let seat = self
            .seat(player)
            .ok_or_else(|| GameError::NotAParticipant(player.to_string()))?;

        match self.status {
            BattleStatus::Pending => return Err(GameError::BattleNotActive),
            BattleStatus::Completed => {
                return Ok(BattleOutcome::Ended(
                    self.result.clone().unwrap_or(BattleResult::Draw),
                ))
            }
            BattleStatus::Active => {}
        }

        if now.saturating_duration_since(self.started_at) > self.time_limit {
            self.status = BattleStatus::Completed;
            self.result = Some(BattleResult::Draw);
            tracing::info!(player1 = %self.player1, player2 = %self.player2, "battle time expired");
            return Ok(BattleOutcome::TimeExpired);
        }

        self.attempts[seat] += 1;

        if self.puzzle.check(expression) {
            let winner = player.to_string();
            let loser = if seat == 0 {
                self.player2.clone()
            } else {
                self.player1.clone()
            };
            self.status = BattleStatus::Completed;
            self.result = Some(BattleResult::Win {
                winner: winner.clone(),
            });
            tracing::info!(%winner, %loser, "battle won");
            return Ok(BattleOutcome::Won(BattleRewards { winner, loser }));
        }

        Ok(BattleOutcome::Incorrect {
            attempts_remaining: MAX_ATTEMPTS - self.attempts[seat] % MAX_ATTEMPTS,
        })
    }

    fn seat(&self, player: &str) -> Option<usize> {
        if player == self.player1 {
            Some(0)
        } else if player == self.player2 {
            Some(1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorConfig;

    fn generator() -> Generator {
        Generator::new(GeneratorConfig {
            seed: Some(11),
            ..Default::default()
        })
    }

    #[test]
    fn test_ranked_battle_uses_lower_level() {
        let now = Instant::now();
        let battle = Battle::ranked(("ann", 25), ("bob", 4), &mut generator(), now).unwrap();
        assert_eq!(battle.puzzle.difficulty.level(), 4);
        assert_eq!(battle.status, BattleStatus::Active);
        assert_eq!(battle.time_remaining(now), RANKED_TIME_LIMIT);
    }

    #[test]
    fn test_correct_answer_wins() {
        let now = Instant::now();
        let mut battle = Battle::ranked(("ann", 1), ("bob", 1), &mut generator(), now).unwrap();
        let solution = battle.puzzle.solution.clone();

        assert_eq!(
            battle.submit("ann", "1+1", now).unwrap(),
            BattleOutcome::Incorrect {
                attempts_remaining: 2
            }
        );
        let outcome = battle.submit("bob", &solution, now + Duration::from_secs(5)).unwrap();
        let rewards = BattleRewards {
            winner: "bob".to_string(),
            loser: "ann".to_string(),
        };
        assert_eq!(outcome, BattleOutcome::Won(rewards.clone()));
        assert_eq!(battle.attempts("ann"), Some(1));
        assert_eq!(battle.attempts("bob"), Some(1));

        assert_eq!(
            battle.submit("ann", &solution, now).unwrap(),
            BattleOutcome::Ended(BattleResult::Win {
                winner: "bob".to_string()
            })
        );

        let mut bob = GameSession::new();
        let mut ann = GameSession {
            trophies: 3,
            ..GameSession::new()
        };
        rewards.apply(&mut bob, &mut ann);
        assert_eq!(bob.score, WIN_POINTS);
        assert_eq!(bob.trophies, WIN_TROPHIES);
        assert_eq!(ann.trophies, 0);
    }

    #[test]
    fn test_late_answer_is_a_draw() {
        let now = Instant::now();
        let mut battle = Battle::ranked(("ann", 1), ("bob", 1), &mut generator(), now).unwrap();
        let solution = battle.puzzle.solution.clone();
        let late = now + RANKED_TIME_LIMIT + Duration::from_secs(1);

        assert_eq!(battle.submit("ann", &solution, late).unwrap(), BattleOutcome::TimeExpired);
        assert_eq!(battle.status, BattleStatus::Completed);
        assert_eq!(battle.result, Some(BattleResult::Draw));
        assert_eq!(battle.time_remaining(late), Duration::ZERO);
    }

    #[test]
    fn test_friendly_battle_requires_acceptance() {
        let now = Instant::now();
        let mut battle = Battle::friendly(("ann", 12), ("bob", 30), &mut generator(), now).unwrap();
        assert_eq!(battle.status, BattleStatus::Pending);
        assert_eq!(battle.time_limit, FRIENDLY_TIME_LIMIT);
        assert_eq!(battle.submit("ann", "1", now), Err(GameError::BattleNotActive));

        assert_eq!(
            battle.accept("ann", now),
            Err(GameError::NotAParticipant("ann".to_string()))
        );
        let later = now + Duration::from_secs(100);
        battle.accept("bob", later).unwrap();
        assert_eq!(battle.status, BattleStatus::Active);
        assert_eq!(battle.time_remaining(later), FRIENDLY_TIME_LIMIT);
        assert_eq!(battle.accept("bob", later), Err(GameError::BattleNotActive));
    }

    #[test]
    fn test_outsider_cannot_submit() {
        let now = Instant::now();
        let mut battle = Battle::ranked(("ann", 1), ("bob", 1), &mut generator(), now).unwrap();
        assert_eq!(
            battle.submit("eve", "1", now),
            Err(GameError::NotAParticipant("eve".to_string()))
        );
        assert_eq!(battle.attempts("eve"), None);
    }
}
