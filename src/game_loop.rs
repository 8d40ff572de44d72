//! Fixed-timestep driver
//!
//! Owns one season and the player's progress. Frame steps and the 1 Hz
//! countdown run on a single queue of simulated time inside `update`, so a
//! timer tick can never interleave with a half-finished frame. Seconds are
//! counted from the moment the current season started or was reset.

use crate::consts::*;
use crate::frames_to_ms;
use crate::platform::{InputSource, RenderTarget, RewardSink};
use crate::rewards::{GameRewards, PlayerProgress, RewardCalculator};
use crate::settings::Settings;
use crate::sim::{
    GameEvent, GameSessionSummary, LevelCatalog, LevelError, LevelSource, Season, tick,
};

pub struct GameLoop<L: LevelSource = LevelCatalog> {
    season: Season<L>,
    calculator: RewardCalculator,
    progress: PlayerProgress,
    accumulator: f32,
    /// Frames simulated since the loop started
    frame: u64,
}

impl GameLoop<LevelCatalog> {
    /// Loop over the built-in levels
    pub fn with_builtin_levels(
        settings: &Settings,
        seed: u64,
        progress: PlayerProgress,
    ) -> Result<Self, LevelError> {
        let season = Season::with_builtin_levels(settings, seed, 0)?;
        Ok(Self::new(season, RewardCalculator::default(), progress))
    }
}

impl<L: LevelSource> GameLoop<L> {
    pub fn new(season: Season<L>, calculator: RewardCalculator, progress: PlayerProgress) -> Self {
        Self {
            season,
            calculator,
            progress,
            accumulator: 0.0,
            frame: 0,
        }
    }

    pub fn season(&self) -> &Season<L> {
        &self.season
    }

    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    pub fn calculator(&self) -> &RewardCalculator {
        &self.calculator
    }

    /// Simulated time in milliseconds
    pub fn now_ms(&self) -> u64 {
        frames_to_ms(self.frame)
    }

    /// Run as many fixed frames as `dt` seconds cover
    pub fn update(
        &mut self,
        dt: f32,
        input: &impl InputSource,
        sink: &mut impl RewardSink,
    ) -> Vec<GameEvent> {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.frame += 1;
            let now = self.now_ms();

            tick(&mut self.season, &input.intent(), now);
            // Countdown is anchored to the current season's start
            let elapsed = now.saturating_sub(self.season.state().started_at_ms);
            if elapsed > 0 && elapsed % 1000 == 0 {
                self.season.timer_tick(now);
            }

            for event in self.season.drain_events() {
                if let GameEvent::SeasonComplete(summary) = &event {
                    self.award(summary, sink);
                }
                events.push(event);
            }

            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        events
    }

    /// Present the current state
    pub fn render(&self, target: &mut impl RenderTarget) {
        target.present(&self.season.snapshot(self.now_ms()));
    }

    /// Abandon the current season and start a new one
    pub fn restart(&mut self, seed: u64) {
        let now = self.now_ms();
        self.season.restart(seed, now);
        self.accumulator = 0.0;
    }

    /// Daily login bonus for day `today` (days since the Unix epoch)
    pub fn daily_login(&mut self, today: u32) -> GameRewards {
        let rewards = self.calculator.compute_daily_login_rewards(
            &self.progress.counters,
            &self.progress.badges,
            today,
        );
        self.apply(&rewards);
        rewards
    }

    /// Tournament victory bonus
    pub fn tournament_win(&mut self) -> GameRewards {
        let rewards = self
            .calculator
            .compute_tournament_rewards(&self.progress.counters, &self.progress.badges);
        self.apply(&rewards);
        rewards
    }

    fn award(&mut self, summary: &GameSessionSummary, sink: &mut impl RewardSink) {
        let rewards = self.calculator.compute_season_rewards(
            summary,
            &self.progress.counters,
            &self.progress.badges,
        );
        self.apply(&rewards);
        sink.submit(summary, &rewards);
    }

    fn apply(&mut self, rewards: &GameRewards) {
        self.progress.counters = rewards.new_counters.clone();
        self.progress.badges.extend(rewards.badges_earned.iter().copied());
        if let Some(level_up) = &rewards.level_up {
            log::info!("Reached level {}: {}", level_up.level, level_up.title);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::BadgeId;
    use crate::sim::{SeasonPhase, Snapshot, TickInput, Trigger};

    fn game() -> GameLoop {
        GameLoop::with_builtin_levels(&Settings::default(), 11, PlayerProgress::new()).unwrap()
    }

    fn ignore(_: &GameSessionSummary, _: &GameRewards) {}

    #[test]
    fn test_one_frame_per_step() {
        let mut game = game();
        game.update(SIM_DT, &TickInput::default(), &mut ignore);
        assert_eq!(game.frame, 1);
        assert_eq!(game.now_ms(), 16);

        // Large deltas are clamped, then capped by the substep limit
        game.update(5.0, &TickInput::default(), &mut ignore);
        assert!(game.frame <= 1 + MAX_SUBSTEPS as u64);
        assert!(game.frame >= 6);
    }

    #[test]
    fn test_countdown_runs_once_per_second() {
        let mut game = game();
        for _ in 0..120 {
            game.update(SIM_DT, &TickInput::default(), &mut ignore);
        }
        assert_eq!(game.frame, 120);
        assert_eq!(game.season().state().time_remaining_seconds, 298);
    }

    #[test]
    fn test_restart_mid_second_keeps_full_budget() {
        let mut game = game();
        for _ in 0..50 {
            game.update(SIM_DT, &TickInput::default(), &mut ignore);
        }
        game.restart(2);

        for _ in 0..30 {
            game.update(SIM_DT, &TickInput::default(), &mut ignore);
        }
        assert_eq!(game.season().state().time_remaining_seconds, 300);

        for _ in 0..30 {
            game.update(SIM_DT, &TickInput::default(), &mut ignore);
        }
        assert_eq!(game.season().state().time_remaining_seconds, 299);
    }

    #[test]
    fn test_completion_awards_rewards() {
        let mut game = game();
        for level in 1..=5 {
            game.season.handle(Trigger::KeyCollected, game.now_ms());
            game.season.handle(Trigger::DoorReached, game.now_ms());
            assert_eq!(game.season().state().levels_completed, level);
            // Two seconds of transition
            for _ in 0..121 {
                game.update(SIM_DT, &TickInput::default(), &mut ignore);
            }
        }
        assert_eq!(game.season().phase(), SeasonPhase::SeasonComplete);

        let counters = &game.progress().counters;
        assert_eq!(counters.games_played, 1);
        assert_eq!(counters.games_won, 1);
        assert!(counters.total_xp > 0);
        assert!(game.progress().has_badge(BadgeId::FirstGame));
    }

    #[test]
    fn test_sink_receives_completion() {
        let mut game = game();
        let mut received = Vec::new();
        let mut sink = |summary: &GameSessionSummary, rewards: &GameRewards| {
            received.push((summary.clone(), rewards.xp_awarded));
        };

        let mut completions = 0;
        for _ in 1..=5 {
            game.season.handle(Trigger::KeyCollected, game.now_ms());
            game.season.handle(Trigger::DoorReached, game.now_ms());
            for _ in 0..121 {
                let events = game.update(SIM_DT, &TickInput::default(), &mut sink);
                completions += events
                    .iter()
                    .filter(|e| matches!(e, GameEvent::SeasonComplete(_)))
                    .count();
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0.levels_completed, 5);
        assert!(received[0].1 >= 50);
    }

    #[test]
    fn test_render_presents_snapshot() {
        struct Capture(Option<Snapshot>);
        impl RenderTarget for Capture {
            fn present(&mut self, snapshot: &Snapshot) {
                self.0 = Some(snapshot.clone());
            }
        }

        let game = game();
        let mut capture = Capture(None);
        game.render(&mut capture);
        let snapshot = capture.0.unwrap();
        assert_eq!(snapshot.level_index, 1);
        assert_eq!(snapshot.hearts_remaining, 3);
    }

    #[test]
    fn test_daily_login_updates_progress() {
        let mut game = game();
        let rewards = game.daily_login(20_000);
        assert_eq!(rewards.xp_awarded, 30);
        assert_eq!(game.progress().counters.total_xp, 30);
        assert_eq!(game.daily_login(20_000).xp_awarded, 0);

        let rewards = game.tournament_win();
        assert_eq!(rewards.badges_earned, vec![BadgeId::TournamentWinner]);
        assert!(game.progress().has_badge(BadgeId::TournamentWinner));
    }
}
