//! Duck Season entry point
//!
//! The browser build is driven from JavaScript through `DuckGame`. Natively
//! this runs a headless season with a scripted input pattern and reports what
//! happened.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use duck_season::consts::*;
    use duck_season::platform::RenderTarget;
    use duck_season::rewards::PlayerProgress;
    use duck_season::sim::{GameEvent, Snapshot, TickInput};
    use duck_season::{GameLoop, GameRewards, GameSessionSummary, Settings};

    struct ConsoleHud {
        last_second: Option<u32>,
    }

    impl RenderTarget for ConsoleHud {
        fn present(&mut self, snapshot: &Snapshot) {
            if self.last_second == Some(snapshot.time_remaining_seconds) {
                return;
            }
            self.last_second = Some(snapshot.time_remaining_seconds);
            if snapshot.time_remaining_seconds % 10 == 0 {
                log::info!(
                    "[{:>3}s] level {} {:?} hearts {} at ({:.0}, {:.0})",
                    snapshot.time_remaining_seconds,
                    snapshot.level_index,
                    snapshot.phase,
                    snapshot.hearts_remaining,
                    snapshot.player_position.x,
                    snapshot.player_position.y
                );
            }
        }
    }

    /// Walk right, hop, walk back, repeat
    fn scripted_input(frame: u64) -> TickInput {
        match frame % 240 {
            0..=89 => TickInput {
                right: true,
                ..Default::default()
            },
            90..=119 => TickInput {
                right: true,
                jump: true,
                ..Default::default()
            },
            120..=209 => TickInput {
                left: true,
                ..Default::default()
            },
            _ => TickInput {
                jump: true,
                ..Default::default()
            },
        }
    }

    env_logger::init();
    log::info!("Duck Season (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);
    let settings = Settings::load();

    let mut game = match GameLoop::with_builtin_levels(&settings, seed, PlayerProgress::load()) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Failed to load levels: {}", e);
            std::process::exit(1);
        }
    };

    let mut hud = ConsoleHud { last_second: None };
    let mut completed = None;
    let mut sink = |summary: &GameSessionSummary, rewards: &GameRewards| {
        completed = Some((summary.clone(), rewards.clone()));
    };

    // One full season budget
    let frames = (settings.season.time_budget_seconds as u64 + 1) * FRAMES_PER_SECOND;
    'run: for frame in 0..frames {
        let events = game.update(SIM_DT, &scripted_input(frame), &mut sink);
        game.render(&mut hud);
        for event in events {
            match event {
                GameEvent::SeasonFailed { .. } | GameEvent::SeasonComplete(_) => break 'run,
                other => log::debug!("{:?}", other),
            }
        }
    }

    let summary = match &completed {
        Some((summary, _)) => summary.clone(),
        None => game.season().summary(),
    };
    println!("\nSession {:016x}", summary.session_id);
    println!("  levels cleared: {}", summary.levels_completed);
    println!("  score:          {}", summary.final_score);
    println!("  elapsed:        {}s", summary.elapsed_seconds);
    println!("  took damage:    {}", summary.took_damage);

    let calculator = game.calculator();
    match &completed {
        Some((_, rewards)) => {
            println!("  XP awarded:     {}", rewards.xp_awarded);
            for reason in &rewards.breakdown.reasons {
                println!("    - {}", reason);
            }
        }
        None => {
            let preview = calculator.potential_rewards(&summary);
            println!(
                "  season not finished; a clear could pay {}-{} XP",
                preview.min_xp, preview.max_xp
            );
        }
    }

    let total_xp = game.progress().counters.total_xp;
    let level = calculator.ladder.calculate_level(total_xp);
    println!(
        "  player level:   {} {} ({} XP, next: {})",
        level.level,
        level.title,
        total_xp,
        calculator.ladder.estimated_time_to_next_level(total_xp, 100.0)
    );
    game.progress().save();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `duck_season::web::start`, this is just to satisfy the compiler
}
