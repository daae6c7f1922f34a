//! BlortNix demo entry point
//!
//! Natively this runs a few headless autoplay games against the on-disk high
//! score, narrating events through the logger. Set `RUST_LOG=info` to watch,
//! and `BLORTNIX_TUNING=<file.json>` to play with alternative balance.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use rand::Rng;

    use blortnix::autoplay::Autoplay;
    use blortnix::feedback::{self, LogSink};
    use blortnix::highscores::FileStore;
    use blortnix::{GamePhase, GameSession, Tuning};

    /// Simulated frame length (~60 FPS)
    const FRAME_MS: u64 = 16;
    /// Demo games per run
    const GAMES: u32 = 3;
    /// Give up on a game after this much session time
    const GAME_TIME_LIMIT_MS: u64 = 10 * 60 * 1000;

    env_logger::init();
    log::info!("BlortNix (native demo) starting...");

    let tuning = match std::env::var("BLORTNIX_TUNING") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading tuning file {}", path))?;
            Tuning::from_json(&json).with_context(|| format!("parsing tuning file {}", path))?
        }
        Err(_) => Tuning::default(),
    };

    let store = FileStore::in_config_dir();
    log::info!("High score file: {}", store.path().display());

    let seed: u64 = rand::rng().random();
    log::info!("Session seed: {}", seed);
    let mut session = GameSession::new(seed, tuning, store);
    let mut bot = Autoplay::default();
    let mut sink = LogSink;

    for game in 1..=GAMES {
        session.start();
        bot.reset();
        let started_at = session.now_ms();
        let mut frames = 0u64;

        while session.phase() == GamePhase::Playing
            && session.now_ms().saturating_sub(started_at) < GAME_TIME_LIMIT_MS
        {
            session.tick(FRAME_MS);
            frames += 1;

            // Take a short break partway through each game
            if frames == 600 {
                session.pause();
                session.tick(2_000);
                session.resume();
            }

            if let Some(coord) = bot.next_tap(&session.snapshot()) {
                session.tap(coord.row, coord.col);
            }
            feedback::dispatch(session.drain_events(), &mut sink);
        }

        let snapshot = session.snapshot();
        log::info!(
            "Game {}: score {} level {} misses {} (high score {})",
            game,
            snapshot.score,
            snapshot.level,
            snapshot.misses,
            snapshot.high_score
        );
        session.go_home();
    }

    println!("High score: {}", session.high_score());
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The engine is embedded by a web front end; there is no wasm entry point
}
