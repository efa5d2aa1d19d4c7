//! Terminal isotile runner (default binary).
//!
//! Loads configuration and the tile atlas, then runs the fixed-step frame loop:
//! crossterm events feed the input handler, the core advances one frame per
//! tick, and the scene is rasterized into a framebuffer diffed onto the terminal.
//! Logs go to `logs/isotile.log`; the terminal itself belongs to the renderer.

use std::fs::{self, OpenOptions};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing_subscriber::{prelude::*, EnvFilter};

use isotile::core::{Atlas, FrameOutcome, Game, GameConfig};
use isotile::input::{should_quit, InputHandler};
use isotile::term::{FrameBuffer, IsoView, TerminalRenderer, Viewport};
use isotile::types::TICK_MS;

fn main() -> Result<()> {
    init_logging()?;

    let config = GameConfig::load().context("failed to load configuration")?;
    let atlas = Atlas::load(&config.atlas_path)
        .with_context(|| format!("failed to load tile atlas {}", config.atlas_path.display()))?;
    let mut game = Game::from_config(&config, Arc::new(atlas));
    tracing::info!(
        board_size = config.board_size,
        policy = ?config.advance_policy,
        seed = ?config.seed,
        "starting"
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut game);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(err) = &result {
        tracing::error!(error = %err, "exiting with error");
    }
    result
}

fn run(term: &mut TerminalRenderer, game: &mut Game) -> Result<()> {
    let view = IsoView::for_projection(game.session().projection());
    let mut input = InputHandler::new();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(u64::from(TICK_MS));

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        view.render_into(game, viewport, &mut fb);
        term.present(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press && should_quit(key) {
                        return Ok(());
                    }
                    input.handle_key(key);
                }
                Event::Mouse(mouse) => input.handle_mouse(mouse),
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);

            let camera = *game.session().camera();
            let pointer = input
                .mouse()
                .map(|(col, row)| view.term_to_world(col, row, &camera, viewport))
                .unwrap_or_default();

            let frame = input.frame(pointer, elapsed_ms);
            if game.frame(&frame) == FrameOutcome::Quit {
                return Ok(());
            }
        }
    }
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("isotile.log"))
        .context("failed to open log file")?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
