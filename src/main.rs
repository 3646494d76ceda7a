mod tui;

use clap::{Parser, ValueEnum};
use log::{error, info};
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::io;
use std::time::{Duration, Instant};

use pathsnek::{Cell, Command, GameConfig, GameEngine, InputSource, Mode, RenderSink};
use tui::Tui;

const LOG_FILE: &str = "pathsnek.log";

#[derive(Parser)]
#[command(name = "pathsnek")]
#[command(version, about = "Snake that can find its own way to the food")]
struct Cli {
    /// Grid width in cells
    #[arg(long, default_value_t = 30)]
    cols: u16,

    /// Grid height in cells
    #[arg(long, default_value_t = 20)]
    rows: u16,

    /// Milliseconds per simulation tick
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Seed for food placement; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the snake steering itself
    #[arg(long)]
    ai: bool,

    /// Log level written to pathsnek.log
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        let mut config = GameConfig::new(self.cols, self.rows)
            .with_tick_interval(Duration::from_millis(self.tick_ms));
        // The default start and food only fit boards of at least 11x11.
        if !config.grid.in_bounds(config.initial_food) {
            let (cols, rows) = (i32::from(self.cols), i32::from(self.rows));
            let start = Cell::new(cols / 4, rows / 2);
            let mut food = Cell::new(cols * 3 / 4, rows / 2);
            // One column wide: put the food in the next row instead.
            // A 1x1 board still ends up with both on one cell and is rejected.
            if food == start {
                food = Cell::new(start.col, (start.row + 1) % rows.max(1));
            }
            config = config.with_start(start).with_initial_food(food);
        }
        config.seed = self.seed;
        config
    }
}

fn main() -> Result<(), io::Error> {
    let cli = Cli::parse();

    // Stdout belongs to the terminal UI, so logs go to a file.
    WriteLogger::init(cli.log_level.into(), Config::default(), File::create(LOG_FILE)?)
        .map_err(io::Error::other)?;

    let config = cli.game_config();
    let mut engine = GameEngine::new(config).map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    if cli.ai {
        engine.set_mode(Mode::Ai);
    }

    info!("Starting pathsnek");

    tui::install_panic_hook();
    let mut tui = Tui::enter()?;
    let result = run(&mut engine, &mut tui);
    if let Err(e) = &result {
        error!("Game loop failed: {}", e);
    }
    let restored = tui.restore();

    info!("Exiting with score {}", engine.score());
    result.and(restored)
}

/// Drives the engine at its tick interval, forwarding commands in between
/// and blinking the food on its own, faster cadence.
fn run(engine: &mut GameEngine, tui: &mut Tui) -> io::Result<()> {
    let tick_rate = engine.config().tick_interval;
    let blink_rate = engine.config().blink_interval;
    let mut last_tick = Instant::now();
    let mut last_blink = Instant::now();

    tui.present(&engine.snapshot())?;

    loop {
        let timeout = tick_rate
            .saturating_sub(last_tick.elapsed())
            .min(blink_rate.saturating_sub(last_blink.elapsed()));

        if let Some(command) = tui.next_command(timeout)? {
            if command == Command::Quit {
                return Ok(());
            }
            engine.apply(command);
            tui.present(&engine.snapshot())?;
        }

        if last_blink.elapsed() >= blink_rate {
            tui.toggle_blink()?;
            last_blink = Instant::now();
        }

        if last_tick.elapsed() >= tick_rate {
            engine.tick();
            tui.present(&engine.snapshot())?;
            last_tick = Instant::now();
        }
    }
}
