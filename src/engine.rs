use log::{debug, info, warn};
use rand::rngs::StdRng;

use crate::config::{ConfigError, GameConfig};
use crate::food::FoodSpawner;
use crate::grid::{Cell, Direction, Grid};
use crate::interface::Command;
use crate::pathfinder::find_path;
use crate::snake::{CollisionKind, Snake, StepResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    User,
    Ai,
}

impl Mode {
    pub fn toggled(&self) -> Mode {
        match self {
            Mode::User => Mode::Ai,
            Mode::Ai => Mode::User,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    GameOver,
    /// The snake covers every cell; nowhere left to put food.
    Won,
}

/// What a single `tick` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickEvent {
    /// The game is over; nothing moved.
    Idle,
    Moved,
    Ate,
    Crashed(CollisionKind),
    BoardFilled,
}

/// Everything a renderer needs, detached from the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub grid: Grid,
    /// Head first.
    pub snake_cells: Vec<Cell>,
    pub food: Cell,
    pub score: u32,
    pub status: GameStatus,
    pub mode: Mode,
    /// Empty unless `mode` is `Mode::Ai`.
    pub ai_path: Vec<Cell>,
}

/// Owns all mutable game state and advances it one tick at a time.
#[derive(Debug)]
pub struct GameEngine {
    config: GameConfig,
    snake: Snake,
    food: Cell,
    heading: Direction,
    pending: Option<Direction>,
    mode: Mode,
    status: GameStatus,
    score: u32,
    ai_path: Vec<Cell>,
    spawner: FoodSpawner<StdRng>,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut engine = GameEngine {
            snake: Snake::new(config.start),
            food: config.initial_food,
            heading: Direction::Right,
            pending: None,
            mode: Mode::User,
            status: GameStatus::Running,
            score: 0,
            ai_path: Vec::new(),
            spawner: Self::spawner_for(&config),
            config,
        };
        engine.reset();
        Ok(engine)
    }

    fn spawner_for(config: &GameConfig) -> FoodSpawner<StdRng> {
        match config.seed {
            Some(seed) => FoodSpawner::seeded(seed),
            None => FoodSpawner::from_entropy(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    /// Back to the configured starting position, in user mode.
    pub fn reset(&mut self) {
        self.snake = Snake::new(self.config.start);
        self.food = self.config.initial_food;
        self.heading = Direction::Right;
        self.pending = None;
        self.mode = Mode::User;
        self.status = GameStatus::Running;
        self.score = 0;
        self.ai_path.clear();
        self.spawner = Self::spawner_for(&self.config);

        info!(
            "Game reset on {}x{} grid, snake at {:?}, food at {:?}",
            self.config.grid.cols, self.config.grid.rows, self.config.start, self.food
        );
    }

    /// Queues a turn for the next tick. Ignored outside user mode and when it
    /// would reverse the current heading.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.mode != Mode::User {
            return;
        }
        if direction.is_opposite(self.heading) {
            debug!("Ignoring reversal from {:?} to {:?}", self.heading, direction);
            return;
        }
        self.pending = Some(direction);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            info!("Switching mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        self.ai_path.clear();
        self.pending = None;
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Turn(direction) => self.set_direction(direction),
            Command::ToggleMode => self.toggle_mode(),
            Command::SetMode(mode) => self.set_mode(mode),
            Command::Reset => self.reset(),
            Command::Quit => {}
        }
    }

    /// Advances the simulation by one cell.
    pub fn tick(&mut self) -> TickEvent {
        if self.status != GameStatus::Running {
            return TickEvent::Idle;
        }

        self.heading = self.resolve_direction();

        let food = self.food;
        match self.snake.step(self.heading, self.config.grid, food) {
            StepResult::Collision(kind) => {
                self.status = GameStatus::GameOver;
                info!(
                    "Game over: {:?} collision heading {:?}, score {}",
                    kind, self.heading, self.score
                );
                TickEvent::Crashed(kind)
            }
            StepResult::Moved => TickEvent::Moved,
            StepResult::Ate => {
                self.score += 1;
                debug!("Captured food at {:?}, score {}", food, self.score);

                match self.spawner.spawn(self.config.grid, &self.snake.occupied()) {
                    Some(cell) => {
                        self.food = cell;
                        TickEvent::Ate
                    }
                    None => {
                        self.status = GameStatus::Won;
                        warn!("Board filled with score {}", self.score);
                        TickEvent::BoardFilled
                    }
                }
            }
        }
    }

    fn resolve_direction(&mut self) -> Direction {
        match self.mode {
            Mode::User => self.pending.take().unwrap_or(self.heading),
            Mode::Ai => {
                let head = self.snake.head();
                self.ai_path = find_path(self.config.grid, head, self.food, &self.snake.occupied());

                match self
                    .ai_path
                    .first()
                    .and_then(|next| Direction::between(head, *next))
                {
                    Some(direction) => direction,
                    None => {
                        debug!("No path from {:?} to {:?}, keeping {:?}", head, self.food, self.heading);
                        self.heading
                    }
                }
            }
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            grid: self.config.grid,
            snake_cells: self.snake.cells().collect(),
            food: self.food,
            score: self.score,
            status: self.status,
            mode: self.mode,
            ai_path: match self.mode {
                Mode::Ai => self.ai_path.clone(),
                Mode::User => Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_engine() -> GameEngine {
        let config = GameConfig::new(5, 5)
            .with_start(Cell::new(2, 2))
            .with_initial_food(Cell::new(4, 2))
            .with_seed(11);
        GameEngine::new(config).expect("valid config")
    }

    #[test]
    fn test_reset() {
        let engine = small_engine();
        let snapshot = engine.snapshot();

        assert_eq!(snapshot.snake_cells, vec![Cell::new(2, 2)]);
        assert_eq!(snapshot.food, Cell::new(4, 2));
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.status, GameStatus::Running);
        assert_eq!(snapshot.mode, Mode::User);
        assert!(snapshot.ai_path.is_empty());
        assert_eq!(engine.heading(), Direction::Right);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert_eq!(
            GameEngine::new(GameConfig::new(0, 0)).err(),
            Some(ConfigError::EmptyGrid { cols: 0, rows: 0 })
        );
    }

    #[test]
    fn test_ai_end_to_end() {
        let mut engine = small_engine();
        engine.set_mode(Mode::Ai);

        assert_eq!(engine.tick(), TickEvent::Moved);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.snake_cells[0], Cell::new(3, 2));
        assert_eq!(snapshot.status, GameStatus::Running);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.ai_path, vec![Cell::new(3, 2), Cell::new(4, 2)]);

        assert_eq!(engine.tick(), TickEvent::Ate);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.snake_cells, vec![Cell::new(4, 2), Cell::new(3, 2)]);
        assert_eq!(snapshot.score, 1);
        assert_eq!(snapshot.status, GameStatus::Running);
        assert_ne!(snapshot.food, Cell::new(4, 2));
        assert_ne!(snapshot.food, Cell::new(3, 2));
        assert!(snapshot.grid.in_bounds(snapshot.food));
    }

    #[test]
    fn test_ai_keeps_eating_without_crashing() {
        let config = GameConfig::new(12, 12)
            .with_start(Cell::new(1, 1))
            .with_initial_food(Cell::new(8, 3))
            .with_seed(2024);
        let mut engine = GameEngine::new(config).expect("valid config");
        engine.set_mode(Mode::Ai);

        let mut eaten = 0;
        for _ in 0..200 {
            match engine.tick() {
                TickEvent::Ate => {
                    eaten += 1;
                    assert!(!engine.snake().contains(engine.food()));
                }
                TickEvent::Crashed(_) | TickEvent::Idle => break,
                _ => {}
            }
            if eaten == 3 {
                break;
            }
        }

        assert_eq!(eaten, 3);
        assert_eq!(engine.score(), 3);
        assert_eq!(engine.snake().len(), 4);
    }

    #[test]
    fn test_food_capture_grows_and_scores() {
        let mut engine = small_engine();

        assert_eq!(engine.tick(), TickEvent::Moved);
        assert_eq!(engine.tick(), TickEvent::Ate);

        assert_eq!(engine.score(), 1);
        assert_eq!(engine.snake().len(), 2);
        assert!(!engine.snake().contains(engine.food()));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = small_engine();
        assert_eq!(engine.heading(), Direction::Right);

        engine.set_direction(Direction::Left);
        engine.tick();

        assert_eq!(engine.heading(), Direction::Right);
        assert_eq!(engine.snake().head(), Cell::new(3, 2));
    }

    #[test]
    fn test_turn_is_applied_on_next_tick() {
        let mut engine = small_engine();

        engine.set_direction(Direction::Down);
        assert_eq!(engine.heading(), Direction::Right, "not committed yet");
        engine.tick();

        assert_eq!(engine.heading(), Direction::Down);
        assert_eq!(engine.snake().head(), Cell::new(2, 3));

        // Without a new request the heading persists.
        engine.tick();
        assert_eq!(engine.snake().head(), Cell::new(2, 4));
    }

    #[test]
    fn test_two_requests_cannot_sneak_a_reversal() {
        let mut engine = small_engine();

        // Heading Right: Up is accepted, Left is still a reversal of the
        // committed heading and is ignored.
        engine.set_direction(Direction::Up);
        engine.set_direction(Direction::Left);
        engine.tick();

        assert_eq!(engine.heading(), Direction::Up);
        assert_eq!(engine.snake().head(), Cell::new(2, 1));
    }

    #[test]
    fn test_set_direction_ignored_in_ai_mode() {
        let mut engine = small_engine();
        engine.set_mode(Mode::Ai);

        engine.set_direction(Direction::Up);
        engine.tick();

        assert_eq!(engine.snake().head(), Cell::new(3, 2));
    }

    #[test]
    fn test_wall_collision_ends_game() {
        let mut engine = small_engine();

        engine.set_direction(Direction::Up);
        assert_eq!(engine.tick(), TickEvent::Moved);
        assert_eq!(engine.tick(), TickEvent::Moved);
        assert_eq!(engine.tick(), TickEvent::Crashed(CollisionKind::Wall));
        assert_eq!(engine.status(), GameStatus::GameOver);

        let frozen = engine.snapshot();
        assert_eq!(engine.tick(), TickEvent::Idle);
        assert_eq!(engine.snapshot(), frozen);
    }

    #[test]
    fn test_ai_without_path_keeps_heading() {
        let config = GameConfig::new(5, 5)
            .with_start(Cell::new(2, 2))
            .with_initial_food(Cell::new(0, 0))
            .with_seed(5);
        let mut engine = GameEngine::new(config).expect("valid config");
        // Both neighbours of the corner food are body cells.
        engine.snake = Snake::from_cells([
            Cell::new(2, 0),
            Cell::new(1, 0),
            Cell::new(1, 1),
            Cell::new(0, 1),
        ])
        .expect("valid snake");
        engine.set_mode(Mode::Ai);

        assert_eq!(engine.tick(), TickEvent::Moved);
        assert!(engine.snapshot().ai_path.is_empty());
        assert_eq!(engine.heading(), Direction::Right);
        assert_eq!(engine.snake().head(), Cell::new(3, 0));
        assert_eq!(engine.status(), GameStatus::Running);
    }

    #[test]
    fn test_set_mode_clears_path() {
        let mut engine = small_engine();
        engine.set_mode(Mode::Ai);
        engine.tick();
        assert!(!engine.snapshot().ai_path.is_empty());

        engine.toggle_mode();
        assert_eq!(engine.mode(), Mode::User);
        assert!(engine.snapshot().ai_path.is_empty());

        engine.set_mode(Mode::Ai);
        assert!(engine.snapshot().ai_path.is_empty());
    }

    #[test]
    fn test_reset_restores_initial_snapshot() {
        let mut engine = small_engine();
        let initial = engine.snapshot();

        engine.set_mode(Mode::Ai);
        engine.tick();
        engine.tick();
        assert_eq!(engine.score(), 1);
        engine.reset();
        assert_eq!(engine.snapshot(), initial);

        engine.set_direction(Direction::Down);
        for _ in 0..5 {
            engine.tick();
        }
        assert_eq!(engine.status(), GameStatus::GameOver);
        engine.apply(Command::Reset);
        assert_eq!(engine.snapshot(), initial);
        assert_eq!(engine.heading(), Direction::Right);
    }

    #[test]
    fn test_reset_replays_same_food_sequence() {
        let mut engine = small_engine();
        engine.set_mode(Mode::Ai);
        engine.tick();
        engine.tick();
        let first_food = engine.food();

        engine.reset();
        engine.set_mode(Mode::Ai);
        engine.tick();
        engine.tick();
        assert_eq!(engine.food(), first_food);
    }

    #[test]
    fn test_board_filled_wins() {
        // 2x1 board: eating the only food covers every cell.
        let config = GameConfig::new(2, 1)
            .with_start(Cell::new(0, 0))
            .with_initial_food(Cell::new(1, 0))
            .with_seed(1);
        let mut engine = GameEngine::new(config).expect("valid config");

        assert_eq!(engine.tick(), TickEvent::BoardFilled);
        assert_eq!(engine.status(), GameStatus::Won);
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.snake().len(), 2);
        assert_eq!(engine.tick(), TickEvent::Idle);
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut engine = small_engine();

        engine.apply(Command::ToggleMode);
        assert_eq!(engine.mode(), Mode::Ai);
        engine.apply(Command::SetMode(Mode::User));
        assert_eq!(engine.mode(), Mode::User);
        engine.apply(Command::Turn(Direction::Down));
        engine.apply(Command::Quit);
        engine.tick();
        assert_eq!(engine.snake().head(), Cell::new(2, 3));
    }
}
