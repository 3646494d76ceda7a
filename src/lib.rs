//! Pathsnek - a snake that can steer itself.
//!
//! The simulation core is free of any terminal or timer code:
//! - `grid`: cells, directions and board bounds
//! - `pathfinder`: A* from the head to the food
//! - `snake`: the body and its single-step move
//! - `food`: seedable placement on free cells
//! - `engine`: the tick state machine that ties them together
//!
//! Hosts drive it through the `interface` traits.

pub mod config;
pub mod engine;
pub mod food;
pub mod grid;
pub mod interface;
pub mod pathfinder;
pub mod snake;

pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, GameStatus, Mode, RenderSnapshot, TickEvent};
pub use food::FoodSpawner;
pub use grid::{Cell, Direction, Grid};
pub use interface::{Command, InputSource, RenderSink};
pub use pathfinder::find_path;
pub use snake::{CollisionKind, Snake, StepResult};
