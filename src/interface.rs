//! Seams between the simulation core and whatever hosts it.

use std::io;
use std::time::Duration;

use crate::engine::{Mode, RenderSnapshot};
use crate::grid::Direction;

/// One user intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    ToggleMode,
    SetMode(Mode),
    Reset,
    /// Handled by the host; the engine ignores it.
    Quit,
}

/// Produces commands, e.g. from a keyboard.
pub trait InputSource {
    /// Waits at most `timeout` for the next command.
    fn next_command(&mut self, timeout: Duration) -> io::Result<Option<Command>>;
}

/// Consumes the state to display after each tick.
pub trait RenderSink {
    fn present(&mut self, snapshot: &RenderSnapshot) -> io::Result<()>;
}
