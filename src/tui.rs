use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Stylize},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::panic;
use std::time::Duration;

use pathsnek::{Cell, Command, Direction, GameStatus, InputSource, Mode, RenderSink, RenderSnapshot};

const HEAD_SYMBOL: &str = "@";
const BODY_SYMBOL: &str = "o";
const PATH_SYMBOL: &str = "·";
const FOOD_SYMBOL: &str = "●";

/// Maps a key press to an engine command.
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w') => Some(Command::Turn(Direction::Up)),
        KeyCode::Down | KeyCode::Char('s') => Some(Command::Turn(Direction::Down)),
        KeyCode::Left | KeyCode::Char('a') => Some(Command::Turn(Direction::Left)),
        KeyCode::Right | KeyCode::Char('d') => Some(Command::Turn(Direction::Right)),
        KeyCode::Char('m') => Some(Command::ToggleMode),
        KeyCode::Char('r') => Some(Command::Reset),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Leaves raw mode and the alternate screen, and shows the cursor. Every
/// step is attempted; the first error is returned.
fn restore_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    let mut stdout = io::stdout();
    let screen = execute!(stdout, LeaveAlternateScreen, Show);
    raw.and(screen)
}

/// Runs `undo` when `result` is an error, then passes the result through.
fn rollback_on_err<T>(result: io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        undo();
    }
    result
}

/// Restores the terminal before the default panic message is printed.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        previous(info);
    }));
}

/// Restores the terminal when dropped, unless already disarmed.
struct TerminalGuard {
    armed: bool,
}

impl TerminalGuard {
    fn disarm(&mut self) -> io::Result<()> {
        if !self.armed {
            return Ok(());
        }
        self.armed = false;
        restore_terminal()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = restore_terminal();
        }
    }
}

/// Terminal host: reads keys and draws snapshots.
pub struct Tui<B: Backend = CrosstermBackend<Stdout>> {
    terminal: Terminal<B>,
    show_food: bool,
    last: Option<RenderSnapshot>,
    guard: Option<TerminalGuard>,
}

impl Tui<CrosstermBackend<Stdout>> {
    /// Switches to raw mode and the alternate screen. If any step fails the
    /// terminal is put back before the error is returned.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        let terminal = rollback_on_err(
            execute!(stdout, EnterAlternateScreen)
                .and_then(|_| Terminal::new(CrosstermBackend::new(stdout))),
            || {
                let _ = restore_terminal();
            },
        )?;

        let mut tui = Tui::new(terminal);
        tui.guard = Some(TerminalGuard { armed: true });
        Ok(tui)
    }
}

impl<B: Backend> Tui<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Tui {
            terminal,
            show_food: true,
            last: None,
            guard: None,
        }
    }

    pub fn restore(&mut self) -> io::Result<()> {
        match self.guard.as_mut() {
            Some(guard) => guard.disarm(),
            None => Ok(()),
        }
    }

    /// Flips the food blink phase and redraws the last snapshot.
    pub fn toggle_blink(&mut self) -> io::Result<()> {
        self.show_food = !self.show_food;
        self.redraw()
    }

    fn redraw(&mut self) -> io::Result<()> {
        if let Some(snapshot) = &self.last {
            let show_food = self.show_food;
            self.terminal.draw(|frame| draw(frame, snapshot, show_food))?;
        }
        Ok(())
    }
}

impl<B: Backend> InputSource for Tui<B> {
    fn next_command(&mut self, timeout: Duration) -> io::Result<Option<Command>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) => Ok(command_for_key(key)),
            _ => Ok(None),
        }
    }
}

impl<B: Backend> RenderSink for Tui<B> {
    fn present(&mut self, snapshot: &RenderSnapshot) -> io::Result<()> {
        self.last = Some(snapshot.clone());
        self.redraw()
    }
}

pub fn draw(frame: &mut Frame, snapshot: &RenderSnapshot, show_food: bool) {
    let [header, arena] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(frame.area());

    let mode = match snapshot.mode {
        Mode::User => "User",
        Mode::Ai => "AI",
    };
    frame.render_widget(
        Paragraph::new(format!(
            "SNEK    Score: {}    Mode: {}    [arrows/wasd] turn  [m] mode  [r] restart  [q] quit",
            snapshot.score, mode
        ))
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL)),
        header,
    );

    let title = match snapshot.status {
        GameStatus::Running => "Playing",
        GameStatus::GameOver => "Game over",
        GameStatus::Won => "Board cleared",
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(arena);
    frame.render_widget(block, arena);
    frame.render_widget(BoardView { snapshot, show_food }, inner);

    let banner = match snapshot.status {
        GameStatus::Running => None,
        GameStatus::GameOver => Some("GAME OVER"),
        GameStatus::Won => Some("BOARD CLEARED"),
    };
    if let Some(banner) = banner {
        frame.render_widget(
            Paragraph::new(format!(
                "{}\nFinal Score: {}\nPress r to play again",
                banner, snapshot.score
            ))
            .alignment(Alignment::Center)
            .red()
            .bold(),
            inner,
        );
    }
}

/// One terminal cell per board cell.
pub struct BoardView<'a> {
    pub snapshot: &'a RenderSnapshot,
    pub show_food: bool,
}

impl BoardView<'_> {
    fn paint(buf: &mut Buffer, area: Rect, cell: Cell, symbol: &str, fg: Color, bg: Option<Color>) {
        let (Ok(col), Ok(row)) = (u16::try_from(cell.col), u16::try_from(cell.row)) else {
            return;
        };
        if col >= area.width || row >= area.height {
            return;
        }
        if let Some(target) = buf.cell_mut((area.x + col, area.y + row)) {
            target.set_symbol(symbol).set_fg(fg);
            if let Some(bg) = bg {
                target.set_bg(bg);
            }
        }
    }
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for cell in &self.snapshot.ai_path {
            Self::paint(buf, area, *cell, PATH_SYMBOL, Color::LightBlue, None);
        }

        if self.show_food {
            Self::paint(buf, area, self.snapshot.food, FOOD_SYMBOL, Color::LightRed, None);
        }

        let mut cells = self.snapshot.snake_cells.iter();
        if let Some(head) = cells.next() {
            for cell in cells {
                Self::paint(buf, area, *cell, BODY_SYMBOL, Color::Black, Some(Color::Green));
            }
            Self::paint(buf, area, *head, HEAD_SYMBOL, Color::Yellow, Some(Color::Green));
        }
    }
}
