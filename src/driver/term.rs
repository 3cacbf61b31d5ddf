use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use thiserror::Error;

use crate::engine::AppTree;
use crate::error::TreeError;
use crate::input::InputSource;

pub type DriverResult<T> = std::result::Result<T, TermDriverError>;

#[derive(Debug, Error)]
pub enum TermDriverError {
    #[error("engine error: {0}")]
    Engine(#[from] TreeError),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Single key handed to the engine for exactly one poll.
struct PendingKey(Option<char>);

impl InputSource for PendingKey {
    fn poll_key(&mut self) -> Option<char> {
        self.0.take()
    }
}

/// Minimal terminal driver that owns an [`AppTree`] and manages raw mode +
/// alternate screen transitions. The engine itself stays device-agnostic;
/// this adapter turns crossterm key presses into the engine's single-char
/// input contract.
pub struct TermDriver {
    engine: AppTree,
    poll_interval: Duration,
    exit_key: Option<char>,
}

impl TermDriver {
    pub fn new(engine: AppTree) -> Self {
        Self {
            engine,
            poll_interval: Duration::from_millis(50),
            exit_key: None,
        }
    }

    /// Extra character that terminates the loop; escape always does.
    pub fn with_exit_key(mut self, key: char) -> Self {
        self.exit_key = Some(key);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Enter raw mode, enable the engine and pump key events until the exit
    /// key arrives. The terminal is restored on the way out even when the
    /// loop fails.
    pub fn run(mut self) -> DriverResult<()> {
        let mut stdout = io::stdout();
        self.enter(&mut stdout)?;
        let result = self.run_inner(&mut stdout);
        self.exit(&mut stdout);
        result
    }

    fn run_inner(&mut self, stdout: &mut impl Write) -> DriverResult<()> {
        self.engine.enable(stdout)?;

        loop {
            if !event::poll(self.poll_interval)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char(ch) => {
                    if self.exit_key == Some(ch) {
                        return Ok(());
                    }
                    let mut pending = PendingKey(Some(ch));
                    self.engine.handle_input(&mut pending, stdout)?;
                }
                _ => {}
            }
        }
    }

    fn enter(&self, stdout: &mut impl Write) -> DriverResult<()> {
        terminal::enable_raw_mode().map_err(|err| TermDriverError::Terminal(err.to_string()))?;
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(())
    }

    fn exit(&self, stdout: &mut impl Write) {
        execute!(stdout, Show, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_key_yields_once() {
        let mut pending = PendingKey(Some('s'));
        assert_eq!(pending.poll_key(), Some('s'));
        assert_eq!(pending.poll_key(), None);
    }
}
