//! Terminal session: raw mode and capture setup, restored on drop.

use crossterm::{
    cursor,
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::time::Duration;

/// Configuration for the terminal host.
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// How long the input thread waits for events before checking shutdown.
    pub poll_timeout: Duration,
    /// Whether to enable mouse capture.
    pub enable_mouse: bool,
    /// Whether to use alternate screen buffer.
    pub alternate_screen: bool,
    /// Ask the terminal for key release events when it supports them.
    pub report_key_releases: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(10),
            enable_mouse: true,
            alternate_screen: true,
            report_key_releases: true,
        }
    }
}

/// Active terminal session.
///
/// Entering switches the terminal to raw mode and enables the requested
/// capture modes; dropping the session undoes all of it.
pub struct TerminalSession {
    config: TerminalConfig,
    width: u16,
    height: u16,
    capture: CaptureState,
}

/// Capture modes enabled so far; teardown undoes exactly these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CaptureState {
    alternate_screen: bool,
    mouse_capture: bool,
    focus_change: bool,
    key_releases: bool,
}

impl CaptureState {
    /// Undo every enabled mode, newest first. Failures are ignored so one
    /// broken step does not leave the rest enabled.
    fn restore<W: Write>(&self, out: &mut W) {
        if self.key_releases {
            let _ = execute!(out, PopKeyboardEnhancementFlags);
        }
        if self.focus_change {
            let _ = execute!(out, DisableFocusChange, cursor::Show);
        }
        if self.mouse_capture {
            let _ = execute!(out, DisableMouseCapture);
        }
        if self.alternate_screen {
            let _ = execute!(out, LeaveAlternateScreen);
        }
    }
}

impl TerminalSession {
    /// Enter raw mode and enable capture per `config`.
    ///
    /// If a step fails, the steps already taken are undone before the error
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails (raw mode, alternate screen,
    /// etc.).
    pub fn enter(config: TerminalConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        terminal::enable_raw_mode()?;

        // From here on, an early return drops `session` and restores the
        // terminal.
        let mut session = Self {
            config,
            width,
            height,
            capture: CaptureState::default(),
        };

        let mut stdout = io::stdout();
        if session.config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
            session.capture.alternate_screen = true;
        }
        if session.config.enable_mouse {
            execute!(stdout, EnableMouseCapture)?;
            session.capture.mouse_capture = true;
        }
        execute!(stdout, EnableFocusChange, cursor::Hide)?;
        session.capture.focus_change = true;

        if session.config.report_key_releases
            && terminal::supports_keyboard_enhancement().unwrap_or(false)
        {
            // Disambiguated codes are needed for lock-key state.
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
            session.capture.key_releases = true;
        }
        stdout.flush()?;

        tracing::info!(width, height, key_releases = session.capture.key_releases, "terminal session started");
        Ok(session)
    }

    /// Whether the terminal reports key releases.
    ///
    /// When it does not, the input thread synthesizes a release right after
    /// every press.
    #[inline]
    pub const fn reports_key_releases(&self) -> bool {
        self.capture.key_releases
    }

    /// Terminal size at session start, in cells.
    #[inline]
    pub const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Session configuration.
    #[inline]
    pub const fn config(&self) -> &TerminalConfig {
        &self.config
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.capture.restore(&mut io::stdout());
        let _ = terminal::disable_raw_mode();
        tracing::info!("terminal session ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teardown(capture: CaptureState) -> String {
        let mut out = Vec::new();
        capture.restore(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_partial_setup_restores_only_enabled_modes() {
        // Alternate screen entered, mouse capture failed.
        let partial = CaptureState {
            alternate_screen: true,
            ..CaptureState::default()
        };
        let written = teardown(partial);
        assert!(written.contains("\x1b[?1049l"));
        assert!(!written.contains("\x1b[?1000l"));
        assert!(!written.contains("\x1b[?1004l"));
    }

    #[test]
    fn test_full_setup_restores_everything() {
        let full = CaptureState {
            alternate_screen: true,
            mouse_capture: true,
            focus_change: true,
            key_releases: true,
        };
        let written = teardown(full);
        assert!(written.contains("\x1b[?1049l"));
        assert!(written.contains("\x1b[?1000l"));
        assert!(written.contains("\x1b[?1004l"));
        assert!(written.contains("\x1b[?25h"));
        assert!(written.contains("\x1b[<1u"));

        // Leaving the alternate screen comes last.
        assert!(written.ends_with("\x1b[?1049l"));
    }

    #[test]
    fn test_nothing_enabled_writes_nothing() {
        assert!(teardown(CaptureState::default()).is_empty());
    }
}
