//! `TerminalSurface`: single-syscall output buffer handed to `Game::render`.

use crate::frame::RenderSurface;
use std::io::{self, Stdout, Write};

/// True-color RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

/// Terminal drawing surface.
///
/// Draw calls only append ANSI sequences to an in-memory buffer;
/// [`RenderSurface::present`] writes the whole frame in one `write()` so the
/// terminal never shows a half-drawn frame.
pub struct TerminalSurface<W: Write = Stdout> {
    data: Vec<u8>,
    writer: W,
    width: u16,
    height: u16,
    clear_each_frame: bool,
}

impl TerminalSurface<Stdout> {
    /// Surface writing to stdout.
    pub fn stdout(width: u16, height: u16) -> Self {
        Self::new(io::stdout(), width, height)
    }
}

impl<W: Write> TerminalSurface<W> {
    /// Surface writing to `writer`, sized `width` x `height` cells.
    pub fn new(writer: W, width: u16, height: u16) -> Self {
        Self {
            data: Vec::with_capacity(4096),
            writer,
            width,
            height,
            clear_each_frame: true,
        }
    }

    /// Whether each frame starts by clearing the screen (default `true`).
    #[must_use]
    pub const fn with_clear_each_frame(mut self, clear: bool) -> Self {
        self.clear_each_frame = clear;
        self
    }

    /// Surface width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Surface height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Update the size after a terminal resize.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Bytes queued for the current frame.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the underlying writer.
    #[inline]
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    /// Move cursor to (x, y), zero-based.
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        // CSI row ; col H
        let _ = write!(self.data, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1);
    }

    /// Write text at the cursor.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Write text at (x, y), clipped to the surface width.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str) {
        if x >= self.width || y >= self.height {
            return;
        }
        let room = usize::from(self.width - x);
        self.cursor_move(x, y);
        let clipped: String = text.chars().take(room).collect();
        self.write_str(&clipped);
    }

    /// Set foreground color (true color).
    #[inline]
    pub fn set_fg(&mut self, color: Rgb) {
        let _ = write!(self.data, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
    }

    /// Set background color (true color).
    #[inline]
    pub fn set_bg(&mut self, color: Rgb) {
        let _ = write!(self.data, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Clear the entire screen.
    #[inline]
    pub fn clear_screen(&mut self) {
        self.data.extend_from_slice(b"\x1b[2J");
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn begin_frame(&mut self) {
        self.data.clear();
        if self.clear_each_frame {
            self.clear_screen();
        }
    }

    fn present(&mut self) -> io::Result<()> {
        self.reset_attrs();
        self.writer.write_all(&self.data)?;
        self.writer.flush()
    }
}
