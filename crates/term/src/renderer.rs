//! Terminal output: raw-mode session handling and framebuffer presentation.
//!
//! The renderer keeps the last presented frame. Presenting a frame of the
//! same size writes only the horizontal runs of cells that changed; the
//! first frame, a resized frame, or one after [`TerminalRenderer::invalidate`]
//! repaints the whole screen. Mouse capture stays on while the session is
//! entered so the pointer can hover and place tiles.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::QueueableCommand;

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// A horizontal span of changed cells on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub x: u16,
    pub y: u16,
    pub len: u16,
}

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    front: Option<FrameBuffer>,
    scratch: Vec<u8>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            front: None,
            scratch: Vec::with_capacity(32 * 1024),
        }
    }

    /// Switch to raw mode on the alternate screen with mouse capture.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.scratch.clear();
        self.scratch
            .queue(EnterAlternateScreen)?
            .queue(Hide)?
            .queue(DisableLineWrap)?
            .queue(EnableMouseCapture)?;
        self.flush_scratch()
    }

    /// Undo [`Self::enter`]. Safe to call after a failed frame.
    pub fn exit(&mut self) -> Result<()> {
        self.scratch.clear();
        self.scratch
            .queue(DisableMouseCapture)?
            .queue(ResetColor)?
            .queue(SetAttribute(Attribute::Reset))?
            .queue(EnableLineWrap)?
            .queue(Show)?
            .queue(LeaveAlternateScreen)?;
        self.flush_scratch()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Repaint everything on the next [`Self::present`].
    pub fn invalidate(&mut self) {
        self.front = None;
    }

    /// Show `frame`, then hand back the previously shown buffer in its place.
    ///
    /// The caller keeps drawing into the same `FrameBuffer` every frame; the
    /// two buffers trade places so nothing is cloned.
    pub fn present(&mut self, frame: &mut FrameBuffer) -> Result<()> {
        self.scratch.clear();
        let mut back = match self.front.take() {
            Some(front) if front.width() == frame.width() && front.height() == frame.height() => {
                encode_diff_into(&front, frame, &mut self.scratch)?;
                front
            }
            stale => {
                encode_full_into(frame, &mut self.scratch)?;
                let mut back = stale.unwrap_or_else(|| FrameBuffer::new(0, 0));
                back.resize(frame.width(), frame.height());
                back
            }
        };
        self.flush_scratch()?;

        std::mem::swap(&mut back, frame);
        self.front = Some(back);
        Ok(())
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn flush_scratch(&mut self) -> Result<()> {
        self.out.write_all(&self.scratch)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Tracks the style already sent so runs of equal style emit it once.
struct Painter<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> Painter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn paint(&mut self, fb: &FrameBuffer, x: u16, y: u16) -> Result<()> {
        let cell = fb.get(x, y).unwrap_or_default();
        if self.style != Some(cell.style) {
            let CellStyle { fg, bg, bold } = cell.style;
            self.out
                .queue(SetAttribute(Attribute::Reset))?
                .queue(SetForegroundColor(color(fg)))?
                .queue(SetBackgroundColor(color(bg)))?;
            if bold {
                self.out.queue(SetAttribute(Attribute::Bold))?;
            }
            self.style = Some(cell.style);
        }
        self.out.queue(Print(cell.ch))?;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.out
            .queue(ResetColor)?
            .queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

/// Encode a repaint of the whole screen.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(Clear(ClearType::All))?;
    let mut painter = Painter::new(out);
    for y in 0..fb.height() {
        painter.out.queue(MoveTo(0, y))?;
        for x in 0..fb.width() {
            painter.paint(fb, x, y)?;
        }
    }
    painter.finish()
}

/// Encode only the cells of `next` that differ from `prev`.
///
/// Both buffers must have the same dimensions.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut painter = Painter::new(out);
    for run in changed_runs(prev, next) {
        painter.out.queue(MoveTo(run.x, run.y))?;
        for x in run.x..run.x + run.len {
            painter.paint(next, x, run.y)?;
        }
    }
    painter.finish()
}

/// Maximal runs of differing cells, row by row.
pub fn changed_runs(prev: &FrameBuffer, next: &FrameBuffer) -> Vec<Run> {
    let differs = |x: u16, y: u16| prev.get(x, y) != next.get(x, y);
    let mut runs = Vec::new();
    for y in 0..next.height() {
        let mut x = 0;
        while x < next.width() {
            if !differs(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            while x < next.width() && differs(x, y) {
                x += 1;
            }
            runs.push(Run {
                x: start,
                y,
                len: x - start,
            });
        }
    }
    runs
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
