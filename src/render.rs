use crate::canvas::Canvas;
use anyhow::Context;
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::Write;

pub const HEADER: &str =
    "Bouncing Terminal Ball - Use [W] [A] [S] [D] to control the ball. Q to exit.";

/// Presentation side of the frame loop.
pub trait Renderer {
    fn begin(&mut self) -> anyhow::Result<()>;
    fn present(&mut self, canvas: &Canvas) -> anyhow::Result<()>;
    fn end(&mut self) -> anyhow::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// Ball color on black; `None` leaves the terminal colors alone.
    pub color: Option<Color>,
    pub header: bool,
    pub ground: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: Some(Color::Magenta),
            header: true,
            ground: true,
        }
    }
}

/// Draws the canvas with crossterm commands into any writer, normally stdout.
/// Raw mode is left to the caller.
pub struct TerminalRenderer<W: Write> {
    out: W,
    opts: RenderOptions,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, opts: RenderOptions) -> Self {
        Self { out, opts }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn canvas_top(&self) -> u16 {
        u16::from(self.opts.header)
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn begin(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )
        .context("entering alternate screen")?;
        self.out.flush()?;
        Ok(())
    }

    fn present(&mut self, canvas: &Canvas) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        if self.opts.header {
            queue!(self.out, cursor::MoveTo(0, 0), ResetColor, Print(HEADER))?;
        }

        if let Some(fg) = self.opts.color {
            queue!(self.out, SetForegroundColor(fg), SetBackgroundColor(Color::Black))?;
        }

        let top = self.canvas_top();
        let rows = canvas.height() as usize;
        for (y, line) in canvas.lines(self.opts.ground).into_iter().enumerate() {
            // ground line keeps the default colors
            if y == rows && self.opts.color.is_some() {
                queue!(self.out, ResetColor)?;
            }
            let row = u16::try_from(y).map_or(u16::MAX, |y| top.saturating_add(y));
            queue!(self.out, cursor::MoveTo(0, row), Print(line))?;
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush().context("presenting frame")?;
        Ok(())
    }

    fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Fill;

    fn render(opts: RenderOptions, canvas: &Canvas) -> String {
        let mut r = TerminalRenderer::new(Vec::new(), opts);
        r.present(canvas).unwrap();
        String::from_utf8(r.into_inner()).unwrap()
    }

    #[test]
    fn present_writes_glyphs_and_ground() {
        let mut c = Canvas::new(2, 4);
        c.set(0, 1, Fill::Full);
        c.set(1, 2, Fill::Shaded);
        let s = render(RenderOptions::default(), &c);
        assert!(s.contains(HEADER));
        assert!(s.contains(" █  "));
        assert!(s.contains("  ▓ "));
        assert!(s.contains("===="));
    }

    #[test]
    fn bare_output_has_no_header_or_ground() {
        let c = Canvas::new(2, 4);
        let opts = RenderOptions {
            color: None,
            header: false,
            ground: false,
        };
        let s = render(opts, &c);
        assert!(!s.contains(HEADER));
        assert!(!s.contains('='));
        assert_eq!(s.matches("    ").count(), 2);
    }

    #[test]
    fn tallest_canvas_does_not_overflow_rows() {
        let mut c = Canvas::new(u16::MAX, 1);
        c.set(i64::from(u16::MAX) - 1, 0, Fill::Full);
        let s = render(RenderOptions::default(), &c);
        assert!(s.contains('█'));
        assert!(s.contains(HEADER));
    }

    #[test]
    fn begin_and_end_bracket_the_screen() {
        let mut r = TerminalRenderer::new(Vec::new(), RenderOptions::default());
        r.begin().unwrap();
        r.end().unwrap();
        let s = String::from_utf8(r.into_inner()).unwrap();
        assert!(s.contains("\x1b[?1049h"));
        assert!(s.contains("\x1b[?1049l"));
    }
}
