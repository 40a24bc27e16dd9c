//! Console output
//!
//! Commands print two kinds of lines: titles (one per command) and items (one
//! per key or file). How they look is decided by a [`Style`].

use std::io::{self, IsTerminal, Write};

/// Rendering strategy for titles and items
pub trait Style {
    fn title(&self, text: &str) -> String;
    fn item(&self, text: &str) -> String;
}

/// No decoration
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Style for Plain {
    fn title(&self, text: &str) -> String {
        text.to_string()
    }

    fn item(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Highlighted terminal output: black on yellow titles, yellow on black items
#[derive(Debug, Clone, Copy, Default)]
pub struct Ansi;

impl Ansi {
    const TITLE: &'static str = "\x1b[6;30;43m";
    const ITEM: &'static str = "\x1b[0;33;40m";
    const RESET: &'static str = "\x1b[0m";
}

impl Style for Ansi {
    fn title(&self, text: &str) -> String {
        format!("{}{}{}", Self::TITLE, text, Self::RESET)
    }

    fn item(&self, text: &str) -> String {
        format!("{}{}{}", Self::ITEM, text, Self::RESET)
    }
}

/// When to use [`Ansi`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn style(self, is_terminal: bool) -> Box<dyn Style> {
        match self {
            ColorChoice::Always => Box::new(Ansi),
            ColorChoice::Auto if is_terminal => Box::new(Ansi),
            ColorChoice::Auto | ColorChoice::Never => Box::new(Plain),
        }
    }
}

/// Line-oriented writer applying a [`Style`]
pub struct Console<W> {
    out: W,
    style: Box<dyn Style>,
}

impl Console<io::Stdout> {
    /// Console on stdout, colored according to `color`
    pub fn stdout(color: ColorChoice) -> Self {
        let out = io::stdout();
        let style = color.style(out.is_terminal());
        Self::new(out, style)
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, style: Box<dyn Style>) -> Self {
        Self { out, style }
    }

    /// Undecorated console, mostly for tests
    pub fn plain(out: W) -> Self {
        Self::new(out, Box::new(Plain))
    }

    pub fn title(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", self.style.title(text))
    }

    pub fn item(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", self.style.item(text))
    }

    /// Content line, printed as is
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
