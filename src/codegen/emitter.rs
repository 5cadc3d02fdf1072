//! Emitter
//!
//! Line-oriented output for the generated runtime source. Indentation is
//! absolute (a space count), matching how the emission routines thread an
//! `indent` through the command tree. Every logical line ends with a line
//! terminator, so the output is deterministic byte for byte.

use std::fmt;
use std::io::{self, Write};

/// Width in spaces of one indentation level in the generated source.
pub const INDENT: usize = 3;

/// Writes generated source text to any byte sink.
pub struct Emitter<W: Write> {
    out: W,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write one line at the given absolute indentation.
    pub fn line(&mut self, indent: usize, text: &str) -> io::Result<()> {
        self.linef(indent, format_args!("{text}"))
    }

    /// Write one formatted line at the given absolute indentation.
    pub fn linef(&mut self, indent: usize, args: fmt::Arguments<'_>) -> io::Result<()> {
        write!(self.out, "{:indent$}", "")?;
        self.out.write_fmt(args)?;
        self.out.write_all(b"\n")
    }

    /// Write one line with no indentation.
    pub fn raw(&mut self, text: &str) -> io::Result<()> {
        self.linef(0, format_args!("{text}"))
    }

    /// Write an empty line.
    pub fn blank(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Printf-style shorthand for [`Emitter::linef`].
macro_rules! emit {
    ($emitter:expr, $indent:expr, $($arg:tt)*) => {
        $emitter.linef($indent, format_args!($($arg)*))
    };
}
pub(crate) use emit;
