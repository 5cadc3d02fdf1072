//! Generator Errors

use std::io;
use thiserror::Error;

/// Errors reported by the code generator.
///
/// The emitted program itself never throws: runtime failure flows through
/// its success flag. These are the generator's own compile-time errors.
#[derive(Debug, Error)]
pub enum GenError {
    /// A looped subprogram can never fail, so the loop cannot terminate.
    #[error("nontermination in loop: the loop body never fails")]
    NonterminatingLoop,

    /// The program has no main declaration to generate code from.
    #[error("program has no main declaration")]
    MissingMain,

    /// A command calls a procedure that no declaration provides.
    #[error("call to undeclared procedure '{0}'")]
    UndefinedProcedure(String),

    /// Procedures are inlined at their call sites, so a recursive
    /// procedure cannot be compiled.
    #[error("procedure '{0}' is recursive and cannot be inlined")]
    RecursiveProcedure(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
