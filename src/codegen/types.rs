//! Generator State Types
//!
//! The per-command record threaded through emission. The context of a
//! command decides the failure code generated for it, and the restore-point
//! fields decide whether the emitted fragment records host-graph changes.

/// The body kind of the nearest enclosing combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    MainBody,
    IfBody,
    TryBody,
    LoopBody,
}

/// Data passed between the code generation functions.
#[derive(Debug, Clone, Copy)]
pub struct CommandData {
    /// Context of the current command.
    pub context: Context,
    /// Current loop nesting depth, starting at 0 and incremented on
    /// entering a loop body. Decides whether a loop's restore frame is
    /// refreshed per iteration or released at loop exit.
    pub loop_depth: u32,
    /// Set when the enclosing branch condition or loop body requires the
    /// emitted fragment to record graph changes.
    pub record_changes: bool,
    /// The restore frame in scope, if any enclosing branch or loop
    /// established one. The number names the emitted runtime variable, so
    /// concurrently live frames never collide.
    pub restore_point: Option<u32>,
    /// Absolute indentation of the emitted fragment, in spaces.
    pub indent: usize,
}

impl CommandData {
    /// The state for the main command body of the program.
    pub fn main_body(indent: usize) -> Self {
        Self {
            context: Context::MainBody,
            loop_depth: 0,
            record_changes: false,
            restore_point: None,
            indent,
        }
    }

    /// The same state one indentation level deeper.
    pub fn indented(self) -> Self {
        Self { indent: self.indent + super::emitter::INDENT, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::emitter::INDENT;

    #[test]
    fn test_main_body_state() {
        let data = CommandData::main_body(3);
        assert_eq!(data.context, Context::MainBody);
        assert_eq!(data.loop_depth, 0);
        assert!(!data.record_changes);
        assert_eq!(data.restore_point, None);
        assert_eq!(data.indent, 3);
    }

    #[test]
    fn test_indented_only_changes_indent() {
        let data = CommandData::main_body(3).indented();
        assert_eq!(data.indent, 3 + INDENT);
        assert_eq!(data.context, Context::MainBody);
    }
}
