//! Branch Emission
//!
//! `if C then P else Q` and `try C then P else Q` share one shape: the
//! condition runs inside a do-once block so failure can exit it early, and
//! a restore frame captured at entry guarantees the branches start from a
//! well-defined graph. They differ in what happens to the condition's
//! changes: an if statement rolls them back on every path, a try statement
//! keeps them on success and rolls them back on failure.

use std::io::Write;

use crate::analysis::{null_command, single_rule};
use crate::ast::types::BranchNode;

use super::errors::GenError;
use super::types::{CommandData, Context};
use super::Generator;

impl<W: Write> Generator<'_, W> {
    pub(crate) fn generate_branch(
        &mut self,
        branch: &BranchNode,
        is_if: bool,
        data: CommandData,
    ) -> Result<(), GenError> {
        let mut condition_data = data.indented();
        condition_data.context = if is_if { Context::IfBody } else { Context::TryBody };

        // A sufficiently simple condition needs no frame. A single rule in
        // an if condition is only matched, never applied, so there is
        // nothing to roll back. A try gets the same treatment when the
        // condition cannot change the graph, or when a single-rule
        // condition feeds branches that cannot change it either.
        let suppress_frame = if is_if {
            single_rule(&branch.condition, &self.procedures)
        } else {
            null_command(&branch.condition, &self.procedures)
                || (single_rule(&branch.condition, &self.procedures)
                    && null_command(&branch.then_command, &self.procedures)
                    && null_command(&branch.else_command, &self.procedures))
        };
        if suppress_frame {
            condition_data.restore_point = None;
        } else {
            condition_data.record_changes = true;
            condition_data.restore_point = Some(self.next_restore_point());
        }

        let label = if is_if { "/* If Statement */" } else { "/* Try Statement */" };
        self.emitter.line(data.indent, label)?;
        self.emitter.line(data.indent, "/* Condition */")?;
        if let Some(point) = condition_data.restore_point {
            self.emit_recording_trace(data.indent)?;
            self.emit_frame_capture(data.indent, point)?;
        }
        self.emitter.line(data.indent, "do")?;
        self.emitter.line(data.indent, "{")?;
        self.generate_command(&branch.condition, condition_data)?;
        self.emitter.line(data.indent, "} while(false);")?;
        self.emitter.blank()?;

        // An if condition is purely a test: its graph effects must not
        // leak, whichever way it went.
        if is_if {
            if let Some(point) = condition_data.restore_point {
                self.emit_frame_undo(data.indent, point)?;
            }
        }

        let branch_data = data.indented();
        self.emitter.line(data.indent, "/* Then Branch */")?;
        self.emitter.line(data.indent, "if(success)")?;
        self.emitter.line(data.indent, "{")?;
        if !is_if {
            if let Some(point) = condition_data.restore_point {
                self.emit_frame_discard(branch_data.indent, point)?;
            }
        }
        self.generate_command(&branch.then_command, branch_data)?;
        self.emitter.line(data.indent, "}")?;
        self.emitter.line(data.indent, "/* Else Branch */")?;
        self.emitter.line(data.indent, "else")?;
        self.emitter.line(data.indent, "{")?;
        if !is_if {
            if let Some(point) = condition_data.restore_point {
                self.emit_frame_undo(branch_data.indent, point)?;
            }
        }
        // The else branch starts from a clean flag.
        self.emitter.line(branch_data.indent, "success = true;")?;
        self.generate_command(&branch.else_command, branch_data)?;
        self.emitter.line(data.indent, "}")?;
        if data.context == Context::IfBody || data.context == Context::TryBody {
            self.emitter.line(data.indent, "break;")?;
        }
        Ok(())
    }
}
