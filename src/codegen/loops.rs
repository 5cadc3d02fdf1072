//! Loop Emission
//!
//! `P!` runs its body until the body fails, then terminates successfully.
//! A body that needs recording owns a restore frame: the outermost
//! recording loop discards its frame after each successful iteration,
//! while a nested loop re-anchors it so that a failing iteration unwinds
//! only itself and never the outer loop's accumulated changes.

use std::io::Write;

use crate::analysis::{never_fails, null_command, single_rule};
use crate::ast::types::CommandNode;

use super::emitter::INDENT;
use super::errors::GenError;
use super::types::{CommandData, Context};
use super::Generator;

impl<W: Write> Generator<'_, W> {
    pub(crate) fn generate_loop(
        &mut self,
        body: &CommandNode,
        data: CommandData,
    ) -> Result<(), GenError> {
        // A body that cannot fail loops forever; a body that cannot change
        // the graph (and can fail) may still never do so.
        if never_fails(body, &self.procedures) {
            return Err(GenError::NonterminatingLoop);
        }
        if null_command(body, &self.procedures) {
            tracing::warn!(
                "loop body neither fails nor changes the host graph; \
                 the loop may not terminate"
            );
        }

        let mut loop_data = data.indented();
        loop_data.context = Context::LoopBody;
        loop_data.loop_depth = data.loop_depth + 1;
        if single_rule(body, &self.procedures) {
            loop_data.restore_point = None;
        } else {
            loop_data.record_changes = true;
            loop_data.restore_point = Some(self.next_restore_point());
        }

        self.emitter.line(data.indent, "/* Loop Statement */")?;
        if let Some(point) = loop_data.restore_point {
            self.emit_recording_trace(data.indent)?;
            self.emit_frame_capture(data.indent, point)?;
        }
        self.emitter.line(data.indent, "while(success)")?;
        self.emitter.line(data.indent, "{")?;
        self.generate_command(body, loop_data)?;
        if let Some(point) = loop_data.restore_point {
            let end_indent = data.indent + INDENT;
            if loop_data.loop_depth > 1 {
                self.emitter.line(
                    end_indent,
                    "/* Update restore point for next iteration of inner loop. */",
                )?;
                self.emit_frame_refresh(end_indent, point)?;
            } else {
                self.emitter.line(
                    end_indent,
                    "/* Graph changes from loop body may not have been used.",
                )?;
                self.emitter.line(
                    end_indent,
                    "   Discard them so that future graph roll backs are uncorrupted. */",
                )?;
                self.emit_frame_discard_on_success(end_indent, point)?;
            }
        }
        self.emitter.line(data.indent, "}")?;
        // A loop always leaves with the flag set: running out of matches
        // is normal termination, not failure.
        self.emitter.line(data.indent, "success = true;")?;
        Ok(())
    }
}
