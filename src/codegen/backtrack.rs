//! Restore-Frame Emission
//!
//! Every branch condition or loop body that needs host-graph recording
//! owns one restore frame. A frame is captured at scope entry and leaves
//! scope through exactly one of: undo (roll the graph back), discard
//! (accept the changes and free the frame) or refresh (re-anchor the frame
//! for the next iteration of an inner loop). The two backtracking policies
//! differ only in what those operations print.
//!
//! Under change recording the frame is a stack position held in a local
//! `restore_point<n>` variable; under graph copying it is a saved copy of
//! the host graph, and the trace lines that would print the stack position
//! are omitted.

use std::io::Write;

use super::config::BacktrackPolicy;
use super::emitter::emit;
use super::errors::GenError;
use super::Generator;

impl<W: Write> Generator<'_, W> {
    /// Capture a new restore frame at scope entry.
    pub(crate) fn emit_frame_capture(&mut self, indent: usize, point: u32) -> Result<(), GenError> {
        match self.config.backtracking {
            BacktrackPolicy::CopyGraphs => {
                self.emitter.line(indent, "copyGraph(host);")?;
            }
            BacktrackPolicy::RecordChanges => {
                emit!(
                    self.emitter,
                    indent,
                    "int restore_point{point} = graph_change_stack == NULL ? 0 : \
                     topOfGraphChangeStack();"
                )?;
                if self.config.tracing.backtracking {
                    emit!(
                        self.emitter,
                        indent,
                        "print_trace(\"Restore point {point}: %d.\\n\\n\", restore_point{point});"
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Roll the host graph back to the frame and free it.
    pub(crate) fn emit_frame_undo(&mut self, indent: usize, point: u32) -> Result<(), GenError> {
        match self.config.backtracking {
            BacktrackPolicy::CopyGraphs => {
                emit!(self.emitter, indent, "host = popGraphs({point});")?;
            }
            BacktrackPolicy::RecordChanges => {
                emit!(self.emitter, indent, "undoChanges(host, restore_point{point});")?;
                if self.config.tracing.backtracking {
                    emit!(
                        self.emitter,
                        indent,
                        "print_trace(\"Undoing graph changes from restore point {point}: \
                         %d.\\n\\n\", restore_point{point});"
                    )?;
                }
            }
        }
        if self.config.tracing.graphs {
            self.emitter.line(indent, "print_trace(\"Restored graph:\\n\");")?;
            self.emitter.line(indent, "printGraph(host, trace_file);")?;
        }
        Ok(())
    }

    /// Accept the frame's changes and free it.
    pub(crate) fn emit_frame_discard(&mut self, indent: usize, point: u32) -> Result<(), GenError> {
        match self.config.backtracking {
            BacktrackPolicy::CopyGraphs => {
                emit!(self.emitter, indent, "Graph *copy = popGraphs({point});")?;
                self.emitter.line(indent, "freeGraph(copy);")?;
            }
            BacktrackPolicy::RecordChanges => {
                emit!(self.emitter, indent, "discardChanges(restore_point{point});")?;
                if self.config.tracing.backtracking {
                    self.emitter.line(indent, "print_trace(\"Discarding graph changes.\\n\");")?;
                    emit!(
                        self.emitter,
                        indent,
                        "print_trace(\"New restore point {point}: %d.\\n\\n\", \
                         restore_point{point});"
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Accept the frame's changes at the end of a successful outermost-loop
    /// iteration. The discard is conditional: a failed iteration has
    /// already unwound its own changes.
    pub(crate) fn emit_frame_discard_on_success(
        &mut self,
        indent: usize,
        point: u32,
    ) -> Result<(), GenError> {
        match self.config.backtracking {
            BacktrackPolicy::CopyGraphs => {
                self.emitter.line(indent, "if(success)")?;
                self.emitter.line(indent, "{")?;
                emit!(
                    self.emitter,
                    indent + super::emitter::INDENT,
                    "Graph *copy = popGraphs({point});"
                )?;
                self.emitter.line(indent + super::emitter::INDENT, "freeGraph(copy);")?;
                self.emitter.line(indent, "}")?;
            }
            BacktrackPolicy::RecordChanges => {
                emit!(
                    self.emitter,
                    indent,
                    "if(success) discardChanges(restore_point{point});"
                )?;
                if self.config.tracing.backtracking {
                    self.emitter.line(indent, "print_trace(\"Discarding graph changes.\\n\");")?;
                    emit!(
                        self.emitter,
                        indent,
                        "print_trace(\"New restore point {point}: %d.\\n\\n\", \
                         restore_point{point});"
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Re-anchor the frame after a successful inner-loop iteration, so a
    /// later failing iteration unwinds only its own changes and the outer
    /// loop's accumulated effects survive.
    pub(crate) fn emit_frame_refresh(&mut self, indent: usize, point: u32) -> Result<(), GenError> {
        match self.config.backtracking {
            BacktrackPolicy::CopyGraphs => {
                self.emitter.line(indent, "if(success)")?;
                self.emitter.line(indent, "{")?;
                emit!(
                    self.emitter,
                    indent + super::emitter::INDENT,
                    "Graph *copy = popGraphs({point});"
                )?;
                self.emitter.line(indent + super::emitter::INDENT, "freeGraph(copy);")?;
                self.emitter.line(indent + super::emitter::INDENT, "copyGraph(host);")?;
                self.emitter.line(indent, "}")?;
            }
            BacktrackPolicy::RecordChanges => {
                if self.config.tracing.backtracking {
                    emit!(
                        self.emitter,
                        indent,
                        "print_trace(\"Updating restore point {point}.\\n\");"
                    )?;
                    emit!(
                        self.emitter,
                        indent,
                        "print_trace(\"Old: %d. New: %d.\\n\\n\", restore_point{point}, \
                         topOfGraphChangeStack());"
                    )?;
                }
                emit!(
                    self.emitter,
                    indent,
                    "if(success) restore_point{point} = topOfGraphChangeStack();"
                )?;
            }
        }
        Ok(())
    }

    /// Trace line announcing that a scope starts recording, emitted ahead
    /// of the capture.
    pub(crate) fn emit_recording_trace(&mut self, indent: usize) -> Result<(), GenError> {
        if self.config.tracing.backtracking {
            self.emitter.line(indent, "print_trace(\"Recording graph changes.\\n\");")?;
        }
        Ok(())
    }
}
