//! Failure Emission
//!
//! Two events raise a failure: a rule that does not match (the rule name
//! is reported) and the fail statement (no name). What the emitted program
//! does with it depends entirely on where the failure happens:
//!
//! - main body: the program is over. Report the cause into the output
//!   file, tear down and exit.
//! - if/try condition: clear the flag and exit the condition's do-once
//!   block.
//! - loop body: clear the flag and restore the pre-iteration graph, so the
//!   enclosing `while(success)` terminates cleanly.

use std::io::Write;

use super::emitter::emit;
use super::errors::GenError;
use super::types::{CommandData, Context};
use super::Generator;

impl<W: Write> Generator<'_, W> {
    pub(crate) fn generate_failure(
        &mut self,
        rule_name: Option<&str>,
        data: CommandData,
    ) -> Result<(), GenError> {
        if data.context == Context::MainBody {
            if self.config.tracing.graphs {
                self.emitter
                    .line(data.indent, "print_trace(\"Program failed. Final graph:\\n\");")?;
                self.emitter.line(data.indent, "printGraph(host, trace_file);")?;
            }
            match rule_name {
                Some(name) => emit!(
                    self.emitter,
                    data.indent,
                    "fprintf(output_file, \"No output graph: rule {name} not applicable.\\n\");"
                )?,
                None => self.emitter.line(
                    data.indent,
                    "fprintf(output_file, \"No output graph: Fail statement invoked\\n\");",
                )?,
            }
            self.emitter.line(
                data.indent,
                "printf(\"Output information saved to file gp2.output\\n\");",
            )?;
            self.emitter.line(data.indent, "garbageCollect();")?;
            self.emitter.line(data.indent, "fclose(output_file);")?;
            self.emitter.line(data.indent, "return 0;")?;
        } else {
            self.emitter.line(data.indent, "success = false;")?;
        }

        if data.context == Context::IfBody || data.context == Context::TryBody {
            self.emitter.line(data.indent, "break;")?;
        }
        if data.context == Context::LoopBody {
            if let Some(point) = data.restore_point {
                self.emit_frame_undo(data.indent, point)?;
            }
        }
        Ok(())
    }
}
