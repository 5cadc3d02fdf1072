//! Command Dispatch
//!
//! The recursive translation of one command into runtime code. Branch,
//! loop, rule-call and failure emission live in their own modules; this
//! one handles the structural commands and the terminals.

use std::io::Write;

use crate::ast::types::CommandNode;

use super::errors::GenError;
use super::types::{CommandData, Context};
use super::Generator;

impl<W: Write> Generator<'_, W> {
    pub(crate) fn generate_command(
        &mut self,
        command: &CommandNode,
        data: CommandData,
    ) -> Result<(), GenError> {
        match command {
            CommandNode::Sequence(commands) => {
                for (index, command) in commands.iter().enumerate() {
                    self.generate_command(command, data)?;
                    // A failed command inside a loop body must stop the
                    // iteration before the next command runs.
                    if data.context == Context::LoopBody && index + 1 < commands.len() {
                        self.emitter.line(data.indent, "if(!success) break;")?;
                        self.emitter.blank()?;
                    }
                }
            }

            CommandNode::RuleCall(rule) => {
                self.emitter.line(data.indent, "/* Rule Call */")?;
                self.generate_rule_call(rule, true, data)?;
            }

            CommandNode::RuleSetCall(rules) => {
                self.emitter.line(data.indent, "/* Rule Set Call */")?;
                self.emitter.line(data.indent, "do")?;
                self.emitter.line(data.indent, "{")?;
                let inner = data.indented();
                for (index, rule) in rules.iter().enumerate() {
                    self.generate_rule_call(rule, index + 1 == rules.len(), inner)?;
                }
                self.emitter.line(data.indent, "} while(false);")?;
            }

            CommandNode::ProcedureCall(name) => {
                let procedure = self
                    .procedures
                    .get(name)
                    .ok_or_else(|| GenError::UndefinedProcedure(name.clone()))?;
                self.generate_command(&procedure.command, data)?;
            }

            CommandNode::If(branch) => self.generate_branch(branch, true, data)?,
            CommandNode::Try(branch) => self.generate_branch(branch, false, data)?,

            CommandNode::Loop(body) => self.generate_loop(body, data)?,

            CommandNode::Or(or) => {
                self.emitter.line(data.indent, "/* OR Statement */")?;
                self.emitter.line(data.indent, "if((rand() % 2) == 0)")?;
                self.emitter.line(data.indent, "{")?;
                self.generate_command(&or.left, data.indented())?;
                self.emitter.line(data.indent, "}")?;
                self.emitter.line(data.indent, "else")?;
                self.emitter.line(data.indent, "{")?;
                self.generate_command(&or.right, data.indented())?;
                self.emitter.line(data.indent, "}")?;
                if data.context == Context::IfBody || data.context == Context::TryBody {
                    self.emitter.line(data.indent, "break;")?;
                }
            }

            CommandNode::Skip => {
                self.emitter.line(data.indent, "/* Skip Statement */")?;
                self.emitter.line(data.indent, "success = true;")?;
            }

            CommandNode::Fail => {
                self.emitter.line(data.indent, "/* Fail Statement */")?;
                self.generate_failure(None, data)?;
            }

            CommandNode::Break(brk) => {
                self.emitter.line(data.indent, "/* Break Statement */")?;
                if let Some(point) = data.restore_point {
                    if brk.inner_loop {
                        self.emitter.line(
                            data.indent,
                            "/* Update restore point for next iteration of inner loop. */",
                        )?;
                        self.emit_frame_refresh(data.indent, point)?;
                    } else {
                        self.emitter.line(
                            data.indent,
                            "/* Graph changes from loop body not required.",
                        )?;
                        self.emitter.line(
                            data.indent,
                            "   Discard them so that future graph roll backs are uncorrupted. */",
                        )?;
                        self.emit_frame_discard(data.indent, point)?;
                    }
                }
                self.emitter.line(data.indent, "break;")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::codegen::testutil::*;
    use crate::ast::types::CommandNode;

    #[test]
    fn test_sequence_in_loop_body_checks_success_between_commands() {
        let output = generate_main(loop_(seq(vec![rule("r1"), rule("r2")])));
        assert!(output.contains("if(!success) break;"));
    }

    #[test]
    fn test_sequence_in_main_body_has_no_success_checks() {
        let output = generate_main(seq(vec![rule("r1"), rule("r2")]));
        assert!(!output.contains("if(!success) break;"));
    }

    #[test]
    fn test_or_statement_chooses_randomly() {
        let output = generate_main(or_(rule("r1"), rule("r2")));
        assert!(output.contains("if((rand() % 2) == 0)"));
        let left = output.find("if(matchr1(M_r1))").expect("left branch missing");
        let right = output.find("if(matchr2(M_r2))").expect("right branch missing");
        assert!(left < right);
    }

    #[test]
    fn test_or_inside_condition_exits_the_do_once_block() {
        let output = generate_main(if_(
            seq(vec![rule("r0"), or_(rule("r1"), rule("r2"))]),
            CommandNode::Skip,
            CommandNode::Skip,
        ));
        // The choice is followed by a break out of the condition block.
        let or_end = output.rfind("/* OR Statement */").expect("or statement missing");
        let tail = &output[or_end..];
        assert!(tail.contains("break;"));
    }

    #[test]
    fn test_skip_sets_success() {
        let output = generate_main(CommandNode::Skip);
        assert!(output.contains("/* Skip Statement */"));
        assert!(output.contains("   success = true;"));
    }

    #[test]
    fn test_fail_in_main_body_reports_and_exits() {
        let output = generate_main(CommandNode::Fail);
        assert!(output.contains("No output graph: Fail statement invoked"));
        assert!(output.contains("garbageCollect();"));
    }

    #[test]
    fn test_break_discards_the_loop_frame() {
        let output = generate_main(loop_(seq(vec![rule("r1"), brk(false)])));
        // The loop body is not a single rule, so a frame exists and the
        // break discards it.
        assert!(output.contains("discardChanges(restore_point0);"));
        assert!(output.contains("/* Break Statement */"));
    }

    #[test]
    fn test_break_with_inner_loop_flag_refreshes_the_frame() {
        let output = generate_main(loop_(seq(vec![
            loop_(seq(vec![rule("r1"), brk(true)])),
            rule("r2"),
        ])));
        // Both the break and the inner loop's iteration end refresh the
        // inner frame.
        assert!(output
            .matches("if(success) restore_point1 = topOfGraphChangeStack();")
            .count()
            >= 2);
    }
}
