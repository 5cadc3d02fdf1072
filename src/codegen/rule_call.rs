//! Rule-Call Emission
//!
//! A rule call expands to a guarded match/apply pair, parameterised by its
//! context. The same expansion serves rule-set members: only the last rule
//! of a set emits failure code, and earlier rules break out of the set's
//! do-once block on success.

use std::io::Write;

use crate::ast::types::RuleCallNode;

use super::config::BacktrackPolicy;
use super::emitter::{emit, INDENT};
use super::errors::GenError;
use super::types::{CommandData, Context};
use super::Generator;

impl<W: Write> Generator<'_, W> {
    /// Emit the expansion of one rule call. `last_rule` is false only for
    /// non-final members of a rule set.
    pub(crate) fn generate_rule_call(
        &mut self,
        rule: &RuleCallNode,
        last_rule: bool,
        data: CommandData,
    ) -> Result<(), GenError> {
        if rule.empty_lhs {
            self.generate_empty_lhs_call(rule, data)
        } else {
            self.generate_guarded_call(rule, last_rule, data)
        }
    }

    /// An empty left-hand side always matches, so no guard is needed. A
    /// predicate with an empty left-hand side expands to nothing at all:
    /// the graph is unchanged and the prior success flag flows through.
    fn generate_empty_lhs_call(
        &mut self,
        rule: &RuleCallNode,
        data: CommandData,
    ) -> Result<(), GenError> {
        let name = rule.rule_name.as_str();
        if self.config.tracing.rules {
            emit!(
                self.emitter,
                data.indent,
                "print_trace(\"Matched {name}. (empty rule)\\n\\n\");"
            )?;
        }
        if rule.is_predicate {
            return Ok(());
        }
        let record = data.restore_point.is_some()
            && self.config.backtracking == BacktrackPolicy::RecordChanges;
        emit!(self.emitter, data.indent, "apply{name}({record});")?;
        self.emit_graph_trace_after_apply(data.indent, name)?;
        self.emitter.line(data.indent, "success = true;")?;
        self.emitter.blank()?;
        Ok(())
    }

    fn generate_guarded_call(
        &mut self,
        rule: &RuleCallNode,
        last_rule: bool,
        data: CommandData,
    ) -> Result<(), GenError> {
        let name = rule.rule_name.as_str();
        let body_indent = data.indent + INDENT;
        if self.config.tracing.rules {
            emit!(self.emitter, data.indent, "print_trace(\"Matching {name}...\\n\");")?;
        }
        emit!(self.emitter, data.indent, "if(match{name}(M_{name}))")?;
        self.emitter.line(data.indent, "{")?;
        if self.config.tracing.rules {
            emit!(self.emitter, body_indent, "print_trace(\"Matched {name}.\\n\\n\");")?;
        }
        if !rule.is_predicate {
            // In `if C then P else Q` a matched rule in C must not change
            // the graph unless a recording scope can undo it. Without a
            // restore point the call degrades to match-only: the morphism
            // is reset and the bindings are thrown away.
            // (initialiseMorphism only clears bindings; it does not touch
            // the host graph.)
            if data.context != Context::IfBody || data.restore_point.is_some() {
                let record = data.record_changes
                    && self.config.backtracking == BacktrackPolicy::RecordChanges;
                emit!(self.emitter, body_indent, "apply{name}(M_{name}, {record});")?;
                self.emit_graph_trace_after_apply(body_indent, name)?;
            } else {
                emit!(self.emitter, body_indent, "initialiseMorphism(M_{name}, host);")?;
            }
        }
        self.emitter.line(body_indent, "success = true;")?;
        // A matched non-final rule exits the enclosing rule-set block.
        if !last_rule {
            self.emitter.line(body_indent, "break;")?;
        }
        self.emitter.line(data.indent, "}")?;
        if last_rule {
            self.emitter.line(data.indent, "else")?;
            self.emitter.line(data.indent, "{")?;
            if self.config.tracing.rules {
                emit!(
                    self.emitter,
                    body_indent,
                    "print_trace(\"Failed to match {name}.\\n\\n\");"
                )?;
            }
            self.generate_failure(Some(name), CommandData { indent: body_indent, ..data })?;
            self.emitter.line(data.indent, "}")?;
        } else if self.config.tracing.rules {
            emit!(
                self.emitter,
                data.indent,
                "else print_trace(\"Failed to match {name}.\\n\\n\");"
            )?;
        }
        Ok(())
    }

    fn emit_graph_trace_after_apply(&mut self, indent: usize, name: &str) -> Result<(), GenError> {
        if self.config.tracing.graphs {
            emit!(
                self.emitter,
                indent,
                "print_trace(\"Graph after applying rule {name}:\\n\");"
            )?;
            self.emitter.line(indent, "printGraph(host, trace_file);")?;
            self.emitter.blank()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::types::CommandNode;
    use crate::codegen::testutil::*;
    use crate::codegen::{generate, BacktrackPolicy, GenConfig, TraceConfig};

    #[test]
    fn test_empty_lhs_rule_applies_without_a_guard() {
        let output = generate_main(empty_rule("fresh"));
        assert!(output.contains("applyfresh(false);"));
        assert!(!output.contains("matchfresh"));
    }

    #[test]
    fn test_empty_lhs_predicate_emits_nothing() {
        let output = generate_main(CommandNode::RuleCall(rule_ref("check", true, true)));
        assert!(output.contains("/* Rule Call */"));
        assert!(!output.contains("applycheck"));
        assert!(!output.contains("matchcheck"));
    }

    #[test]
    fn test_predicate_rule_matches_without_applying() {
        let output = generate_main(CommandNode::RuleCall(rule_ref("check", false, true)));
        assert!(output.contains("if(matchcheck(M_check))"));
        assert!(!output.contains("applycheck"));
    }

    #[test]
    fn test_if_condition_without_frame_is_match_only() {
        let output = generate_main(if_(rule("r1"), CommandNode::Skip, CommandNode::Skip));
        assert!(output.contains("initialiseMorphism(M_r1, host);"));
        assert!(!output.contains("applyr1"));
    }

    #[test]
    fn test_if_condition_with_frame_applies_and_records() {
        let output = generate_main(if_(
            seq(vec![rule("r1"), rule("r2")]),
            CommandNode::Skip,
            CommandNode::Skip,
        ));
        assert!(output.contains("applyr1(M_r1, true);"));
        assert!(!output.contains("initialiseMorphism"));
    }

    #[test]
    fn test_recording_flag_is_off_under_graph_copying() {
        let config = GenConfig {
            backtracking: BacktrackPolicy::CopyGraphs,
            ..GenConfig::default()
        };
        let program = program_with_main(if_(
            seq(vec![rule("r1"), rule("r2")]),
            CommandNode::Skip,
            CommandNode::Skip,
        ));
        let output = generate_string(&program, &config);
        assert!(output.contains("copyGraph(host);"));
        assert!(output.contains("applyr1(M_r1, false);"));
        assert!(output.contains("host = popGraphs(0);"));
    }

    #[test]
    fn test_rule_set_breaks_after_non_final_match() {
        let output = generate_main(CommandNode::RuleSetCall(vec![
            rule_ref("r1", false, false),
            rule_ref("r2", false, false),
        ]));
        let r1_block_start = output.find("if(matchr1(M_r1))").unwrap();
        let r2_block_start = output.find("if(matchr2(M_r2))").unwrap();
        let r1_block = &output[r1_block_start..r2_block_start];
        assert!(r1_block.contains("break;"));
    }

    #[test]
    fn test_rule_tracing_emits_match_traces() {
        let config = GenConfig {
            tracing: TraceConfig { rules: true, graphs: false, backtracking: false },
            ..GenConfig::default()
        };
        let program = program_with_main(rule("r1"));
        let output = generate_string(&program, &config);
        assert!(output.contains("print_trace(\"Matching r1...\\n\");"));
        assert!(output.contains("print_trace(\"Matched r1.\\n\\n\");"));
        assert!(output.contains("print_trace(\"Failed to match r1.\\n\\n\");"));
        assert!(output.contains("openTraceFile(\"gp2.trace\");"));
    }

    #[test]
    fn test_rule_call_in_loop_marks_failure_and_restores() {
        let output = generate_main(loop_(seq(vec![rule("r1"), rule("r2")])));
        assert!(output.contains("success = false;"));
        assert!(output.contains("undoChanges(host, restore_point0);"));
    }

    #[test]
    fn test_generation_succeeds_into_any_writer() {
        let program = program_with_main(rule("r1"));
        let mut sink = Vec::new();
        generate(&program, &GenConfig::default(), &mut sink).unwrap();
        assert!(!sink.is_empty());
    }
}
