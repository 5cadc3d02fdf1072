//! Command Properties
//!
//! Three conservative classifications drive restore-point suppression and
//! loop diagnostics:
//! - `single_rule`: the command is no more complex than one rule call.
//! - `null_command`: the command provably leaves the host graph unchanged.
//! - `never_fails`: the command provably cannot set the success flag false.
//!
//! Procedure calls delegate to the procedure's body through the procedure
//! map. An unresolvable name classifies as false on all three properties;
//! generation rejects such programs with a hard error before emission, so
//! the conservative answer is only ever a fallback.

use crate::ast::program::ProcedureMap;
use crate::ast::types::CommandNode;

/// True when the command amounts to a single rule call or something
/// simpler. Such commands need no restore point in an if condition, a loop
/// body, or a simple try statement: a failed match leaves the graph
/// untouched, and a successful match either is not applied (if condition)
/// or needs no rollback (loop body).
///
/// Leading null commands of a sequence are skipped before the remainder is
/// classified.
pub fn single_rule(command: &CommandNode, procedures: &ProcedureMap) -> bool {
    match command {
        CommandNode::Sequence(commands) => {
            let mut rest = commands
                .iter()
                .skip_while(|command| null_command(command, procedures));
            match rest.next() {
                None => true,
                Some(first) => rest.next().is_none() && single_rule(first, procedures),
            }
        }
        CommandNode::RuleCall(_) | CommandNode::RuleSetCall(_) => true,
        CommandNode::ProcedureCall(name) => procedures
            .get(name)
            .map_or(false, |procedure| single_rule(&procedure.command, procedures)),
        CommandNode::If(_) | CommandNode::Try(_) | CommandNode::Loop(_) => false,
        CommandNode::Or(or) => {
            single_rule(&or.left, procedures) && single_rule(&or.right, procedures)
        }
        CommandNode::Skip | CommandNode::Fail | CommandNode::Break(_) => true,
    }
}

/// True when the command provably does not change the host graph.
pub fn null_command(command: &CommandNode, procedures: &ProcedureMap) -> bool {
    match command {
        CommandNode::Sequence(commands) => commands
            .iter()
            .all(|command| null_command(command, procedures)),
        CommandNode::RuleCall(rule) => rule.is_predicate,
        CommandNode::RuleSetCall(rules) => rules.iter().all(|rule| rule.is_predicate),
        CommandNode::ProcedureCall(name) => procedures
            .get(name)
            .map_or(false, |procedure| null_command(&procedure.command, procedures)),
        CommandNode::If(branch) => {
            null_command(&branch.then_command, procedures)
                && null_command(&branch.else_command, procedures)
        }
        CommandNode::Try(branch) => {
            null_command(&branch.condition, procedures)
                && null_command(&branch.then_command, procedures)
                && null_command(&branch.else_command, procedures)
        }
        CommandNode::Loop(body) => null_command(body, procedures),
        CommandNode::Or(or) => {
            null_command(&or.left, procedures) && null_command(&or.right, procedures)
        }
        CommandNode::Skip | CommandNode::Fail | CommandNode::Break(_) => true,
    }
}

/// True when the command provably cannot set the success flag to false.
/// A loop always terminates successfully, and a branch absorbs its
/// condition's failure, so only the branch bodies matter there.
pub fn never_fails(command: &CommandNode, procedures: &ProcedureMap) -> bool {
    match command {
        CommandNode::Sequence(commands) => commands
            .iter()
            .all(|command| never_fails(command, procedures)),
        CommandNode::RuleCall(rule) => rule.empty_lhs,
        CommandNode::RuleSetCall(rules) => rules.iter().all(|rule| rule.empty_lhs),
        CommandNode::ProcedureCall(name) => procedures
            .get(name)
            .map_or(false, |procedure| never_fails(&procedure.command, procedures)),
        CommandNode::If(branch) | CommandNode::Try(branch) => {
            never_fails(&branch.then_command, procedures)
                && never_fails(&branch.else_command, procedures)
        }
        CommandNode::Loop(_) => true,
        CommandNode::Or(or) => {
            never_fails(&or.left, procedures) && never_fails(&or.right, procedures)
        }
        CommandNode::Skip | CommandNode::Break(_) => true,
        CommandNode::Fail => false,
    }
}
