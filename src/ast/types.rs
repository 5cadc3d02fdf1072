//! AST Types for Graph Programs
//!
//! The structures here mirror what the front end hands over after parsing
//! and semantic analysis. They are read-only to the generator; all flags
//! (rule properties, loop nesting of breaks) are attached upstream.

use serde::{Deserialize, Serialize};

// =============================================================================
// PROGRAM & DECLARATIONS
// =============================================================================

/// Root node: the full declaration list of a graph program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramNode {
    pub declarations: Vec<DeclarationNode>,
}

/// Union of all top-level and procedure-local declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationNode {
    Main(MainNode),
    Procedure(ProcedureNode),
    Rule(RuleDeclNode),
}

/// The main command sequence of the program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainNode {
    pub command: CommandNode,
}

/// A named procedure. Procedures are inlined at each call site, so the body
/// is an ordinary command. Local declarations may nest further procedures
/// and rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureNode {
    pub name: String,
    pub command: CommandNode,
    pub local_decls: Vec<DeclarationNode>,
}

/// A rule declaration. The generator does not see the rule's graphs; it
/// only needs the sizes that parameterise the morphism allocation and the
/// two flags the semantic analyser derives from the rule's structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDeclNode {
    pub name: String,
    /// Number of nodes in the rule's left-hand side.
    pub left_nodes: u32,
    /// Number of edges in the rule's left-hand side.
    pub left_edges: u32,
    /// Number of variables declared by the rule.
    pub variable_count: u32,
    /// The left-hand side is the empty graph, so the rule always matches.
    pub empty_lhs: bool,
    /// The rule does not change the host graph.
    pub is_predicate: bool,
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Union of all program commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandNode {
    /// Ordered command sequence: `C1; C2; ...`
    Sequence(Vec<CommandNode>),
    /// A call to a single rule.
    RuleCall(RuleCallNode),
    /// `{R1, ..., Rn}`: the rules are tried in order until one matches.
    /// Non-empty by front-end contract.
    RuleSetCall(Vec<RuleCallNode>),
    /// A call to a named procedure, resolved against the declaration list.
    ProcedureCall(String),
    /// `if C then P else Q`: the condition's graph changes never survive.
    If(BranchNode),
    /// `try C then P else Q`: the condition's graph changes survive on
    /// success and are rolled back on failure.
    Try(BranchNode),
    /// `P!`: repeat the body until it fails.
    Loop(Box<CommandNode>),
    /// `P or Q`: nondeterministic choice between the two subprograms.
    Or(OrNode),
    Skip,
    Fail,
    Break(BreakNode),
}

/// A rule call as resolved by the semantic analyser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCallNode {
    pub rule_name: String,
    /// The rule's left-hand side is the empty graph.
    pub empty_lhs: bool,
    /// The rule does not change the host graph.
    pub is_predicate: bool,
}

/// The three subprograms of an if or try statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchNode {
    pub condition: Box<CommandNode>,
    pub then_command: Box<CommandNode>,
    pub else_command: Box<CommandNode>,
}

/// The two subprograms of an or statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrNode {
    pub left: Box<CommandNode>,
    pub right: Box<CommandNode>,
}

/// A break statement inside a loop body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakNode {
    /// Set upstream when the loop this break exits is itself nested inside
    /// another loop that records graph changes. The restore frame must then
    /// be refreshed rather than released.
    pub inner_loop: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_deserializes_from_front_end_json() {
        let json = serde_json::json!({
            "declarations": [
                { "Rule": { "name": "r1", "left_nodes": 2, "left_edges": 1,
                            "variable_count": 0, "empty_lhs": false,
                            "is_predicate": false } },
                { "Main": { "command": { "RuleCall": {
                    "rule_name": "r1", "empty_lhs": false,
                    "is_predicate": false } } } }
            ]
        });
        let program: ProgramNode = serde_json::from_value(json).unwrap();
        assert_eq!(program.declarations.len(), 2);
        match &program.declarations[1] {
            DeclarationNode::Main(main) => match &main.command {
                CommandNode::RuleCall(rule) => assert_eq!(rule.rule_name, "r1"),
                other => panic!("expected a rule call, got {:?}", other),
            },
            other => panic!("expected a main declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_command_equality() {
        let command = CommandNode::Loop(Box::new(CommandNode::Break(BreakNode {
            inner_loop: true,
        })));
        assert_eq!(command.clone(), command);
    }
}
