//! Program-Level Views
//!
//! Helpers that flatten the declaration list into the two shapes the
//! generator consumes: a name-indexed procedure map and the rule
//! declarations in their declaration order.

use indexmap::IndexMap;

use crate::ast::types::{CommandNode, DeclarationNode, ProcedureNode, ProgramNode, RuleDeclNode};

/// Procedures of a program indexed by name, in declaration order.
///
/// Local declarations are collected at the position of their enclosing
/// procedure, matching the order in which morphism code is emitted. Name
/// resolution is flat: the front end guarantees unique procedure names
/// after scope resolution.
#[derive(Debug)]
pub struct ProcedureMap<'a> {
    map: IndexMap<&'a str, &'a ProcedureNode>,
}

impl<'a> ProcedureMap<'a> {
    pub fn from_program(program: &'a ProgramNode) -> Self {
        let mut map = IndexMap::new();
        collect_procedures(&program.declarations, &mut map);
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&'a ProcedureNode> {
        self.map.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

fn collect_procedures<'a>(
    declarations: &'a [DeclarationNode],
    map: &mut IndexMap<&'a str, &'a ProcedureNode>,
) {
    for declaration in declarations {
        match declaration {
            DeclarationNode::Main(_) | DeclarationNode::Rule(_) => {}
            DeclarationNode::Procedure(procedure) => {
                map.insert(procedure.name.as_str(), procedure);
                collect_procedures(&procedure.local_decls, map);
            }
        }
    }
}

impl ProgramNode {
    /// The command of the first main declaration, if any.
    pub fn main_command(&self) -> Option<&CommandNode> {
        self.declarations.iter().find_map(|declaration| match declaration {
            DeclarationNode::Main(main) => Some(&main.command),
            _ => None,
        })
    }

    /// All rule declarations in declaration order, visiting a procedure's
    /// local declarations at the procedure's position.
    pub fn rule_declarations(&self) -> Vec<&RuleDeclNode> {
        let mut rules = Vec::new();
        collect_rules(&self.declarations, &mut rules);
        rules
    }
}

fn collect_rules<'a>(declarations: &'a [DeclarationNode], rules: &mut Vec<&'a RuleDeclNode>) {
    for declaration in declarations {
        match declaration {
            DeclarationNode::Main(_) => {}
            DeclarationNode::Procedure(procedure) => {
                collect_rules(&procedure.local_decls, rules);
            }
            DeclarationNode::Rule(rule) => rules.push(rule),
        }
    }
}
