//! Program Code Generation
//!
//! A single pass over the command tree that emits the C source of the
//! runtime: a `main` that builds the host graph, applies rules under the
//! program's control constructs with correct backtracking, and writes the
//! result graph. The per-rule match/apply functions and the graph runtime
//! are external; the emitted code only calls into their interfaces.

pub mod config;
pub mod emitter;
pub mod errors;
pub mod types;

mod backtrack;
mod branch;
mod failure;
mod loops;
mod program;
mod rule_call;
mod runtime;

pub use config::{BacktrackPolicy, GenConfig, TraceConfig};
pub use errors::GenError;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::ast::program::ProcedureMap;
use crate::ast::types::{CommandNode, ProgramNode, RuleDeclNode};
use emitter::Emitter;

/// Name of the file written into the output directory.
pub const MAIN_FILE: &str = "main.c";

/// Generate the runtime source for `program` into `out`.
pub fn generate<W: Write>(
    program: &ProgramNode,
    config: &GenConfig,
    out: W,
) -> Result<(), GenError> {
    let main = program.main_command().ok_or(GenError::MissingMain)?;
    let procedures = ProcedureMap::from_program(program);
    check_procedure_calls(main, &procedures, &mut Vec::new())?;
    let rules = program.rule_declarations();
    tracing::debug!(
        rules = rules.len(),
        procedures = procedures.len(),
        "generating runtime source"
    );
    let mut generator = Generator {
        emitter: Emitter::new(out),
        config,
        procedures,
        rules,
        restore_point_count: 0,
    };
    generator.generate_runtime(main)?;
    generator.emitter.flush()?;
    Ok(())
}

/// Generate the runtime source and write it to `main.c` in the output
/// directory. Returns the path of the written file.
pub fn write_main_file(
    program: &ProgramNode,
    config: &GenConfig,
    output_dir: &Path,
) -> Result<PathBuf, GenError> {
    let path = output_dir.join(MAIN_FILE);
    let file = File::create(&path)?;
    generate(program, config, BufWriter::new(file))?;
    Ok(path)
}

/// State shared by the emission routines during one generator invocation.
pub(crate) struct Generator<'a, W: Write> {
    pub(crate) emitter: Emitter<W>,
    pub(crate) config: &'a GenConfig,
    pub(crate) procedures: ProcedureMap<'a>,
    pub(crate) rules: Vec<&'a RuleDeclNode>,
    restore_point_count: u32,
}

impl<W: Write> Generator<'_, W> {
    /// Claim the next restore-point identifier. Identifiers name the
    /// emitted runtime variables, so two live frames never share one.
    pub(crate) fn next_restore_point(&mut self) -> u32 {
        let point = self.restore_point_count;
        self.restore_point_count += 1;
        point
    }
}

/// Procedures are inlined at their call sites, so every call reachable
/// from the main command must resolve to a declaration and the procedure
/// call graph must be acyclic.
fn check_procedure_calls<'a>(
    command: &'a CommandNode,
    procedures: &ProcedureMap<'a>,
    stack: &mut Vec<&'a str>,
) -> Result<(), GenError> {
    match command {
        CommandNode::Sequence(commands) => {
            for command in commands {
                check_procedure_calls(command, procedures, stack)?;
            }
        }
        CommandNode::ProcedureCall(name) => {
            let procedure = procedures
                .get(name)
                .ok_or_else(|| GenError::UndefinedProcedure(name.clone()))?;
            if stack.contains(&name.as_str()) {
                return Err(GenError::RecursiveProcedure(name.clone()));
            }
            stack.push(name.as_str());
            check_procedure_calls(&procedure.command, procedures, stack)?;
            stack.pop();
        }
        CommandNode::If(branch) | CommandNode::Try(branch) => {
            check_procedure_calls(&branch.condition, procedures, stack)?;
            check_procedure_calls(&branch.then_command, procedures, stack)?;
            check_procedure_calls(&branch.else_command, procedures, stack)?;
        }
        CommandNode::Loop(body) => check_procedure_calls(body, procedures, stack)?,
        CommandNode::Or(or) => {
            check_procedure_calls(&or.left, procedures, stack)?;
            check_procedure_calls(&or.right, procedures, stack)?;
        }
        CommandNode::RuleCall(_)
        | CommandNode::RuleSetCall(_)
        | CommandNode::Skip
        | CommandNode::Fail
        | CommandNode::Break(_) => {}
    }
    Ok(())
}
