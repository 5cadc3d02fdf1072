//! Runtime-Shell Synthesis
//!
//! Everything around the generated command body: include directives, the
//! per-rule morphism globals and their lifecycle, teardown, the host-graph
//! builder wired to the external host parser, and the entry point.

use std::io::Write;

use crate::ast::types::CommandNode;

use super::config::BacktrackPolicy;
use super::emitter::{emit, INDENT};
use super::errors::GenError;
use super::types::CommandData;
use super::Generator;

/// Initial node capacity of the host graph.
const HOST_NODE_SIZE: u32 = 128;
/// Initial edge capacity of the host graph.
const HOST_EDGE_SIZE: u32 = 128;

impl<W: Write> Generator<'_, W> {
    pub(crate) fn generate_runtime(&mut self, main: &CommandNode) -> Result<(), GenError> {
        self.emit_includes()?;
        self.emit_morphism_declarations()?;
        self.emit_free_morphisms()?;
        self.emit_garbage_collect()?;
        self.emit_host_graph_builder()?;
        self.emit_main_function(main)
    }

    fn emit_includes(&mut self) -> Result<(), GenError> {
        self.emitter.raw("#include <time.h>")?;
        self.emitter.raw("#include \"common.h\"")?;
        self.emitter.raw("#include \"debug.h\"")?;
        self.emitter.raw("#include \"graph.h\"")?;
        self.emitter.raw("#include \"graphStacks.h\"")?;
        self.emitter.raw("#include \"parser.h\"")?;
        self.emitter.raw("#include \"morphism.h\"")?;
        self.emitter.blank()?;
        Ok(())
    }

    /// One header include and one global morphism handle per rule.
    fn emit_morphism_declarations(&mut self) -> Result<(), GenError> {
        for rule in &self.rules {
            emit!(self.emitter, 0, "#include \"{}.h\"", rule.name)?;
            emit!(self.emitter, 0, "Morphism *M_{} = NULL;", rule.name)?;
        }
        self.emitter.blank()?;
        Ok(())
    }

    fn emit_free_morphisms(&mut self) -> Result<(), GenError> {
        self.emitter.raw("static void freeMorphisms(void)")?;
        self.emitter.raw("{")?;
        for rule in &self.rules {
            emit!(self.emitter, INDENT, "freeMorphism(M_{});", rule.name)?;
        }
        self.emitter.raw("}")?;
        self.emitter.blank()?;
        Ok(())
    }

    /// Teardown runs on every exit path, normal and failing alike.
    fn emit_garbage_collect(&mut self) -> Result<(), GenError> {
        self.emitter.raw("static void garbageCollect(void)")?;
        self.emitter.raw("{")?;
        self.emitter.line(INDENT, "freeGraph(host);")?;
        if self.config.list_hashing {
            self.emitter.line(INDENT, "freeHostListStore();")?;
        }
        self.emitter.line(INDENT, "freeMorphisms();")?;
        match self.config.backtracking {
            BacktrackPolicy::CopyGraphs => self.emitter.line(INDENT, "freeGraphStack();")?,
            BacktrackPolicy::RecordChanges => {
                self.emitter.line(INDENT, "freeGraphChangeStack();")?
            }
        }
        self.emitter.line(INDENT, "closeLogFile();")?;
        if self.config.tracing.any() {
            self.emitter.line(INDENT, "closeTraceFile();")?;
        }
        self.emitter.raw("}")?;
        self.emitter.blank()?;
        Ok(())
    }

    fn emit_host_graph_builder(&mut self) -> Result<(), GenError> {
        self.emitter.raw("Graph *host = NULL;")?;
        self.emitter.raw("int *node_map = NULL;")?;
        self.emitter.blank()?;
        self.emitter.raw("static Graph *buildHostGraph(char *host_file)")?;
        self.emitter.raw("{")?;
        self.emitter.line(INDENT, "yyin = fopen(host_file, \"r\");")?;
        self.emitter.line(INDENT, "if(yyin == NULL)")?;
        self.emitter.line(INDENT, "{")?;
        self.emitter.line(2 * INDENT, "perror(host_file);")?;
        self.emitter.line(2 * INDENT, "return NULL;")?;
        self.emitter.line(INDENT, "}")?;
        self.emitter.blank()?;
        emit!(
            self.emitter,
            INDENT,
            "host = newGraph({HOST_NODE_SIZE}, {HOST_EDGE_SIZE});"
        )?;
        emit!(
            self.emitter,
            INDENT,
            "node_map = calloc({HOST_NODE_SIZE}, sizeof(int));"
        )?;
        self.emitter.line(INDENT, "if(node_map == NULL)")?;
        self.emitter.line(INDENT, "{")?;
        self.emitter.line(2 * INDENT, "freeGraph(host);")?;
        self.emitter.line(2 * INDENT, "return NULL;")?;
        self.emitter.line(INDENT, "}")?;
        self.emitter.line(
            INDENT,
            "/* The parser populates the host graph using node_map to add edges with",
        )?;
        self.emitter.line(INDENT, " * the correct source and target indices. */")?;
        self.emitter.line(INDENT, "int result = yyparse();")?;
        self.emitter.line(INDENT, "free(node_map);")?;
        self.emitter.line(INDENT, "fclose(yyin);")?;
        self.emitter.line(INDENT, "if(result == 0) return host;")?;
        self.emitter.line(INDENT, "else")?;
        self.emitter.line(INDENT, "{")?;
        self.emitter.line(2 * INDENT, "freeGraph(host);")?;
        self.emitter.line(2 * INDENT, "return NULL;")?;
        self.emitter.line(INDENT, "}")?;
        self.emitter.raw("}")?;
        self.emitter.blank()?;
        Ok(())
    }

    fn emit_main_function(&mut self, main: &CommandNode) -> Result<(), GenError> {
        self.emitter.raw("bool success = true;")?;
        self.emitter.blank()?;
        self.emitter.raw("int main(int argc, char **argv)")?;
        self.emitter.raw("{")?;
        self.emitter.line(INDENT, "srand(time(NULL));")?;
        self.emitter.line(INDENT, "openLogFile(\"gp2.log\");")?;
        self.emitter.blank()?;
        self.emitter.line(INDENT, "if(argc != 2)")?;
        self.emitter.line(INDENT, "{")?;
        self.emitter.line(
            2 * INDENT,
            "fprintf(stderr, \"Error: missing <host-file> argument.\\n\");",
        )?;
        self.emitter.line(2 * INDENT, "return 0;")?;
        self.emitter.line(INDENT, "}")?;
        self.emitter.blank()?;
        if self.config.tracing.any() {
            self.emitter.line(INDENT, "openTraceFile(\"gp2.trace\");")?;
        }
        self.emitter.line(INDENT, "host = buildHostGraph(argv[1]);")?;
        self.emitter.line(INDENT, "if(host == NULL)")?;
        self.emitter.line(INDENT, "{")?;
        self.emitter.line(
            2 * INDENT,
            "fprintf(stderr, \"Error parsing host graph file.\\n\");",
        )?;
        self.emitter.line(2 * INDENT, "return 0;")?;
        self.emitter.line(INDENT, "}")?;
        self.emitter.line(INDENT, "FILE *output_file = fopen(\"gp2.output\", \"w\");")?;
        self.emitter.line(INDENT, "if(output_file == NULL)")?;
        self.emitter.line(INDENT, "{")?;
        self.emitter.line(2 * INDENT, "perror(\"gp2.output\");")?;
        self.emitter.line(2 * INDENT, "exit(1);")?;
        self.emitter.line(INDENT, "}")?;
        if self.config.tracing.graphs {
            self.emitter.line(INDENT, "print_trace(\"Start Graph: \\n\");")?;
            self.emitter.line(INDENT, "printGraph(host, trace_file);")?;
            self.emitter.blank()?;
        }
        for rule in &self.rules {
            emit!(
                self.emitter,
                INDENT,
                "M_{} = makeMorphism({}, {}, {});",
                rule.name,
                rule.left_nodes,
                rule.left_edges,
                rule.variable_count
            )?;
        }
        self.emitter.blank()?;

        self.generate_command(main, CommandData::main_body(INDENT))?;

        self.emitter.line(INDENT, "printGraph(host, output_file);")?;
        self.emitter.line(INDENT, "printf(\"Output graph saved to file gp2.output\\n\");")?;
        self.emitter.line(INDENT, "garbageCollect();")?;
        self.emitter.line(INDENT, "fclose(output_file);")?;
        self.emitter.line(INDENT, "return 0;")?;
        self.emitter.raw("}")?;
        self.emitter.blank()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::types::{
        CommandNode, DeclarationNode, MainNode, ProcedureNode, ProgramNode, RuleDeclNode,
    };
    use crate::codegen::testutil::*;
    use crate::codegen::{BacktrackPolicy, GenConfig, TraceConfig};

    fn sized_rule(name: &str, nodes: u32, edges: u32, variables: u32) -> DeclarationNode {
        DeclarationNode::Rule(RuleDeclNode {
            name: name.to_string(),
            left_nodes: nodes,
            left_edges: edges,
            variable_count: variables,
            empty_lhs: false,
            is_predicate: false,
        })
    }

    fn two_rule_program() -> ProgramNode {
        ProgramNode {
            declarations: vec![
                sized_rule("grow", 2, 1, 3),
                DeclarationNode::Procedure(ProcedureNode {
                    name: "Shrink".to_string(),
                    command: rule("shrink"),
                    local_decls: vec![sized_rule("shrink", 1, 0, 0)],
                }),
                DeclarationNode::Main(MainNode { command: rule("grow") }),
            ],
        }
    }

    #[test]
    fn test_shell_declares_and_allocates_every_morphism() {
        let output = generate_string(&two_rule_program(), &GenConfig::default());
        assert!(output.contains("#include \"grow.h\""));
        assert!(output.contains("Morphism *M_grow = NULL;"));
        assert!(output.contains("M_grow = makeMorphism(2, 1, 3);"));
        // Local rule declarations are visited at their procedure's
        // position.
        assert!(output.contains("#include \"shrink.h\""));
        assert!(output.contains("M_shrink = makeMorphism(1, 0, 0);"));
        assert!(output.contains("freeMorphism(M_grow);"));
        assert!(output.contains("freeMorphism(M_shrink);"));
    }

    #[test]
    fn test_shell_builds_the_host_graph_with_fixed_capacities() {
        let output = generate_main(CommandNode::Skip);
        assert!(output.contains("host = newGraph(128, 128);"));
        assert!(output.contains("node_map = calloc(128, sizeof(int));"));
        assert!(output.contains("int result = yyparse();"));
    }

    #[test]
    fn test_shell_seeds_random_and_opens_log() {
        let output = generate_main(CommandNode::Skip);
        assert!(output.contains("srand(time(NULL));"));
        assert!(output.contains("openLogFile(\"gp2.log\");"));
    }

    #[test]
    fn test_teardown_matches_the_backtracking_policy() {
        let recording = generate_main(CommandNode::Skip);
        assert!(recording.contains("freeGraphChangeStack();"));
        assert!(!recording.contains("freeGraphStack();"));

        let config =
            GenConfig { backtracking: BacktrackPolicy::CopyGraphs, ..GenConfig::default() };
        let copying = generate_string(&program_with_main(CommandNode::Skip), &config);
        assert!(copying.contains("freeGraphStack();"));
        assert!(!copying.contains("freeGraphChangeStack();"));
    }

    #[test]
    fn test_list_hashing_adds_store_teardown() {
        let config = GenConfig { list_hashing: true, ..GenConfig::default() };
        let output = generate_string(&program_with_main(CommandNode::Skip), &config);
        assert!(output.contains("freeHostListStore();"));
    }

    #[test]
    fn test_trace_file_lifecycle_follows_the_toggles() {
        let off = generate_main(CommandNode::Skip);
        assert!(!off.contains("openTraceFile"));
        assert!(!off.contains("closeTraceFile"));

        let config = GenConfig {
            tracing: TraceConfig { rules: false, graphs: true, backtracking: false },
            ..GenConfig::default()
        };
        let on = generate_string(&program_with_main(CommandNode::Skip), &config);
        assert!(on.contains("openTraceFile(\"gp2.trace\");"));
        assert!(on.contains("closeTraceFile();"));
        assert!(on.contains("print_trace(\"Start Graph: \\n\");"));
    }

    #[test]
    fn test_shell_ends_by_writing_the_graph_and_tearing_down() {
        let output = generate_main(CommandNode::Skip);
        let body_end = output.rfind("printGraph(host, output_file);").expect("output write");
        let teardown = output.rfind("garbageCollect();").expect("teardown");
        let close = output.rfind("return 0;").expect("exit");
        assert!(body_end < teardown && teardown < close);
    }

    #[test]
    fn test_missing_argument_path_returns_zero() {
        // Quirk preserved from the runtime contract: argument and parse
        // failures exit with status 0 after printing to stderr.
        let output = generate_main(CommandNode::Skip);
        assert!(output.contains("Error: missing <host-file> argument."));
        assert!(output.contains("Error parsing host graph file."));
    }
}
