//! gplc - code generation for a graph-transformation language
//!
//! This library turns the annotated command AST of a graph program into
//! the C source of a standalone runtime that applies graph-rewriting
//! rules with backtracking under the language's control constructs.

pub mod analysis;
pub mod ast;
pub mod codegen;

pub use ast::program::ProcedureMap;
pub use ast::types::*;
pub use codegen::{generate, write_main_file, BacktrackPolicy, GenConfig, GenError, TraceConfig};
