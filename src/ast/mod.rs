//! Abstract Syntax Tree (AST) Types for Graph Programs
//!
//! This module defines the command and declaration structures consumed by
//! the code generator. The tree arrives fully annotated from the front end:
//! rule calls carry their match/application flags and break statements carry
//! their loop-nesting flag.

pub mod program;
pub mod types;
