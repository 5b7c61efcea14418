//! Main module for proof-flow document functionality

pub mod ast;
pub mod extraction;
pub mod mapping;
pub mod output;
pub mod parsing;
pub mod serializer;
pub mod testing;
