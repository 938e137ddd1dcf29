#[macro_use]
extern crate lazy_static;

pub mod analyzer;
pub mod attributes;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod lexer;
pub mod output;
pub mod report;
pub mod semantic;
pub mod symbols;
pub mod token;

pub use analyzer::{AnalysisOutput, Analyzer};
pub use error::AppError;
