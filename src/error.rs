use std::fmt;
use std::io;

/// A single accumulated lexical-scan failure (`spec.md` §7): recorded as
/// scanning proceeds, never aborts the scan, and is flushed as a batch once
/// analysis finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalError {
    pub line: u32,
    pub message: String,
}

impl LexicalError {
    pub fn new(line: u32, message: String) -> Self {
        Self { line, message }
    }
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MyJS Lex Error: (line {}): {}", self.line, self.message)
    }
}

/// Structural failures (`spec.md` §7): fatal, reported once, nonzero exit.
#[derive(Debug)]
pub enum AppError {
    GrammarFileMissing,
    SourceFileMissing(String),
    SourceFileUnreadable(String, io::Error),
    GrammarMalformed(String),
    OutputWrite(String, io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::GrammarFileMissing => write!(f, "Error: file 'Gramatica.txt' not found"),
            AppError::SourceFileMissing(path) => write!(f, "Error: file '{}' not found", path),
            AppError::SourceFileUnreadable(path, err) => {
                write!(f, "Error reading file '{}': {}", path, err)
            }
            AppError::GrammarMalformed(what) => write!(f, "Error in grammar file: {}", what),
            AppError::OutputWrite(path, err) => {
                write!(f, "Error writing output file '{}': {}", path, err)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::SourceFileUnreadable(_, err) | AppError::OutputWrite(_, err) => Some(err),
            _ => None,
        }
    }
}
