//! Error reporter (component G): per-non-terminal syntactic diagnostics,
//! the "missing `;`" line heuristic, lexical-error accumulation/flush, and
//! semantic-error printing at the point of detection.

use crate::error::LexicalError;
use crate::symbols::SymbolTable;
use crate::token::{Token, TokenKind};

#[derive(Debug, Default)]
pub struct ErrorReporter {
    lexical_errors: Vec<LexicalError>,
    syntactic_error: bool,
    semantic_error_count: u32,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lexical(&mut self, error: LexicalError) {
        self.lexical_errors.push(error);
    }

    pub fn has_lexical_errors(&self) -> bool {
        !self.lexical_errors.is_empty()
    }

    /// Prints every accumulated lexical error, in scan order.
    pub fn flush_lexical_errors(&self) {
        for error in &self.lexical_errors {
            println!("{}", error);
        }
    }

    pub fn has_syntactic_error(&self) -> bool {
        self.syntactic_error
    }

    pub fn semantic_error_count(&self) -> u32 {
        self.semantic_error_count
    }

    pub fn has_any_error(&self) -> bool {
        self.has_lexical_errors() || self.syntactic_error || self.semantic_error_count > 0
    }

    pub fn report_semantic(&mut self, message: &str) {
        println!("MyJS Semantic Error: {}", message);
        self.semantic_error_count += 1;
    }

    /// Reports a syntactic error for the non-terminal `expected_non_terminal`
    /// that was being expanded when `token` (the unexpected lookahead) was
    /// seen, with `prev_line` the line of the previously consumed token.
    pub fn report_syntactic(
        &mut self,
        expected_non_terminal: &str,
        token: &Token,
        prev_line: u32,
        symbols: &SymbolTable,
    ) {
        self.syntactic_error = true;

        // The program's synthetic end-of-file token carries no real line of
        // its own; it always falls back to the previously consumed line.
        let nominal_line = if token.kind == TokenKind::Eof { 0 } else { token.location.line };
        let mut line = nominal_line;
        let mut changed = false;
        if nominal_line > prev_line {
            line = prev_line;
            changed = true;
        }
        if line == 0 {
            line = prev_line;
        }

        let show_id = if token.kind == TokenKind::Id {
            symbols.name_of(token.attr.as_handle())
        } else {
            token.kind.terminal_name().to_string()
        };

        print!("MyJS Syntactic Error: At line {} ", line);
        println!("{}", message_for(expected_non_terminal, &show_id, changed));
    }
}

fn message_for(non_terminal: &str, show_id: &str, changed: bool) -> String {
    match non_terminal {
        "S" => format!("expected the start of a statement or function, found '{}'", show_id),
        "LC" => format!("expected the start of a statement, found '{}'", show_id),
        "LF" => format!("expected 'function', found '{}'", show_id),
        "CuerpoIf" => format!("expected the start of a statement or a '{{', found '{}'", show_id),
        "Cuerpo" => format!("expected the start of a statement or a '}}', found '{}'", show_id),
        "Args" => format!("expected a data type or a missing ')', found '{}'", show_id),
        "ArgsLlamada" => format!("there is an invalid argument or a missing ')', found '{}'", show_id),
        "ArgMoreLlamada" => format!(
            "expected ',' to pass more arguments or a missing ')', found '{}'",
            show_id
        ),
        "ArgMore" => format!(
            "expected ',' to declare more arguments or a missing ')', found '{}'",
            show_id
        ),
        "LS" => format!("expected a function call or a declaration, found '{}'", show_id),
        "IdOpt" => format!("expected '=' or a function call, found '{}'", show_id),
        "TypeFun" => format!("expected a function type, found '{}'", show_id),
        "Tipo" => format!("expected a data type, found '{}'", show_id),
        "Asignar" => format!("expected '=', found '{}'", show_id),
        "ExpReturn" => {
            if changed {
                "expected ';'".to_string()
            } else {
                format!("there is an invalid expression after return, found '{}'", show_id)
            }
        }
        "Expresion" => format!("there is a malformed expression, found '{}'", show_id),
        "ExpresionAux" => {
            if changed {
                "expected ';'".to_string()
            } else {
                format!("expected an operator, found '{}'", show_id)
            }
        }
        "Expresion1" => format!("there is a malformed expression, found '{}'", show_id),
        "Expresion1Aux" => {
            if changed {
                "expected ';'".to_string()
            } else {
                format!("expected an operator, found '{}'", show_id)
            }
        }
        "Expresion2" => format!("there is a malformed expression, found '{}'", show_id),
        "Expresion2Aux" => {
            if changed {
                "expected ';'".to_string()
            } else {
                format!("expected an operator, found '{}'", show_id)
            }
        }
        "Expresion3" => format!("there is an invalid expression, found '{}'", show_id),
        "Expresion4" => {
            if changed {
                "expected ';'".to_string()
            } else {
                format!("there is a malformed function call or a missing ')', found '{}'", show_id)
            }
        }
        other => format!("expected '{}', found '{}'", other, show_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_missing_semicolon_when_line_advances() {
        assert_eq!(message_for("ExpresionAux", "let", true), "expected ';'");
    }

    #[test]
    fn reports_operator_expected_when_line_unchanged() {
        assert_eq!(
            message_for("ExpresionAux", "let", false),
            "expected an operator, found 'let'"
        );
    }

    #[test]
    fn falls_back_to_generic_template_for_unknown_non_terminals() {
        assert_eq!(message_for("Foo", "bar", false), "expected 'Foo', found 'bar'");
    }
}
