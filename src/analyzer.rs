//! Predictive analyzer (component E): the table-driven pushdown machine
//! that drives the whole pipeline. Its stack interleaves grammar symbols
//! and scheduled semantic actions so that component F runs inline with the
//! parse, one symbol at a time, exactly as `spec.md` §4.E describes.
//!
//! Grounded in the teacher's `parser.rs` `ParseStack`/`Parser` shape (a
//! dual state/attribute stack driven by a `next_action`/`parse_text` loop)
//! generalized here from LALR shift/reduce to LL(1) predict/match, and in
//! `examples/original_source/lex.py`'s `parse()` for the exact action
//! scheduling and interleaving order.

use crate::error::AppError;
use crate::first_follow::ParsingTable;
use crate::grammar::{Grammar, Production, EOF};
use crate::lexer::Lexer;
use crate::report::ErrorReporter;
use crate::semantic::{self, SemState};
use crate::symbols::SymbolTable;
use crate::token::Token;

/// One item on the analyzer's mixed stack (`spec.md` §3): either a grammar
/// symbol awaiting a terminal match or non-terminal expansion, or a
/// semantic action scheduled to run at this point in the derivation.
#[derive(Debug, Clone)]
enum StackItem {
    Symbol(String),
    Action(semantic::SemanticAction),
}

/// Everything an analysis run produced, ready for the three output
/// writers in `output.rs`.
pub struct AnalysisOutput {
    pub tokens: Vec<Token>,
    pub symbols: SymbolTable,
    pub derivation: Vec<u32>,
    pub errors: ErrorReporter,
}

impl AnalysisOutput {
    /// `parse.txt` is only emitted when there were no lexical or syntactic
    /// errors (`spec.md` §7); semantic errors alone do not suppress it.
    pub fn derivation_is_publishable(&self) -> bool {
        !self.errors.has_lexical_errors() && !self.errors.has_syntactic_error()
    }
}

/// The loaded grammar and its precomputed LL(1) table, ready to analyze
/// any number of source texts.
pub struct Analyzer {
    grammar: Grammar,
    table: ParsingTable,
}

impl Analyzer {
    pub fn new(grammar_text: &str) -> Result<Self, AppError> {
        let grammar = Grammar::load(grammar_text)?;
        let table = ParsingTable::build(&grammar)?;
        Ok(Self { grammar, table })
    }

    /// Drives the predictive stack over `source`, pulling exactly one
    /// token of lookahead at a time, grounded in
    /// `examples/original_source/lex.py`'s `parse()`: a token is only
    /// fetched (and only then recorded for `lexed.txt`) when the previous
    /// lookahead has been consumed by a successful terminal match, never
    /// ahead of need. On the first syntactic error the loop stops without
    /// fetching any further token, so `tokens` ends up holding exactly the
    /// prefix the original would have written to `lexed.txt` before
    /// aborting — not the whole file.
    pub fn analyze(&self, source: &str) -> AnalysisOutput {
        let mut symbols = SymbolTable::new();
        let mut lexer = Lexer::new(source);
        let mut errors = ErrorReporter::new();
        let mut tokens: Vec<Token> = Vec::new();

        let mut lookahead = fetch(&mut lexer, &mut symbols, &mut errors);
        tokens.push(lookahead.clone());

        let mut state = SemState::new();
        let mut derivation = Vec::new();
        let mut prev_line = lookahead.location.line;

        let mut stack: Vec<StackItem> = vec![
            StackItem::Symbol(EOF.to_string()),
            StackItem::Symbol(self.grammar.axiom.clone()),
        ];

        while let Some(item) = stack.pop() {
            match item {
                StackItem::Action(action) => {
                    semantic::dispatch(action, &mut state, &mut symbols, &mut errors);
                }
                StackItem::Symbol(symbol) => {
                    if self.grammar.is_terminal(&symbol) {
                        if symbol == lookahead.kind.terminal_name() {
                            if symbol == "id" {
                                state.last_id_pos = Some(lookahead.attr.as_handle());
                            }
                            if symbol != EOF {
                                prev_line = lookahead.location.line;
                                lookahead = fetch(&mut lexer, &mut symbols, &mut errors);
                                tokens.push(lookahead.clone());
                            }
                        } else {
                            errors.report_syntactic(&symbol, &lookahead, prev_line, &symbols);
                            break;
                        }
                    } else {
                        match self.table.get(&symbol, lookahead.kind.terminal_name()) {
                            Some(number) => {
                                derivation.push(number);
                                let production = self.grammar.production(number);
                                let actions = semantic::actions_for(number);
                                for scheduled in schedule(production, actions).into_iter().rev() {
                                    stack.push(scheduled);
                                }
                            }
                            None => {
                                errors.report_syntactic(&symbol, &lookahead, prev_line, &symbols);
                                break;
                            }
                        }
                    }
                }
            }
        }

        AnalysisOutput { tokens, symbols, derivation, errors }
    }
}

/// Pulls one token from `lexer`, folding any lexical errors recorded
/// while scanning it into `errors` in scan order.
fn fetch(lexer: &mut Lexer<'_>, symbols: &mut SymbolTable, errors: &mut ErrorReporter) -> Token {
    let mut lex_errors = Vec::new();
    let token = lexer.next_token(symbols, &mut lex_errors);
    for error in lex_errors {
        errors.record_lexical(error);
    }
    token
}

/// Interleaves `production`'s right-hand side with its `(slot, action)`
/// schedule, in left-to-right execution order (slot 0 actions, symbol 1,
/// slot 1 actions, symbol 2, ... symbol N, slot N actions). A lambda
/// production has no real symbols, so it contributes only its actions.
/// The caller pushes the result in reverse so the stack top is this
/// list's first item.
fn schedule(
    production: &Production,
    actions: &[(u32, semantic::SemanticAction)],
) -> Vec<StackItem> {
    if production.is_lambda() {
        return actions.iter().map(|&(_, action)| StackItem::Action(action)).collect();
    }

    let mut items = Vec::with_capacity(production.rhs.len() + actions.len());
    let mut scheduled = actions.iter().peekable();

    while scheduled.peek().map_or(false, |&&(slot, _)| slot == 0) {
        items.push(StackItem::Action(scheduled.next().unwrap().1));
    }
    for (i, symbol) in production.rhs.iter().enumerate() {
        items.push(StackItem::Symbol(symbol.clone()));
        let slot = (i + 1) as u32;
        while scheduled.peek().map_or(false, |&&(s, _)| s == slot) {
            items.push(StackItem::Action(scheduled.next().unwrap().1));
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load() -> Analyzer {
        let text = std::fs::read_to_string("tests/fixtures/Gramatica.txt").unwrap();
        Analyzer::new(&text).unwrap()
    }

    #[test]
    fn accepts_a_well_formed_program() {
        let analyzer = load();
        let out = analyzer.analyze(
            "function int main() { let int x = 3; write(x); return x; }",
        );
        assert!(out.derivation_is_publishable());
        assert!(!out.derivation.is_empty());
        assert_eq!(out.errors.semantic_error_count(), 0);
    }

    #[test]
    fn derivation_starts_with_the_axioms_first_alternative() {
        let analyzer = load();
        let out = analyzer.analyze("let int x = 3;");
        // S -> LC S is production 1.
        assert_eq!(out.derivation.first(), Some(&1));
    }

    #[test]
    fn float_initializer_for_int_declaration_is_a_semantic_error() {
        let analyzer = load();
        let out = analyzer.analyze("let int x = 3.5;");
        assert!(out.derivation_is_publishable());
        assert!(out.errors.semantic_error_count() > 0);
    }

    #[test]
    fn write_boolean_is_a_semantic_error() {
        let analyzer = load();
        let out = analyzer.analyze("let boolean b; write(b);");
        assert!(out.errors.semantic_error_count() > 0);
    }

    #[test]
    fn call_site_argument_mismatch_is_a_semantic_error() {
        let analyzer = load();
        let out = analyzer.analyze(
            "function int f(int a) { return a; } function void g() { f(1, 2); }",
        );
        assert!(out.errors.semantic_error_count() > 0);
    }

    #[test]
    fn missing_semicolon_is_a_syntactic_error_and_suppresses_the_derivation() {
        let analyzer = load();
        let out = analyzer.analyze("let int x = 3\nlet int y = 4;");
        assert!(out.errors.has_syntactic_error());
        assert!(!out.derivation_is_publishable());
    }

    #[test]
    fn scanning_stops_at_the_first_syntactic_error() {
        let analyzer = load();
        // Missing ';' after the first declaration: the second line is never
        // reached by the scanner, so only the tokens up to and including
        // the unexpected lookahead ('let', int, id, eq, intconst, let) are
        // recorded — not the whole source.
        let out = analyzer.analyze("let int x = 3\nlet int y = 4;");
        assert!(out.errors.has_syntactic_error());
        assert_eq!(out.tokens.len(), 6);
    }

    #[test]
    fn out_of_range_literal_is_lexical_and_suppresses_the_derivation() {
        let analyzer = load();
        let out = analyzer.analyze("let int x = 99999;");
        assert!(out.errors.has_lexical_errors());
        assert!(!out.derivation_is_publishable());
    }

    #[test]
    fn two_runs_of_the_same_program_are_byte_identical() {
        let analyzer = load();
        let src = "function int main() { let int x = 3; write(x); return x; }";
        let a = analyzer.analyze(src);
        let b = analyzer.analyze(src);
        assert_eq!(a.derivation, b.derivation);
        assert_eq!(a.tokens.len(), b.tokens.len());
    }
}
