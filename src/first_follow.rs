//! FIRST/FOLLOW fixed-point computation and LL(1) parsing-table
//! construction (component D).

use std::collections::{HashMap, HashSet};

use crate::error::AppError;
use crate::grammar::{Grammar, LAMBDA};

pub type SymbolSet = HashSet<String>;

/// FIRST(A) for every non-terminal `A`, where the set may contain the
/// sentinel `"lambda"` meaning `A` is nullable.
pub fn compute_first(grammar: &Grammar) -> HashMap<String, SymbolSet> {
    let mut first: HashMap<String, SymbolSet> = grammar
        .non_terminals
        .iter()
        .map(|nt| (nt.clone(), SymbolSet::new()))
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for nt in &grammar.non_terminals {
            for (_, production) in grammar.productions_for(nt) {
                if production.is_lambda() {
                    changed |= first.get_mut(nt).unwrap().insert(LAMBDA.to_string());
                    continue;
                }
                let mut all_nullable = true;
                for symbol in &production.rhs {
                    if grammar.is_terminal(symbol) {
                        changed |= first.get_mut(nt).unwrap().insert(symbol.clone());
                        all_nullable = false;
                        break;
                    } else if grammar.is_non_terminal(symbol) {
                        let symbol_first = first.get(symbol).cloned().unwrap_or_default();
                        for f in &symbol_first {
                            if f != LAMBDA {
                                changed |= first.get_mut(nt).unwrap().insert(f.clone());
                            }
                        }
                        if !symbol_first.contains(LAMBDA) {
                            all_nullable = false;
                            break;
                        }
                    } else {
                        all_nullable = false;
                        break;
                    }
                }
                if all_nullable {
                    changed |= first.get_mut(nt).unwrap().insert(LAMBDA.to_string());
                }
            }
        }
    }
    first
}

/// FOLLOW(A) for every non-terminal `A`, seeded with `eof` on the axiom.
pub fn compute_follow(grammar: &Grammar, first: &HashMap<String, SymbolSet>) -> HashMap<String, SymbolSet> {
    let mut follow: HashMap<String, SymbolSet> = grammar
        .non_terminals
        .iter()
        .map(|nt| (nt.clone(), SymbolSet::new()))
        .collect();
    follow.get_mut(&grammar.axiom).unwrap().insert("eof".to_string());

    let mut changed = true;
    while changed {
        changed = false;
        for nt in &grammar.non_terminals {
            for (_, production) in grammar.productions_for(nt) {
                for (i, symbol) in production.rhs.iter().enumerate() {
                    if !grammar.is_non_terminal(symbol) {
                        continue;
                    }
                    let rest = &production.rhs[i + 1..];
                    if rest.is_empty() {
                        let nt_follow = follow.get(nt).cloned().unwrap_or_default();
                        for f in nt_follow {
                            changed |= follow.get_mut(symbol).unwrap().insert(f);
                        }
                        continue;
                    }
                    let mut all_nullable = true;
                    for next_symbol in rest {
                        if grammar.is_terminal(next_symbol) {
                            changed |= follow.get_mut(symbol).unwrap().insert(next_symbol.clone());
                            all_nullable = false;
                            break;
                        } else if grammar.is_non_terminal(next_symbol) {
                            let next_first = first.get(next_symbol).cloned().unwrap_or_default();
                            for f in &next_first {
                                if f != LAMBDA {
                                    changed |= follow.get_mut(symbol).unwrap().insert(f.clone());
                                }
                            }
                            if !next_first.contains(LAMBDA) {
                                all_nullable = false;
                                break;
                            }
                        }
                    }
                    if all_nullable {
                        let nt_follow = follow.get(nt).cloned().unwrap_or_default();
                        for f in nt_follow {
                            changed |= follow.get_mut(symbol).unwrap().insert(f);
                        }
                    }
                }
            }
        }
    }
    follow
}

fn first_of_rhs(grammar: &Grammar, rhs: &[String], first: &HashMap<String, SymbolSet>) -> SymbolSet {
    let mut out = SymbolSet::new();
    if rhs.is_empty() || rhs[0] == LAMBDA {
        out.insert(LAMBDA.to_string());
        return out;
    }
    for symbol in rhs {
        if grammar.is_terminal(symbol) {
            out.insert(symbol.clone());
            return out;
        } else if grammar.is_non_terminal(symbol) {
            let symbol_first = first.get(symbol).cloned().unwrap_or_default();
            for f in &symbol_first {
                if f != LAMBDA {
                    out.insert(f.clone());
                }
            }
            if !symbol_first.contains(LAMBDA) {
                return out;
            }
        } else {
            out.insert(LAMBDA.to_string());
            return out;
        }
    }
    out.insert(LAMBDA.to_string());
    out
}

/// `M[non_terminal, terminal] -> production_number`.
#[derive(Debug, Default)]
pub struct ParsingTable {
    table: HashMap<(String, String), u32>,
}

impl ParsingTable {
    pub fn build(grammar: &Grammar) -> Result<Self, AppError> {
        let first = compute_first(grammar);
        let follow = compute_follow(grammar, &first);
        let mut table: HashMap<(String, String), u32> = HashMap::new();

        for nt in &grammar.non_terminals {
            for (number, production) in grammar.productions_for(nt) {
                let first_of_production = first_of_rhs(grammar, &production.rhs, &first);
                for terminal in &first_of_production {
                    if terminal == LAMBDA {
                        continue;
                    }
                    let key = (nt.clone(), terminal.clone());
                    if let Some(&existing) = table.get(&key) {
                        if existing != number {
                            return Err(AppError::GrammarMalformed(format!(
                                "LL(1) conflict: {} has two alternatives predicted on '{}' (productions {} and {})",
                                nt, terminal, existing, number
                            )));
                        }
                    }
                    table.insert(key, number);
                }
            }
        }

        for nt in &grammar.non_terminals {
            for (number, production) in grammar.productions_for(nt) {
                let first_of_production = first_of_rhs(grammar, &production.rhs, &first);
                if !first_of_production.contains(LAMBDA) {
                    continue;
                }
                for terminal in follow.get(nt).cloned().unwrap_or_default() {
                    table.entry((nt.clone(), terminal)).or_insert(number);
                }
            }
        }

        let built = Self { table };
        for nt in &grammar.non_terminals {
            if !built.table.keys().any(|(n, _)| n == nt) {
                return Err(AppError::GrammarMalformed(format!(
                    "non-terminal '{}' has no predicted entries",
                    nt
                )));
            }
        }
        Ok(built)
    }

    pub fn get(&self, non_terminal: &str, terminal: &str) -> Option<u32> {
        self.table
            .get(&(non_terminal.to_string(), terminal.to_string()))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_myjs_grammar() -> Grammar {
        let text = std::fs::read_to_string("tests/fixtures/Gramatica.txt").unwrap();
        Grammar::load(&text).unwrap()
    }

    #[test]
    fn myjs_grammar_builds_a_conflict_free_table() {
        let grammar = load_myjs_grammar();
        let table = ParsingTable::build(&grammar).unwrap();
        assert_eq!(table.get("S", "let"), Some(1));
        assert_eq!(table.get("S", "eof"), Some(3));
        assert_eq!(table.get("S", "function"), Some(2));
    }

    #[test]
    fn every_non_terminal_is_predicted_somewhere() {
        let grammar = load_myjs_grammar();
        let table = ParsingTable::build(&grammar).unwrap();
        for nt in &grammar.non_terminals {
            let predicted = grammar
                .terminals
                .iter()
                .chain(std::iter::once(&"eof".to_string()))
                .any(|t| table.get(nt, t).is_some());
            assert!(predicted, "{} has no predicted entry", nt);
        }
    }

    #[test]
    fn detects_ll1_conflicts() {
        let conflicting = "
            Terminales = { a b }
            NoTerminales = { S A }
            Axioma = S
            Producciones = {
                S -> A
                A -> a
                A -> a b
            }
        ";
        let grammar = Grammar::load(conflicting).unwrap();
        assert!(ParsingTable::build(&grammar).is_err());
    }
}
