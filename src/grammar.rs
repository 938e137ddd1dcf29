//! Grammar loader (component C): parses a `Gramatica.txt`-format grammar
//! file into the flat production list the table builder (`first_follow.rs`)
//! and the predictive analyzer (`analyzer.rs`) both work from.

use std::collections::{HashMap, HashSet};

use crate::error::AppError;

pub const LAMBDA: &str = "lambda";
pub const EOF: &str = "eof";

#[derive(Debug, Clone)]
pub struct Production {
    pub lhs: String,
    pub rhs: Vec<String>,
}

impl Production {
    pub fn is_lambda(&self) -> bool {
        self.rhs.first().map(|s| s.as_str()) == Some(LAMBDA)
    }
}

#[derive(Debug, Default)]
pub struct Grammar {
    pub terminals: HashSet<String>,
    pub non_terminals: HashSet<String>,
    pub axiom: String,
    /// All productions, in file order; production number is `index + 1`.
    pub productions: Vec<Production>,
    by_lhs: HashMap<String, Vec<usize>>,
}

impl Grammar {
    pub fn load(text: &str) -> Result<Grammar, AppError> {
        let mut terminals = HashSet::new();
        let mut non_terminals = HashSet::new();
        let mut axiom = None;
        let mut productions = Vec::new();
        let mut by_lhs: HashMap<String, Vec<usize>> = HashMap::new();

        let mut in_productions = false;
        let mut pending_section: Option<&'static str> = None;
        let mut pending_body = String::new();

        let mut saw_terminals = false;
        let mut saw_non_terminals = false;
        let mut saw_axioma = false;
        let mut saw_producciones = false;

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with("////") {
                continue;
            }

            if let Some(section) = pending_section {
                pending_body.push(' ');
                if let Some(end) = line.find('}') {
                    pending_body.push_str(&line[..end]);
                    let items: HashSet<String> =
                        pending_body.split_whitespace().map(|s| s.to_string()).collect();
                    match section {
                        "terminals" => terminals = items,
                        "nonterminals" => non_terminals = items,
                        _ => unreachable!(),
                    }
                    pending_section = None;
                    pending_body.clear();
                } else {
                    pending_body.push_str(line);
                }
                continue;
            }

            if line.contains("Terminales") && line.contains('=') && !line.contains("NoTerminales") {
                saw_terminals = true;
                if let (Some(start), Some(end)) = (line.find('{'), line.rfind('}')) {
                    terminals = line[start + 1..end]
                        .split_whitespace()
                        .map(|s| s.to_string())
                        .collect();
                } else if let Some(start) = line.find('{') {
                    pending_section = Some("terminals");
                    pending_body = line[start + 1..].to_string();
                }
                continue;
            }

            if line.contains("NoTerminales") && line.contains('=') {
                saw_non_terminals = true;
                if let (Some(start), Some(end)) = (line.find('{'), line.rfind('}')) {
                    non_terminals = line[start + 1..end]
                        .split_whitespace()
                        .map(|s| s.to_string())
                        .collect();
                } else if let Some(start) = line.find('{') {
                    pending_section = Some("nonterminals");
                    pending_body = line[start + 1..].to_string();
                }
                continue;
            }

            if line.contains("Axioma") && line.contains('=') && !line.contains("Producciones") {
                saw_axioma = true;
                if let Some((_, rhs)) = line.split_once('=') {
                    axiom = Some(rhs.trim().to_string());
                }
                continue;
            }

            if line.contains("Producciones") && line.contains('=') {
                saw_producciones = true;
                in_productions = true;
                continue;
            }

            if in_productions {
                if line.contains('}') && !line.contains("->") {
                    in_productions = false;
                    continue;
                }
                if let Some((lhs, rhs)) = line.replace('}', "").split_once("->") {
                    let lhs = lhs.trim().to_string();
                    let mut rhs = rhs.trim();
                    if let Some(comment_at) = rhs.find("////") {
                        rhs = rhs[..comment_at].trim();
                    }
                    let rhs: Vec<String> = rhs.split_whitespace().map(|s| s.to_string()).collect();
                    let index = productions.len();
                    by_lhs.entry(lhs.clone()).or_default().push(index);
                    productions.push(Production { lhs, rhs });
                }
            }
        }

        if !saw_terminals {
            return Err(AppError::GrammarMalformed("missing Terminales section".into()));
        }
        if !saw_non_terminals {
            return Err(AppError::GrammarMalformed("missing NoTerminales section".into()));
        }
        if !saw_producciones {
            return Err(AppError::GrammarMalformed("missing Producciones section".into()));
        }
        if !saw_axioma {
            return Err(AppError::GrammarMalformed("missing Axioma section".into()));
        }
        let axiom = axiom.ok_or_else(|| AppError::GrammarMalformed("missing Axioma section".into()))?;
        if productions.is_empty() {
            return Err(AppError::GrammarMalformed("no productions found".into()));
        }

        Ok(Grammar {
            terminals,
            non_terminals,
            axiom,
            productions,
            by_lhs,
        })
    }

    /// Productions for `lhs`, as `(production_number, production)` pairs,
    /// in file order.
    pub fn productions_for(&self, lhs: &str) -> impl Iterator<Item = (u32, &Production)> {
        self.by_lhs
            .get(lhs)
            .into_iter()
            .flatten()
            .map(move |&i| ((i + 1) as u32, &self.productions[i]))
    }

    pub fn is_terminal(&self, symbol: &str) -> bool {
        self.terminals.contains(symbol) || symbol == EOF
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.non_terminals.contains(symbol)
    }

    /// The production numbered `number` (1-based, file order).
    pub fn production(&self, number: u32) -> &Production {
        &self.productions[(number - 1) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = "
        Terminales = { a b }
        NoTerminales = { S }
        Axioma = S
        Producciones = {
            S -> a S
            S -> b
        }
    ";

    #[test]
    fn loads_terminals_non_terminals_axiom_and_productions() {
        let g = Grammar::load(TINY).unwrap();
        assert_eq!(g.axiom, "S");
        assert!(g.terminals.contains("a"));
        assert!(g.non_terminals.contains("S"));
        assert_eq!(g.productions.len(), 2);
        assert_eq!(g.productions[0].rhs, vec!["a", "S"]);
    }

    #[test]
    fn numbers_productions_in_file_order_starting_at_one() {
        let g = Grammar::load(TINY).unwrap();
        let nums: Vec<u32> = g.productions_for("S").map(|(n, _)| n).collect();
        assert_eq!(nums, vec![1, 2]);
    }

    #[test]
    fn missing_terminales_section_is_a_fatal_load_error() {
        let text = "
            NoTerminales = { S }
            Axioma = S
            Producciones = {
                S -> b
            }
        ";
        assert!(matches!(Grammar::load(text), Err(AppError::GrammarMalformed(_))));
    }

    #[test]
    fn missing_noterminales_section_is_a_fatal_load_error() {
        let text = "
            Terminales = { a b }
            Axioma = S
            Producciones = {
                S -> b
            }
        ";
        assert!(matches!(Grammar::load(text), Err(AppError::GrammarMalformed(_))));
    }
}
