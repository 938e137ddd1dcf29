//! The three fixed-format report writers (`spec.md` §6): `lexed.txt`,
//! `symbols.txt`, `parse.txt`. Formats are grounded byte-for-byte in
//! `examples/original_source/lex.py`'s `get_next_token`/
//! `write_symbol_table_to_file`/`main` dump logic.

use crate::symbols::SymbolTable;
use crate::token::{Attr, Token};

/// One line per scanned token, in scan order, `<KIND,>` when the kind
/// carries no attribute, `<KIND,"value">` for `STR` (double-quoted), and
/// `<KIND,value>` otherwise (identifiers dump their symbol-table
/// position, not their lexeme).
pub fn format_lexed(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        if token.kind.has_no_attribute() {
            out.push_str(&format!("<{},>\n", token.kind.dump_name()));
            continue;
        }
        match &token.attr {
            Attr::Str(s) => out.push_str(&format!("<{},\"{}\">\n", token.kind.dump_name(), s)),
            Attr::Int(v) => out.push_str(&format!("<{},{}>\n", token.kind.dump_name(), v)),
            Attr::Float(v) => out.push_str(&format!("<{},{}>\n", token.kind.dump_name(), v)),
            Attr::Handle(pos) => out.push_str(&format!("<{},{}>\n", token.kind.dump_name(), pos)),
            Attr::None => out.push_str(&format!("<{},>\n", token.kind.dump_name())),
        }
    }
    out
}

/// The full symbol table, ordered by interning position, every symbol
/// ever created regardless of whether its scope has since closed.
pub fn format_symbols(symbols: &SymbolTable) -> String {
    let mut out = String::from("CONTENIDOS DE LA TABLA:\n\n");
    for record in symbols.records_in_order() {
        out.push_str(&format!("* LEXEMA : '{}'\n", record.lexeme));
        out.push_str("  Atributos:\n");
        let kind = record.kind.to_string();
        if !kind.is_empty() {
            out.push_str(&format!("    + tipo: '{}'\n", kind));
        }
        if let Some(displacement) = record.displacement {
            out.push_str(&format!("    + desplazamiento: {}\n", displacement));
        }
        out.push_str("  --------- ---------\n\n");
    }
    out
}

/// `"Descendente "` followed by the left-most derivation's production
/// numbers, each followed by a trailing space. Only written by the
/// caller when the run had no lexical or syntactic errors.
pub fn format_parse(derivation: &[u32]) -> String {
    let mut out = String::from("Descendente ");
    for number in derivation {
        out.push_str(&format!("{} ", number));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{SymbolKind, TypeTag};
    use crate::token::{Location, TokenKind};

    #[test]
    fn dumps_no_attribute_tokens_with_a_trailing_comma() {
        let tokens = vec![Token { kind: TokenKind::Let, attr: Attr::None, location: Location { line: 1 } }];
        assert_eq!(format_lexed(&tokens), "<LET,>\n");
    }

    #[test]
    fn dumps_string_literals_double_quoted() {
        let tokens = vec![Token {
            kind: TokenKind::Str,
            attr: Attr::Str("hi".to_string()),
            location: Location { line: 1 },
        }];
        assert_eq!(format_lexed(&tokens), "<STR,\"hi\">\n");
    }

    #[test]
    fn dumps_identifiers_by_symbol_table_position() {
        let tokens = vec![Token { kind: TokenKind::Id, attr: Attr::Handle(3), location: Location { line: 1 } }];
        assert_eq!(format_lexed(&tokens), "<ID,3>\n");
    }

    #[test]
    fn formats_a_symbol_record_block() {
        let mut symbols = SymbolTable::new();
        let pos = symbols.intern("x");
        symbols.set_kind(pos, SymbolKind::Primitive(TypeTag::Int));
        symbols.set_displacement(pos, 0);
        let dumped = format_symbols(&symbols);
        assert!(dumped.starts_with("CONTENIDOS DE LA TABLA:\n\n"));
        assert!(dumped.contains("* LEXEMA : 'x'\n"));
        assert!(dumped.contains("    + tipo: 'int'\n"));
        assert!(dumped.contains("    + desplazamiento: 0\n"));
    }

    #[test]
    fn parse_derivation_is_space_separated_with_a_trailing_space() {
        assert_eq!(format_parse(&[1, 2, 3]), "Descendente 1 2 3 ");
    }
}
