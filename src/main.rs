use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;

use myjs_analyzer::analyzer::Analyzer;
use myjs_analyzer::error::AppError;
use myjs_analyzer::output;

/// Lexical, syntactic and semantic analyzer for MyJS.
#[derive(ClapParser)]
#[command(name = "myjs-analyzer")]
struct Cli {
    /// MyJS source file to analyze.
    source: PathBuf,
}

const GRAMMAR_FILE: &str = "Gramatica.txt";

fn run() -> Result<bool, AppError> {
    let cli = Cli::parse();

    let grammar_text = fs::read_to_string(GRAMMAR_FILE).map_err(|_| AppError::GrammarFileMissing)?;
    let analyzer = Analyzer::new(&grammar_text)?;

    let source_path = cli.source.to_string_lossy().into_owned();
    let source_text = fs::read_to_string(&cli.source).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::SourceFileMissing(source_path.clone())
        } else {
            AppError::SourceFileUnreadable(source_path.clone(), e)
        }
    })?;

    let result = analyzer.analyze(&source_text);

    fs::write("lexed.txt", output::format_lexed(&result.tokens))
        .map_err(|e| AppError::OutputWrite("lexed.txt".to_string(), e))?;
    fs::write("symbols.txt", output::format_symbols(&result.symbols))
        .map_err(|e| AppError::OutputWrite("symbols.txt".to_string(), e))?;

    result.errors.flush_lexical_errors();

    if result.derivation_is_publishable() {
        fs::write("parse.txt", output::format_parse(&result.derivation))
            .map_err(|e| AppError::OutputWrite("parse.txt".to_string(), e))?;
        println!("Analisis completado exitosamente.");
        println!("Archivos generados: lexed.txt, symbols.txt, parse.txt");
    } else {
        println!("\nAnalisis finalizado con errores.");
        println!("Archivos generados: lexed.txt, symbols.txt");
    }

    Ok(result.errors.has_any_error())
}

fn main() -> ExitCode {
    match run() {
        Ok(false) => ExitCode::from(0),
        Ok(true) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(2)
        }
    }
}
