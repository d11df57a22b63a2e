use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use contracts_plan_pdf::{plan_builder, write_rendered, PdfBuildError, DEFAULT_OUTPUT_PATH};
use log::debug;

/// Renders the TRAK Contracts Implementation Plan to PDF.
///
/// Fonts are read from `assets/fonts` (or `CONTRACTS_PLAN_FONTS_DIR`), falling back to a
/// system sans-serif family.
#[derive(Parser)]
#[command(author, version, about = "Generate the TRAK Contracts Implementation Plan PDF")]
struct Cli {
    /// Destination file; parent directories are created as needed.
    #[arg(short, long, env = "CONTRACTS_PLAN_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Skip the section outline.
    #[arg(long)]
    no_bookmarks: bool,
}

fn run(cli: &Cli) -> Result<PathBuf, PdfBuildError> {
    let builder = plan_builder();
    debug!(
        "Rendering {} sections (bookmarks: {})",
        builder.sections().len(),
        !cli.no_bookmarks
    );

    let rendered = if cli.no_bookmarks {
        builder.render()?
    } else {
        builder.render_with_bookmarks()?
    };
    write_rendered(&rendered, &cli.output)
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(path) => println!("PDF generated successfully: {}", path.display()),
        Err(err) => {
            eprintln!("Error: {}", err);
            print_error_sources(&err);
            std::process::exit(1);
        }
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn output_defaults_to_docs_directory() {
        let cli = Cli::try_parse_from(["contracts-plan"]).expect("parse defaults");
        if std::env::var_os("CONTRACTS_PLAN_OUTPUT").is_none() {
            assert_eq!(cli.output, PathBuf::from(DEFAULT_OUTPUT_PATH));
        }
        assert!(!cli.no_bookmarks);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from(["contracts-plan", "-o", "out/plan.pdf", "--no-bookmarks"])
            .expect("parse flags");
        assert_eq!(cli.output, PathBuf::from("out/plan.pdf"));
        assert!(cli.no_bookmarks);
    }
}
