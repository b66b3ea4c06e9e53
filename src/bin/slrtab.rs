//! Command-line interface for the `slrtab` table extractor.
//!
//! This binary wraps [`tablex::slr`]: it reads an SLR(1) report from a
//! file or standard input, extracts the ACTION/GOTO tables and writes
//! them back out as parser initialization code.

#[cfg(feature = "cli")]
mod real {
    use anyhow::Context;
    use clap::Parser;
    use std::io::{IsTerminal, Read};
    use std::path::PathBuf;
    use tablex::slr::{ExtractOptions, ReportSchema, parse_report, render};

    #[derive(Parser)]
    #[command(about = "Extract SLR(1) ACTION/GOTO tables from a report")]
    struct Args {
        /// Input report file (standard input when omitted).
        input: Option<PathBuf>,

        /// Path to the output code file.
        #[arg(short, long, default_value = "slr_table_init.rs")]
        output: PathBuf,

        /// Path to a report-schema file (built-in layout when omitted).
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Fail on malformed rows and cells instead of skipping them.
        #[arg(long)]
        strict: bool,
    }

    pub fn main() -> anyhow::Result<()> {
        env_logger::init();

        let args = Args::parse();

        let schema = match &args.schema {
            Some(path) => ReportSchema::from_path(path)?,
            None => ReportSchema::default(),
        };

        let text = match &args.input {
            Some(path) => {
                eprintln!("reading SLR table from {}", path.display());
                std::fs::read_to_string(path)
                    .with_context(|| format!("can't read {}", path.display()))?
            }
            None => {
                let mut stdin = std::io::stdin();
                if stdin.is_terminal() {
                    eprintln!("usage:");
                    eprintln!("  from a pipe:   <generator> | slrtab");
                    eprintln!("  from a file:   slrtab <report>");
                    eprintln!("  set output:    slrtab -o <file> <report>");
                    std::process::exit(1);
                }
                eprintln!("reading SLR table from standard input");
                let mut buf = String::new();
                stdin
                    .read_to_string(&mut buf)
                    .context("can't read standard input")?;
                buf
            }
        };

        let extraction = parse_report(&text, &schema, ExtractOptions { strict: args.strict })?;

        std::fs::write(&args.output, render(&extraction.tables))
            .with_context(|| format!("can't write {}", args.output.display()))?;

        eprintln!("generated {}", args.output.display());
        eprintln!(
            "parsed {} states ({} rows skipped, {} cells skipped)",
            extraction.tables.action.len(),
            extraction.stats.skipped_rows,
            extraction.stats.skipped_cells
        );
        eprintln!("ACTION entries: {}", extraction.tables.action_entries());
        eprintln!("GOTO entries: {}", extraction.tables.goto_entries());
        Ok(())
    }
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    real::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("slrtab disabled (compiled without `cli` feature)");
}
