//! Command-line interface for the `dfagen` automaton builder.
//!
//! This binary wraps [`tablex::dfa`] and exposes command-line options for
//! expanding a transition-rule file into an explicit DFA description. The
//! description is echoed on standard output and saved to a file for the
//! lexer to load.

#[cfg(feature = "cli")]
mod real {
    use anyhow::Context;
    use clap::Parser;
    use log::warn;
    use std::path::PathBuf;
    use tablex::dfa::{Automaton, RuleSet};

    #[derive(Parser)]
    #[command(about = "Build a DFA description from transition rules")]
    struct Args {
        /// Path to a transition-rule file (built-in rule set when omitted).
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Path to the output description file.
        #[arg(short, long, default_value = "dfa.txt")]
        output: PathBuf,
    }

    pub fn main() -> anyhow::Result<()> {
        env_logger::init();

        let args = Args::parse();

        let rules = match &args.rules {
            Some(path) => RuleSet::from_path(path)?,
            None => RuleSet::builtin(),
        };

        let automaton = Automaton::build(&rules);
        for warning in automaton.validate() {
            warn!("{warning}");
        }

        let text = automaton.to_string();
        print!("{text}");
        std::fs::write(&args.output, &text)
            .with_context(|| format!("can't write {}", args.output.display()))?;
        eprintln!("DFA description saved to {}", args.output.display());
        Ok(())
    }
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    real::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("dfagen disabled (compiled without `cli` feature)");
}
