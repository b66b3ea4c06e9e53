//! The parse-table pipeline.
//!
//! An SLR(1) generator prints its ACTION/GOTO table as a fixed-width
//! textual report. [`parse_report`] locates the table section by a marker
//! substring, finds the header row, slices every data row at the character
//! offsets given by a [`ReportSchema`], and rebuilds the two tables:
//! ACTION entries (`s7`, `r3`, `acc`) keyed by state and terminal, GOTO
//! entries keyed by state and nonterminal. [`write_tables`] then re-emits
//! the tables as initialization code for a table-driven parser.
//!
//! Reports are cosmetic and get reformatted; the extractor is therefore
//! lenient by default, skipping rows and cells it cannot read and counting
//! them in [`ExtractStats`]. Strict mode turns those skips into errors.
//!
//! ```
//! use tablex::slr::{parse_report, ExtractOptions, ReportSchema};
//!
//! let schema = ReportSchema::from_widths(8, [("ADD", 8), ("Prog", 8)]);
//! let report = "\
//! === SLR(1) PARSE TABLE ===
//!    State     ADD    Prog
//! 0       s7      3
//! ";
//! let out = parse_report(report, &schema, ExtractOptions::default()).unwrap();
//! assert_eq!(out.tables.action[&0]["ADD"], "s7");
//! assert_eq!(out.tables.goto[&0]["Prog"], 3);
//! ```

mod emit;
mod extract;
mod schema;

pub use emit::{render, write_tables};
pub use extract::{Extraction, ExtractOptions, ExtractStats, Tables, parse_report};
pub use schema::{
    ColumnSpec, DEFAULT_EMPTY_SYMBOL, DEFAULT_MARKER, DEFAULT_STATE_LABEL, DEFAULT_STATE_WIDTH,
    ReportSchema, SymbolKind,
};
