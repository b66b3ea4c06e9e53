use std::collections::BTreeMap;

use log::debug;

use super::schema::{ColumnSpec, ReportSchema, SymbolKind};
use crate::Symbol;
use crate::error::ExtractError;

/// The two tables recovered from a report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tables {
    /// `state -> terminal -> action token` (`s7`, `r3`, `acc`).
    pub action: BTreeMap<usize, BTreeMap<Symbol, String>>,
    /// `state -> nonterminal -> target state`.
    pub goto: BTreeMap<usize, BTreeMap<Symbol, usize>>,
}

impl Tables {
    /// Total number of ACTION entries.
    pub fn action_entries(&self) -> usize {
        self.action.values().map(BTreeMap::len).sum()
    }

    /// Total number of GOTO entries.
    pub fn goto_entries(&self) -> usize {
        self.goto.values().map(BTreeMap::len).sum()
    }
}

/// Extraction knobs. The default is lenient: malformed rows and goto
/// cells are skipped and counted, never fatal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Fail on the first malformed row or cell instead of skipping it.
    pub strict: bool,
}

/// Counters kept while scanning the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Data rows accepted (leading field parsed as a state id).
    pub rows: usize,
    /// Candidate rows dropped because the leading field is not a
    /// nonnegative integer.
    pub skipped_rows: usize,
    /// Goto cells dropped because the value is not a nonnegative integer.
    pub skipped_cells: usize,
}

/// A completed extraction.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub tables: Tables,
    pub stats: ExtractStats,
}

/// Extracts the ACTION/GOTO tables from a report.
///
/// The table section starts at the first occurrence of `schema.marker`;
/// the header is the first line from there that contains
/// `schema.state_label` and is not a `=`-separator. Every following line
/// up to end of input is treated as a candidate data row: blank lines and
/// separators are skipped, the leading `state_width` characters must form
/// a state id, and each schema column is sliced by character offsets,
/// clamped to the line length. Empty cells and the `-` placeholder hold
/// no entry; terminal cells are stored verbatim in ACTION; nonterminal
/// cells must parse as a state id to land in GOTO.
///
/// A repeated state id starts that state's rows over; the last row wins
/// wholesale. Line numbers in errors and log messages count from the
/// start of the input.
pub fn parse_report(
    text: &str,
    schema: &ReportSchema,
    opts: ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let start = text
        .find(&schema.marker)
        .ok_or_else(|| ExtractError::SectionNotFound {
            marker: schema.marker.clone(),
        })?;
    let line_offset = text[..start].matches('\n').count();
    let lines: Vec<&str> = text[start..].lines().collect();

    let header = lines
        .iter()
        .position(|line| line.contains(&schema.state_label) && !line.trim().starts_with('='))
        .ok_or_else(|| ExtractError::HeaderNotFound {
            state_label: schema.state_label.clone(),
        })?;

    let columns: Vec<(&ColumnSpec, SymbolKind)> =
        schema.symbol_columns().map(|col| (col, col.kind())).collect();
    debug!("terminals: {:?}", schema.terminals());
    debug!("nonterminals: {:?}", schema.nonterminals());

    let mut tables = Tables::default();
    let mut stats = ExtractStats::default();

    for (i, line) in lines.iter().enumerate().skip(header + 1) {
        let line_no = line_offset + i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('=') {
            continue;
        }

        // Columns are character offsets, not byte offsets; the report may
        // carry multibyte symbols such as ε.
        let chars: Vec<char> = line.chars().collect();
        let field: String = chars[..chars.len().min(schema.state_width)].iter().collect();
        let field = field.trim();
        let Some(state) = parse_state(field) else {
            if opts.strict {
                return Err(ExtractError::MalformedRow {
                    line_no,
                    field: field.to_owned(),
                });
            }
            debug!("line {line_no}: skipping row, state field {field:?}");
            stats.skipped_rows += 1;
            continue;
        };
        stats.rows += 1;

        let mut action_row: BTreeMap<Symbol, String> = BTreeMap::new();
        let mut goto_row: BTreeMap<Symbol, usize> = BTreeMap::new();

        for &(col, kind) in &columns {
            let end = col.end.min(chars.len());
            if col.start >= end {
                continue;
            }
            let cell: String = chars[col.start..end].iter().collect();
            let cell = cell.trim();
            if cell.is_empty() || cell == "-" {
                continue;
            }
            match kind {
                SymbolKind::Terminal => {
                    action_row.insert(col.label.clone(), cell.to_owned());
                }
                SymbolKind::Nonterminal => match parse_state(cell) {
                    Some(target) => {
                        goto_row.insert(col.label.clone(), target);
                    }
                    None => {
                        if opts.strict {
                            return Err(ExtractError::MalformedCell {
                                line_no,
                                label: col.label.to_string(),
                                value: cell.to_owned(),
                            });
                        }
                        debug!(
                            "line {line_no}: skipping cell {:?} = {cell:?}",
                            col.label
                        );
                        stats.skipped_cells += 1;
                    }
                },
            }
        }

        tables.action.insert(state, action_row);
        tables.goto.insert(state, goto_row);
    }

    debug!(
        "extracted {} states, {} action entries, {} goto entries",
        tables.action.len(),
        tables.action_entries(),
        tables.goto_entries()
    );

    Ok(Extraction { tables, stats })
}

/// Parses a field as a state id: all characters must be ASCII digits.
fn parse_state(field: &str) -> Option<usize> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn tiny_schema() -> ReportSchema {
        ReportSchema::from_widths(8, [("ADD", 8), ("Prog", 8)])
    }

    const TINY_REPORT: &str = "\
grammar: 12 productions

=== SLR(1) PARSE TABLE ===
========================
   State     ADD    Prog
--------
0       s7      3
";

    #[test]
    fn extracts_action_and_goto_entries() {
        init_logging();
        let out = parse_report(TINY_REPORT, &tiny_schema(), ExtractOptions::default()).unwrap();
        assert_eq!(out.tables.action.len(), 1);
        assert_eq!(out.tables.action[&0]["ADD"], "s7");
        assert_eq!(out.tables.goto[&0]["Prog"], 3);
        assert_eq!(out.stats.rows, 1);
        // The `--------` ruler is a candidate row with a bad state field.
        assert_eq!(out.stats.skipped_rows, 1);
        assert_eq!(out.stats.skipped_cells, 0);
    }

    #[test]
    fn missing_marker_is_fatal() {
        init_logging();
        let err = parse_report("no table here\n", &tiny_schema(), ExtractOptions::default())
            .unwrap_err();
        assert!(matches!(err, ExtractError::SectionNotFound { .. }));
        assert!(err.to_string().contains("SLR(1)"));
    }

    #[test]
    fn missing_header_is_fatal() {
        init_logging();
        let err = parse_report(
            "=== SLR(1) PARSE TABLE ===\n0       s7\n",
            &tiny_schema(),
            ExtractOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::HeaderNotFound { .. }));
    }

    #[test]
    fn malformed_rows_are_skipped_and_isolated() {
        init_logging();
        let report = "\
=== SLR(1) PARSE TABLE ===
   State     ADD    Prog
0       s7      3
oops    r2      4
1       r1      5
";
        let out = parse_report(report, &tiny_schema(), ExtractOptions::default()).unwrap();
        assert_eq!(out.stats.rows, 2);
        assert_eq!(out.stats.skipped_rows, 1);
        assert_eq!(out.tables.action[&0]["ADD"], "s7");
        assert_eq!(out.tables.action[&1]["ADD"], "r1");
        assert_eq!(out.tables.goto[&1]["Prog"], 5);
        assert!(!out.tables.action.contains_key(&2));
    }

    #[test]
    fn strict_mode_fails_on_malformed_row() {
        init_logging();
        let report = "\
=== SLR(1) PARSE TABLE ===
   State     ADD    Prog
oops    r2      4
";
        let err = parse_report(report, &tiny_schema(), ExtractOptions { strict: true })
            .unwrap_err();
        match err {
            ExtractError::MalformedRow { line_no, field } => {
                assert_eq!(line_no, 3);
                assert_eq!(field, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_goto_cell_is_skipped() {
        init_logging();
        let report = "\
=== SLR(1) PARSE TABLE ===
   State     ADD    Prog
0       s7      x3
";
        let out = parse_report(report, &tiny_schema(), ExtractOptions::default()).unwrap();
        assert_eq!(out.stats.skipped_cells, 1);
        assert_eq!(out.tables.action[&0]["ADD"], "s7");
        assert!(out.tables.goto[&0].is_empty());
    }

    #[test]
    fn strict_mode_fails_on_malformed_cell() {
        init_logging();
        let report = "\
=== SLR(1) PARSE TABLE ===
   State     ADD    Prog
0       s7      x3
";
        let err = parse_report(report, &tiny_schema(), ExtractOptions { strict: true })
            .unwrap_err();
        match err {
            ExtractError::MalformedCell {
                line_no,
                label,
                value,
            } => {
                assert_eq!(line_no, 3);
                assert_eq!(label, "Prog");
                assert_eq!(value, "x3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_and_dash_cells_hold_no_entry() {
        init_logging();
        let report = "\
=== SLR(1) PARSE TABLE ===
   State     ADD    Prog
0       -
1
";
        let out = parse_report(report, &tiny_schema(), ExtractOptions::default()).unwrap();
        assert_eq!(out.stats.rows, 2);
        assert!(out.tables.action[&0].is_empty());
        assert!(out.tables.goto[&0].is_empty());
        assert!(out.tables.action[&1].is_empty());
        assert_eq!(out.stats.skipped_cells, 0);
    }

    #[test]
    fn alignment_of_padding_does_not_matter() {
        init_logging();
        let left = "\
=== SLR(1) PARSE TABLE ===
   State     ADD    Prog
0       s7      3
";
        let right = "\
=== SLR(1) PARSE TABLE ===
   State     ADD    Prog
       0      s7       3
";
        let a = parse_report(left, &tiny_schema(), ExtractOptions::default()).unwrap();
        let b = parse_report(right, &tiny_schema(), ExtractOptions::default()).unwrap();
        assert_eq!(a.tables, b.tables);
    }

    #[test]
    fn repeated_state_row_wins_wholesale() {
        init_logging();
        let report = "\
=== SLR(1) PARSE TABLE ===
   State     ADD    Prog
0       s7      3
0               4
";
        let out = parse_report(report, &tiny_schema(), ExtractOptions::default()).unwrap();
        assert_eq!(out.stats.rows, 2);
        assert_eq!(out.tables.action.len(), 1);
        // The second row replaced the first entirely, ADD entry included.
        assert!(out.tables.action[&0].is_empty());
        assert_eq!(out.tables.goto[&0]["Prog"], 4);
    }

    #[test]
    fn short_rows_and_wide_schemas_coexist() {
        init_logging();
        let schema = ReportSchema::from_widths(8, [("ADD", 8), ("MUL", 8), ("Prog", 8)]);
        let report = "\
=== SLR(1) PARSE TABLE ===
   State     ADD     MUL    Prog
7       acc
";
        let out = parse_report(report, &schema, ExtractOptions::default()).unwrap();
        assert_eq!(out.tables.action[&7]["ADD"], "acc");
        assert!(out.tables.goto[&7].is_empty());
    }

    #[test]
    fn marker_line_itself_may_be_the_header() {
        init_logging();
        let report = "\
SLR(1) table   State     ADD    Prog
0       s7      3
";
        // The marker line contains the state label, so the scan accepts it
        // as the header and data starts on the next line.
        let out = parse_report(report, &tiny_schema(), ExtractOptions::default()).unwrap();
        assert_eq!(out.tables.action[&0]["ADD"], "s7");
    }

    #[test]
    fn scanning_runs_to_end_of_input() {
        init_logging();
        let report = "\
=== SLR(1) PARSE TABLE ===
   State     ADD    Prog

1       s2
========================
2       acc
conflicts: none
";
        let out = parse_report(report, &tiny_schema(), ExtractOptions::default()).unwrap();
        assert_eq!(out.stats.rows, 2);
        assert_eq!(out.tables.action[&2]["ADD"], "acc");
        // Trailing prose is a skipped candidate row, not an error.
        assert_eq!(out.stats.skipped_rows, 1);
    }

    #[test]
    fn multibyte_text_before_the_columns_does_not_shift_them() {
        init_logging();
        let schema = ReportSchema::parse("marker: 分析表\nADD 8 16\nProg 16 24\n").unwrap();
        let report = "\
=== SLR(1)分析表 ===
   State     ADD    Prog
0       s7      3
";
        let out = parse_report(report, &schema, ExtractOptions::default()).unwrap();
        assert_eq!(out.tables.action[&0]["ADD"], "s7");
        assert_eq!(out.tables.goto[&0]["Prog"], 3);
    }

    #[test]
    fn default_schema_reads_a_full_width_row() {
        init_logging();
        let schema = ReportSchema::default();

        // Lay the row out exactly as the reference report does: the state
        // field and every symbol column are eight characters, left-aligned.
        let cells = [("ADD", "s7"), ("#", "acc"), ("ε", "9"), ("Prog", "3")];
        let mut row = format!("{:<8}", 0);
        for col in &schema.columns {
            let value = cells
                .iter()
                .find(|(label, _)| *label == col.label.as_str())
                .map_or("", |(_, value)| *value);
            row.push_str(&format!("{value:<8}"));
        }
        let report = format!("=== SLR(1) PARSE TABLE ===\n   State  ...\n{row}\n");

        let out = parse_report(&report, &schema, ExtractOptions::default()).unwrap();
        assert_eq!(out.tables.action[&0]["ADD"], "s7");
        assert_eq!(out.tables.action[&0]["#"], "acc");
        assert_eq!(out.tables.goto[&0]["Prog"], 3);
        // The empty-symbol column never lands in either table.
        assert_eq!(out.tables.action[&0].len(), 2);
        assert_eq!(out.tables.goto[&0].len(), 1);
        assert_eq!(out.stats.skipped_cells, 0);
    }

    #[test]
    fn state_ids_with_leading_zeros_parse() {
        init_logging();
        let report = "\
=== SLR(1) PARSE TABLE ===
   State     ADD    Prog
007     s7
";
        let out = parse_report(report, &tiny_schema(), ExtractOptions::default()).unwrap();
        assert_eq!(out.tables.action[&7]["ADD"], "s7");
    }

    #[test]
    fn signed_and_aliased_state_fields_are_rejected() {
        assert_eq!(parse_state("7"), Some(7));
        assert_eq!(parse_state("007"), Some(7));
        assert_eq!(parse_state("+7"), None);
        assert_eq!(parse_state("-7"), None);
        assert_eq!(parse_state(""), None);
        assert_eq!(parse_state("7a"), None);
    }
}
