use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::Symbol;
use crate::error::ConfigError;

/// Marker substring that begins the table section.
pub const DEFAULT_MARKER: &str = "SLR(1)";
/// Literal token identifying the header row.
pub const DEFAULT_STATE_LABEL: &str = "State";
/// Width in characters of the leading state field.
pub const DEFAULT_STATE_WIDTH: usize = 8;
/// Column label holding the empty-string symbol; never extracted.
pub const DEFAULT_EMPTY_SYMBOL: &str = "ε";

/// Column labels of the reference report, in report order. Every column
/// is eight characters wide.
const DEFAULT_COLUMNS: &[&str] = &[
    "ADD", "ASG", "COMMA", "ELSE", "FLOAT", "FLOAT_NUM", "ID", "IF", "INT", "INT_NUM", "LBR",
    "LBRACK", "LPAR", "MUL", "RBR", "RBRACK", "REL_OP", "RETURN", "RPAR", "SEMI", "VOID", "WHILE",
    "ε", "#", "AddExpr", "ArgList", "CompStmt", "Decl", "DeclList", "Expr", "ExprStmt", "Fact",
    "FunDecl", "IfStmt", "LoopStmt", "OtherStmt", "Param", "ParamList", "Prog", "RetStmt",
    "SimpExpr", "Stmt", "StmtList", "Term", "Type", "VarDecl",
];

static DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z-]+)\s*:\s*(.*)$").unwrap());
static COLUMN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\S+)\s+(\d+)\s+(\d+)$").unwrap());

/// Grammar-symbol kind, decided by naming convention: `#` and labels with
/// cased characters but no lowercase ones (`ADD`, `FLOAT_NUM`) are
/// terminals, everything else is a nonterminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Terminal,
    Nonterminal,
}

impl SymbolKind {
    /// Classifies a column label.
    pub fn of(label: &str) -> SymbolKind {
        let cased = label.chars().any(|c| c.is_lowercase() || c.is_uppercase());
        if label == "#" || (cased && !label.chars().any(char::is_lowercase)) {
            SymbolKind::Terminal
        } else {
            SymbolKind::Nonterminal
        }
    }
}

/// One fixed-width column: a half-open character range `[start, end)`
/// within a data row.
///
/// Offsets must match the producing report exactly. A drifted schema does
/// not fail; it reads fragments of neighbouring columns, so offsets are
/// the first thing to check when extracted tables look wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub label: Symbol,
    pub start: usize,
    pub end: usize,
}

impl ColumnSpec {
    pub fn new(label: &str, start: usize, end: usize) -> Self {
        ColumnSpec {
            label: Symbol::from(label),
            start,
            end,
        }
    }

    /// The table this column's entries land in.
    pub fn kind(&self) -> SymbolKind {
        SymbolKind::of(&self.label)
    }
}

/// The report layout: how to find the table section and where each symbol
/// column sits within a data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSchema {
    /// Substring that begins the table section.
    pub marker: String,
    /// Literal token identifying the header row.
    pub state_label: String,
    /// Width in characters of the leading state field.
    pub state_width: usize,
    /// Column label treated as the empty-string symbol and excluded.
    pub empty_symbol: String,
    /// Symbol columns in report order.
    pub columns: Vec<ColumnSpec>,
}

impl Default for ReportSchema {
    /// The layout of the reference report: an 8-character state field
    /// followed by 46 symbol columns of 8 characters each.
    fn default() -> Self {
        Self::from_widths(
            DEFAULT_STATE_WIDTH,
            DEFAULT_COLUMNS.iter().map(|&label| (label, 8)),
        )
    }
}

impl ReportSchema {
    /// Builds a schema from `(label, width)` pairs laid out contiguously
    /// after the state field.
    pub fn from_widths<'a, I>(state_width: usize, widths: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        let mut columns = Vec::new();
        let mut offset = state_width;
        for (label, width) in widths {
            columns.push(ColumnSpec::new(label, offset, offset + width));
            offset += width;
        }
        ReportSchema {
            marker: DEFAULT_MARKER.to_owned(),
            state_label: DEFAULT_STATE_LABEL.to_owned(),
            state_width,
            empty_symbol: DEFAULT_EMPTY_SYMBOL.to_owned(),
            columns,
        }
    }

    /// Parses a schema file.
    ///
    /// Blank lines and lines starting with `--` are skipped. The
    /// directives `marker:`, `state-label:`, `state-width:` and
    /// `empty-symbol:` override the defaults; any other line must be a
    /// `<label> <start> <end>` column with character offsets.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut schema = ReportSchema {
            marker: DEFAULT_MARKER.to_owned(),
            state_label: DEFAULT_STATE_LABEL.to_owned(),
            state_width: DEFAULT_STATE_WIDTH,
            empty_symbol: DEFAULT_EMPTY_SYMBOL.to_owned(),
            columns: Vec::new(),
        };

        for (i, raw_line) in input.lines().enumerate() {
            let line_no = i + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with("--") {
                continue;
            }
            if let Some(cap) = DIRECTIVE_RE.captures(line) {
                let value = cap[2].trim();
                match &cap[1] {
                    "marker" => schema.marker = value.to_owned(),
                    "state-label" => schema.state_label = value.to_owned(),
                    "state-width" => {
                        schema.state_width = value.parse().map_err(|_| ConfigError::Value {
                            line_no,
                            reason: format!("state-width {value:?} is not a number"),
                        })?;
                    }
                    "empty-symbol" => schema.empty_symbol = value.to_owned(),
                    name => {
                        return Err(ConfigError::Value {
                            line_no,
                            reason: format!("unknown directive {name:?}"),
                        });
                    }
                }
                continue;
            }
            if let Some(cap) = COLUMN_RE.captures(line) {
                let start = parse_offset(&cap[2], line_no)?;
                let end = parse_offset(&cap[3], line_no)?;
                if end <= start {
                    return Err(ConfigError::Value {
                        line_no,
                        reason: format!("empty column range {start}..{end}"),
                    });
                }
                schema.columns.push(ColumnSpec::new(&cap[1], start, end));
                continue;
            }
            return Err(ConfigError::Line {
                line_no,
                line: line.to_owned(),
            });
        }

        Ok(schema)
    }

    /// Loads a schema file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::parse(&text)
    }

    /// Labels filed under ACTION, in schema order.
    pub fn terminals(&self) -> Vec<&str> {
        self.symbol_columns()
            .filter(|col| col.kind() == SymbolKind::Terminal)
            .map(|col| col.label.as_str())
            .collect()
    }

    /// Labels filed under GOTO, in schema order.
    pub fn nonterminals(&self) -> Vec<&str> {
        self.symbol_columns()
            .filter(|col| col.kind() == SymbolKind::Nonterminal)
            .map(|col| col.label.as_str())
            .collect()
    }

    /// Columns that take part in extraction (the empty symbol is skipped).
    pub(crate) fn symbol_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns
            .iter()
            .filter(|col| col.label.as_str() != self.empty_symbol)
    }
}

fn parse_offset(digits: &str, line_no: usize) -> Result<usize, ConfigError> {
    digits.parse().map_err(|_| ConfigError::Value {
        line_no,
        reason: format!("offset {digits:?} out of range"),
    })
}
