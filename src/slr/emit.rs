use std::io::{self, Write};

use super::extract::Tables;

/// Writes the tables as parser initialization code: one setter call per
/// entry, ACTION entries first, then GOTO entries. Entries come out
/// ordered by state and then by symbol, so regenerated files diff
/// cleanly no matter what order the report listed them in.
pub fn write_tables<W: Write>(out: &mut W, tables: &Tables) -> io::Result<()> {
    writeln!(out, "/*")?;
    writeln!(out, "Produced by SLR table extractor SLRTAB")?;
    writeln!(out, "*/")?;
    writeln!(out, "")?;

    writeln!(out, "pub fn initialize_slr_table(table: &mut SlrTable) {{")?;

    writeln!(out, "    // ACTION")?;
    for (state, row) in &tables.action {
        for (terminal, action) in row {
            writeln!(out, "    table.action({}, {:?}, {:?});", state, terminal, action)?;
        }
    }

    writeln!(out, "")?;
    writeln!(out, "    // GOTO")?;
    for (state, row) in &tables.goto {
        for (nonterminal, target) in row {
            writeln!(out, "    table.goto({}, {:?}, {});", state, nonterminal, target)?;
        }
    }

    writeln!(out, "}}")?;
    Ok(())
}

/// Renders the initialization code to a string.
pub fn render(tables: &Tables) -> String {
    let mut buf = Vec::new();
    write_tables(&mut buf, tables).expect("writes to a Vec cannot fail");
    String::from_utf8(buf).expect("generated code is UTF-8")
}
