use rowhop_core::format::Cell;
use std::io::Write;

/// Write the grid as RFC 4180 CSV. Null cells render as empty fields.
pub(crate) fn write_csv<W: Write>(
    out: &mut W,
    header: Option<&[&str]>,
    grid: &[Vec<Cell>],
) -> std::io::Result<()> {
    if let Some(header) = header {
        write_row(out, header.iter().map(|name| (*name).to_string()))?;
    }
    for row in grid {
        write_row(out, row.iter().map(ToString::to_string))?;
    }
    Ok(())
}

pub(crate) fn write_json<W: Write>(out: &mut W, grid: &[Vec<Cell>]) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, grid)?;
    writeln!(out)?;
    Ok(())
}

fn write_row<W: Write>(
    out: &mut W,
    fields: impl Iterator<Item = String>,
) -> std::io::Result<()> {
    let encoded: Vec<String> = fields.map(|field| escape(&field)).collect();
    writeln!(out, "{}", encoded.join(","))
}

fn escape(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    #[test]
    fn plain_rows_pass_through() {
        let mut out = Vec::new();
        write_csv(
            &mut out,
            Some(&["name", "partner_id.name"]),
            &[vec![text("SO001"), text("Acme")]],
        )
        .expect("write should succeed");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "name,partner_id.name\nSO001,Acme\n"
        );
    }

    #[test]
    fn quotes_commas_and_newlines_are_escaped() {
        let mut out = Vec::new();
        write_csv(&mut out, None, &[vec![text("a,b"), text("say \"hi\"\nok")]])
            .expect("write should succeed");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "\"a,b\",\"say \"\"hi\"\"\nok\"\n"
        );
    }

    #[test]
    fn null_cells_are_empty_fields() {
        let mut out = Vec::new();
        write_csv(&mut out, None, &[vec![Cell::Null, Cell::Int(3), Cell::Null]])
            .expect("write should succeed");
        assert_eq!(String::from_utf8(out).expect("utf8"), ",3,\n");
    }

    #[test]
    fn json_output_keeps_explicit_nulls() {
        let mut out = Vec::new();
        write_json(&mut out, &[vec![Cell::Null, Cell::Bool(false), text("x")]])
            .expect("write should succeed");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "[[null,false,\"x\"]]\n"
        );
    }
}
