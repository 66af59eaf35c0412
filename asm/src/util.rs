use arch::{word::Are, BASE_ADDR};
use color_print::cformat;

use crate::first_pass::{Assembly, Segment};

/// Prints the expanded source side by side with the final memory image.
pub fn print_dump(file: &str, lines: &[String], asm: &Assembly) {
    for row in dump_rows(file, lines, asm) {
        println!("{}", row);
    }
}

/// One row per source line without words, one row per word otherwise.
pub fn dump_rows(file: &str, lines: &[String], asm: &Assembly) -> Vec<String> {
    let mut rows = vec![format!(
        "{}+------[{}]{}",
        "-".repeat(19),
        file,
        "-".repeat(45usize.saturating_sub(file.len()))
    )];

    let data_base = asm.ic();
    let mut stmts = asm.stmts.iter().peekable();
    for (idx, raw) in lines.iter().enumerate() {
        let line_num = idx + 1;
        let Some(stmt) = stmts.next_if(|s| s.line == line_num) else {
            rows.push(format!("{:19}| {:>4}: {}", "", line_num, raw));
            continue;
        };

        let (image, base) = match stmt.seg {
            Segment::Code => (&asm.code, BASE_ADDR),
            Segment::Data => (&asm.data, data_base),
        };
        let words = image.iter().enumerate().skip(stmt.offset).take(stmt.len);
        for (i, (pos, word)) in words.enumerate() {
            let addr = base + pos as u32;
            let flag = match stmt.seg {
                Segment::Code => word.are().map(Are::letter).unwrap_or('?'),
                Segment::Data => ' ',
            };
            let body = match (i, stmt.seg) {
                (0, Segment::Code) => match word.to_inst() {
                    Ok(inst) => format!("{:>4}:   {}", line_num, inst.cformat()),
                    Err(_) => cformat!("{:>4}:   <r,s>{}</>", line_num, raw.trim()),
                },
                (0, Segment::Data) => cformat!("{:>4}: <c>{}</>", line_num, raw.trim()),
                _ => String::new(),
            };
            rows.push(format!("[{:07}] {} {} | {}", addr, word, flag, body));
        }
    }
    rows.push("-------------------+-----------------------------------------------------".into());
    rows
}
