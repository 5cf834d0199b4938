use std::io::{self, BufRead, Write};

/// Asks whether to start despite missing inputs. Only an explicit yes counts.
pub fn confirm_continue<R: BufRead, W: Write>(mut input: R, output: &mut W) -> io::Result<bool> {
    write!(output, "Continue anyway? [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
