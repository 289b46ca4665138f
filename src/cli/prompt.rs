//! Interactive resume confirmation.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use console::style;

use crate::error::{Error, Result};
use crate::invoice::DATE_FORMAT;
use crate::range::{is_affirmative, resume_from};

/// Asks whether to resume after `latest`, reading one line from `input`.
///
/// An empty line counts as yes.
///
/// # Errors
///
/// Returns [`Error::Io`] if the prompt cannot be written, the answer cannot
/// be read, or input is already at end of file.
pub fn confirm_resume<R, W>(input: &mut R, output: &mut W, latest: NaiveDate) -> Result<bool>
where
    R: BufRead,
    W: Write,
{
    write!(
        output,
        "Existing invoices detected up to {}. Resume from {}? {}: ",
        latest.format(DATE_FORMAT),
        resume_from(latest).format(DATE_FORMAT),
        style("[Y/n]").bold()
    )?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no answer to resume prompt",
        )));
    }
    Ok(is_affirmative(&answer))
}
