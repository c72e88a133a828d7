//! Interactive front end: selection prompts, raw-data paging and the
//! explore loop.
//!
//! Everything here is generic over `BufRead`/`Write` so it can run against
//! stdin/stdout or in-memory buffers.

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use crate::config::Config;
use crate::filter::{DaySelector, MonthSelector, load_and_filter};
use crate::loader::open_source;
use crate::output::render_text;
use crate::report::compute_report;
use crate::selection::{City, Selection, resolve_source};

/// Asks `question` and returns the trimmed answer, or `None` at end of input.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<Option<String>> {
    write!(output, "{question}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// `true` only for an explicit `yes`.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool> {
    Ok(ask(input, output, question)?.is_some_and(|a| a.eq_ignore_ascii_case("yes")))
}

/// Re-asks `question` until `parse` accepts the answer.
fn ask_until<R, W, T, E>(
    input: &mut R,
    output: &mut W,
    question: &str,
    invalid: &str,
    parse: impl Fn(&str) -> std::result::Result<T, E>,
) -> Result<Option<T>>
where
    R: BufRead,
    W: Write,
{
    loop {
        let Some(answer) = ask(input, output, question)? else {
            return Ok(None);
        };
        match parse(&answer) {
            Ok(value) => return Ok(Some(value)),
            Err(_) => writeln!(output, "\n{invalid}\n")?,
        }
    }
}

/// Collects a city, month and day, retrying on invalid input.
///
/// Returns `None` if input ends before all three are given.
pub fn prompt_selection<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    data_dir: &Path,
) -> Result<Option<Selection>> {
    writeln!(output, "Hello! Let's explore some US bikeshare data!")?;

    let cities = City::ALL.map(|c| c.name()).join(", ");
    let Some(city) = ask_until(
        input,
        output,
        &format!("Enter a city to analyze ({cities}): "),
        "Not a valid city. Please enter a valid city.",
        str::parse::<City>,
    )?
    else {
        return Ok(None);
    };

    let Some(month) = ask_until(
        input,
        output,
        "Enter a month to filter by (Jan ... Dec) or 'all' for no filter: ",
        "Not a valid month. Please enter a valid month.",
        str::parse::<MonthSelector>,
    )?
    else {
        return Ok(None);
    };

    let Some(day) = ask_until(
        input,
        output,
        "Enter a day of the week to filter by (Mon ... Sun) or 'all' for no filter: ",
        "Not a valid day. Please enter a valid day.",
        str::parse::<DaySelector>,
    )?
    else {
        return Ok(None);
    };

    writeln!(output, "\nCity: {city} - Month Filter: {month} - Day Filter: {day}")?;
    writeln!(output, "{}", "-".repeat(40))?;

    Ok(Some(Selection {
        source: resolve_source(city.name(), data_dir),
        month,
        day,
    }))
}

/// Pages through raw lines of `source`, `page_size` at a time, asking
/// before each further page. Returns the number of lines shown.
pub fn display_raw<S, R, W>(source: S, input: &mut R, output: &mut W, page_size: usize) -> Result<usize>
where
    S: BufRead,
    R: BufRead,
    W: Write,
{
    let mut lines = source.lines();
    let mut shown = 0;

    loop {
        for _ in 0..page_size {
            match lines.next() {
                Some(line) => {
                    writeln!(output, "{}", line?)?;
                    shown += 1;
                }
                None => {
                    writeln!(output, "\nEnd of file.\n")?;
                    return Ok(shown);
                }
            }
        }

        if !confirm(input, output, "\nWould you like to view more data? Enter yes or no.\n")? {
            return Ok(shown);
        }
    }
}

/// Opens `path` (gzip-aware) and pages through it with [`display_raw`].
#[tracing::instrument(skip(input, output), fields(path = %path.display()))]
pub fn display_raw_file<R: BufRead, W: Write>(
    path: &Path,
    input: &mut R,
    output: &mut W,
    page_size: usize,
) -> Result<usize> {
    let source = std::io::BufReader::new(open_source(path)?);
    let shown = display_raw(source, input, output, page_size)?;
    info!(shown, "Raw data displayed");
    Ok(shown)
}

/// Offers to page through `path`. A failure is logged and reported to the
/// user without ending the session.
pub fn offer_raw<R: BufRead, W: Write>(input: &mut R, output: &mut W, path: &Path, page_size: usize) -> Result<()> {
    if !confirm(input, output, "\nWould you like to view raw data from the file? Enter yes or no.\n")? {
        return Ok(());
    }

    if let Err(e) = display_raw_file(path, input, output, page_size) {
        error!(error = %e, "Raw data display failed");
        writeln!(output, "\nCould not display raw data: {e}\n")?;
    }
    Ok(())
}

/// The interactive loop: select, report, optionally page raw data, repeat.
pub async fn explore<R: BufRead, W: Write>(input: &mut R, output: &mut W, config: &Config) -> Result<()> {
    loop {
        let Some(selection) = prompt_selection(input, output, &config.data_dir)? else {
            return Ok(());
        };

        match load_and_filter(&selection.source, selection.month, selection.day, config.policy) {
            Ok(dataset) => {
                let report = compute_report(Arc::new(dataset)).await;
                writeln!(output, "{}", render_text(&report))?;

                offer_raw(input, output, &selection.source, config.raw_rows)?;
            }
            Err(e) => {
                error!(error = %e, "Query failed");
                writeln!(output, "\nCould not load trip data: {e}\n")?;
            }
        }

        if !confirm(input, output, "\nWould you like to restart? Enter yes or no.\n")? {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use std::io::Cursor;
    use std::path::PathBuf;

    #[test]
    fn test_prompt_selection_retries_invalid_input() {
        let mut input = Cursor::new("boston\nchicago\nfoo\nmar\nmonday\n");
        let mut output = Vec::new();

        let selection = prompt_selection(&mut input, &mut output, Path::new("/data"))
            .unwrap()
            .unwrap();

        assert_eq!(selection.source, PathBuf::from("/data/chicago.csv"));
        assert_eq!(selection.month, MonthSelector::Month(3));
        assert_eq!(selection.day, DaySelector::Day(Weekday::Mon));

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Not a valid city"));
        assert!(text.contains("Not a valid month"));
        assert!(!text.contains("Not a valid day"));
    }

    #[test]
    fn test_prompt_selection_end_of_input() {
        let mut input = Cursor::new("washington\n");
        let mut output = Vec::new();

        let selection = prompt_selection(&mut input, &mut output, Path::new(".")).unwrap();
        assert!(selection.is_none());
    }

    #[test]
    fn test_display_raw_pages_until_declined() {
        let source = Cursor::new("h\n1\n2\n3\n4\n5\n6\n");
        let mut input = Cursor::new("yes\nno\n");
        let mut output = Vec::new();

        let shown = display_raw(source, &mut input, &mut output, 2).unwrap();
        assert_eq!(shown, 4);
    }

    #[test]
    fn test_display_raw_stops_at_end_of_file() {
        let source = Cursor::new("h\n1\n2\n");
        let mut input = Cursor::new("yes\nyes\n");
        let mut output = Vec::new();

        let shown = display_raw(source, &mut input, &mut output, 2).unwrap();
        assert_eq!(shown, 3);
        assert!(String::from_utf8(output).unwrap().contains("End of file."));
    }

    #[test]
    fn test_offer_raw_reports_failure_and_continues() {
        let mut input = Cursor::new("yes\nno\n");
        let mut output = Vec::new();

        offer_raw(&mut input, &mut output, Path::new("/definitely/not/here.csv"), 5).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Could not display raw data"));
        // the next answer is still available for the restart prompt
        assert!(!confirm(&mut input, &mut Vec::new(), "?").unwrap());
    }

    #[test]
    fn test_confirm_only_accepts_yes() {
        let mut output = Vec::new();
        assert!(confirm(&mut Cursor::new("YES\n"), &mut output, "?").unwrap());
        assert!(!confirm(&mut Cursor::new("y\n"), &mut output, "?").unwrap());
        assert!(!confirm(&mut Cursor::new(""), &mut output, "?").unwrap());
    }
}
