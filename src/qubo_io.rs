//! Reading and writing QUBO instances in the packed upper triangular CSV format.
//!
//! ```text
//! 3
//! b0,w01,w02
//! b1,w12
//! b2
//! ```
//!
//! The first line holds the variable count `n`. Data line `l` (1-indexed) holds columns `l..=n`
//! of row `l` of the raw coefficient matrix, so the first entry of each line is that variable's
//! linear coefficient. Off diagonal values are mirrored to make the matrix symmetric.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use ndarray::Array2;

use crate::qubo::Qubo;
use crate::utils::{parse_exact_int, parse_leading_int};

/// How strictly the matrix body is validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Unparsable tokens read as 0, values are narrowed to 16 bits with wrap around, surplus
    /// tokens and rows are skipped.
    #[default]
    Permissive,
    /// Any malformed, out of range, missing or surplus entry is an error.
    Strict,
}

/// What the reader had to paper over in permissive mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadSummary {
    pub num_x: usize,
    pub malformed_tokens: usize,
    pub ignored_entries: usize,
}

/// Reads a QUBO from the file at `path`.
///
/// # Errors
///
/// Fails if the file cannot be opened, the first line is missing or is not a positive integer, or,
/// in strict mode, if any entry of the body is invalid.
pub fn read_qubo<P: AsRef<Path>>(path: P, mode: ParseMode) -> Result<(Qubo, ReadSummary)> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    parse_qubo(BufReader::new(file), mode)
}

/// Parses a QUBO from any buffered reader, see [`read_qubo`].
///
/// # Errors
///
/// As [`read_qubo`], plus any I/O error from the reader.
pub fn parse_qubo<R: BufRead>(reader: R, mode: ParseMode) -> Result<(Qubo, ReadSummary)> {
    let mut lines = reader.lines();

    let first = match lines.next() {
        Some(line) => line.context("Failed to read first line")?,
        None => bail!("Failed to read first line"),
    };
    let n = match mode {
        ParseMode::Permissive => parse_leading_int(&first).unwrap_or(0),
        ParseMode::Strict => parse_exact_int(&first).unwrap_or(0),
    };
    if n <= 0 {
        bail!("Invalid N in CSV");
    }
    let num_x = usize::try_from(n).context("Invalid N in CSV")?;

    // the dense matrix needs n * n cells, which must fit in an allocation
    let cells = num_x
        .checked_mul(num_x)
        .filter(|&cells| cells <= isize::MAX as usize / std::mem::size_of::<i16>())
        .with_context(|| format!("N = {num_x} is too large for a dense matrix"))?;
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(cells)
        .with_context(|| format!("Failed to allocate the {num_x}x{num_x} matrix"))?;
    storage.resize(cells, 0i16);
    let mut q = Array2::from_shape_vec((num_x, num_x), storage)?;
    let mut summary = ReadSummary {
        num_x,
        ..ReadSummary::default()
    };

    let mut rows_seen = 0;
    for (row, line) in lines.enumerate() {
        let line = line.with_context(|| format!("Failed to read row {}", row + 1))?;

        if row >= num_x {
            if line.trim().is_empty() {
                continue;
            }
            match mode {
                ParseMode::Permissive => {
                    summary.ignored_entries += split_tokens(&line).count();
                    continue;
                }
                ParseMode::Strict => bail!("Row {} is beyond N = {num_x}", row + 1),
            }
        }
        rows_seen = row + 1;

        let mut tokens_in_row = 0;
        for (offset, token) in split_tokens(&line).enumerate() {
            let col = row + offset;
            tokens_in_row += 1;

            if col >= num_x {
                match mode {
                    ParseMode::Permissive => {
                        summary.ignored_entries += 1;
                        continue;
                    }
                    ParseMode::Strict => {
                        bail!("Row {} has more than {} entries", row + 1, num_x - row)
                    }
                }
            }

            let value = match mode {
                ParseMode::Permissive => match parse_leading_int(token) {
                    Some(v) => v as i16,
                    None => {
                        summary.malformed_tokens += 1;
                        0
                    }
                },
                ParseMode::Strict => {
                    let v = parse_exact_int(token).with_context(|| {
                        format!("Malformed entry {token:?} at row {}, column {}", row + 1, col + 1)
                    })?;
                    i16::try_from(v).with_context(|| {
                        format!("Entry {v} at row {}, column {} does not fit in 16 bits", row + 1, col + 1)
                    })?
                }
            };

            q[[row, col]] = value;
            q[[col, row]] = value;
        }

        if mode == ParseMode::Strict && tokens_in_row < num_x - row {
            bail!(
                "Row {} has {tokens_in_row} entries, expected {}",
                row + 1,
                num_x - row
            );
        }
    }

    if mode == ParseMode::Strict && rows_seen < num_x {
        bail!("Expected {num_x} rows after the header, found {rows_seen}");
    }

    Ok((Qubo::from_raw(q)?, summary))
}

/// Splits a data line on commas. An empty line has no tokens and a trailing comma does not start
/// a new token.
fn split_tokens(line: &str) -> impl Iterator<Item = &str> {
    let line = line.strip_suffix(',').unwrap_or(line);
    line.split(',').filter(move |_| !line.is_empty())
}

/// Renders the QUBO in the format [`parse_qubo`] reads.
pub fn to_csv_string(qubo: &Qubo) -> String {
    let num_x = qubo.num_x();
    let mut out = format!("{num_x}\n");
    for i in 0..num_x {
        let row: Vec<String> = (i..num_x).map(|j| qubo.raw_entry(i, j).to_string()).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Writes the QUBO to `path` in the packed CSV format.
///
/// # Errors
///
/// Fails if the file cannot be created or written.
pub fn write_qubo<P: AsRef<Path>>(qubo: &Qubo, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(to_csv_string(qubo).as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use smolprng::{JsfLarge, PRNG};

    fn parse(text: &str, mode: ParseMode) -> Result<(Qubo, ReadSummary)> {
        parse_qubo(text.as_bytes(), mode)
    }

    #[test]
    fn test_parse_upper_triangle() {
        let (p, summary) = parse("3\n1,2,3\n4,5\n6\n", ParseMode::Permissive).unwrap();

        assert_eq!(p.b(), &array![1, 4, 6]);
        assert_eq!(p.w(), &array![[0i16, 2, 3], [2, 0, 5], [3, 5, 0]]);
        assert_eq!(summary.num_x, 3);
        assert_eq!(summary.malformed_tokens, 0);
        assert_eq!(summary.ignored_entries, 0);
    }

    #[test]
    fn test_parse_handles_crlf_and_trailing_comma() {
        let (p, _) = parse("2\r\n-1,-2,\r\n-3\r\n", ParseMode::Strict).unwrap();
        assert_eq!(p.b(), &array![-1, -3]);
        assert_eq!(p.w(), &array![[0i16, -2], [-2, 0]]);
    }

    #[test]
    fn test_bad_header() {
        assert!(parse("", ParseMode::Permissive).is_err());
        assert!(parse("0\n", ParseMode::Permissive).is_err());
        assert!(parse("-4\n", ParseMode::Permissive).is_err());
        assert!(parse("abc\n1\n", ParseMode::Permissive).is_err());

        // too large for a dense n x n matrix, reported instead of aborting
        let err = parse("3000000000\n", ParseMode::Permissive).unwrap_err();
        assert!(err.to_string().contains("too large"));

        // legacy prefix parse accepts trailing junk, strict does not
        assert!(parse("1x\n5\n", ParseMode::Permissive).is_ok());
        assert!(parse("1x\n5\n", ParseMode::Strict).is_err());
    }

    #[test]
    fn test_permissive_malformed_tokens_read_as_zero() {
        let (p, summary) = parse("2\nfoo,7\n", ParseMode::Permissive).unwrap();
        assert_eq!(p.b(), &array![0, 0]);
        assert_eq!(p.w()[[0, 1]], 7);
        assert_eq!(summary.malformed_tokens, 1);
    }

    #[test]
    fn test_permissive_wraps_and_skips_surplus() {
        let (p, summary) = parse("2\n40000,1,9,9\n2\n3,3\n", ParseMode::Permissive).unwrap();
        assert_eq!(p.b()[0], 40000i64 as i16 as i32);
        assert_eq!(p.b()[1], 2);
        assert_eq!(summary.ignored_entries, 4);
    }

    #[test]
    fn test_permissive_short_input() {
        let (p, _) = parse("3\n1\n", ParseMode::Permissive).unwrap();
        assert_eq!(p.b(), &array![1, 0, 0]);
        assert!(p.w().iter().all(|v| *v == 0));
    }

    #[test]
    fn test_strict_rejects() {
        assert!(parse("2\nfoo,7\n1\n", ParseMode::Strict).is_err());
        assert!(parse("2\n40000,7\n1\n", ParseMode::Strict).is_err());
        assert!(parse("2\n1,7,8\n1\n", ParseMode::Strict).is_err());
        assert!(parse("2\n1\n1\n", ParseMode::Strict).is_err());
        assert!(parse("2\n1,7\n", ParseMode::Strict).is_err());
        assert!(parse("2\n1,7\n1\n1\n", ParseMode::Strict).is_err());

        // trailing blank lines are fine
        assert!(parse("2\n1,7\n1\n\n", ParseMode::Strict).is_ok());
    }

    #[test]
    fn test_csv_output_reads_back() {
        let mut prng = PRNG {
            generator: JsfLarge::from(17u64),
        };
        let p = Qubo::make_random_qubo(15, &mut prng, 0.5);

        let text = to_csv_string(&p);
        assert_eq!(text.lines().count(), 16);
        assert_eq!(text.lines().nth(15).map(|l| l.split(',').count()), Some(1));

        let (q, _) = parse(&text, ParseMode::Strict).unwrap();
        assert_eq!(p, q);
    }

    #[test]
    fn test_write_and_read_file() {
        let p = Qubo::from_raw(array![[-5i16, 3], [3, 2]]).unwrap();
        let path = std::env::temp_dir().join(format!("qubo_io_test_{}.csv", std::process::id()));

        write_qubo(&p, &path).unwrap();
        let (q, _) = read_qubo(&path, ParseMode::Strict).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(p, q);
    }

    #[test]
    fn test_missing_file() {
        assert!(read_qubo("/nonexistent/qubo.csv", ParseMode::Permissive).is_err());
    }
}
