//! Plain-text matrix files
//!
//! ```text
//! # comment lines and blank lines are ignored
//! 3
//! 0 4 -
//! - 0 1
//! 2 inf 0
//! ```
//!
//! The first value line holds `N`, followed by `N` rows of `N` whitespace-separated values.
//! `-`, `x` and `inf` (any case) read as undefined; undefined cells are written as `-`.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use crate::core::{DistMatrix, Element, Error, Result};

fn is_undefined_token(token: &str) -> bool {
    token == "-" || token.eq_ignore_ascii_case("x") || token.eq_ignore_ascii_case("inf")
}

/// Parse a matrix from a reader
pub fn read_matrix<T, B>(reader: B) -> Result<DistMatrix<T>>
where
    T: Element + FromStr,
    T::Err: Display,
    B: BufRead,
{
    let mut n: Option<usize> = None;
    let mut rows: Vec<Vec<T>> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some(n) = n else {
            n = Some(trimmed.parse::<usize>().map_err(|e| Error::Parse {
                line: line_no,
                message: format!("expected matrix dimension, got {trimmed:?}: {e}"),
            })?);
            continue;
        };

        if rows.len() == n {
            return Err(Error::Parse {
                line: line_no,
                message: format!("unexpected extra row; matrix has {n} rows"),
            });
        }

        let row = trimmed
            .split_whitespace()
            .map(|token| {
                if is_undefined_token(token) {
                    Ok(T::UNDEFINED)
                } else {
                    token.parse::<T>().map_err(|e| Error::Parse {
                        line: line_no,
                        message: format!("bad value {token:?}: {e}"),
                    })
                }
            })
            .collect::<Result<Vec<T>>>()?;

        if row.len() != n {
            return Err(Error::Parse {
                line: line_no,
                message: format!("expected {n} values, got {}", row.len()),
            });
        }
        rows.push(row);
    }

    match n {
        None => Err(Error::Parse {
            line: 0,
            message: "empty input: missing matrix dimension".to_string(),
        }),
        Some(n) if rows.len() != n => Err(Error::Parse {
            line: 0,
            message: format!("expected {n} rows, got {}", rows.len()),
        }),
        Some(_) => DistMatrix::from_rows(rows),
    }
}

/// Write a matrix in the same format `read_matrix` accepts
pub fn write_matrix<T, W>(matrix: &DistMatrix<T>, mut writer: W) -> Result<()>
where
    T: Element + Display,
    W: Write,
{
    writeln!(writer, "{}", matrix.dim())?;
    for row in matrix.rows() {
        let line: Vec<String> = row
            .iter()
            .map(|v| {
                if v.is_defined() {
                    v.to_string()
                } else {
                    "-".to_string()
                }
            })
            .collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_matrix<T>(path: &Path) -> Result<DistMatrix<T>>
where
    T: Element + FromStr,
    T::Err: Display,
{
    let file = std::fs::File::open(path)?;
    read_matrix(std::io::BufReader::new(file))
}

pub fn save_matrix<T>(matrix: &DistMatrix<T>, path: &Path) -> Result<()>
where
    T: Element + Display,
{
    let file = std::fs::File::create(path)?;
    write_matrix(matrix, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    const U: i64 = i64::UNDEFINED;

    #[test]
    fn test_read_with_comments_and_sentinels() {
        let text = "# three nodes\n\n3\n0 4 -\nX 0 1\n2 INF 0\n";
        let m: DistMatrix<i64> = read_matrix(text.as_bytes()).unwrap();
        assert_eq!(m.dim(), 3);
        assert_eq!(m.get(0, 1), 4);
        assert_eq!(m.get(0, 2), U);
        assert_eq!(m.get(1, 0), U);
        assert_eq!(m.get(2, 1), U);
    }

    #[test]
    fn test_write_then_read() {
        let m = DistMatrix::from_rows(vec![vec![0i64, U], vec![7, 0]]).unwrap();
        let mut out = Vec::new();
        write_matrix(&m, &mut out).unwrap();
        assert_eq!(String::from_utf8(out.clone()).unwrap(), "2\n0 -\n7 0\n");

        let back: DistMatrix<i64> = read_matrix(out.as_slice()).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_short_row_reports_line() {
        let err = read_matrix::<i32, _>("2\n0 1\n5\n".as_bytes()).unwrap_err();
        match err {
            Error::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("expected 2 values"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_value_and_missing_rows() {
        assert!(matches!(
            read_matrix::<i32, _>("1\nseven\n".as_bytes()),
            Err(Error::Parse { line: 2, .. })
        ));
        assert!(matches!(
            read_matrix::<i32, _>("3\n0 1 2\n".as_bytes()),
            Err(Error::Parse { line: 0, .. })
        ));
        assert!(read_matrix::<i32, _>("".as_bytes()).is_err());
        assert!(read_matrix::<i32, _>("1\n0\n0\n".as_bytes()).is_err());
    }

    #[test]
    fn test_float_matrix() {
        let m: DistMatrix<f64> = read_matrix("2\n0 1.5\ninf 0\n".as_bytes()).unwrap();
        assert_eq!(m.get(0, 1), 1.5);
        assert_eq!(m.get(1, 0), f64::INFINITY);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.txt");
        let m = DistMatrix::from_rows(vec![vec![0i32, 3], vec![i32::UNDEFINED, 0]]).unwrap();
        save_matrix(&m, &path).unwrap();
        let back: DistMatrix<i32> = load_matrix(&path).unwrap();
        assert_eq!(back, m);
    }
}
