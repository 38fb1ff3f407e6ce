use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::app::Result;
use crate::domain::{CharterNumber, ErrorEntry, ResultRow};
use crate::store::Store;

pub const RESULT_HEADER: &str = "charter_number,website,scraped_timestamp";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Flat-file persistence: result CSV, error log and progress marker.
///
/// Each row goes out in one append-mode write (the progress marker is
/// overwritten). A line cut short by a crash is terminated before the next
/// append, and the resume scan only counts complete rows, so the charter on
/// a torn line is fetched again.
pub struct CsvStore {
    output: PathBuf,
    error_log: PathBuf,
    progress_file: PathBuf,
}

impl CsvStore {
    pub fn new(
        output: impl Into<PathBuf>,
        error_log: impl Into<PathBuf>,
        progress_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            output: output.into(),
            error_log: error_log.into(),
            progress_file: progress_file.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    pub fn error_log_path(&self) -> &Path {
        &self.error_log
    }

    fn open_append(path: &Path) -> Result<File> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?)
    }

    /// Append `line` with a single write, preceded by `header` when the file
    /// is empty or by a newline when the last line was left unterminated.
    fn append_line(path: &Path, header: Option<&str>, line: &str) -> Result<()> {
        let mut file = Self::open_append(path)?;
        let len = file.metadata()?.len();

        let mut buf = String::with_capacity(line.len() + RESULT_HEADER.len() + 2);
        if len == 0 {
            if let Some(header) = header {
                buf.push_str(header);
                buf.push('\n');
            }
        } else if !ends_with_newline(&mut file, len)? {
            tracing::warn!("Terminating partial last line in {}", path.display());
            buf.push('\n');
        }
        buf.push_str(line);
        buf.push('\n');

        file.write_all(buf.as_bytes())?;
        Ok(())
    }
}

impl Store for CsvStore {
    fn processed(&self) -> Result<HashSet<CharterNumber>> {
        let file = match File::open(&self.output) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(e) => return Err(e.into()),
        };

        let mut processed = HashSet::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with("charter_number") {
                continue;
            }
            match parse_row_charter(&line) {
                Some(charter) => {
                    processed.insert(charter);
                }
                None => {
                    tracing::warn!(
                        "Ignoring malformed line {} in {}: {:?}",
                        idx + 1,
                        self.output.display(),
                        line
                    );
                }
            }
        }

        Ok(processed)
    }

    fn append_result(&self, row: &ResultRow) -> Result<()> {
        Self::append_line(&self.output, Some(RESULT_HEADER), &format_result_row(row))
    }

    fn append_error(&self, entry: &ErrorEntry) -> Result<()> {
        Self::append_line(&self.error_log, None, &format_error_entry(entry))
    }

    fn record_progress(&self, charter: CharterNumber) -> Result<()> {
        if let Some(parent) = self
            .progress_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.progress_file, format!("{}\n", charter))?;
        Ok(())
    }
}

fn ends_with_newline(file: &mut File, len: u64) -> Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Percent-escape commas and drop line breaks so the row stays one line of
/// exactly three fields.
pub fn escape_field(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r'))
        .collect::<String>()
        .replace(',', "%2C")
}

/// Strip characters that would break the error log's line/field structure.
pub fn sanitize_message(message: &str) -> String {
    message
        .chars()
        .filter(|c| !matches!(c, ',' | '\n' | '\r'))
        .collect()
}

pub fn format_result_row(row: &ResultRow) -> String {
    format!(
        "{},{},{}",
        row.charter,
        escape_field(row.website.as_str()),
        format_timestamp(&row.scraped_at)
    )
}

pub fn format_error_entry(entry: &ErrorEntry) -> String {
    format!(
        "{},charter_{},{}",
        format_timestamp(&entry.at),
        entry.charter,
        sanitize_message(&entry.message)
    )
}

/// Charter of a complete row: three fields ending in a full timestamp.
fn parse_row_charter(line: &str) -> Option<CharterNumber> {
    let mut fields = line.split(',');
    let (charter, _website, scraped) = (fields.next()?, fields.next()?, fields.next()?);
    if fields.next().is_some() {
        return None;
    }
    NaiveDateTime::parse_from_str(scraped, TIMESTAMP_FORMAT).ok()?;
    charter.parse().ok()
}
