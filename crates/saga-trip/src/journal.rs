use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use saga_engine::{Context, Logger};
use tracing::{debug, warn};

use crate::booking::{Booking, BookingError};
use crate::error::{CliError, Result};

/// Append-only JSON-lines journal of booking transitions.
///
/// Each line is one complete [`Booking`]. The last line is the state to
/// resume from after a crash. A write cut short leaves a line without its
/// newline; readers ignore it and the next append overwrites it.
#[derive(Debug, Clone)]
pub(crate) struct Journal {
    path: PathBuf,
}

impl Journal {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the journal and record `booking` as its first entry.
    pub(crate) fn start(&self, booking: &Booking) -> Result<()> {
        File::create(&self.path).map_err(|source| CliError::JournalOpen {
            path: self.path.clone(),
            source,
        })?;
        self.append(booking).map_err(|source| CliError::JournalAppend {
            path: self.path.clone(),
            source,
        })
    }

    fn append(&self, booking: &Booking) -> std::result::Result<(), BookingError> {
        let mut line = serde_json::to_string(booking).map_err(BookingError::JournalEncode)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(BookingError::JournalWrite)?;
        let end = complete_len(&mut file).map_err(BookingError::JournalWrite)?;
        file.set_len(end).map_err(BookingError::JournalWrite)?;
        file.seek(SeekFrom::Start(end)).map_err(BookingError::JournalWrite)?;
        file.write_all(line.as_bytes()).map_err(BookingError::JournalWrite)?;
        file.sync_data().map_err(BookingError::JournalWrite)?;

        debug!(path = %self.path.display(), state = %booking.state, "journaled booking");
        Ok(())
    }

    /// Every complete entry in the journal, oldest first. A missing file is
    /// empty.
    pub(crate) fn entries(&self) -> Result<Vec<Booking>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(CliError::JournalOpen {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let complete = content.rfind('\n').map_or("", |i| &content[..=i]);
        if complete.len() < content.len() {
            warn!(path = %self.path.display(), "ignoring incomplete last journal entry");
        }

        let mut entries = Vec::new();
        for (index, line) in complete.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let booking = serde_json::from_str(line).map_err(|source| CliError::JournalParse {
                path: self.path.clone(),
                line: index + 1,
                source,
            })?;
            entries.push(booking);
        }
        Ok(entries)
    }

    /// The most recent entry, if any.
    pub(crate) fn last(&self) -> Result<Option<Booking>> {
        Ok(self.entries()?.pop())
    }
}

/// Length of `file` up to and including its last newline.
fn complete_len(file: &mut File) -> std::io::Result<u64> {
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    Ok(content
        .iter()
        .rposition(|&byte| byte == b'\n')
        .map_or(0, |i| i as u64 + 1))
}

impl Logger<Booking, BookingError> for Journal {
    fn log(&self, ctx: &Context, tx: &Booking) -> std::result::Result<(), BookingError> {
        ctx.check()?;
        self.append(tx)
    }
}
