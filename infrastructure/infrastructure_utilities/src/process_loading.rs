//! Process File Loading
//!
//! Reads the simulator input: one process per line, four whitespace-separated
//! fields:
//!
//! ```text
//! <arrival-time> <name> <service-time> <memory-kb>
//! ```
//!
//! Blank lines are skipped. Names are at most seven characters and must be
//! unique; service time must be at least 1. Lines need not be sorted by
//! arrival time.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use entities_process::{ProcessDescriptor, MAX_NAME_LEN};

/// Errors raised while reading a process file
///
/// Line numbers are 1-based.
#[derive(Debug)]
pub enum ParseError {
    /// The file could not be opened or read
    Io { path: String, source: io::Error },
    /// Wrong number of fields, or a field that is not a non-negative integer
    MalformedLine { line: usize, content: String },
    /// Name longer than seven characters
    NameTooLong { line: usize, name: String },
    /// Name already used on an earlier line
    DuplicateName { line: usize, name: String },
    /// Service time of zero
    InvalidServiceTime { line: usize, name: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io { path, source } => write!(f, "Could not open file {}: {}", path, source),
            ParseError::MalformedLine { line, content } => {
                write!(f, "Line {}: expected '<arrival> <name> <service> <memory>', got '{}'", line, content)
            }
            ParseError::NameTooLong { line, name } => write!(
                f,
                "Line {}: process name '{}' is longer than {} characters",
                line, name, MAX_NAME_LEN
            ),
            ParseError::DuplicateName { line, name } => {
                write!(f, "Line {}: process name '{}' is already in use", line, name)
            }
            ParseError::InvalidServiceTime { line, name } => {
                write!(f, "Line {}: process '{}' must have a service time of at least 1", line, name)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Read and parse the process file at `path`
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or the first
/// validation error found.
pub fn load_processes(path: impl AsRef<Path>) -> Result<Vec<ProcessDescriptor>, ParseError> {
    let path = path.as_ref();
    let io_error = |source| ParseError::Io {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    let descriptors = parse_lines(BufReader::new(file)).map_err(|err| match err {
        LineError::Io(source) => io_error(source),
        LineError::Parse(err) => err,
    })?;
    log::debug!("loaded {} processes from {}", descriptors.len(), path.display());
    Ok(descriptors)
}

/// Parse process descriptors from any buffered reader
///
/// # Examples
///
/// ```
/// use infrastructure_utilities::parse_processes;
///
/// let processes = parse_processes("0 P1 30 16\n29 P2 40 64\n".as_bytes()).unwrap();
/// assert_eq!(processes.len(), 2);
/// assert_eq!(processes[1].name, "P2");
/// ```
pub fn parse_processes(reader: impl BufRead) -> Result<Vec<ProcessDescriptor>, ParseError> {
    parse_lines(reader).map_err(|err| match err {
        LineError::Io(source) => ParseError::Io {
            path: "<input>".to_string(),
            source,
        },
        LineError::Parse(err) => err,
    })
}

enum LineError {
    Io(io::Error),
    Parse(ParseError),
}

fn parse_lines(reader: impl BufRead) -> Result<Vec<ProcessDescriptor>, LineError> {
    let mut descriptors = Vec::new();
    let mut names = HashSet::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(LineError::Io)?;
        if line.trim().is_empty() {
            continue;
        }
        let descriptor = parse_line(number + 1, &line).map_err(LineError::Parse)?;
        if !names.insert(descriptor.name.clone()) {
            return Err(LineError::Parse(ParseError::DuplicateName {
                line: number + 1,
                name: descriptor.name,
            }));
        }
        descriptors.push(descriptor);
    }
    Ok(descriptors)
}

fn parse_line(line: usize, content: &str) -> Result<ProcessDescriptor, ParseError> {
    let malformed = || ParseError::MalformedLine {
        line,
        content: content.trim().to_string(),
    };
    let fields: Vec<&str> = content.split_whitespace().collect();
    let [arrival, name, service, memory] = fields.as_slice() else {
        return Err(malformed());
    };
    let arrival_time = arrival.parse::<u32>().map_err(|_| malformed())?;
    let service_time = service.parse::<u32>().map_err(|_| malformed())?;
    let memory_requirement = memory.parse::<u32>().map_err(|_| malformed())?;

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ParseError::NameTooLong {
            line,
            name: name.to_string(),
        });
    }
    if service_time == 0 {
        return Err(ParseError::InvalidServiceTime {
            line,
            name: name.to_string(),
        });
    }
    Ok(ProcessDescriptor::new(arrival_time, *name, service_time, memory_requirement))
}
