//! Error types for bsdfio.

use crate::color::ColorModel;
use std::{
    fmt,
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
};

/// Violated preconditions while building or transforming sampled BRDFs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BxdfError {
    /// An angle axis has no sample.
    #[error("angle axis {axis} is empty")]
    EmptyAxis {
        /// Index of the axis.
        axis: usize,
    },
    /// An angle axis is not in ascending order.
    #[error("angle axis {axis} is not sorted in ascending order")]
    UnsortedAxis {
        /// Index of the axis.
        axis: usize,
    },
    /// An angle lies outside of the domain of its axis.
    #[error("angle {value} on axis {axis} lies outside of [0, {max}]")]
    AngleOutOfDomain {
        /// Index of the axis.
        axis: usize,
        /// The offending value in radians.
        value: f32,
        /// Maximum of the domain in radians.
        max: f32,
    },
    /// The number of channels disagrees with the color model.
    #[error("expected {expected} channels, got {actual}")]
    ChannelMismatch {
        /// Channel count implied by the color model.
        expected: usize,
        /// Channel count found.
        actual: usize,
    },
    /// A spectral color model was requested without wavelengths.
    #[error("spectral color model requires at least one wavelength")]
    MissingWavelengths,
    /// The BRDF is parameterised in the wrong coordinate system.
    #[error("expected a BRDF in {expected} coordinates, got {actual}")]
    UnexpectedCoordSys {
        /// Name of the expected coordinate system.
        expected: &'static str,
        /// Name of the actual coordinate system.
        actual: &'static str,
    },
    /// The operation does not support the color model.
    #[error("color model {0} is not supported here")]
    UnsupportedColorModel(ColorModel),
    /// The reflectance model has no parameter with this name.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
    /// The value given to a parameter has the wrong shape.
    #[error("invalid value for parameter '{0}'")]
    InvalidParameterValue(String),
}

/// Error type when writing a file.
#[derive(Debug)]
pub struct WriteFileError {
    /// The path of the file.
    pub path: Box<Path>,
    /// The kind of the error.
    pub kind: WriteFileErrorKind,
}

impl Display for WriteFileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WriteFileErrorKind::Write(_) => {
                write!(f, "error while writing file: {}", self.path.display())
            }
            WriteFileErrorKind::Precondition(err) => {
                write!(f, "cannot write file {}: {}", self.path.display(), err)
            }
        }
    }
}

impl std::error::Error for WriteFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            WriteFileErrorKind::Write(err) => Some(err),
            WriteFileErrorKind::Precondition(err) => Some(err),
        }
    }
}

impl WriteFileError {
    /// Creates a new `WriteFileError` from a `std::io::Error`.
    pub fn from_std_io_error(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        Self {
            path: path.as_ref().to_path_buf().into_boxed_path(),
            kind: WriteFileErrorKind::Write(err),
        }
    }

    /// Creates a new `WriteFileError` from a violated precondition.
    pub fn from_bxdf_error(path: impl AsRef<Path>, err: BxdfError) -> Self {
        Self {
            path: path.as_ref().to_path_buf().into_boxed_path(),
            kind: WriteFileErrorKind::Precondition(err),
        }
    }
}

/// The kind of the error while writing a file.
#[derive(Debug)]
pub enum WriteFileErrorKind {
    /// The error is a `std::io::Error`.
    Write(std::io::Error),
    /// The data does not satisfy the writer's requirements.
    Precondition(BxdfError),
}

impl From<std::io::Error> for WriteFileErrorKind {
    fn from(value: std::io::Error) -> Self { Self::Write(value) }
}

/// Error type when reading a file.
#[derive(Debug)]
pub struct ReadFileError {
    /// Path to the file that caused the error.
    pub path: Box<Path>,
    /// Kind of error that occurred.
    pub kind: ReadFileErrorKind,
}

impl Display for ReadFileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ReadFileErrorKind::Read(_) => {
                write!(f, "error while reading file: {}", self.path.display())
            }
            ReadFileErrorKind::Parse(err) => {
                write!(f, "error while reading file {}: {}", self.path.display(), err)
            }
        }
    }
}

impl std::error::Error for ReadFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ReadFileErrorKind::Read(err) => Some(err),
            ReadFileErrorKind::Parse(err) => Some(err),
        }
    }
}

impl ReadFileError {
    /// Creates a new `ReadFileError` from a `ParseError`.
    pub fn from_parse_error(path: impl AsRef<Path>, err: ParseError) -> Self {
        Self {
            path: path.as_ref().to_path_buf().into_boxed_path(),
            kind: ReadFileErrorKind::Parse(err),
        }
    }

    /// Creates a new `ReadFileError` from a `std::io::Error`.
    pub fn from_std_io_error(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        Self {
            path: path.as_ref().to_path_buf().into_boxed_path(),
            kind: ReadFileErrorKind::Read(err),
        }
    }

    /// Attaches a path to an error produced without one.
    pub fn from_kind(path: impl AsRef<Path>, kind: ReadFileErrorKind) -> Self {
        Self {
            path: path.as_ref().to_path_buf().into_boxed_path(),
            kind,
        }
    }
}

/// Kind of error that occurred while reading a file.
#[derive(Debug)]
pub enum ReadFileErrorKind {
    /// Error caused by a `std::io::Error`.
    Read(std::io::Error),
    /// Error caused by a `ParseError`.
    Parse(ParseError),
}

impl From<std::io::Error> for ReadFileErrorKind {
    fn from(value: std::io::Error) -> Self { Self::Read(value) }
}

impl From<ParseError> for ReadFileErrorKind {
    fn from(value: ParseError) -> Self { Self::Parse(value) }
}

/// Error type when parsing a text file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Line number where the error occurred, starting at 1.
    pub line: u32,
    /// Kind of error that occurred.
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(line: u32, kind: ParseErrorKind) -> Self { Self { line, kind } }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "error while parsing line {}: ", self.line)?;
        match &self.kind {
            ParseErrorKind::UnexpectedEof => write!(f, "unexpected end of file"),
            ParseErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {}, found '{}'", expected, found)
            }
            ParseErrorKind::ParseFloat(token) => write!(f, "invalid number '{}'", token),
            ParseErrorKind::ParseInt(token) => write!(f, "invalid count '{}'", token),
            ParseErrorKind::Unsupported(what) => write!(f, "unsupported {}", what),
            ParseErrorKind::MissingSection(name) => write!(f, "missing section '{}'", name),
            ParseErrorKind::InvalidContent(err) => write!(f, "invalid content: {}", err),
        }
    }
}

impl std::error::Error for ParseError {}

/// All possible errors while parsing a file.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// The file ended in the middle of a section.
    UnexpectedEof,
    /// A keyword other than the expected one was found.
    UnexpectedToken {
        /// What the parser was looking for.
        expected: &'static str,
        /// The token found instead.
        found: String,
    },
    /// The token is not a valid floating point number.
    ParseFloat(String),
    /// The token is not a valid non-negative integer.
    ParseInt(String),
    /// The file uses a feature this reader does not handle.
    Unsupported(String),
    /// A mandatory header section is absent.
    MissingSection(&'static str),
    /// The values read do not form a valid sample set.
    InvalidContent(BxdfError),
}

/// Error while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid TOML or has the wrong shape.
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    /// A value is out of its valid range.
    #[error("invalid configuration value for '{field}': {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn write_error_carries_source() {
        let err = WriteFileError::from_bxdf_error(
            "out.ddr",
            BxdfError::UnexpectedCoordSys {
                expected: "specular",
                actual: "spherical",
            },
        );
        assert!(err.to_string().contains("out.ddr"));
        assert!(err.to_string().contains("specular"));
        assert!(err.source().is_some());
    }

    #[test]
    fn parse_error_reports_line() {
        let err = ReadFileError::from_parse_error(
            "in.sdr",
            ParseError::new(7, ParseErrorKind::ParseFloat("abc".into())),
        );
        let msg = err.to_string();
        assert!(msg.contains("line 7"), "{}", msg);
        assert!(msg.contains("abc"), "{}", msg);
    }
}
