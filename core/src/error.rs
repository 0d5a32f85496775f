// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;
use thiserror::Error;

/// The error type for cloudgroups operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The credential path could not be made absolute or canonical
    PathResolution,

    /// The credential file does not exist
    MissingFile,

    /// The credential file exists but could not be read
    ReadFailed,

    /// The credential document is malformed
    ParseFailed,

    /// The token endpoint rejected the grant or could not be reached
    TokenAcquisition,

    /// An API client could not be built
    ClientConstruction,

    /// Delegation was requested without a user to act as
    MissingDelegationTarget,

    /// Listing groups failed
    ListFailed,

    /// Unexpected errors (request building, unconfigured components, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

// Convenience constructors
impl Error {
    /// Create a path resolution error
    pub fn path_resolution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PathResolution, message)
    }

    /// Create a missing file error
    pub fn missing_file(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingFile, message)
    }

    /// Create a read error
    pub fn read_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReadFailed, message)
    }

    /// Create a parse error
    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseFailed, message)
    }

    /// Create a token acquisition error
    pub fn token_acquisition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenAcquisition, message)
    }

    /// Create a client construction error
    pub fn client_construction(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ClientConstruction, message)
    }

    /// Create a missing delegation target error
    pub fn missing_delegation_target(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingDelegationTarget, message)
    }

    /// Create a list error
    pub fn list_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ListFailed, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::PathResolution => write!(f, "path resolution failed"),
            ErrorKind::MissingFile => write!(f, "missing file"),
            ErrorKind::ReadFailed => write!(f, "read failed"),
            ErrorKind::ParseFailed => write!(f, "parse failed"),
            ErrorKind::TokenAcquisition => write!(f, "token acquisition failed"),
            ErrorKind::ClientConstruction => write!(f, "client construction failed"),
            ErrorKind::MissingDelegationTarget => write!(f, "missing delegation target"),
            ErrorKind::ListFailed => write!(f, "list failed"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
