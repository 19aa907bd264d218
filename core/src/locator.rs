// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Schema document locators
//!
//! A [`Locator`] is the absolute, canonical identity of a schema
//! document. Local documents use the `file` scheme; remote ones use
//! `http` or `https`. Relative `schemaLocation`/`location` values are
//! joined against the locator of the importing document.
//!
//! Canonicalization removes the fragment and, for local files that
//! exist, resolves the path through the filesystem so the same document
//! reached via two relative paths has one identity.

use std::env::current_dir;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::fs::canonicalize;
use std::io::Error as IoError;
use std::path::Path;
use std::path::PathBuf;
use url::ParseError;
use url::Url;

/// Locator errors.
#[derive(Debug)]
pub enum Error {
    /// String cannot be interpreted as URL.
    InvalidUrl(String, ParseError),
    /// Path cannot be represented as `file` URL.
    InvalidPath(PathBuf),
    /// Cannot get current directory to resolve relative path.
    CurrentDir(IoError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::InvalidUrl(v, err) => write!(f, "invalid document location {v}: {err}"),
            Self::InvalidPath(v) => write!(f, "invalid document path: {}", v.display()),
            Self::CurrentDir(err) => write!(f, "cannot resolve current directory: {err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::InvalidUrl(_, err) => Some(err),
            Self::CurrentDir(err) => Some(err),
            Self::InvalidPath(_) => None,
        }
    }
}

/// Where content of the document comes from.
#[derive(Debug, PartialEq, Eq)]
pub enum Source<'a> {
    /// Document on the local filesystem.
    Local(PathBuf),
    /// Document that should be fetched over the network.
    Remote(&'a Url),
    /// Scheme that is not supported.
    Unsupported(&'a str),
}

/// Canonical document identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locator {
    url: Url,
}

impl Locator {
    /// Parse locator from command line or configuration value. Strings
    /// that are not absolute URLs are treated as filesystem paths
    /// relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if value is neither valid URL nor valid path.
    pub fn parse(input: &str) -> Result<Self, Error> {
        match Url::parse(input) {
            // Single letter schemes are drive letters.
            Ok(url) if url.scheme().len() > 1 => Ok(Self::from_url(url)),
            Ok(_) | Err(ParseError::RelativeUrlWithoutBase) => Self::from_path(Path::new(input)),
            Err(err) => Err(Error::InvalidUrl(input.to_string(), err)),
        }
    }

    /// Create locator of a local file.
    ///
    /// # Errors
    ///
    /// Returns error if path cannot be made absolute or converted to URL.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            current_dir().map_err(Error::CurrentDir)?.join(path)
        };
        let absolute = canonicalize(&absolute).unwrap_or(absolute);
        Url::from_file_path(&absolute)
            .map(|url| Self { url })
            .map_err(|()| Error::InvalidPath(absolute))
    }

    /// Create canonical locator from URL.
    #[must_use]
    pub fn from_url(mut url: Url) -> Self {
        url.set_fragment(None);
        if url.scheme() == "file" {
            if let Some(url) = url
                .to_file_path()
                .ok()
                .and_then(|path| canonicalize(path).ok())
                .and_then(|path| Url::from_file_path(path).ok())
            {
                return Self { url };
            }
        }
        Self { url }
    }

    /// Resolve `reference` (absolute or relative) against this locator.
    ///
    /// # Errors
    ///
    /// Returns error if the reference is not a valid URL reference.
    pub fn join(&self, reference: &str) -> Result<Self, Error> {
        self.url
            .join(reference.trim())
            .map(Self::from_url)
            .map_err(|err| Error::InvalidUrl(reference.to_string(), err))
    }

    /// Source of the document content.
    #[must_use]
    pub fn source(&self) -> Source<'_> {
        match self.url.scheme() {
            "file" => self
                .url
                .to_file_path()
                .map_or(Source::Unsupported("file"), Source::Local),
            "http" | "https" => Source::Remote(&self.url),
            scheme => Source::Unsupported(scheme),
        }
    }

    /// Candidate path of a remote document inside a local import
    /// directory: `<import_path>/<host>/<path>`.
    #[must_use]
    pub fn import_path_candidate(&self, import_path: &Path) -> Option<PathBuf> {
        let host = self.url.host_str()?;
        let segments = self.url.path_segments()?;
        Some(
            segments
                .filter(|segment| !segment.is_empty())
                .fold(import_path.join(host), |path, segment| path.join(segment)),
        )
    }

    /// URL of the document.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.url
    }

    /// Last path segment of the locator, useful for messages.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.url.fmt(f)
    }
}
