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

//! Schema Document Store.
//!
//! Maps a [`Locator`] to document bytes. Local files are read from the
//! filesystem. Remote documents are first looked up in the configured
//! import paths (`<import_path>/<host>/<path>`) and only then fetched
//! through the [`Fetcher`], unless local-only mode is requested.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::io::Error as IoError;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use wsdlc_core::Fetcher;
use wsdlc_core::Locator;
use wsdlc_core::Source;

/// Why a document could not be obtained.
#[derive(Debug)]
pub enum FetchErrorReason {
    /// Local file cannot be read.
    Io(PathBuf, IoError),
    /// Remote document is not present in any import path and
    /// fetching is disabled.
    LocalFilesOnly(Vec<PathBuf>),
    /// Scheme of the locator is not supported.
    UnsupportedScheme(String),
    /// Fetcher failed.
    Remote(Box<dyn StdError + Send + Sync>),
}

impl Display for FetchErrorReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Io(path, err) => write!(f, "cannot read {}: {err}", path.display()),
            Self::LocalFilesOnly(probed) if probed.is_empty() => {
                write!(f, "remote fetch disabled and no import path is configured")
            }
            Self::LocalFilesOnly(probed) => {
                write!(f, "remote fetch disabled and document is not found in:")?;
                for path in probed {
                    write!(f, " {}", path.display())?;
                }
                Ok(())
            }
            Self::UnsupportedScheme(scheme) => write!(f, "unsupported scheme: {scheme}"),
            Self::Remote(err) => write!(f, "fetch failed: {err}"),
        }
    }
}

/// Document fetch error.
#[derive(Debug)]
pub struct FetchError {
    /// Document that was requested.
    pub locator: Locator,
    /// Details.
    pub reason: FetchErrorReason,
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "cannot load {}: {}", self.locator, self.reason)
    }
}

impl StdError for FetchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.reason {
            FetchErrorReason::Io(_, err) => Some(err),
            FetchErrorReason::Remote(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Document store policy.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Directories that mirror remote documents.
    pub import_paths: Vec<PathBuf>,
    /// Never use the fetcher.
    pub local_files_only: bool,
}

/// Document store with per-locator cache.
pub struct DocumentStore<'a, F> {
    fetcher: &'a F,
    config: StoreConfig,
    cache: HashMap<Locator, Arc<[u8]>>,
}

impl<'a, F: Fetcher> DocumentStore<'a, F> {
    /// Create new store.
    pub fn new(fetcher: &'a F, config: StoreConfig) -> Self {
        Self {
            fetcher,
            config,
            cache: HashMap::new(),
        }
    }

    /// Number of distinct documents obtained so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// No documents were obtained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Get content of the document.
    ///
    /// # Errors
    ///
    /// Returns error if the document cannot be read or fetched.
    pub async fn resolve(&mut self, locator: &Locator) -> Result<Arc<[u8]>, FetchError> {
        if let Some(bytes) = self.cache.get(locator) {
            return Ok(bytes.clone());
        }
        let err = |reason| FetchError {
            locator: locator.clone(),
            reason,
        };
        let bytes: Vec<u8> = match locator.source() {
            Source::Local(path) => {
                debug!(path = %path.display(), "reading local document");
                std::fs::read(&path).map_err(|e| err(FetchErrorReason::Io(path, e)))?
            }
            Source::Remote(_) => {
                let candidates = self
                    .config
                    .import_paths
                    .iter()
                    .filter_map(|dir| locator.import_path_candidate(dir))
                    .collect::<Vec<_>>();
                match candidates.iter().find(|path| path.is_file()) {
                    Some(path) => {
                        debug!(%locator, path = %path.display(), "using local copy from import path");
                        std::fs::read(path)
                            .map_err(|e| err(FetchErrorReason::Io(path.clone(), e)))?
                    }
                    None if self.config.local_files_only => {
                        return Err(err(FetchErrorReason::LocalFilesOnly(candidates)));
                    }
                    None => {
                        debug!(%locator, "fetching remote document");
                        self.fetcher
                            .fetch(locator)
                            .await
                            .map_err(|e| err(FetchErrorReason::Remote(Box::new(e))))?
                    }
                }
            }
            Source::Unsupported(scheme) => {
                return Err(err(FetchErrorReason::UnsupportedScheme(scheme.to_string())));
            }
        };
        let bytes: Arc<[u8]> = bytes.into();
        self.cache.insert(locator.clone(), bytes.clone());
        Ok(bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Error as IoError;
    use wsdlc_fetch_mock::Expect;
    use wsdlc_fetch_mock::Fetcher as MockFetcher;

    #[tokio::test]
    async fn remote_documents_are_cached() {
        let fetcher = MockFetcher::<IoError>::new();
        fetcher.expect(Expect::fetch("http://example.com/a.xsd", "<a/>"));
        let mut store = DocumentStore::new(&fetcher, StoreConfig::default());
        let locator = Locator::parse("http://example.com/a.xsd").unwrap();
        assert_eq!(&*store.resolve(&locator).await.unwrap(), b"<a/>");
        assert_eq!(&*store.resolve(&locator).await.unwrap(), b"<a/>");
        assert_eq!(fetcher.history().len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn import_path_wins_over_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let mirrored = dir.path().join("example.com").join("schemas");
        std::fs::create_dir_all(&mirrored).unwrap();
        std::fs::write(mirrored.join("a.xsd"), "<local/>").unwrap();

        let fetcher = MockFetcher::<IoError>::new();
        let config = StoreConfig {
            import_paths: vec![dir.path().join("missing"), dir.path().to_path_buf()],
            local_files_only: true,
        };
        let mut store = DocumentStore::new(&fetcher, config);
        let locator = Locator::parse("http://example.com/schemas/a.xsd").unwrap();
        assert_eq!(&*store.resolve(&locator).await.unwrap(), b"<local/>");
        assert!(fetcher.history().is_empty());
    }

    #[tokio::test]
    async fn local_files_only_names_locator() {
        let fetcher = MockFetcher::<IoError>::new();
        let config = StoreConfig {
            import_paths: Vec::new(),
            local_files_only: true,
        };
        let mut store = DocumentStore::new(&fetcher, config);
        let locator = Locator::parse("http://example.com/remote.xsd").unwrap();
        let err = store.resolve(&locator).await.unwrap_err();
        assert!(matches!(err.reason, FetchErrorReason::LocalFilesOnly(_)));
        assert!(err.to_string().contains("http://example.com/remote.xsd"));
        assert!(fetcher.history().is_empty());
    }

    #[tokio::test]
    async fn unsupported_scheme_and_missing_file() {
        let fetcher = MockFetcher::<IoError>::new();
        let mut store = DocumentStore::new(&fetcher, StoreConfig::default());
        let ftp = Locator::parse("ftp://example.com/a.xsd").unwrap();
        assert!(matches!(
            store.resolve(&ftp).await.unwrap_err().reason,
            FetchErrorReason::UnsupportedScheme(s) if s == "ftp"
        ));
        let dir = tempfile::tempdir().unwrap();
        let missing = Locator::from_path(&dir.path().join("nope.wsdl")).unwrap();
        assert!(matches!(
            store.resolve(&missing).await.unwrap_err().reason,
            FetchErrorReason::Io(..)
        ));
    }
}
