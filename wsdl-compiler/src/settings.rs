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

//! Compilation settings.
//!
//! Settings are assembled from [`Options`] layers: an optional TOML
//! manifest first, then command-line values on top of it.
//!
//! Manifest example:
//!
//! ```toml
//! wsdl = "service.wsdl"
//! both = "generated/service"
//! optional-element-type = "boost-optional"
//! import-paths = ["schemas"]
//!
//! [namespace-mapping]
//! "urn:example:types" = "types"
//! ```

use crate::compiler::Config as CompilerConfig;
use crate::generator::render::Config as RenderConfig;
use crate::generator::Config as GeneratorConfig;
use crate::generator::OptionalElementType;
use crate::loader::StoreConfig;
use crate::optimizer::Config as OptimizerConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::fs::File;
use std::io::Error as IoError;
use std::io::Read as _;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use toml::de::Error as TomlError;
use wsdlc_core::locator::Error as LocatorError;
use wsdlc_core::Locator;

/// Configuration errors.
#[derive(Debug)]
pub enum Error {
    /// File cannot be read.
    Io(PathBuf, IoError),
    /// Manifest is not valid.
    Toml(PathBuf, TomlError),
    /// Line of a namespace mapping file is not `uri=code`.
    MappingSyntax {
        /// Mapping file.
        file: PathBuf,
        /// Line number starting from 1.
        line: usize,
        /// Line content.
        text: String,
    },
    /// Namespace mapping argument is not `uri=code` or `@file`.
    InvalidMapping(String),
    /// No WSDL document is given.
    MissingInput,
    /// No output file is given.
    MissingOutput,
    /// `both` is combined with `output` or `impl`.
    BothWithOutput,
    /// `impl` is given without `output`.
    ImplWithoutOutput,
    /// WSDL location is not valid.
    InvalidLocator(LocatorError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Io(fname, err) => write!(f, "cannot read {}: {err}", fname.display()),
            Self::Toml(fname, err) => {
                write!(f, "manifest file format error: {}: {err}", fname.display())
            }
            Self::MappingSyntax { file, line, text } => write!(
                f,
                "{}:{line}: expected `uri=code` namespace mapping, got {text:?}",
                file.display()
            ),
            Self::InvalidMapping(v) => {
                write!(f, "invalid namespace mapping {v:?}: expected `uri=code` or `@file`")
            }
            Self::MissingInput => write!(f, "WSDL document is not specified"),
            Self::MissingOutput => write!(f, "output file is not specified"),
            Self::BothWithOutput => {
                write!(f, "--both cannot be combined with --output or --impl")
            }
            Self::ImplWithoutOutput => write!(f, "--impl requires --output"),
            Self::InvalidLocator(err) => err.fmt(f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(_, err) => Some(err),
            Self::Toml(_, err) => Some(err),
            Self::InvalidLocator(err) => Some(err),
            _ => None,
        }
    }
}

/// Namespace mapping command-line argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceMapping {
    /// `uri=code`
    Entry {
        /// Namespace URI.
        uri: String,
        /// Namespace code.
        code: String,
    },
    /// `@file` with one `uri=code` per line.
    File(PathBuf),
}

impl FromStr for NamespaceMapping {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        if let Some(path) = s.strip_prefix('@') {
            return Ok(Self::File(PathBuf::from(path)));
        }
        parse_entry(s)
            .map(|(uri, code)| Self::Entry { uri, code })
            .ok_or_else(|| Error::InvalidMapping(s.to_string()))
    }
}

impl NamespaceMapping {
    /// Collect mappings; later entries override earlier ones.
    ///
    /// # Errors
    ///
    /// Returns error if a mapping file cannot be read or parsed.
    pub fn collect(mappings: &[Self]) -> Result<BTreeMap<String, String>, Error> {
        let mut result = BTreeMap::new();
        for mapping in mappings {
            match mapping {
                Self::Entry { uri, code } => {
                    result.insert(uri.clone(), code.clone());
                }
                Self::File(path) => result.extend(read_mapping_file(path)?),
            }
        }
        Ok(result)
    }
}

/// URI may contain `=`, so the last one separates the code.
fn parse_entry(s: &str) -> Option<(String, String)> {
    let (uri, code) = s.rsplit_once('=')?;
    let (uri, code) = (uri.trim(), code.trim());
    (!uri.is_empty() && !code.is_empty()).then(|| (uri.to_string(), code.to_string()))
}

fn read_file(fname: &Path) -> Result<String, Error> {
    let mut file = File::open(fname).map_err(|err| Error::Io(fname.to_path_buf(), err))?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|err| Error::Io(fname.to_path_buf(), err))?;
    Ok(content)
}

/// Read namespace mapping file. Empty lines and lines starting with
/// `#` are skipped.
///
/// # Errors
///
/// Returns error if file cannot be read or a line is malformed.
pub fn read_mapping_file(fname: &Path) -> Result<Vec<(String, String)>, Error> {
    read_file(fname)?
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(no, line)| {
            parse_entry(line).ok_or_else(|| Error::MappingSyntax {
                file: fname.to_path_buf(),
                line: no + 1,
                text: line.to_string(),
            })
        })
        .collect()
}

/// One layer of options. All values are optional so layers can be
/// combined with [`Options::overlay`].
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Options {
    /// WSDL path or URL.
    pub wsdl: Option<String>,
    /// Output file.
    pub output: Option<PathBuf>,
    /// Header included by the implementation-only output.
    #[serde(rename = "impl")]
    pub impl_header: Option<String>,
    /// Base name of header and implementation.
    pub both: Option<PathBuf>,
    /// Generate server base classes instead of clients.
    pub server: Option<bool>,
    /// Service filter.
    pub service: Option<String>,
    /// Namespace codes by URI.
    #[serde(default)]
    pub namespace_mapping: BTreeMap<String, String>,
    /// Rendering of optional members.
    pub optional_element_type: Option<OptionalElementType>,
    /// Do not prune unreferenced types.
    pub keep_unused_types: Option<bool>,
    /// Local mirrors of remote documents.
    #[serde(default)]
    pub import_paths: Vec<PathBuf>,
    /// Never fetch remote documents.
    pub use_local_files_only: Option<bool>,
    /// List known types when references are unresolved.
    pub help_on_missing: Option<bool>,
    /// Skip blocking calls.
    pub no_sync: Option<bool>,
    /// Skip non-blocking calls.
    pub no_async: Option<bool>,
    /// Skip job classes.
    pub no_async_jobs: Option<bool>,
    /// C++ namespace.
    pub namespace: Option<String>,
    /// Export macro.
    pub export_macro: Option<String>,
    /// JSON dump of generated classes.
    pub emit_json: Option<PathBuf>,
}

impl Options {
    /// Read options from a TOML manifest.
    ///
    /// # Errors
    ///
    /// - `Error::Io` if failed to read file
    /// - `Error::Toml` if content is not a valid manifest
    pub fn read(fname: &Path) -> Result<Self, Error> {
        toml::from_str(&read_file(fname)?).map_err(|err| Error::Toml(fname.to_path_buf(), err))
    }

    /// Combine with `top` taking precedence. Output options are taken
    /// from `top` as a group when it sets any of them. Import paths of
    /// `top` are probed first.
    #[must_use]
    pub fn overlay(self, top: Self) -> Self {
        let top_output = top.output.is_some() || top.impl_header.is_some() || top.both.is_some();
        let (output, impl_header, both) = if top_output {
            (top.output, top.impl_header, top.both)
        } else {
            (self.output, self.impl_header, self.both)
        };
        let mut namespace_mapping = self.namespace_mapping;
        namespace_mapping.extend(top.namespace_mapping);
        let mut import_paths = top.import_paths;
        import_paths.extend(self.import_paths);
        Self {
            wsdl: top.wsdl.or(self.wsdl),
            output,
            impl_header,
            both,
            server: top.server.or(self.server),
            service: top.service.or(self.service),
            namespace_mapping,
            optional_element_type: top.optional_element_type.or(self.optional_element_type),
            keep_unused_types: top.keep_unused_types.or(self.keep_unused_types),
            import_paths,
            use_local_files_only: top.use_local_files_only.or(self.use_local_files_only),
            help_on_missing: top.help_on_missing.or(self.help_on_missing),
            no_sync: top.no_sync.or(self.no_sync),
            no_async: top.no_async.or(self.no_async),
            no_async_jobs: top.no_async_jobs.or(self.no_async_jobs),
            namespace: top.namespace.or(self.namespace),
            export_macro: top.export_macro.or(self.export_macro),
            emit_json: top.emit_json.or(self.emit_json),
        }
    }
}

/// Files to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Header only.
    Header {
        /// Header file.
        output: PathBuf,
    },
    /// Implementation only, including an existing header.
    Implementation {
        /// Implementation file.
        output: PathBuf,
        /// Header as written in `#include`.
        header: String,
    },
    /// `<base>.h` and `<base>.cpp`.
    Both {
        /// Base file name.
        base: PathBuf,
    },
}

impl OutputMode {
    /// Header file name as included by the implementation.
    #[must_use]
    pub fn header_name(&self) -> String {
        match self {
            Self::Header { output } => file_name(output),
            Self::Implementation { header, .. } => header.clone(),
            Self::Both { base } => format!("{}.h", file_name(base)),
        }
    }

    /// Header file to write.
    #[must_use]
    pub fn header_file(&self) -> Option<PathBuf> {
        match self {
            Self::Header { output } => Some(output.clone()),
            Self::Implementation { .. } => None,
            Self::Both { base } => Some(with_suffix(base, ".h")),
        }
    }

    /// Implementation file to write.
    #[must_use]
    pub fn implementation_file(&self) -> Option<PathBuf> {
        match self {
            Self::Header { .. } => None,
            Self::Implementation { output, .. } => Some(output.clone()),
            Self::Both { base } => Some(with_suffix(base, ".cpp")),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

/// Resolved settings of one compilation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Start document.
    pub start: Locator,
    /// Files to produce.
    pub output: OutputMode,
    /// Server mode.
    pub server: bool,
    /// Service filter.
    pub service: Option<String>,
    /// Namespace codes by URI.
    pub namespace_mapping: BTreeMap<String, String>,
    /// Rendering of optional members.
    pub optional_element_type: OptionalElementType,
    /// Do not prune unreferenced types.
    pub keep_unused_types: bool,
    /// Local mirrors of remote documents.
    pub import_paths: Vec<PathBuf>,
    /// Never fetch remote documents.
    pub use_local_files_only: bool,
    /// List known types when references are unresolved.
    pub help_on_missing: bool,
    /// Skip blocking calls.
    pub no_sync: bool,
    /// Skip non-blocking calls.
    pub no_async: bool,
    /// Skip job classes.
    pub no_async_jobs: bool,
    /// C++ namespace.
    pub namespace: Option<String>,
    /// Export macro.
    pub export_macro: Option<String>,
    /// JSON dump of generated classes.
    pub emit_json: Option<PathBuf>,
}

impl TryFrom<Options> for Settings {
    type Error = Error;

    fn try_from(options: Options) -> Result<Self, Error> {
        let wsdl = options.wsdl.ok_or(Error::MissingInput)?;
        let start = Locator::parse(&wsdl).map_err(Error::InvalidLocator)?;
        let output = match (options.both, options.output, options.impl_header) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => return Err(Error::BothWithOutput),
            (Some(base), None, None) => OutputMode::Both { base },
            (None, Some(output), Some(header)) => OutputMode::Implementation { output, header },
            (None, Some(output), None) => OutputMode::Header { output },
            (None, None, Some(_)) => return Err(Error::ImplWithoutOutput),
            (None, None, None) => return Err(Error::MissingOutput),
        };
        Ok(Self {
            start,
            output,
            server: options.server.unwrap_or_default(),
            service: options.service,
            namespace_mapping: options.namespace_mapping,
            optional_element_type: options.optional_element_type.unwrap_or_default(),
            keep_unused_types: options.keep_unused_types.unwrap_or_default(),
            import_paths: options.import_paths,
            use_local_files_only: options.use_local_files_only.unwrap_or_default(),
            help_on_missing: options.help_on_missing.unwrap_or_default(),
            no_sync: options.no_sync.unwrap_or_default(),
            no_async: options.no_async.unwrap_or_default(),
            no_async_jobs: options.no_async_jobs.unwrap_or_default(),
            namespace: options.namespace,
            export_macro: options.export_macro,
            emit_json: options.emit_json,
        })
    }
}

impl Settings {
    /// Document store policy.
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            import_paths: self.import_paths.clone(),
            local_files_only: self.use_local_files_only,
        }
    }

    /// Compiler parameters.
    #[must_use]
    pub fn compiler_config(&self) -> CompilerConfig {
        CompilerConfig {
            service: self.service.clone(),
            namespace_mapping: self.namespace_mapping.clone(),
            help_on_missing: self.help_on_missing,
        }
    }

    /// Optimizer parameters.
    #[must_use]
    pub const fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig {
            keep_unused_types: self.keep_unused_types,
        }
    }

    /// Generator parameters.
    #[must_use]
    pub const fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            optional_element_type: self.optional_element_type,
            server: self.server,
            no_sync: self.no_sync,
            no_async: self.no_async,
            no_async_jobs: self.no_async_jobs,
        }
    }

    /// Renderer parameters.
    #[must_use]
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            namespace: self.namespace.clone(),
            export_macro: self.export_macro.clone(),
            header_file: self.output.header_name(),
        }
    }
}
