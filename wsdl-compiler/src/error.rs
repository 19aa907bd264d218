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

use crate::compiler::Error as CompileError;
use crate::loader::LoadError;
use crate::settings::Error as SettingsError;
use serde_json::Error as JsonError;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::io::Error as IoError;
use std::path::PathBuf;

/// WSDL compiler errors.
#[derive(Debug)]
pub enum Error {
    Config(SettingsError),
    Fetcher(Box<dyn StdError + Send + Sync>),
    Load(LoadError),
    Compile(Vec<String>),
    Json(JsonError),
    WriteOutput(PathBuf, IoError),
}

// Passing by reference would break possibility to use it as
// `map_err(Error::compile_error)`.
#[allow(clippy::needless_pass_by_value)]
impl Error {
    pub fn compile_error(e: CompileError) -> Self {
        Self::Compile(
            format!("{e}")
                .split('\n')
                .map(ToString::to_string)
                .collect(),
        )
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Config(error) => write!(f, "configuration error: {error}"),
            Self::Fetcher(error) => write!(f, "cannot create document fetcher: {error}"),
            Self::Load(error) => write!(f, "load error: {error}"),
            Self::Compile(lines) => {
                write!(f, "compilation error:")?;
                lines
                    .iter()
                    .enumerate()
                    .try_for_each(|(no, line)| write!(f, "\n #{no}: {line}"))
            }
            Self::Json(error) => write!(f, "failed to serialize generated classes: {error}"),
            Self::WriteOutput(fname, error) => {
                write!(f, "failed write output file: {}: {error}", fname.display())
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Fetcher(err) => Some(err.as_ref()),
            Self::Load(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::WriteOutput(_, err) => Some(err),
            Self::Compile(_) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compiler::TypeId;
    use crate::schema::QualifiedName;

    #[test]
    fn compile_error_is_split_into_lines() {
        let id = TypeId::Named(QualifiedName::new("urn:a", "A"));
        let err = Error::compile_error(CompileError::Type(
            id.clone(),
            Box::new(CompileError::InheritanceCycle(vec![id])),
        ));
        let Error::Compile(lines) = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(lines.len(), 2);
        assert!(err.to_string().starts_with("compilation error:\n #0: while compiling type:"));
    }
}
