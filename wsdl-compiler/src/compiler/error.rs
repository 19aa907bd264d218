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

use crate::compiler::TypeId;
use crate::schema::QualifiedName;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use wsdlc_core::Locator;

/// Kind of a top-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// Type.
    Type,
    /// Element.
    Element,
    /// Attribute.
    Attribute,
    /// Model group.
    Group,
    /// Attribute group.
    AttributeGroup,
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Type => write!(f, "type"),
            Self::Element => write!(f, "element"),
            Self::Attribute => write!(f, "attribute"),
            Self::Group => write!(f, "group"),
            Self::AttributeGroup => write!(f, "attribute group"),
        }
    }
}

/// Compilation error kinds.
#[derive(Debug)]
pub enum Error {
    /// Same name declared twice with different structure.
    Conflict {
        /// Kind of declaration.
        kind: SymbolKind,
        /// Declared name.
        name: QualifiedName,
        /// Document with the first declaration.
        first: Locator,
        /// Document with the second declaration.
        second: Locator,
    },
    /// Type derives from itself.
    InheritanceCycle(Vec<TypeId>),
    /// Service filter does not match any service.
    ServiceNotFound {
        /// Requested service.
        name: String,
        /// Services that exist.
        available: Vec<String>,
    },
    /// Error while compiling a type.
    Type(TypeId, Box<Error>),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Conflict {
                kind,
                name,
                first,
                second,
            } => write!(
                f,
                "conflicting declarations of {kind} {name}: {first} and {second}"
            ),
            Self::InheritanceCycle(chain) => {
                write!(f, "inheritance cycle:")?;
                for id in chain {
                    write!(f, " {id} ->")?;
                }
                chain.first().map_or(Ok(()), |id| write!(f, " {id}"))
            }
            Self::ServiceNotFound { name, available } if available.is_empty() => {
                write!(f, "service not found: {name} (document declares no services)")
            }
            Self::ServiceNotFound { name, available } => write!(
                f,
                "service not found: {name} (available: {})",
                available.join(", ")
            ),
            Self::Type(id, err) => write!(f, "while compiling type: {id}\n{err}"),
        }
    }
}
