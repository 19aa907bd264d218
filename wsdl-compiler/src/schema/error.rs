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

use wsdlc_core::Locator;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Why a construct failed to parse.
#[derive(Debug, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Document is not valid UTF-8.
    Encoding,
    /// XML is not well formed.
    Xml(String),
    /// Root element is neither `wsdl:definitions` nor `xs:schema`.
    UnexpectedRoot(String),
    /// Required attribute is missing.
    MissingAttribute(&'static str),
    /// One of attributes is required.
    MissingOneOf(&'static str, &'static str),
    /// Attribute has invalid value.
    InvalidAttribute(&'static str, String),
    /// QName value uses an undeclared prefix.
    UnboundPrefix(String),
    /// Required child element is missing.
    MissingChild(&'static str),
}

impl Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Encoding => write!(f, "document is not valid UTF-8"),
            Self::Xml(reason) => write!(f, "malformed XML: {reason}"),
            Self::UnexpectedRoot(name) => {
                write!(f, "unexpected root element {name}, expected wsdl:definitions or xs:schema")
            }
            Self::MissingAttribute(name) => write!(f, "missing required attribute {name}"),
            Self::MissingOneOf(a, b) => write!(f, "one of attributes {a} or {b} is required"),
            Self::InvalidAttribute(name, value) => {
                write!(f, "invalid value of attribute {name}: {value:?}")
            }
            Self::UnboundPrefix(prefix) => write!(f, "unbound namespace prefix {prefix}"),
            Self::MissingChild(name) => write!(f, "missing required element {name}"),
        }
    }
}

/// Fatal parse error of a single document.
#[derive(Debug)]
pub struct SyntaxError {
    /// Document.
    pub locator: Locator,
    /// Construct that failed, e.g. `complexType "Foo"`.
    pub construct: String,
    /// Byte offset of the construct.
    pub position: u64,
    /// Details.
    pub kind: SyntaxErrorKind,
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}: byte {}: {}: {}",
            self.locator, self.position, self.construct, self.kind
        )
    }
}

impl StdError for SyntaxError {}
