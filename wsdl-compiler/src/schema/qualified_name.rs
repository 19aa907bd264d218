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

//! Namespace-qualified names and well-known namespaces.

use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// XML Schema namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema";
/// XML Schema instance namespace.
pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// WSDL 1.1 namespace.
pub const WSDL: &str = "http://schemas.xmlsoap.org/wsdl/";
/// WSDL SOAP 1.1 binding extension namespace.
pub const WSDL_SOAP11: &str = "http://schemas.xmlsoap.org/wsdl/soap/";
/// WSDL SOAP 1.2 binding extension namespace.
pub const WSDL_SOAP12: &str = "http://schemas.xmlsoap.org/wsdl/soap12/";
/// SOAP 1.1 encoding namespace.
pub const SOAP11_ENCODING: &str = "http://schemas.xmlsoap.org/soap/encoding/";
/// SOAP 1.2 encoding namespace.
pub const SOAP12_ENCODING: &str = "http://www.w3.org/2003/05/soap-encoding";
/// SOAP 1.1 envelope namespace.
pub const SOAP11_ENVELOPE: &str = "http://schemas.xmlsoap.org/soap/envelope/";
/// SOAP 1.2 envelope namespace.
pub const SOAP12_ENVELOPE: &str = "http://www.w3.org/2003/05/soap-envelope";
/// Namespace bound to the `xml` prefix.
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespaces with schemas built into the compiler. Imports of these
/// namespaces are never fetched.
pub const BUILTIN_NAMESPACES: &[&str] = &[
    XSD,
    XSI,
    WSDL,
    SOAP11_ENCODING,
    SOAP12_ENCODING,
    SOAP11_ENVELOPE,
    SOAP12_ENVELOPE,
    XML,
];

/// Returns true if schema of the namespace is built in.
#[must_use]
pub fn is_builtin_namespace(namespace: &str) -> bool {
    BUILTIN_NAMESPACES.contains(&namespace)
}

/// Namespace URI together with local name. Empty namespace means
/// "no namespace".
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize)]
pub struct QualifiedName {
    /// Namespace URI.
    pub namespace: String,
    /// Local name.
    pub name: String,
}

impl QualifiedName {
    /// Create new qualified name.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Name in the XML Schema namespace.
    #[must_use]
    pub fn is_xsd(&self) -> bool {
        self.namespace == XSD
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.namespace.is_empty() {
            self.name.fmt(f)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.name)
        }
    }
}
