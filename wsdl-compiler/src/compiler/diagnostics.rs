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

//! Non-fatal findings of the compilation.

use crate::schema::QualifiedName;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use tracing::warn;

/// What kind of declaration was referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReferenceKind {
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
    /// WSDL message.
    Message,
    /// WSDL binding.
    Binding,
    /// WSDL port type.
    PortType,
}

impl Display for ReferenceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Type => write!(f, "type"),
            Self::Element => write!(f, "element"),
            Self::Attribute => write!(f, "attribute"),
            Self::Group => write!(f, "group"),
            Self::AttributeGroup => write!(f, "attribute group"),
            Self::Message => write!(f, "message"),
            Self::Binding => write!(f, "binding"),
            Self::PortType => write!(f, "port type"),
        }
    }
}

/// Reference that was not found in any loaded document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Unresolved {
    /// Referenced name.
    pub reference: QualifiedName,
    /// Kind of the referenced declaration.
    pub kind: ReferenceKind,
    /// Where the reference appears.
    pub context: String,
}

impl Display for Unresolved {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "unresolved {} {} referenced from {}",
            self.kind, self.reference, self.context
        )
    }
}

/// Operation excluded from generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOperation {
    /// Service (or binding / port type) name.
    pub service: String,
    /// Operation name.
    pub operation: String,
    /// Reasons.
    pub problems: Vec<String>,
}

/// Non-fatal findings.
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Unresolved references, sorted and deduplicated.
    pub unresolved: BTreeSet<Unresolved>,
    /// Operations that are excluded from generation.
    pub invalid_operations: Vec<InvalidOperation>,
    /// Listing of known types by namespace (help-on-missing).
    pub known_types: Option<BTreeMap<String, BTreeSet<String>>>,
}

impl Diagnostics {
    /// Nothing to report.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unresolved.is_empty() && self.invalid_operations.is_empty()
    }

    /// Log findings as warnings.
    pub fn report(&self) {
        for unresolved in &self.unresolved {
            warn!("{unresolved}");
        }
        for op in &self.invalid_operations {
            warn!(
                service = %op.service,
                operation = %op.operation,
                "operation is skipped: {}",
                op.problems.join("; ")
            );
        }
    }

    /// Human readable listing of known types, printed when references
    /// cannot be resolved.
    #[must_use]
    pub fn help_on_missing(&self) -> Vec<String> {
        let Some(known) = &self.known_types else {
            return Vec::new();
        };
        if self.unresolved.is_empty() {
            return Vec::new();
        }
        let mut lines = vec!["Known types:".to_string()];
        for (namespace, names) in known {
            let namespace = if namespace.is_empty() {
                "(no namespace)"
            } else {
                namespace
            };
            lines.push(format!("  {namespace}:"));
            lines.extend(names.iter().map(|name| format!("    {name}")));
        }
        lines
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn help_only_when_something_is_missing() {
        let mut diagnostics = Diagnostics {
            known_types: Some(BTreeMap::from([(
                "urn:a".to_string(),
                BTreeSet::from(["A".to_string(), "B".to_string()]),
            )])),
            ..Diagnostics::default()
        };
        assert!(diagnostics.help_on_missing().is_empty());
        diagnostics.unresolved.insert(Unresolved {
            reference: QualifiedName::new("urn:a", "C"),
            kind: ReferenceKind::Type,
            context: "type {urn:a}D".into(),
        });
        assert_eq!(
            diagnostics.help_on_missing(),
            vec!["Known types:", "  urn:a:", "    A", "    B"]
        );
        assert!(!diagnostics.is_empty());
    }
}
