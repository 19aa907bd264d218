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

//! Symbol table of top-level declarations across all documents.
//!
//! The same document may be reached through different import paths
//! and identical declarations may be repeated in several documents.
//! Such duplicates are merged; a duplicate with a different structure
//! is a conflict.

use crate::compiler::error::SymbolKind;
use crate::compiler::Error;
use crate::loader::DocumentSet;
use crate::schema::xsd::AttributeDecl;
use crate::schema::xsd::AttributeGroupDecl;
use crate::schema::xsd::ElementDecl;
use crate::schema::xsd::GroupDecl;
use crate::schema::xsd::Schema;
use crate::schema::xsd::TypeDecl;
use crate::schema::QualifiedName;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;
use wsdlc_core::Locator;

/// Declaration with the schema and document it comes from.
pub struct Declared<'a, T> {
    /// Declaration.
    pub decl: &'a T,
    /// Declaring schema.
    pub schema: &'a Schema,
    /// Declaring document.
    pub locator: &'a Locator,
}

impl<T> Clone for Declared<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Declared<'_, T> {}

/// Map from qualified name to declaration.
pub type SymbolMap<'a, T> = BTreeMap<QualifiedName, Declared<'a, T>>;

/// All named top-level declarations.
#[derive(Default)]
pub struct SymbolTable<'a> {
    /// Types.
    pub types: SymbolMap<'a, TypeDecl>,
    /// Elements.
    pub elements: SymbolMap<'a, ElementDecl>,
    /// Attributes.
    pub attributes: SymbolMap<'a, AttributeDecl>,
    /// Model groups.
    pub groups: SymbolMap<'a, GroupDecl>,
    /// Attribute groups.
    pub attribute_groups: SymbolMap<'a, AttributeGroupDecl>,
}

fn register<'a, T: PartialEq>(
    map: &mut SymbolMap<'a, T>,
    kind: SymbolKind,
    name: QualifiedName,
    declared: Declared<'a, T>,
) -> Result<(), Error> {
    match map.entry(name) {
        Entry::Vacant(e) => {
            e.insert(declared);
            Ok(())
        }
        Entry::Occupied(e) if e.get().decl == declared.decl => {
            debug!(%kind, name = %e.key(), first = %e.get().locator, second = %declared.locator, "merged identical declaration");
            Ok(())
        }
        Entry::Occupied(e) => Err(Error::Conflict {
            kind,
            name: e.key().clone(),
            first: e.get().locator.clone(),
            second: declared.locator.clone(),
        }),
    }
}

impl<'a> SymbolTable<'a> {
    /// Register declarations of all schemas of all documents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if the same name is declared twice
    /// with different structure.
    pub fn build(docs: &'a DocumentSet) -> Result<Self, Error> {
        docs.documents()
            .iter()
            .flat_map(|doc| doc.schemas.iter().map(move |schema| (&doc.locator, schema)))
            .try_fold(Self::default(), |mut table, (locator, schema)| {
                let ns = &schema.target_namespace;
                for t in &schema.types {
                    if let Some(name) = t.name() {
                        register(
                            &mut table.types,
                            SymbolKind::Type,
                            QualifiedName::new(ns, name),
                            Declared {
                                decl: t,
                                schema,
                                locator,
                            },
                        )?;
                    }
                }
                for e in &schema.elements {
                    register(
                        &mut table.elements,
                        SymbolKind::Element,
                        QualifiedName::new(ns, &e.name),
                        Declared {
                            decl: e,
                            schema,
                            locator,
                        },
                    )?;
                }
                for a in &schema.attributes {
                    register(
                        &mut table.attributes,
                        SymbolKind::Attribute,
                        QualifiedName::new(ns, &a.name),
                        Declared {
                            decl: a,
                            schema,
                            locator,
                        },
                    )?;
                }
                for g in &schema.groups {
                    register(
                        &mut table.groups,
                        SymbolKind::Group,
                        QualifiedName::new(ns, &g.name),
                        Declared {
                            decl: g,
                            schema,
                            locator,
                        },
                    )?;
                }
                for g in &schema.attribute_groups {
                    register(
                        &mut table.attribute_groups,
                        SymbolKind::AttributeGroup,
                        QualifiedName::new(ns, &g.name),
                        Declared {
                            decl: g,
                            schema,
                            locator,
                        },
                    )?;
                }
                Ok(table)
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema;

    fn doc(uri: &str, text: &str) -> crate::schema::SchemaDocument {
        schema::parse(text.as_bytes(), &Locator::parse(uri).unwrap()).unwrap()
    }

    const A: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
    xmlns:t="urn:t" targetNamespace="urn:t">
  <xs:complexType name="Point">
    <xs:sequence><xs:element name="x" type="xs:int"/></xs:sequence>
  </xs:complexType>
</xs:schema>"#;

    #[test]
    fn identical_declarations_merge() {
        // Same declaration with different prefixes.
        let b = A.replace("xs:", "xsd:").replace("xmlns:xs=", "xmlns:xsd=");
        let docs = DocumentSet::new(vec![
            doc("http://example.com/a.xsd", A),
            doc("http://example.com/b.xsd", &b),
        ]);
        let table = SymbolTable::build(&docs).unwrap();
        assert_eq!(table.types.len(), 1);
        let point = table.types.get(&QualifiedName::new("urn:t", "Point")).unwrap();
        assert_eq!(point.locator.file_name(), "a.xsd");
    }

    #[test]
    fn different_declarations_conflict() {
        let b = A.replace("xs:int", "xs:string");
        let docs = DocumentSet::new(vec![
            doc("http://example.com/a.xsd", A),
            doc("http://example.com/b.xsd", &b),
        ]);
        let Err(Error::Conflict {
            kind,
            name,
            first,
            second,
        }) = SymbolTable::build(&docs)
        else {
            panic!("conflict expected");
        };
        assert_eq!(kind, SymbolKind::Type);
        assert_eq!(name, QualifiedName::new("urn:t", "Point"));
        assert_eq!(first.file_name(), "a.xsd");
        assert_eq!(second.file_name(), "b.xsd");
    }
}
