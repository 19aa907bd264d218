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

//! Type Graph
//!
//! Merged, namespace-qualified representation of all types declared by
//! the loaded documents. Nodes are keyed by [`TypeId`]; members refer
//! to other nodes by identifier together with an [`EdgeKind`], so
//! recursive and mutually recursive types need no shared ownership.
//! Cycle breaking only rewrites edge kinds.

use crate::compiler::BuiltinType;
use crate::schema::xsd::Facet;
use crate::schema::xsd::Occurs;
use crate::schema::QualifiedName;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use tagged_types::TaggedType;
use wsdlc_core::Locator;

/// Identity of a type node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeId {
    /// Named top-level type.
    Named(QualifiedName),
    /// Anonymous type. The name is the path of the containing
    /// declarations, e.g. `Outer/member`.
    Anonymous(QualifiedName),
}

impl TypeId {
    /// Qualified name or declaration path.
    #[must_use]
    pub const fn qualified_name(&self) -> &QualifiedName {
        match self {
            Self::Named(v) | Self::Anonymous(v) => v,
        }
    }

    /// Namespace of the type.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.qualified_name().namespace
    }

    /// Name that generated code is derived from: the type name or the
    /// last segment of the anonymous type path.
    #[must_use]
    pub fn local_name(&self) -> &str {
        match self {
            Self::Named(v) => &v.name,
            Self::Anonymous(v) => v
                .name
                .rsplit('/')
                .next()
                .unwrap_or(&v.name)
                .trim_start_matches('@'),
        }
    }
}

impl Display for TypeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Named(v) => v.fmt(f),
            Self::Anonymous(v) => write!(f, "{v} (anonymous)"),
        }
    }
}

/// Reference to a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    /// Node of the graph.
    Node(TypeId),
    /// Builtin type.
    Builtin(BuiltinType),
    /// Reference that was not found in any loaded document.
    Unresolved(QualifiedName),
}

impl TypeRef {
    /// Referenced node.
    #[must_use]
    pub const fn node(&self) -> Option<&TypeId> {
        match self {
            Self::Node(id) => Some(id),
            Self::Builtin(_) | Self::Unresolved(_) => None,
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Node(id) => id.fmt(f),
            Self::Builtin(v) => write!(f, "builtin {v:?}"),
            Self::Unresolved(v) => write!(f, "unresolved {v}"),
        }
    }
}

/// How a member holds its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    /// Value is stored inline; the type must be complete first.
    ByValue,
    /// Value is stored through an indirection; a forward declaration
    /// is enough.
    ByReference,
}

/// Whether particle is an element or an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    /// Child element.
    Element,
    /// Attribute.
    Attribute,
}

/// Named element or attribute occurrence.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Local name.
    pub name: String,
    /// Namespace of the name (`None` for unqualified locals).
    pub namespace: Option<String>,
    /// Element or attribute.
    pub kind: ParticleKind,
    /// Type.
    pub type_ref: TypeRef,
    /// Occurrence.
    pub occurs: Occurs,
    /// `nillable`.
    pub nillable: bool,
    /// Storage.
    pub edge: EdgeKind,
    /// Documentation.
    pub documentation: Option<String>,
}

impl Particle {
    /// Particle can be absent.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.occurs.is_optional() || self.nillable
    }

    /// Particle can appear more than once.
    #[must_use]
    pub const fn is_repeated(&self) -> bool {
        self.occurs.is_repeated()
    }
}

/// Element content of a complex type.
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    /// No element content.
    Empty,
    /// Ordered members.
    Sequence(Vec<Particle>),
    /// Exactly one of members; every member is optional.
    Choice(Vec<Particle>),
    /// Members in any order.
    All(Vec<Particle>),
    /// Simple content value.
    SimpleValue(TypeRef),
}

impl Content {
    /// Element particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        match self {
            Self::Sequence(v) | Self::Choice(v) | Self::All(v) => v,
            Self::Empty | Self::SimpleValue(_) => &[],
        }
    }

    fn particles_mut(&mut self) -> &mut [Particle] {
        match self {
            Self::Sequence(v) | Self::Choice(v) | Self::All(v) => v,
            Self::Empty | Self::SimpleValue(_) => &mut [],
        }
    }
}

/// Kind of a type node.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeKind {
    /// Restriction of a simple type.
    Simple {
        /// Restricted type.
        base: TypeRef,
        /// Facets other than enumeration.
        facets: Vec<Facet>,
    },
    /// Closed set of literal values.
    Enumeration {
        /// Type of the literals.
        base: TypeRef,
        /// Literals in declaration order.
        values: Vec<String>,
    },
    /// Whitespace-separated list.
    List {
        /// Item type.
        item: TypeRef,
    },
    /// Complex type.
    Complex {
        /// Element content.
        content: Content,
        /// Attributes.
        attributes: Vec<Particle>,
        /// `mixed`.
        mixed: bool,
        /// `xs:anyAttribute` is present.
        any_attribute: bool,
    },
}

/// How a type derives from its base.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Derivation {
    /// Adds members to the base.
    Extension,
    /// Restates the base.
    Restriction,
}

/// Base type of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseType {
    /// Base.
    pub type_ref: TypeRef,
    /// Derivation method.
    pub derivation: Derivation,
}

/// Type cannot be instantiated directly.
pub type IsAbstract = TaggedType<bool, IsAbstractTag>;
#[doc(hidden)]
#[derive(tagged_types::Tag)]
#[implement(Clone, Copy, PartialEq, Eq)]
#[transparent(Debug)]
#[capability(inner_access)]
pub enum IsAbstractTag {}

/// Kind of dependency between nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DependencyKind {
    /// Inherited type.
    Base,
    /// Member at position (elements first, then attributes).
    Member(usize, EdgeKind),
    /// List item.
    ListItem,
    /// Restricted simple type.
    SimpleBase,
    /// Value of simple content.
    Value,
}

impl DependencyKind {
    /// Dependent type needs the complete definition of the target.
    #[must_use]
    pub const fn is_by_value(self) -> bool {
        !matches!(self, Self::Member(_, EdgeKind::ByReference))
    }
}

/// Node of the type graph.
#[derive(Clone, Debug)]
pub struct TypeNode {
    /// Identity.
    pub id: TypeId,
    /// Kind.
    pub kind: TypeKind,
    /// Base type.
    pub base: Option<BaseType>,
    /// `abstract`.
    pub is_abstract: IsAbstract,
    /// Documentation.
    pub documentation: Option<String>,
    /// Declaring document.
    pub origin: Locator,
}

impl TypeNode {
    /// Element members followed by attribute members.
    pub fn members(&self) -> impl Iterator<Item = &Particle> {
        let (content, attributes): (&[Particle], &[Particle]) = match &self.kind {
            TypeKind::Complex {
                content,
                attributes,
                ..
            } => (content.particles(), attributes.as_slice()),
            _ => (&[], &[]),
        };
        content.iter().chain(attributes)
    }

    /// Member by position in [`Self::members`] order.
    pub fn member_mut(&mut self, position: usize) -> Option<&mut Particle> {
        match &mut self.kind {
            TypeKind::Complex {
                content,
                attributes,
                ..
            } => {
                let particles = content.particles_mut();
                let count = particles.len();
                if position < count {
                    particles.get_mut(position)
                } else {
                    attributes.get_mut(position - count)
                }
            }
            _ => None,
        }
    }

    /// All outgoing references of the node.
    #[must_use]
    pub fn dependencies(&self) -> Vec<(DependencyKind, &TypeRef)> {
        let mut result = Vec::new();
        if let Some(base) = &self.base {
            if base.derivation == Derivation::Extension {
                result.push((DependencyKind::Base, &base.type_ref));
            }
        }
        match &self.kind {
            TypeKind::Simple { base, .. } | TypeKind::Enumeration { base, .. } => {
                result.push((DependencyKind::SimpleBase, base));
            }
            TypeKind::List { item } => result.push((DependencyKind::ListItem, item)),
            TypeKind::Complex { content, .. } => {
                if let Content::SimpleValue(value) = content {
                    result.push((DependencyKind::Value, value));
                }
                result.extend(self.members().enumerate().map(|(position, member)| {
                    (DependencyKind::Member(position, member.edge), &member.type_ref)
                }));
            }
        }
        result
    }

    /// References to unresolved names.
    pub fn unresolved(&self) -> impl Iterator<Item = &QualifiedName> {
        // Extension bases are already listed as dependencies.
        let base = self
            .base
            .iter()
            .filter(|b| b.derivation != Derivation::Extension)
            .map(|b| &b.type_ref);
        self.dependencies()
            .into_iter()
            .map(|(_, r)| r)
            .chain(base)
            .filter_map(|r| match r {
                TypeRef::Unresolved(name) => Some(name),
                _ => None,
            })
            .collect::<Vec<_>>()
            .into_iter()
    }
}

/// Top-level element.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementNode {
    /// Name.
    pub name: QualifiedName,
    /// Type.
    pub type_ref: TypeRef,
    /// `nillable`.
    pub nillable: bool,
    /// `abstract`.
    pub is_abstract: bool,
    /// `substitutionGroup`.
    pub substitution_group: Option<QualifiedName>,
    /// Documentation.
    pub documentation: Option<String>,
}

/// Merged type graph.
#[derive(Clone, Debug, Default)]
pub struct TypeGraph {
    /// Types by identity.
    pub types: BTreeMap<TypeId, TypeNode>,
    /// Top-level elements.
    pub elements: BTreeMap<QualifiedName, ElementNode>,
}

impl TypeGraph {
    /// Find node.
    #[must_use]
    pub fn get(&self, id: &TypeId) -> Option<&TypeNode> {
        self.types.get(id)
    }

    /// Types that directly or transitively reference an unresolved
    /// name.
    #[must_use]
    pub fn tainted(&self) -> BTreeSet<TypeId> {
        let mut tainted: BTreeSet<TypeId> = self
            .types
            .values()
            .filter(|node| node.unresolved().next().is_some())
            .map(|node| node.id.clone())
            .collect();
        loop {
            let newly = self
                .types
                .values()
                .filter(|node| !tainted.contains(&node.id))
                .filter(|node| {
                    let base = node.base.iter().map(|b| &b.type_ref);
                    node.dependencies()
                        .into_iter()
                        .map(|(_, r)| r)
                        .chain(base)
                        .any(|r| r.node().is_some_and(|id| tainted.contains(id)))
                })
                .map(|node| node.id.clone())
                .collect::<Vec<_>>();
            if newly.is_empty() {
                break tainted;
            }
            tainted.extend(newly);
        }
    }

    /// Types reachable from `roots` following every kind of reference.
    #[must_use]
    pub fn reachable<'a>(&self, roots: impl IntoIterator<Item = &'a TypeId>) -> BTreeSet<TypeId> {
        let mut visited = BTreeSet::new();
        let mut stack = roots.into_iter().cloned().collect::<Vec<_>>();
        while let Some(id) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            if let Some(node) = self.types.get(&id) {
                let base = node.base.iter().map(|b| &b.type_ref);
                stack.extend(
                    node.dependencies()
                        .into_iter()
                        .map(|(_, r)| r)
                        .chain(base)
                        .filter_map(TypeRef::node)
                        .filter(|t| !visited.contains(*t))
                        .cloned(),
                );
            }
        }
        visited
    }
}
