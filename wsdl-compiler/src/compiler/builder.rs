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

//! Type Graph Builder
//!
//! Second pass over the declarations registered in the
//! [`SymbolTable`]: every top-level type and element becomes a node of
//! the [`TypeGraph`] with references resolved against the table.
//!
//! - Anonymous types are hoisted into nodes named after their
//!   declaration path (`Outer/member`, `Outer/@attribute`). The
//!   anonymous type of a top-level element is named after the element.
//! - Group and attribute group references are expanded in place.
//! - Nested model groups are flattened: members of a `choice` become
//!   optional, members of a repeated group become repeated.
//! - Unknown references are recorded and replaced with
//!   [`TypeRef::Unresolved`].

use crate::compiler::diagnostics::ReferenceKind;
use crate::compiler::diagnostics::Unresolved;
use crate::compiler::symbols::SymbolTable;
use crate::compiler::type_graph::BaseType;
use crate::compiler::type_graph::Content;
use crate::compiler::type_graph::Derivation;
use crate::compiler::type_graph::EdgeKind;
use crate::compiler::type_graph::ElementNode;
use crate::compiler::type_graph::IsAbstract;
use crate::compiler::type_graph::Particle;
use crate::compiler::type_graph::ParticleKind;
use crate::compiler::type_graph::TypeKind;
use crate::compiler::BuiltinType;
use crate::compiler::Error;
use crate::compiler::TypeGraph;
use crate::compiler::TypeId;
use crate::compiler::TypeNode;
use crate::compiler::TypeRef;
use crate::schema::qualified_name::is_builtin_namespace;
use crate::schema::qualified_name::SOAP11_ENCODING;
use crate::schema::qualified_name::SOAP12_ENCODING;
use crate::schema::xsd::AttributeDecl;
use crate::schema::xsd::AttributeItem;
use crate::schema::xsd::AttributeUsage;
use crate::schema::xsd::ComplexContent;
use crate::schema::xsd::ComplexType;
use crate::schema::xsd::Compositor;
use crate::schema::xsd::ElementDecl;
use crate::schema::xsd::ElementItem;
use crate::schema::xsd::ElementParticle;
use crate::schema::xsd::GroupItem;
use crate::schema::xsd::MaxOccurs;
use crate::schema::xsd::ModelGroup;
use crate::schema::xsd::Occurs;
use crate::schema::xsd::SimpleDerivation;
use crate::schema::xsd::SimpleType;
use crate::schema::xsd::TypeDecl;
use crate::schema::xsd::TypeUse;
use crate::schema::QualifiedName;
use std::collections::BTreeSet;
use std::collections::HashMap;
use tracing::debug;
use tracing::info;
use wsdlc_core::Locator;

/// Namespace and document of the declaration being compiled.
#[derive(Clone, Copy)]
struct Scope<'s> {
    namespace: &'s str,
    origin: &'s Locator,
}

/// Occurrence of a member of a group that itself occurs `group` times.
const fn combine(group: Occurs, member: Occurs, optional: bool) -> Occurs {
    Occurs {
        min: if optional {
            0
        } else {
            group.min.saturating_mul(member.min)
        },
        max: match (group.max, member.max) {
            (MaxOccurs::Bounded(a), MaxOccurs::Bounded(b)) => MaxOccurs::Bounded(a.saturating_mul(b)),
            _ => MaxOccurs::Unbounded,
        },
    }
}

fn is_soap_array(name: &QualifiedName) -> bool {
    name.name == "Array" && matches!(name.namespace.as_str(), SOAP11_ENCODING | SOAP12_ENCODING)
}

/// Builder of the type graph.
pub struct Builder<'a> {
    symbols: &'a SymbolTable<'a>,
    graph: TypeGraph,
    anonymous: HashMap<TypeId, &'a TypeDecl>,
    unresolved: BTreeSet<Unresolved>,
}

impl<'a> Builder<'a> {
    /// Build graph from all registered declarations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InheritanceCycle`] if a type derives from
    /// itself.
    pub fn build(symbols: &'a SymbolTable<'a>) -> Result<(TypeGraph, BTreeSet<Unresolved>), Error> {
        let mut builder = Self {
            symbols,
            graph: TypeGraph::default(),
            anonymous: HashMap::new(),
            unresolved: BTreeSet::new(),
        };
        for (name, declared) in &symbols.types {
            let scope = Scope {
                namespace: &name.namespace,
                origin: declared.locator,
            };
            builder.add_type(TypeId::Named(name.clone()), declared.decl, scope);
        }
        for (name, declared) in &symbols.elements {
            let scope = Scope {
                namespace: &name.namespace,
                origin: declared.locator,
            };
            let type_ref = builder.element_type(name, declared.decl, scope);
            builder.graph.elements.insert(
                name.clone(),
                ElementNode {
                    name: name.clone(),
                    type_ref,
                    nillable: declared.decl.nillable,
                    is_abstract: declared.decl.is_abstract,
                    substitution_group: declared.decl.substitution_group.clone(),
                    documentation: declared.decl.documentation.clone(),
                },
            );
        }
        builder.check_inheritance()?;
        info!(
            types = builder.graph.types.len(),
            elements = builder.graph.elements.len(),
            unresolved = builder.unresolved.len(),
            "type graph built"
        );
        Ok((builder.graph, builder.unresolved))
    }

    fn add_type(&mut self, id: TypeId, decl: &'a TypeDecl, scope: Scope<'_>) -> TypeRef {
        if !self.graph.types.contains_key(&id) {
            let path = id.qualified_name().name.clone();
            let node = match decl {
                TypeDecl::Simple(v) => self.simple_type(id.clone(), v, &path, scope),
                TypeDecl::Complex(v) => self.complex_type(id.clone(), v, &path, scope),
            };
            self.graph.types.insert(id.clone(), node);
        }
        TypeRef::Node(id)
    }

    /// Hoist inline declaration. A path that is already taken by a
    /// different declaration gets a numeric suffix.
    fn add_anonymous(&mut self, path: String, decl: &'a TypeDecl, scope: Scope<'_>) -> TypeRef {
        let mut name = QualifiedName::new(scope.namespace, path.clone());
        let mut n = 1;
        loop {
            let id = TypeId::Anonymous(name.clone());
            match self.anonymous.get(&id) {
                Some(existing) if std::ptr::eq(*existing, decl) => return TypeRef::Node(id),
                Some(_) => {
                    n += 1;
                    name.name = format!("{path}{n}");
                }
                None => {
                    self.anonymous.insert(id.clone(), decl);
                    return self.add_type(id, decl, scope);
                }
            }
        }
    }

    fn unresolved(&mut self, name: &QualifiedName, kind: ReferenceKind, context: &str) -> TypeRef {
        debug!(reference = %name, %kind, context, "unresolved reference");
        self.unresolved.insert(Unresolved {
            reference: name.clone(),
            kind,
            context: context.to_string(),
        });
        TypeRef::Unresolved(name.clone())
    }

    fn resolve_type(&mut self, name: &QualifiedName, context: &str) -> TypeRef {
        if let Some(builtin) = BuiltinType::from_qualified_name(name) {
            TypeRef::Builtin(builtin)
        } else if self.symbols.types.contains_key(name) {
            TypeRef::Node(TypeId::Named(name.clone()))
        } else {
            self.unresolved(name, ReferenceKind::Type, context)
        }
    }

    fn type_use(
        &mut self,
        type_use: Option<&'a TypeUse>,
        default: BuiltinType,
        path: String,
        scope: Scope<'_>,
        context: &str,
    ) -> TypeRef {
        match type_use {
            None => TypeRef::Builtin(default),
            Some(TypeUse::Named(name)) => self.resolve_type(name, context),
            Some(TypeUse::Inline(decl)) => self.add_anonymous(path, decl, scope),
        }
    }

    fn is_complex(&self, type_ref: &TypeRef) -> bool {
        match type_ref {
            TypeRef::Node(TypeId::Named(name)) => self
                .symbols
                .types
                .get(name)
                .is_some_and(|declared| matches!(declared.decl, TypeDecl::Complex(_))),
            _ => false,
        }
    }

    fn element_type(
        &mut self,
        name: &QualifiedName,
        decl: &'a ElementDecl,
        scope: Scope<'_>,
    ) -> TypeRef {
        self.type_use(
            decl.type_use.as_ref(),
            BuiltinType::AnyType,
            name.name.clone(),
            scope,
            &format!("element {name}"),
        )
    }

    fn simple_type(
        &mut self,
        id: TypeId,
        decl: &'a SimpleType,
        path: &str,
        scope: Scope<'_>,
    ) -> TypeNode {
        let context = id.to_string();
        let kind = match &decl.derivation {
            SimpleDerivation::Restriction { base, facets } => {
                let base = self.type_use(
                    Some(base),
                    BuiltinType::AnySimpleType,
                    format!("{path}/base"),
                    scope,
                    &context,
                );
                if facets.enumeration.is_empty() {
                    TypeKind::Simple {
                        base,
                        facets: facets.others.clone(),
                    }
                } else {
                    TypeKind::Enumeration {
                        base,
                        values: facets.enumeration.clone(),
                    }
                }
            }
            SimpleDerivation::List { item } => TypeKind::List {
                item: self.type_use(
                    Some(item),
                    BuiltinType::AnySimpleType,
                    format!("{path}/item"),
                    scope,
                    &context,
                ),
            },
            // Unions are represented by their lexical form.
            SimpleDerivation::Union { .. } => TypeKind::Simple {
                base: TypeRef::Builtin(BuiltinType::String),
                facets: Vec::new(),
            },
        };
        TypeNode {
            id,
            kind,
            base: None,
            is_abstract: IsAbstract::new(false),
            documentation: decl.documentation.clone(),
            origin: scope.origin.clone(),
        }
    }

    fn complex_type(
        &mut self,
        id: TypeId,
        decl: &'a ComplexType,
        path: &str,
        scope: Scope<'_>,
    ) -> TypeNode {
        let context = id.to_string();
        let mut base = None;
        let mut content = Content::Empty;
        let mut soap_array = false;
        match &decl.content {
            ComplexContent::Empty => {}
            ComplexContent::Group(group) => {
                content = self.model_group(group, path, scope, &context);
            }
            ComplexContent::Extension { base: name, group } => {
                let type_ref = self.resolve_type(name, &context);
                if type_ref != TypeRef::Builtin(BuiltinType::AnyType) {
                    base = Some(BaseType {
                        type_ref,
                        derivation: Derivation::Extension,
                    });
                }
                if let Some(group) = group {
                    content = self.model_group(group, path, scope, &context);
                }
            }
            ComplexContent::Restriction { base: name, .. } if is_soap_array(name) => {
                soap_array = true;
                let item = decl.array_item.as_ref().map_or(
                    TypeRef::Builtin(BuiltinType::AnyType),
                    |item| self.resolve_type(item, &context),
                );
                content = Content::Sequence(vec![Particle {
                    name: "item".into(),
                    namespace: None,
                    kind: ParticleKind::Element,
                    type_ref: item,
                    occurs: Occurs {
                        min: 0,
                        max: MaxOccurs::Unbounded,
                    },
                    nillable: false,
                    edge: EdgeKind::ByValue,
                    documentation: None,
                }]);
            }
            ComplexContent::Restriction { base: name, group } => {
                let type_ref = self.resolve_type(name, &context);
                if type_ref != TypeRef::Builtin(BuiltinType::AnyType) {
                    base = Some(BaseType {
                        type_ref,
                        derivation: Derivation::Restriction,
                    });
                }
                if let Some(group) = group {
                    content = self.model_group(group, path, scope, &context);
                }
            }
            ComplexContent::SimpleExtension { base: name } => {
                let type_ref = self.resolve_type(name, &context);
                if self.is_complex(&type_ref) {
                    base = Some(BaseType {
                        type_ref,
                        derivation: Derivation::Extension,
                    });
                } else {
                    content = Content::SimpleValue(type_ref);
                }
            }
            ComplexContent::SimpleRestriction { base: name, .. } => {
                let type_ref = self.resolve_type(name, &context);
                if self.is_complex(&type_ref) {
                    base = Some(BaseType {
                        type_ref: type_ref.clone(),
                        derivation: Derivation::Restriction,
                    });
                }
                content = Content::SimpleValue(type_ref);
            }
        }
        let mut attributes = Vec::new();
        if !soap_array {
            self.attributes(
                &decl.attributes,
                path,
                scope,
                &context,
                &mut attributes,
                &mut Vec::new(),
            );
        }
        TypeNode {
            id,
            kind: TypeKind::Complex {
                content,
                attributes,
                mixed: decl.mixed,
                any_attribute: decl.any_attribute,
            },
            base,
            is_abstract: IsAbstract::new(decl.is_abstract),
            documentation: decl.documentation.clone(),
            origin: scope.origin.clone(),
        }
    }

    fn model_group(
        &mut self,
        group: &'a ModelGroup,
        path: &str,
        scope: Scope<'_>,
        context: &str,
    ) -> Content {
        let mut particles = Vec::new();
        self.flatten(
            group,
            Occurs::ONCE,
            false,
            path,
            scope,
            context,
            &mut particles,
            &mut Vec::new(),
        );
        match group.compositor {
            Compositor::Sequence => Content::Sequence(particles),
            Compositor::Choice => Content::Choice(particles),
            Compositor::All => Content::All(particles),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn flatten(
        &mut self,
        group: &'a ModelGroup,
        outer: Occurs,
        optional: bool,
        path: &str,
        scope: Scope<'_>,
        context: &str,
        out: &mut Vec<Particle>,
        visiting: &mut Vec<QualifiedName>,
    ) {
        let symbols = self.symbols;
        let occurs = combine(outer, group.occurs, optional);
        let optional = optional || group.compositor == Compositor::Choice;
        for item in &group.items {
            match item {
                GroupItem::Element(particle) => {
                    let mut particle = self.element_particle(particle, path, scope, context);
                    particle.occurs = combine(occurs, particle.occurs, optional);
                    out.push(particle);
                }
                GroupItem::Group(inner) => {
                    self.flatten(inner, occurs, optional, path, scope, context, out, visiting);
                }
                GroupItem::GroupRef {
                    reference,
                    occurs: ref_occurs,
                } => {
                    if visiting.contains(reference) {
                        debug!(group = %reference, context, "recursive group reference ignored");
                        continue;
                    }
                    let Some(declared) = symbols.groups.get(reference) else {
                        self.unresolved(reference, ReferenceKind::Group, context);
                        continue;
                    };
                    let group_scope = Scope {
                        namespace: &reference.namespace,
                        origin: declared.locator,
                    };
                    visiting.push(reference.clone());
                    self.flatten(
                        &declared.decl.group,
                        combine(occurs, *ref_occurs, optional),
                        optional,
                        &declared.decl.name,
                        group_scope,
                        context,
                        out,
                        visiting,
                    );
                    visiting.pop();
                }
                GroupItem::Any { occurs: any_occurs } => out.push(Particle {
                    name: "any".into(),
                    namespace: None,
                    kind: ParticleKind::Element,
                    type_ref: TypeRef::Builtin(BuiltinType::AnyType),
                    occurs: combine(occurs, *any_occurs, optional),
                    nillable: false,
                    edge: EdgeKind::ByValue,
                    documentation: None,
                }),
            }
        }
    }

    fn element_particle(
        &mut self,
        particle: &'a ElementParticle,
        path: &str,
        scope: Scope<'_>,
        context: &str,
    ) -> Particle {
        let symbols = self.symbols;
        match &particle.element {
            ElementItem::Local(decl) => Particle {
                name: decl.name.clone(),
                namespace: decl.namespace.clone(),
                kind: ParticleKind::Element,
                type_ref: self.type_use(
                    decl.type_use.as_ref(),
                    BuiltinType::AnyType,
                    format!("{path}/{}", decl.name),
                    scope,
                    context,
                ),
                occurs: particle.occurs,
                nillable: decl.nillable,
                edge: EdgeKind::ByValue,
                documentation: decl.documentation.clone(),
            },
            ElementItem::Ref(name) => {
                let (type_ref, nillable, documentation) = match symbols.elements.get(name) {
                    Some(declared) => {
                        let element_scope = Scope {
                            namespace: &name.namespace,
                            origin: declared.locator,
                        };
                        (
                            self.element_type(name, declared.decl, element_scope),
                            declared.decl.nillable,
                            declared.decl.documentation.clone(),
                        )
                    }
                    None => (
                        self.unresolved(name, ReferenceKind::Element, context),
                        false,
                        None,
                    ),
                };
                Particle {
                    name: name.name.clone(),
                    namespace: Some(name.namespace.clone()),
                    kind: ParticleKind::Element,
                    type_ref,
                    occurs: particle.occurs,
                    nillable,
                    edge: EdgeKind::ByValue,
                    documentation,
                }
            }
        }
    }

    fn attribute_particle(
        &mut self,
        decl: &'a AttributeDecl,
        usage: AttributeUsage,
        path: String,
        scope: Scope<'_>,
        context: &str,
    ) -> Particle {
        Particle {
            name: decl.name.clone(),
            namespace: decl.namespace.clone(),
            kind: ParticleKind::Attribute,
            type_ref: self.type_use(
                decl.type_use.as_ref(),
                BuiltinType::AnySimpleType,
                path,
                scope,
                context,
            ),
            occurs: Occurs {
                min: u32::from(usage == AttributeUsage::Required),
                max: MaxOccurs::Bounded(1),
            },
            nillable: false,
            edge: EdgeKind::ByValue,
            documentation: None,
        }
    }

    fn attributes(
        &mut self,
        items: &'a [AttributeItem],
        path: &str,
        scope: Scope<'_>,
        context: &str,
        out: &mut Vec<Particle>,
        visiting: &mut Vec<QualifiedName>,
    ) {
        let symbols = self.symbols;
        for item in items {
            match item {
                AttributeItem::Local(decl) => {
                    if decl.usage != AttributeUsage::Prohibited {
                        let path = format!("{path}/@{}", decl.name);
                        out.push(self.attribute_particle(decl, decl.usage, path, scope, context));
                    }
                }
                AttributeItem::Ref { usage, .. } if *usage == AttributeUsage::Prohibited => {}
                AttributeItem::Ref { reference, usage } => {
                    if let Some(declared) = symbols.attributes.get(reference) {
                        let scope = Scope {
                            namespace: &reference.namespace,
                            origin: declared.locator,
                        };
                        let path = format!("@{}", reference.name);
                        out.push(self.attribute_particle(declared.decl, *usage, path, scope, context));
                    } else {
                        let type_ref = if is_builtin_namespace(&reference.namespace) {
                            TypeRef::Builtin(BuiltinType::String)
                        } else {
                            self.unresolved(reference, ReferenceKind::Attribute, context)
                        };
                        out.push(Particle {
                            name: reference.name.clone(),
                            namespace: Some(reference.namespace.clone()),
                            kind: ParticleKind::Attribute,
                            type_ref,
                            occurs: Occurs {
                                min: u32::from(*usage == AttributeUsage::Required),
                                max: MaxOccurs::Bounded(1),
                            },
                            nillable: false,
                            edge: EdgeKind::ByValue,
                            documentation: None,
                        });
                    }
                }
                AttributeItem::GroupRef(reference) => {
                    if visiting.contains(reference) {
                        continue;
                    }
                    let Some(declared) = symbols.attribute_groups.get(reference) else {
                        self.unresolved(reference, ReferenceKind::AttributeGroup, context);
                        continue;
                    };
                    let group_scope = Scope {
                        namespace: &reference.namespace,
                        origin: declared.locator,
                    };
                    visiting.push(reference.clone());
                    self.attributes(
                        &declared.decl.attributes,
                        &declared.decl.name,
                        group_scope,
                        context,
                        out,
                        visiting,
                    );
                    visiting.pop();
                }
            }
        }
    }

    fn check_inheritance(&self) -> Result<(), Error> {
        for (id, node) in &self.graph.types {
            let mut chain = vec![id.clone()];
            let mut next = node.base.as_ref().and_then(|b| b.type_ref.node());
            while let Some(current) = next {
                if current == id {
                    return Err(Error::InheritanceCycle(chain));
                }
                if chain.contains(current) {
                    break;
                }
                chain.push(current.clone());
                next = self
                    .graph
                    .types
                    .get(current)
                    .and_then(|n| n.base.as_ref())
                    .and_then(|b| b.type_ref.node());
            }
        }
        Ok(())
    }
}
