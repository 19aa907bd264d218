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

//! Dependency Orderer
//!
//! Linearizes the type graph so that every type is emitted after the
//! types it contains by value. By-value cycles are broken by rewriting
//! one member edge of every cycle to [`EdgeKind::ByReference`] until
//! the by-value graph is acyclic.

use crate::compiler::type_graph::DependencyKind;
use crate::compiler::type_graph::EdgeKind;
use crate::compiler::Error;
use crate::compiler::NamespaceMap;
use crate::compiler::TypeGraph;
use crate::compiler::TypeId;
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use tracing::debug;
use tracing::warn;

/// Member edge that was rewritten to break a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenEdge {
    /// Type containing the member.
    pub source: TypeId,
    /// Type of the member.
    pub target: TypeId,
    /// Member position (elements first, then attributes).
    pub position: usize,
}

/// Graph with rewritten edges and emission order.
#[derive(Debug)]
pub struct Ordered {
    /// Graph where by-value edges are acyclic.
    pub graph: TypeGraph,
    /// All types, dependencies first.
    pub order: Vec<TypeId>,
    /// Edges rewritten to references.
    pub rewritten: Vec<RewrittenEdge>,
}

/// Lexical key of a type: namespace code and name.
fn type_key<'a>(id: &'a TypeId, namespaces: &'a NamespaceMap) -> (&'a str, &'a str) {
    let namespace = id.namespace();
    (
        namespaces.code_for(namespace).unwrap_or(namespace),
        &id.qualified_name().name,
    )
}

/// By-value edges between nodes of the graph: `(dependent, dependency, kind)`.
fn by_value_edges(graph: &TypeGraph) -> Vec<(&TypeId, &TypeId, DependencyKind)> {
    graph
        .types
        .values()
        .flat_map(|node| {
            node.dependencies()
                .into_iter()
                .filter(|(kind, _)| kind.is_by_value())
                .filter_map(|(kind, target)| {
                    let target = target.node()?;
                    let (target, _) = graph.types.get_key_value(target)?;
                    Some((&node.id, target, kind))
                })
        })
        .collect()
}

/// Find one edge to rewrite in every by-value cycle.
fn find_rewrites(
    graph: &TypeGraph,
    namespaces: &NamespaceMap,
) -> Result<Vec<RewrittenEdge>, Error> {
    let edges = by_value_edges(graph);
    let mut g = DiGraphMap::<&TypeId, ()>::new();
    for id in graph.types.keys() {
        g.add_node(id);
    }
    for (source, target, _) in &edges {
        g.add_edge(*source, *target, ());
    }
    tarjan_scc(&g)
        .into_iter()
        .filter(|scc| scc.len() > 1 || g.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let component = scc.iter().copied().collect::<BTreeSet<_>>();
            edges
                .iter()
                .filter(|(source, target, _)| {
                    component.contains(source) && component.contains(target)
                })
                .filter_map(|(source, target, kind)| match kind {
                    DependencyKind::Member(position, EdgeKind::ByValue) => {
                        Some((*source, *target, *position))
                    }
                    _ => None,
                })
                .min_by(|a, b| {
                    (type_key(a.0, namespaces), type_key(a.1, namespaces), a.2).cmp(&(
                        type_key(b.0, namespaces),
                        type_key(b.1, namespaces),
                        b.2,
                    ))
                })
                .map(|(source, target, position)| RewrittenEdge {
                    source: source.clone(),
                    target: target.clone(),
                    position,
                })
                .ok_or_else(|| Error::InheritanceCycle(component.into_iter().cloned().collect()))
        })
        .collect()
}

/// Break by-value cycles and produce emission order.
///
/// # Errors
///
/// Returns [`Error::InheritanceCycle`] if a cycle does not contain any
/// member edge that could be rewritten.
pub fn order(mut graph: TypeGraph, namespaces: &NamespaceMap) -> Result<Ordered, Error> {
    let mut rewritten = Vec::new();
    loop {
        let rewrites = find_rewrites(&graph, namespaces)?;
        if rewrites.is_empty() {
            break;
        }
        for edge in rewrites {
            if let Some(member) = graph
                .types
                .get_mut(&edge.source)
                .and_then(|node| node.member_mut(edge.position))
            {
                warn!(
                    source = %edge.source,
                    target = %edge.target,
                    member = %member.name,
                    "cycle is broken by storing member by reference"
                );
                member.edge = EdgeKind::ByReference;
            }
            rewritten.push(edge);
        }
    }
    let order = topological_order(&graph, namespaces);
    debug!(types = order.len(), rewritten = rewritten.len(), "types ordered");
    Ok(Ordered {
        graph,
        order,
        rewritten,
    })
}

/// Kahn's algorithm with lexically ordered ready set. By-value edges
/// must be acyclic.
fn topological_order(graph: &TypeGraph, namespaces: &NamespaceMap) -> Vec<TypeId> {
    let mut pending: BTreeMap<&TypeId, BTreeSet<&TypeId>> =
        graph.types.keys().map(|id| (id, BTreeSet::new())).collect();
    let mut dependents: BTreeMap<&TypeId, BTreeSet<&TypeId>> = BTreeMap::new();
    for (source, target, _) in by_value_edges(graph) {
        if source != target {
            pending.entry(source).or_default().insert(target);
            dependents.entry(target).or_default().insert(source);
        }
    }
    let mut ready = pending
        .iter()
        .filter(|(_, deps)| deps.is_empty())
        .map(|(id, _)| (type_key(id, namespaces), *id))
        .collect::<BTreeSet<_>>();
    let mut order = Vec::with_capacity(graph.types.len());
    while let Some((_, id)) = ready.pop_first() {
        order.push(id.clone());
        for dependent in dependents.get(id).into_iter().flatten() {
            if let Some(deps) = pending.get_mut(dependent) {
                deps.remove(id);
                if deps.is_empty() {
                    ready.insert((type_key(dependent, namespaces), *dependent));
                }
            }
        }
    }
    order
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compiler::builder::Builder;
    use crate::compiler::symbols::SymbolTable;
    use crate::loader::DocumentSet;
    use crate::schema;
    use crate::schema::QualifiedName;
    use wsdlc_core::Locator;

    const NS: &str = "urn:test";

    fn graph(body: &str) -> (TypeGraph, NamespaceMap) {
        let text = format!(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:t="urn:test"
                targetNamespace="urn:test" elementFormDefault="qualified">{body}</xs:schema>"#
        );
        let locator = Locator::parse("http://example.com/test.xsd").unwrap();
        let docs = DocumentSet::new(vec![schema::parse(text.as_bytes(), &locator).unwrap()]);
        let symbols = SymbolTable::build(&docs).unwrap();
        let (graph, _) = Builder::build(&symbols).unwrap();
        let namespaces = NamespaceMap::build([NS], &BTreeMap::new());
        (graph, namespaces)
    }

    fn named(name: &str) -> TypeId {
        TypeId::Named(QualifiedName::new(NS, name))
    }

    fn names(order: &[TypeId]) -> Vec<&str> {
        order.iter().map(|id| id.qualified_name().name.as_str()).collect()
    }

    fn edge(graph: &TypeGraph, id: &TypeId, position: usize) -> EdgeKind {
        graph.get(id).unwrap().members().nth(position).unwrap().edge
    }

    #[test]
    fn dependencies_come_first() {
        let (graph, namespaces) = graph(
            r#"<xs:complexType name="A"><xs:sequence>
                 <xs:element name="b" type="t:B"/><xs:element name="c" type="t:C"/>
               </xs:sequence></xs:complexType>
               <xs:complexType name="B"><xs:sequence>
                 <xs:element name="c" type="t:C"/>
               </xs:sequence></xs:complexType>
               <xs:complexType name="C"><xs:complexContent><xs:extension base="t:D"/></xs:complexContent></xs:complexType>
               <xs:complexType name="D"><xs:sequence>
                 <xs:element name="v" type="t:Code"/>
               </xs:sequence></xs:complexType>
               <xs:simpleType name="Code"><xs:restriction base="xs:string"/></xs:simpleType>
               <xs:simpleType name="Free"><xs:list itemType="xs:int"/></xs:simpleType>"#,
        );
        let ordered = order(graph, &namespaces).unwrap();
        assert!(ordered.rewritten.is_empty());
        assert_eq!(names(&ordered.order), vec!["Code", "D", "C", "B", "A", "Free"]);
    }

    #[test]
    fn self_reference_is_rewritten() {
        let (graph, namespaces) = graph(
            r#"<xs:complexType name="Node"><xs:sequence>
                 <xs:element name="name" type="xs:string"/>
                 <xs:element name="children" type="t:Node" minOccurs="0" maxOccurs="unbounded"/>
               </xs:sequence></xs:complexType>"#,
        );
        let ordered = order(graph, &namespaces).unwrap();
        assert_eq!(
            ordered.rewritten,
            vec![RewrittenEdge {
                source: named("Node"),
                target: named("Node"),
                position: 1,
            }]
        );
        assert_eq!(edge(&ordered.graph, &named("Node"), 0), EdgeKind::ByValue);
        assert_eq!(edge(&ordered.graph, &named("Node"), 1), EdgeKind::ByReference);
        assert_eq!(names(&ordered.order), vec!["Node"]);
    }

    #[test]
    fn smallest_edge_of_mutual_cycle_is_rewritten() {
        let (graph, namespaces) = graph(
            r#"<xs:complexType name="Parent"><xs:sequence>
                 <xs:element name="child" type="t:Child"/>
               </xs:sequence></xs:complexType>
               <xs:complexType name="Child"><xs:sequence>
                 <xs:element name="parent" type="t:Parent"/>
               </xs:sequence></xs:complexType>"#,
        );
        let ordered = order(graph, &namespaces).unwrap();
        assert_eq!(ordered.rewritten.len(), 1);
        assert_eq!(ordered.rewritten[0].source, named("Child"));
        assert_eq!(edge(&ordered.graph, &named("Child"), 0), EdgeKind::ByReference);
        assert_eq!(edge(&ordered.graph, &named("Parent"), 0), EdgeKind::ByValue);
        assert_eq!(names(&ordered.order), vec!["Child", "Parent"]);
    }

    #[test]
    fn ordering_is_deterministic() {
        let body = r#"<xs:complexType name="X"><xs:sequence>
                 <xs:element name="y" type="t:Y"/>
               </xs:sequence></xs:complexType>
               <xs:complexType name="Y"><xs:sequence>
                 <xs:element name="z" type="t:Z"/>
               </xs:sequence></xs:complexType>
               <xs:complexType name="Z"><xs:sequence>
                 <xs:element name="x" type="t:X"/>
               </xs:sequence></xs:complexType>"#;
        let (first, namespaces) = graph(body);
        let first = order(first, &namespaces).unwrap();
        let (second, namespaces) = graph(body);
        let second = order(second, &namespaces).unwrap();
        assert_eq!(first.order, second.order);
        assert_eq!(first.rewritten, second.rewritten);
        assert_eq!(first.rewritten[0].source, named("X"));
        assert_eq!(names(&first.order), vec!["X", "Z", "Y"]);
    }
}
