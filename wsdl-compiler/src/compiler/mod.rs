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

//! Compiler of loaded documents into a type graph and bound services.

/// XSD builtin types
pub mod builtin;

/// Type graph
pub mod type_graph;

/// Fatal compilation errors
pub mod error;

/// Non-fatal findings
pub mod diagnostics;

/// Global declarations of all schemas
pub mod symbols;

/// Type Graph Builder
pub mod builder;

/// Namespace Mapper
pub mod namespace_map;

/// Binding Resolver
pub mod binding;

/// Compilation result
pub mod compiled;

use crate::loader::DocumentSet;
use crate::schema::qualified_name::XSD;
use builder::Builder;
use diagnostics::InvalidOperation;
use std::collections::BTreeMap;
use symbols::SymbolTable;

/// Reexport `BuiltinType` to the level of the compiler.
pub use builtin::BuiltinType;
/// Reexport `Compiled` to the level of the compiler.
pub use compiled::Compiled;
/// Reexport `Diagnostics` to the level of the compiler.
pub use diagnostics::Diagnostics;
/// Reexport `Error` to the level of the compiler.
pub use error::Error;
/// Reexport `NamespaceMap` to the level of the compiler.
pub use namespace_map::NamespaceMap;
/// Reexport `TypeGraph` to the level of the compiler.
pub use type_graph::TypeGraph;
/// Reexport `TypeId` to the level of the compiler.
pub use type_graph::TypeId;
/// Reexport `TypeNode` to the level of the compiler.
pub use type_graph::TypeNode;
/// Reexport `TypeRef` to the level of the compiler.
pub use type_graph::TypeRef;

/// Compiler parameters.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Restrict generation to the service with this local name.
    pub service: Option<String>,
    /// User namespace codes by URI.
    pub namespace_mapping: BTreeMap<String, String>,
    /// Collect known types for reporting unresolved references.
    pub help_on_missing: bool,
}

/// Compile loaded documents.
///
/// # Errors
///
/// Returns error on conflicting declarations, inheritance cycles or
/// unknown requested service.
pub fn compile(docs: &DocumentSet, config: &Config) -> Result<Compiled, Error> {
    let symbols = SymbolTable::build(docs)?;
    let (graph, mut unresolved) = Builder::build(&symbols)?;
    let services = binding::resolve(docs, &graph, config.service.as_deref(), &mut unresolved)?;
    let namespaces = NamespaceMap::build(
        docs.namespaces()
            .into_iter()
            .chain(graph.types.keys().map(TypeId::namespace))
            .chain(graph.elements.keys().map(|name| name.namespace.as_str()))
            .chain(std::iter::once(XSD)),
        &config.namespace_mapping,
    );
    let invalid_operations = services
        .iter()
        .flat_map(|service| {
            service
                .operations
                .iter()
                .filter(|op| !op.is_valid())
                .map(|op| InvalidOperation {
                    service: service.service.clone(),
                    operation: op.name.clone(),
                    problems: op.problems.clone(),
                })
        })
        .collect();
    let known_types = config.help_on_missing.then(|| {
        docs.known_types()
            .into_iter()
            .map(|(ns, names)| {
                (
                    ns.to_string(),
                    names.into_iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    });
    Ok(Compiled {
        graph,
        namespaces,
        services,
        diagnostics: Diagnostics {
            unresolved,
            invalid_operations,
            known_types,
        },
    })
}
