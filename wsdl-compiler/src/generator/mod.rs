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

//! Code Generator
//!
//! Walks ordered types and bound services and produces
//! [`GeneratedClass`] descriptions: type classes first, in emission
//! order, followed by client and job classes or server base classes.

/// Casing of XML names
pub mod casemungler;

/// Generated class descriptions
pub mod class;

/// C++ types
pub mod cpp_type;

/// Identifier collision resolution
pub mod naming;

/// C++ text renderer
pub mod render;

mod service;
mod types;

use crate::compiler::binding::ServiceBinding;
use crate::compiler::type_graph::TypeKind;
use crate::compiler::NamespaceMap;
use crate::compiler::TypeGraph;
use crate::compiler::TypeId;
use crate::compiler::TypeRef;
use crate::orderer::Ordered;
use casemungler::to_upper_camel;
use class::GeneratedClass;
use class::ValueKind;
use naming::NameRegistry;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Rendering of optional members.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum OptionalElementType {
    /// `T*`, null when absent.
    RawPointer,
    /// `boost::optional<T>`.
    BoostOptional,
    /// `std::optional<T>`.
    #[default]
    StdOptional,
}

/// Configuration of generation.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Rendering of optional members.
    pub optional_element_type: OptionalElementType,
    /// Generate server base classes instead of clients.
    pub server: bool,
    /// Do not generate blocking calls.
    pub no_sync: bool,
    /// Do not generate non-blocking calls.
    pub no_async: bool,
    /// Do not generate job classes.
    pub no_async_jobs: bool,
}

/// Generator state shared by type and service generation.
pub struct Generator<'a> {
    config: &'a Config,
    graph: &'a TypeGraph,
    namespaces: &'a NamespaceMap,
    classes: NameRegistry,
    type_names: BTreeMap<&'a TypeId, String>,
}

/// Generate classes for ordered types and services.
#[must_use]
pub fn generate(
    ordered: &Ordered,
    services: &[ServiceBinding],
    namespaces: &NamespaceMap,
    config: &Config,
) -> Vec<GeneratedClass> {
    let mut generator = Generator {
        config,
        graph: &ordered.graph,
        namespaces,
        classes: NameRegistry::default(),
        type_names: BTreeMap::new(),
    };
    for id in &ordered.order {
        let code = generator.code(id.namespace());
        let name = generator.classes.take(&class_candidate(id), code);
        generator.type_names.insert(id, name);
    }
    let mut classes = ordered
        .order
        .iter()
        .filter_map(|id| generator.type_class(id))
        .collect::<Vec<_>>();
    let type_classes = classes.len();
    for service in services {
        if config.server {
            classes.push(generator.server_class(service, services));
        } else {
            let (client, jobs) = generator.client_classes(service, services);
            classes.push(client);
            classes.extend(jobs);
        }
    }
    info!(
        types = type_classes,
        services = classes.len() - type_classes,
        "classes generated"
    );
    classes
}

/// Class name candidate: the type name, or the declaration path of an
/// anonymous type.
fn class_candidate(id: &TypeId) -> String {
    match id {
        TypeId::Named(name) => to_upper_camel(&name.name),
        TypeId::Anonymous(path) => path
            .name
            .split('/')
            .map(|segment| to_upper_camel(segment.trim_start_matches('@')))
            .collect(),
    }
}

impl<'a> Generator<'a> {
    /// Namespace code for generated names.
    fn code(&self, namespace: &str) -> &'a str {
        self.namespaces.code_for(namespace).unwrap_or("ns")
    }

    /// C++ type and (de)serialization kind of a value; `None` if the
    /// reference is unresolved.
    fn value_of(&self, type_ref: &TypeRef) -> Option<(String, ValueKind)> {
        match type_ref {
            TypeRef::Builtin(builtin) => Some((
                cpp_type::builtin(*builtin).to_string(),
                ValueKind::Builtin(*builtin),
            )),
            TypeRef::Node(id) => {
                let name = self.type_names.get(id)?;
                let kind = match self.graph.get(id).map(|node| &node.kind) {
                    Some(TypeKind::Enumeration { .. }) => ValueKind::Enumeration,
                    _ => ValueKind::Class,
                };
                Some((name.clone(), kind))
            }
            TypeRef::Unresolved(_) => None,
        }
    }
}
