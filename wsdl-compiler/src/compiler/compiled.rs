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

use crate::compiler::binding::ServiceBinding;
use crate::compiler::Diagnostics;
use crate::compiler::NamespaceMap;
use crate::compiler::TypeGraph;
use crate::compiler::TypeId;
use crate::compiler::TypeRef;
use std::collections::BTreeSet;

/// Result of compilation of a document set.
#[derive(Debug)]
pub struct Compiled {
    /// All types and elements.
    pub graph: TypeGraph,
    /// Code of every namespace.
    pub namespaces: NamespaceMap,
    /// Bound services.
    pub services: Vec<ServiceBinding>,
    /// Non-fatal findings.
    pub diagnostics: Diagnostics,
}

impl Compiled {
    /// Types directly used by parts of operations that will be
    /// generated.
    #[must_use]
    pub fn root_types(&self) -> BTreeSet<TypeId> {
        self.services
            .iter()
            .flat_map(ServiceBinding::valid_operations)
            .flat_map(|op| op.part_types())
            .filter_map(TypeRef::node)
            .cloned()
            .collect()
    }
}
