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

mod prune_unused_types;

use crate::compiler::Compiled;
use prune_unused_types::prune_unused_types;

/// Optimizer parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Keep types that no valid operation uses.
    pub keep_unused_types: bool,
}

/// Apply all known optimizations to compiled data structures.
#[must_use]
pub fn optimize(input: Compiled, config: &Config) -> Compiled {
    [prune_unused_types]
        .iter()
        .fold(input, |input, f| f(input, config))
}
