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

//! Identifier safety and collision resolution.

use std::collections::BTreeSet;

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char16_t", "char32_t", "char8_t", "class", "co_await", "co_return",
    "co_yield", "compl", "concept", "const", "const_cast", "consteval", "constexpr", "constinit",
    "continue", "decltype", "default", "delete", "do", "double", "dynamic_cast", "else", "emit",
    "enum", "explicit", "export", "extern", "false", "float", "for", "foreach", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signals", "signed", "sizeof", "slots",
    "static", "static_assert", "static_cast", "struct", "switch", "template", "this",
    "thread_local", "throw", "true", "try", "typedef", "typeid", "typename", "union",
    "unsigned", "using", "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Word is reserved in C++ (including Qt keywords).
#[must_use]
pub fn is_cpp_keyword(word: &str) -> bool {
    CPP_KEYWORDS.contains(&word)
}

/// Make `name` a valid C++ identifier: non-alphanumerics become `_`,
/// a leading digit gets `_` prefix, keywords get `_` suffix.
#[must_use]
pub fn sanitize(name: &str) -> String {
    let mut result = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>();
    if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    if is_cpp_keyword(&result) {
        result.push('_');
    }
    result
}

/// First name free in `existing`: `candidate`, then
/// `candidate_{code}`, then `candidate_{code}2`, `candidate_{code}3`...
#[must_use]
pub fn unique_name(existing: &BTreeSet<String>, candidate: &str, code: &str) -> String {
    if !existing.contains(candidate) {
        return candidate.to_string();
    }
    let qualified = format!("{candidate}_{code}");
    if !existing.contains(&qualified) {
        return qualified;
    }
    (2..)
        .map(|n| format!("{qualified}{n}"))
        .find(|name| !existing.contains(name))
        .unwrap_or(qualified)
}

/// Names taken in one C++ scope.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    names: BTreeSet<String>,
}

impl NameRegistry {
    /// Registry with names that are taken up front.
    pub fn with_reserved<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            names: names.into_iter().map(ToString::to_string).collect(),
        }
    }

    /// Take unique name for `candidate`, disambiguating by namespace
    /// `code`.
    pub fn take(&mut self, candidate: &str, code: &str) -> String {
        let name = unique_name(&self.names, &sanitize(candidate), code);
        self.names.insert(name.clone());
        name
    }

    /// Name is taken.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn existing(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn free_candidate_is_kept() {
        assert_eq!(unique_name(&existing(&[]), "Status", "a"), "Status");
        assert_eq!(unique_name(&existing(&["Other"]), "Status", "a"), "Status");
    }

    #[test]
    fn collision_gets_namespace_code() {
        assert_eq!(unique_name(&existing(&["Status"]), "Status", "b"), "Status_b");
    }

    #[test]
    fn collision_of_qualified_name_gets_number() {
        let taken = existing(&["Status", "Status_b", "Status_b2"]);
        assert_eq!(unique_name(&taken, "Status", "b"), "Status_b3");
    }

    #[test]
    fn registry_is_deterministic() {
        let mut registry = NameRegistry::with_reserved(["serialize"]);
        assert_eq!(registry.take("serialize", "tns"), "serialize_tns");
        assert_eq!(registry.take("Status", "a"), "Status");
        assert_eq!(registry.take("Status", "b"), "Status_b");
        assert_eq!(registry.take("Status", "b"), "Status_b2");
        assert!(registry.contains("Status_b2"));
    }

    #[test]
    fn identifiers_are_sanitized() {
        assert_eq!(sanitize("class"), "class_");
        assert_eq!(sanitize("2value"), "_2value");
        assert_eq!(sanitize("a-b.c"), "a_b_c");
        assert_eq!(sanitize(""), "_");
        assert!(is_cpp_keyword("signals"));
        assert!(!is_cpp_keyword("signal"));
    }
}
