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

//! Descriptions of generated C++ classes.
//!
//! The generator produces these descriptions in emission order; the
//! renderer turns them into C++ text and `--emit-json` dumps them as is.

use crate::compiler::BuiltinType;
use serde::Serialize;

/// Kind of a generated class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassKind {
    /// Complex type.
    Complex,
    /// Restriction of a simple type wrapping the base value.
    SimpleWrapper,
    /// Enumeration.
    Enumeration,
    /// List of simple values.
    List,
    /// Client of a service port.
    ClientService,
    /// Abstract server base of a service port.
    ServerBase,
    /// Asynchronous job of one operation.
    Job,
}

/// How a member stores its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Storage {
    /// Plain value.
    Value,
    /// Optional value, rendered per optional element strategy.
    Optional,
    /// List of values.
    List,
    /// Shared pointer to forward-declared class.
    Shared,
    /// List of shared pointers.
    SharedList,
}

impl Storage {
    /// Storage of a particle.
    #[must_use]
    pub const fn of(optional: bool, repeated: bool, by_reference: bool) -> Self {
        match (repeated, by_reference, optional) {
            (true, true, _) => Self::SharedList,
            (true, false, _) => Self::List,
            (false, true, _) => Self::Shared,
            (false, false, true) => Self::Optional,
            (false, false, false) => Self::Value,
        }
    }
}

/// What (de)serialization of a value is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    /// Builtin C++ type.
    Builtin(BuiltinType),
    /// Generated class with `serialize`/`deserialize`.
    Class,
    /// Generated enumeration with `toString`/`fromString`.
    Enumeration,
}

/// XML name of an element or attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XmlName {
    /// Local name.
    pub name: String,
    /// Namespace, `None` for unqualified names.
    pub namespace: Option<String>,
}

/// Data member with accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// Member name; also the getter name.
    pub name: String,
    /// Setter name.
    pub setter: String,
    /// XML name.
    pub xml: XmlName,
    /// Member is an attribute.
    pub is_attribute: bool,
    /// Member holds the text content of the element.
    pub is_content: bool,
    /// C++ type of one value.
    pub value_type: String,
    /// How one value is (de)serialized.
    pub value_kind: ValueKind,
    /// Storage.
    pub storage: Storage,
    /// Complete C++ type of the member.
    pub cpp_type: String,
    /// Documentation.
    pub documentation: Option<String>,
}

/// Method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// C++ type as declared.
    pub cpp_type: String,
    /// Out parameter receiving a response part.
    pub output: bool,
    /// Message part carried by the parameter.
    pub part: Option<PartValue>,
}

/// Message part value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartValue {
    /// XML name of the part in the message.
    pub xml: XmlName,
    /// C++ type of the value.
    pub value_type: String,
    /// How the value is (de)serialized.
    pub value_kind: ValueKind,
}

/// Kind of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MethodKind {
    /// Constructor.
    Constructor,
    /// `serialize`.
    Serialize,
    /// `deserialize`.
    Deserialize,
    /// Enumeration to string.
    ToString,
    /// Enumeration from string.
    FromString,
    /// Endpoint and error accessors of a client.
    Utility,
    /// Blocking call.
    Sync,
    /// Non-blocking call.
    Async,
    /// Notification.
    Signal,
    /// Start of a job.
    Start,
    /// Pure virtual operation of a server.
    PureVirtual,
    /// Request dispatcher of a server.
    Dispatch,
}

/// SOAP style of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallStyle {
    /// Body is the serialized part element.
    Document,
    /// Body is an operation wrapper of parts.
    Rpc,
}

/// SOAP protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoapVersion {
    /// SOAP 1.1.
    Soap11,
    /// SOAP 1.2.
    Soap12,
}

/// Operation invoked or served by a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Call {
    /// Operation name.
    pub operation: String,
    /// `soapAction`.
    pub soap_action: Option<String>,
    /// Namespace of the rpc wrapper.
    pub namespace: String,
    /// Style.
    pub style: CallStyle,
    /// `use="encoded"`.
    pub encoded: bool,
    /// No response is expected.
    pub one_way: bool,
    /// Request parts.
    pub request: Vec<PartValue>,
    /// Response parts.
    pub response: Vec<PartValue>,
}

/// Method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    /// Name.
    pub name: String,
    /// Kind.
    pub kind: MethodKind,
    /// Return type, empty for constructors.
    pub return_type: String,
    /// Parameters.
    pub parameters: Vec<Parameter>,
    /// `const` method.
    pub is_const: bool,
    /// Operation of call variants.
    pub call: Option<Call>,
    /// Documentation.
    pub documentation: Option<String>,
}

/// Enumerator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    /// C++ enumerator.
    pub name: String,
    /// XML literal.
    pub literal: String,
}

/// Endpoint of a service class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    /// Service name.
    pub service: String,
    /// Port name.
    pub port: String,
    /// Default endpoint address.
    pub endpoint: Option<String>,
    /// Protocol version.
    pub soap_version: SoapVersion,
    /// Target namespace of the definitions.
    pub namespace: String,
}

/// Generated class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedClass {
    /// Collision-free class name.
    pub name: String,
    /// Kind.
    pub kind: ClassKind,
    /// XML type name.
    pub xml: Option<XmlName>,
    /// Base class.
    pub base: Option<String>,
    /// Classes that only need forward declaration.
    pub forward_declarations: Vec<String>,
    /// Data members.
    pub members: Vec<Member>,
    /// Methods.
    pub methods: Vec<Method>,
    /// Enumerators.
    pub enum_values: Vec<EnumValue>,
    /// Service endpoint.
    pub service: Option<ServiceInfo>,
    /// Documentation.
    pub documentation: Option<String>,
}

impl GeneratedClass {
    /// Empty class of `kind`.
    #[must_use]
    pub const fn new(name: String, kind: ClassKind) -> Self {
        Self {
            name,
            kind,
            xml: None,
            base: None,
            forward_declarations: Vec::new(),
            members: Vec::new(),
            methods: Vec::new(),
            enum_values: Vec::new(),
            service: None,
            documentation: None,
        }
    }

    /// Member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Method by name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

impl Method {
    /// Method with no parameters and no call.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: MethodKind, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            return_type: return_type.into(),
            parameters: Vec::new(),
            is_const: false,
            call: None,
            documentation: None,
        }
    }

    /// Add parameter that carries no message part.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, cpp_type: impl Into<String>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            cpp_type: cpp_type.into(),
            output: false,
            part: None,
        });
        self
    }

    /// Mark method `const`.
    #[must_use]
    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn storage_never_wraps_repeated_values() {
        assert_eq!(Storage::of(true, true, false), Storage::List);
        assert_eq!(Storage::of(true, true, true), Storage::SharedList);
        assert_eq!(Storage::of(true, false, false), Storage::Optional);
        assert_eq!(Storage::of(true, false, true), Storage::Shared);
        assert_eq!(Storage::of(false, false, false), Storage::Value);
    }

    #[test]
    fn json_form() {
        let class = GeneratedClass::new("Weather".into(), ClassKind::ClientService);
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["kind"], "client-service");
        assert_eq!(json["name"], "Weather");
        let kind = serde_json::to_value(ValueKind::Builtin(BuiltinType::DateTime)).unwrap();
        assert_eq!(kind, serde_json::json!({ "builtin": "dateTime" }));
    }
}
