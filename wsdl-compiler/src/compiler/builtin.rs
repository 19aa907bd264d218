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

//! Builtin XML Schema types.

use crate::schema::qualified_name::SOAP11_ENCODING;
use crate::schema::qualified_name::SOAP12_ENCODING;
use crate::schema::qualified_name::XSD;
use crate::schema::QualifiedName;
use serde::Serialize;

/// Type with a built-in representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BuiltinType {
    /// `string` and all string-derived types.
    String,
    /// `QName`.
    QName,
    /// `anyURI`.
    AnyUri,
    /// `boolean`.
    Boolean,
    /// `float`.
    Float,
    /// `double`.
    Double,
    /// `decimal`.
    Decimal,
    /// `integer` and unbounded integer types.
    Integer,
    /// `long`.
    Long,
    /// `int`.
    Int,
    /// `short`.
    Short,
    /// `byte`.
    Byte,
    /// `unsignedLong`.
    UnsignedLong,
    /// `unsignedInt`.
    UnsignedInt,
    /// `unsignedShort`.
    UnsignedShort,
    /// `unsignedByte`.
    UnsignedByte,
    /// `duration`.
    Duration,
    /// `dateTime`.
    DateTime,
    /// `date`.
    Date,
    /// `time`.
    Time,
    /// Gregorian calendar fragments (`gYear`, `gMonthDay`, ...).
    Gregorian,
    /// `hexBinary`.
    HexBinary,
    /// `base64Binary`.
    Base64Binary,
    /// `anySimpleType`.
    AnySimpleType,
    /// `anyType`, wildcards and SOAP-encoded arrays.
    AnyType,
}

const XSD_NAMES: &[(&str, BuiltinType)] = &[
    ("string", BuiltinType::String),
    ("normalizedString", BuiltinType::String),
    ("token", BuiltinType::String),
    ("language", BuiltinType::String),
    ("Name", BuiltinType::String),
    ("NCName", BuiltinType::String),
    ("NMTOKEN", BuiltinType::String),
    ("NMTOKENS", BuiltinType::String),
    ("ID", BuiltinType::String),
    ("IDREF", BuiltinType::String),
    ("IDREFS", BuiltinType::String),
    ("ENTITY", BuiltinType::String),
    ("ENTITIES", BuiltinType::String),
    ("NOTATION", BuiltinType::String),
    ("QName", BuiltinType::QName),
    ("anyURI", BuiltinType::AnyUri),
    ("boolean", BuiltinType::Boolean),
    ("float", BuiltinType::Float),
    ("double", BuiltinType::Double),
    ("decimal", BuiltinType::Decimal),
    ("integer", BuiltinType::Integer),
    ("nonNegativeInteger", BuiltinType::Integer),
    ("positiveInteger", BuiltinType::Integer),
    ("nonPositiveInteger", BuiltinType::Integer),
    ("negativeInteger", BuiltinType::Integer),
    ("long", BuiltinType::Long),
    ("int", BuiltinType::Int),
    ("short", BuiltinType::Short),
    ("byte", BuiltinType::Byte),
    ("unsignedLong", BuiltinType::UnsignedLong),
    ("unsignedInt", BuiltinType::UnsignedInt),
    ("unsignedShort", BuiltinType::UnsignedShort),
    ("unsignedByte", BuiltinType::UnsignedByte),
    ("duration", BuiltinType::Duration),
    ("dateTime", BuiltinType::DateTime),
    ("date", BuiltinType::Date),
    ("time", BuiltinType::Time),
    ("gYear", BuiltinType::Gregorian),
    ("gYearMonth", BuiltinType::Gregorian),
    ("gMonth", BuiltinType::Gregorian),
    ("gMonthDay", BuiltinType::Gregorian),
    ("gDay", BuiltinType::Gregorian),
    ("hexBinary", BuiltinType::HexBinary),
    ("base64Binary", BuiltinType::Base64Binary),
    ("anySimpleType", BuiltinType::AnySimpleType),
    ("anyType", BuiltinType::AnyType),
];

impl BuiltinType {
    /// Find builtin type by its local name in the XML Schema namespace.
    #[must_use]
    pub fn from_xsd_name(name: &str) -> Option<Self> {
        XSD_NAMES
            .iter()
            .find_map(|(xsd, builtin)| (*xsd == name).then_some(*builtin))
    }

    /// Find builtin type by qualified name. SOAP encoding namespaces
    /// redeclare the XML Schema types; their arrays map to `anyType`.
    #[must_use]
    pub fn from_qualified_name(qname: &QualifiedName) -> Option<Self> {
        match qname.namespace.as_str() {
            XSD => Self::from_xsd_name(&qname.name),
            SOAP11_ENCODING | SOAP12_ENCODING => match qname.name.as_str() {
                "Array" | "Struct" | "arrayType" => Some(Self::AnyType),
                name => Self::from_xsd_name(name).or(Some(Self::AnyType)),
            },
            _ => None,
        }
    }

    /// Value has a natural textual form and can be an attribute or
    /// simple content.
    #[must_use]
    pub const fn is_simple(self) -> bool {
        !matches!(self, Self::AnyType)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn xsd_names() {
        assert_eq!(BuiltinType::from_xsd_name("int"), Some(BuiltinType::Int));
        assert_eq!(BuiltinType::from_xsd_name("token"), Some(BuiltinType::String));
        assert_eq!(BuiltinType::from_xsd_name("Int"), None);
    }

    #[test]
    fn soap_encoding_names() {
        let array = QualifiedName::new(SOAP11_ENCODING, "Array");
        assert_eq!(
            BuiltinType::from_qualified_name(&array),
            Some(BuiltinType::AnyType)
        );
        let string = QualifiedName::new(SOAP11_ENCODING, "string");
        assert_eq!(
            BuiltinType::from_qualified_name(&string),
            Some(BuiltinType::String)
        );
        let foreign = QualifiedName::new("urn:x", "string");
        assert_eq!(BuiltinType::from_qualified_name(&foreign), None);
    }
}
