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

//! C++ types of values and members.

use crate::compiler::BuiltinType;
use crate::generator::class::Storage;
use crate::generator::class::ValueKind;
use crate::generator::OptionalElementType;

/// C++ type representing a builtin.
#[must_use]
pub const fn builtin(builtin: BuiltinType) -> &'static str {
    match builtin {
        BuiltinType::String
        | BuiltinType::AnyUri
        | BuiltinType::Duration
        | BuiltinType::Gregorian => "QString",
        BuiltinType::QName => "KDQName",
        BuiltinType::Boolean => "bool",
        BuiltinType::Float => "float",
        BuiltinType::Double | BuiltinType::Decimal => "double",
        BuiltinType::Integer | BuiltinType::Long => "qint64",
        BuiltinType::Int => "int",
        BuiltinType::Short => "short",
        BuiltinType::Byte => "signed char",
        BuiltinType::UnsignedLong => "quint64",
        BuiltinType::UnsignedInt => "unsigned int",
        BuiltinType::UnsignedShort => "unsigned short",
        BuiltinType::UnsignedByte => "unsigned char",
        BuiltinType::DateTime => "KDDateTime",
        BuiltinType::Date => "QDate",
        BuiltinType::Time => "QTime",
        BuiltinType::HexBinary | BuiltinType::Base64Binary => "QByteArray",
        BuiltinType::AnySimpleType => "QVariant",
        BuiltinType::AnyType => "KDSoapValue",
    }
}

/// Canonical XML Schema name of a builtin, used as `xsi:type`.
#[must_use]
pub const fn xsd_name(builtin: BuiltinType) -> &'static str {
    match builtin {
        BuiltinType::String => "string",
        BuiltinType::QName => "QName",
        BuiltinType::AnyUri => "anyURI",
        BuiltinType::Boolean => "boolean",
        BuiltinType::Float => "float",
        BuiltinType::Double => "double",
        BuiltinType::Decimal => "decimal",
        BuiltinType::Integer => "integer",
        BuiltinType::Long => "long",
        BuiltinType::Int => "int",
        BuiltinType::Short => "short",
        BuiltinType::Byte => "byte",
        BuiltinType::UnsignedLong => "unsignedLong",
        BuiltinType::UnsignedInt => "unsignedInt",
        BuiltinType::UnsignedShort => "unsignedShort",
        BuiltinType::UnsignedByte => "unsignedByte",
        BuiltinType::Duration => "duration",
        BuiltinType::DateTime => "dateTime",
        BuiltinType::Date => "date",
        BuiltinType::Time => "time",
        BuiltinType::Gregorian => "gYear",
        BuiltinType::HexBinary => "hexBinary",
        BuiltinType::Base64Binary => "base64Binary",
        BuiltinType::AnySimpleType => "anySimpleType",
        BuiltinType::AnyType => "anyType",
    }
}

/// Value is cheap to copy and passed by value.
#[must_use]
pub const fn is_scalar(kind: ValueKind) -> bool {
    match kind {
        ValueKind::Builtin(b) => matches!(
            b,
            BuiltinType::Boolean
                | BuiltinType::Float
                | BuiltinType::Double
                | BuiltinType::Decimal
                | BuiltinType::Integer
                | BuiltinType::Long
                | BuiltinType::Int
                | BuiltinType::Short
                | BuiltinType::Byte
                | BuiltinType::UnsignedLong
                | BuiltinType::UnsignedInt
                | BuiltinType::UnsignedShort
                | BuiltinType::UnsignedByte
        ),
        ValueKind::Enumeration => true,
        ValueKind::Class => false,
    }
}

/// Complete member type for `storage` of `value_type`.
#[must_use]
pub fn member_type(value_type: &str, storage: Storage, optional: OptionalElementType) -> String {
    match storage {
        Storage::Value => value_type.to_string(),
        Storage::Optional => match optional {
            OptionalElementType::RawPointer => format!("{value_type}*"),
            OptionalElementType::BoostOptional => format!("boost::optional<{value_type}>"),
            OptionalElementType::StdOptional => format!("std::optional<{value_type}>"),
        },
        Storage::List => format!("QList<{value_type}>"),
        Storage::Shared => format!("QSharedPointer<{value_type}>"),
        Storage::SharedList => format!("QList<QSharedPointer<{value_type}>>"),
    }
}

/// Type of an input parameter carrying `cpp_type`.
#[must_use]
pub fn input_parameter(cpp_type: &str, scalar: bool) -> String {
    if scalar {
        cpp_type.to_string()
    } else {
        format!("const {cpp_type}&")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn optional_strategies() {
        assert_eq!(
            member_type("int", Storage::Optional, OptionalElementType::RawPointer),
            "int*"
        );
        assert_eq!(
            member_type("int", Storage::Optional, OptionalElementType::BoostOptional),
            "boost::optional<int>"
        );
        assert_eq!(
            member_type("int", Storage::Optional, OptionalElementType::StdOptional),
            "std::optional<int>"
        );
        assert_eq!(
            member_type("int", Storage::Value, OptionalElementType::RawPointer),
            "int"
        );
    }

    #[test]
    fn indirection_and_lists() {
        let optional = OptionalElementType::default();
        assert_eq!(member_type("Node", Storage::Shared, optional), "QSharedPointer<Node>");
        assert_eq!(
            member_type("Node", Storage::SharedList, optional),
            "QList<QSharedPointer<Node>>"
        );
        assert_eq!(member_type("QString", Storage::List, optional), "QList<QString>");
    }

    #[test]
    fn parameters() {
        let int = ValueKind::Builtin(BuiltinType::Int);
        let string = ValueKind::Builtin(BuiltinType::String);
        assert_eq!(input_parameter(builtin(BuiltinType::Int), is_scalar(int)), "int");
        assert_eq!(
            input_parameter(builtin(BuiltinType::String), is_scalar(string)),
            "const QString&"
        );
        assert_eq!(input_parameter("Status", is_scalar(ValueKind::Class)), "const Status&");
    }
}
