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

//! Conversion of XML names to C++ identifier casing.

/// `UpperCamelCase` form of an XML name: class and enumerator names.
#[must_use]
pub fn to_upper_camel<S>(name: S) -> String
where
    S: AsRef<str>,
{
    segments(name.as_ref())
        .flat_map(camel_to_words)
        .map(|word| capitalize(&word))
        .collect()
}

/// `lowerCamelCase` form of an XML name: members, accessors and
/// methods.
#[must_use]
pub fn to_lower_camel<S>(name: S) -> String
where
    S: AsRef<str>,
{
    segments(name.as_ref())
        .flat_map(camel_to_words)
        .enumerate()
        .map(|(i, word)| {
            if i == 0 {
                word.to_lowercase()
            } else {
                capitalize(&word)
            }
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

// XML names may contain '-', '.' and ':' which separate words as well.
fn segments(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_alphanumeric()).filter(|v| !v.is_empty())
}

fn camel_to_words(s: &str) -> impl Iterator<Item = String> {
    let chars: Vec<char> = s.chars().collect();

    chars
        .iter()
        .enumerate()
        .fold(vec![vec![]], |mut words: Vec<Vec<char>>, (i, &ch)| {
            if i > 0 && ch.is_uppercase() && {
                let prev_char = chars[i - 1];

                // lower to upper: camelCase
                prev_char.is_lowercase() ||
                    prev_char.is_ascii_digit() ||
                    // acronym followed by a word of 2+ lowercase letters: URLPath
                    (prev_char.is_uppercase() &&
                        i + 1 < chars.len() && chars[i + 1].is_lowercase() &&
                        chars[(i + 1)..]
                            .iter()
                            .take_while(|&&c| c.is_lowercase())
                            .count() >= 2)
            } {
                words.push(vec![]);
            }

            if let Some(curr_word) = words.last_mut() {
                curr_word.push(ch);
            }
            words
        })
        .into_iter()
        .filter(|w| !w.is_empty())
        .map(|w| w.into_iter().collect::<String>())
        .collect::<Vec<String>>()
        .into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_casemungler_upper_camel_with_string() {
        let owned_string = String::from("getWeather");
        assert_eq!(to_upper_camel(owned_string), "GetWeather");
    }

    #[test]
    fn test_casemungler_upper_camel_normal() {
        assert_eq!(to_upper_camel("city"), "City");
        assert_eq!(to_upper_camel("GetWeatherRequest"), "GetWeatherRequest");
        assert_eq!(to_upper_camel("status-code"), "StatusCode");
        assert_eq!(to_upper_camel("ns1.item_type"), "Ns1ItemType");
    }

    #[test]
    fn test_casemungler_lower_camel_normal() {
        assert_eq!(to_lower_camel("GetWeather"), "getWeather");
        assert_eq!(to_lower_camel("humidity"), "humidity");
        assert_eq!(to_lower_camel("max-value"), "maxValue");
    }

    #[test]
    fn test_casemungler_empty_string() {
        assert_eq!(to_upper_camel(""), "");
        assert_eq!(to_lower_camel("--"), "");
    }

    #[test]
    fn test_casemungler_single_char() {
        assert_eq!(to_upper_camel("f"), "F");
        assert_eq!(to_lower_camel("F"), "f");
    }

    #[test]
    fn test_casemungler_acronyms() {
        assert_eq!(to_lower_camel("URL"), "url");
        assert_eq!(to_lower_camel("URLPath"), "urlPath");
        assert_eq!(to_lower_camel("SOAPAction"), "soapAction");
        assert_eq!(to_upper_camel("PCIEFunctions"), "PCIEFunctions");
    }

    #[test]
    fn test_casemungler_digits() {
        assert_eq!(to_lower_camel("Item2Name"), "item2Name");
        assert_eq!(to_upper_camel("2ndValue"), "2ndValue");
    }
}
