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

//! Expectations for the fetcher mock.

use std::fmt::Display;
use wsdlc_core::Locator;

pub type Response<E> = Result<Vec<u8>, E>;

/// Request expected by the fetcher.
#[derive(Debug)]
pub enum ExpectedRequest {
    /// Expected fetch of the document.
    Fetch { locator: Locator },
}

impl ExpectedRequest {
    const fn locator(&self) -> &Locator {
        match self {
            Self::Fetch { locator } => locator,
        }
    }

    pub(crate) fn matches(&self, locator: &Locator) -> bool {
        self.locator() == locator
    }
}

/// Expectation for the tests.
#[derive(Debug)]
pub struct Expect<E> {
    pub request: ExpectedRequest,
    pub response: Response<E>,
}

impl<E> Expect<E> {
    /// Expect fetch of `uri` that returns `body`.
    pub fn fetch(uri: impl Display, body: impl Display) -> Self {
        Self {
            request: ExpectedRequest::Fetch {
                locator: Locator::parse(&uri.to_string()).expect("invalid locator"),
            },
            response: Ok(body.to_string().into_bytes()),
        }
    }

    /// Expect fetch of `uri` that fails with `err`.
    pub fn fail(uri: impl Display, err: E) -> Self {
        Self {
            request: ExpectedRequest::Fetch {
                locator: Locator::parse(&uri.to_string()).expect("invalid locator"),
            },
            response: Err(err),
        }
    }
}
