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

//! Remote document fetch abstraction
//!
//! This module defines the transport-agnostic [`Fetcher`] trait. The
//! document store uses it for every `http`/`https` locator that is not
//! satisfied by a local import path.
//!
//! Notes for implementors:
//! - The trait is `Send + Sync` and returns `Send` futures so it can be
//!   driven by any async runtime.
//! - Implementations return the raw document bytes. Character decoding
//!   is done by the schema parser.
//! - Non-success responses must be reported as errors; the store never
//!   inspects transport details.

use crate::Locator;
use std::error::Error as StdError;
use std::future::Future;

/// Fetcher provides bytes of a remote schema document.
pub trait Fetcher: Send + Sync {
    /// Fetch error.
    type Error: StdError + Send + Sync + 'static;

    /// Fetch content of the document addressed by `locator`.
    fn fetch(&self, locator: &Locator)
        -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;
}
