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

pub mod expect;

#[doc(inline)]
pub use expect::Expect;
pub use expect::ExpectedRequest;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Mutex;
use std::sync::PoisonError;
use wsdlc_core::Fetcher as WsdlcFetcher;
use wsdlc_core::Locator;

#[derive(Debug)]
pub enum Error {
    ErrorResponse(Box<dyn StdError + Send + Sync>),
    MutexLock(String),
    NothingIsExpected(Locator),
    UnexpectedFetch(Locator, Vec<Locator>),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::ErrorResponse(err) => write!(f, "response: {err}"),
            Self::MutexLock(err) => write!(f, "lock error: {err}"),
            Self::NothingIsExpected(locator) => {
                write!(f, "nothing is expected but {locator} was fetched")
            }
            Self::UnexpectedFetch(locator, expected) => {
                write!(f, "unexpected fetch: {locator}; expected one of: {expected:?}")
            }
        }
    }
}

impl StdError for Error {}

impl Error {
    pub fn mutex_lock<T>(err: PoisonError<T>) -> Self {
        Self::MutexLock(err.to_string())
    }
}

/// Fetcher that serves scripted documents.
///
/// Every expectation is consumed by exactly one fetch, in any order,
/// so a document requested twice fails the second time.
pub struct Fetcher<E> {
    expect: Mutex<VecDeque<Expect<E>>>,
    history: Mutex<Vec<Locator>>,
}

impl<E> Default for Fetcher<E> {
    fn default() -> Self {
        Self {
            expect: Mutex::new(VecDeque::new()),
            history: Mutex::new(Vec::new()),
        }
    }
}

impl<E> Fetcher<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(&self, exp: Expect<E>) {
        self.expect
            .lock()
            .expect("not poisoned")
            .push_back(exp);
    }

    /// Locators that were requested, in request order.
    pub fn history(&self) -> Vec<Locator> {
        self.history.lock().expect("not poisoned").clone()
    }

    /// Number of expectations that were not consumed.
    pub fn pending(&self) -> usize {
        self.expect.lock().expect("not poisoned").len()
    }

    pub fn debug_expect(&self) {
        let expect: &VecDeque<Expect<E>> = &self.expect.lock().expect("not poisoned");
        println!("Expectations (total: {})", expect.len());
        for v in expect {
            println!("{:#?}", v.request);
        }
    }
}

impl<E> WsdlcFetcher for Fetcher<E>
where
    E: StdError + Send + Sync + 'static,
{
    type Error = Error;

    async fn fetch(&self, in_locator: &Locator) -> Result<Vec<u8>, Error> {
        self.history
            .lock()
            .map_err(Error::mutex_lock)?
            .push(in_locator.clone());
        let expect = {
            let mut queue = self.expect.lock().map_err(Error::mutex_lock)?;
            if queue.is_empty() {
                return Err(Error::NothingIsExpected(in_locator.clone()));
            }
            let position = queue
                .iter()
                .position(|exp| exp.request.matches(in_locator))
                .ok_or_else(|| {
                    Error::UnexpectedFetch(
                        in_locator.clone(),
                        queue
                            .iter()
                            .map(|exp| match &exp.request {
                                ExpectedRequest::Fetch { locator } => locator.clone(),
                            })
                            .collect(),
                    )
                })?;
            queue.remove(position)
        };
        match expect {
            Some(Expect { response, .. }) => {
                response.map_err(|err| Error::ErrorResponse(Box::new(err)))
            }
            None => Err(Error::NothingIsExpected(in_locator.clone())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Error;
    use super::Expect;
    use super::Fetcher;
    use std::io::Error as IoError;
    use std::io::ErrorKind;
    use wsdlc_core::Fetcher as _;
    use wsdlc_core::Locator;

    #[tokio::test]
    async fn expectations_are_consumed_once() {
        let fetcher = Fetcher::<IoError>::new();
        fetcher.expect(Expect::fetch("http://example.com/a.xsd", "<a/>"));
        fetcher.expect(Expect::fetch("http://example.com/b.xsd", "<b/>"));

        let b = Locator::parse("http://example.com/b.xsd").unwrap();
        assert_eq!(fetcher.fetch(&b).await.unwrap(), b"<b/>");
        assert!(matches!(
            fetcher.fetch(&b).await,
            Err(Error::UnexpectedFetch(..))
        ));
        assert_eq!(fetcher.pending(), 1);
        assert_eq!(fetcher.history(), vec![b.clone(), b]);
    }

    #[tokio::test]
    async fn scripted_failure() {
        let fetcher = Fetcher::new();
        fetcher.expect(Expect::fail(
            "http://example.com/a.xsd",
            IoError::new(ErrorKind::NotFound, "gone"),
        ));
        let a = Locator::parse("http://example.com/a.xsd").unwrap();
        assert!(matches!(
            fetcher.fetch(&a).await,
            Err(Error::ErrorResponse(_))
        ));
        assert!(matches!(
            fetcher.fetch(&a).await,
            Err(Error::NothingIsExpected(_))
        ));
    }
}
