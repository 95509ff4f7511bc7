// Copyright 2021 Datafuse Labs
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Errors raised by the locus algebra.
///
/// An invalid locus is a planner-internal contract violation: callers must
/// not continue planning with it. Everything the algebra merely cannot
/// determine is answered with [`crate::Locus::Strewn`] instead of an error.
#[derive(Debug, thiserror::Error)]
pub enum LocusError {
    #[error("invalid locus: {0}")]
    InvalidLocus(String),
}

pub type Result<T> = std::result::Result<T, LocusError>;
