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

use std::collections::HashSet;

/// Planner uses [`usize`] as its index type.
///
/// Tables, columns and equivalence classes are all identified with it.
pub type IndexType = usize;

/// A set of columns identified by their IndexType.
pub type ColumnSet = HashSet<IndexType>;

/// A set of relations (range-table entries) identified by their IndexType.
pub type RelSet = HashSet<IndexType>;

/// The declared distribution policy of a base relation, as recorded in the
/// catalog. [`crate::from_relation`] turns this into a [`crate::Locus`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TableDistribution {
    /// Hash distributed on the given column ordinals.
    Hashed {
        columns: Vec<IndexType>,
        segments: usize,
    },
    /// Randomly (round-robin) distributed; no placement can be assumed.
    Random { segments: usize },
    /// A full copy of the table is stored on every segment.
    Replicated { segments: usize },
    /// All rows live on a single segment.
    SingleSegment { segments: usize },
    /// Data is self-contained in the plan or available to any process.
    General { segments: usize },
    /// Catalog-only table, readable only by the entry process.
    Entry { segments: usize },
}

impl TableDistribution {
    pub fn segments(&self) -> usize {
        match self {
            TableDistribution::Hashed { segments, .. }
            | TableDistribution::Random { segments }
            | TableDistribution::Replicated { segments }
            | TableDistribution::SingleSegment { segments }
            | TableDistribution::General { segments }
            | TableDistribution::Entry { segments } => *segments,
        }
    }
}
