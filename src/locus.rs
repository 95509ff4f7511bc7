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

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use enum_as_inner::EnumAsInner;

use crate::eclass::EquivClassId;
use crate::error::LocusError;
use crate::error::Result;

/// Partition key of a [`Locus::Hashed`] locus: one equivalence class per
/// key position.
pub type PartitionKey = Vec<EquivClassId>;

/// Partition key of a [`Locus::HashedOJ`] locus: at each position, a set of
/// equivalence classes treated as interchangeable. After an outer join,
/// several pre-join classes may describe the same post-join column, and
/// NULL-padded rows may sit on any segment.
pub type OjPartitionKey = Vec<Vec<EquivClassId>>;

/// Describes how the tuples of one plan node's output are distributed
/// across worker segments.
///
/// For the hashed variants, a tuple's placement is decided by a hash of its
/// partition key, an m-tuple of values computed from the key's equivalence
/// classes; any member of a class yields the same placement. `Hashed` places
/// every key value, all-NULL keys included, on exactly one segment.
/// `HashedOJ` relaxes that: NULLs introduced by an outer join's padding may
/// appear on any segment, so it is usable for join planning but never as
/// evidence that a grouping can run in place.
///
/// The segment count names the exact segments `0..segments-1` holding the
/// data for the partitioned and replicated variants; for `Entry`, `SingleQE`
/// and `General` it names the candidate set the single running process may
/// be placed on.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, EnumAsInner)]
pub enum Locus {
    /// Transient placeholder, expected to be replaced before the locus is
    /// used in plan construction.
    Null,
    /// A single process on the entry database.
    Entry { segments: usize },
    /// A single worker process on any database.
    SingleQE { segments: usize },
    /// Data available to any process; compatible with any locus.
    General { segments: usize },
    /// Data available on every segment, but not on the entry process.
    SegmentGeneral { segments: usize },
    /// A full copy of the data on every segment of the gang.
    Replicated { segments: usize },
    /// Hash partitioned on the key; NULL keys co-locate deterministically.
    Hashed {
        partkey: PartitionKey,
        segments: usize,
    },
    /// Hash partitioned, but NULL placement was relaxed by an outer join.
    HashedOJ {
        partkey: OjPartitionKey,
        segments: usize,
    },
    /// Partitioned on no known function; the conservative fallback.
    Strewn { segments: usize },
}

impl Locus {
    pub fn null() -> Locus {
        Locus::Null
    }

    pub fn entry(segments: usize) -> Result<Locus> {
        check_segments(segments)?;
        Ok(Locus::Entry { segments })
    }

    pub fn single_qe(segments: usize) -> Result<Locus> {
        check_segments(segments)?;
        Ok(Locus::SingleQE { segments })
    }

    pub fn general(segments: usize) -> Result<Locus> {
        check_segments(segments)?;
        Ok(Locus::General { segments })
    }

    pub fn segment_general(segments: usize) -> Result<Locus> {
        check_segments(segments)?;
        Ok(Locus::SegmentGeneral { segments })
    }

    pub fn replicated(segments: usize) -> Result<Locus> {
        check_segments(segments)?;
        Ok(Locus::Replicated { segments })
    }

    pub fn hashed(partkey: PartitionKey, segments: usize) -> Result<Locus> {
        check_segments(segments)?;
        if partkey.is_empty() {
            return Err(LocusError::InvalidLocus(
                "hashed locus requires a non-empty partition key".to_string(),
            ));
        }
        Ok(Locus::Hashed { partkey, segments })
    }

    pub fn hashed_oj(partkey: OjPartitionKey, segments: usize) -> Result<Locus> {
        check_segments(segments)?;
        if partkey.is_empty() {
            return Err(LocusError::InvalidLocus(
                "hashed-oj locus requires a non-empty partition key".to_string(),
            ));
        }
        if partkey.iter().any(Vec::is_empty) {
            return Err(LocusError::InvalidLocus(
                "hashed-oj partition key has an empty component".to_string(),
            ));
        }
        Ok(Locus::HashedOJ { partkey, segments })
    }

    pub fn strewn(segments: usize) -> Result<Locus> {
        check_segments(segments)?;
        Ok(Locus::Strewn { segments })
    }

    /// Length of the partition key; 0 for every non-hashed variant.
    pub fn degree(&self) -> usize {
        match self {
            Locus::Hashed { partkey, .. } => partkey.len(),
            Locus::HashedOJ { partkey, .. } => partkey.len(),
            _ => 0,
        }
    }

    /// The segment count, `None` for the `Null` placeholder.
    pub fn segments(&self) -> Option<usize> {
        match self {
            Locus::Null => None,
            Locus::Entry { segments }
            | Locus::SingleQE { segments }
            | Locus::General { segments }
            | Locus::SegmentGeneral { segments }
            | Locus::Replicated { segments }
            | Locus::Hashed { segments, .. }
            | Locus::HashedOJ { segments, .. }
            | Locus::Strewn { segments } => Some(*segments),
        }
    }

    /// Confined to a single running process.
    pub fn is_bottleneck(&self) -> bool {
        self.is_entry() || self.is_single_qe()
    }

    /// Partitioned across a gang, each segment holding a disjoint subset.
    pub fn is_partitioned(&self) -> bool {
        self.is_hashed() || self.is_hashed_oj() || self.is_strewn()
    }

    /// Data self-contained or fully copied, joinable against any
    /// partitioned locus without disturbing it.
    pub fn is_replicated_like(&self) -> bool {
        self.is_segment_general() || self.is_replicated()
    }

    /// Structural self-check. The sum type already prevents a partition key
    /// on the wrong variant; what remains is segment-count positivity and
    /// key non-emptiness.
    pub fn is_valid(&self) -> bool {
        match self {
            Locus::Null => true,
            Locus::Hashed { partkey, segments } => *segments >= 1 && !partkey.is_empty(),
            Locus::HashedOJ { partkey, segments } => {
                *segments >= 1 && !partkey.is_empty() && partkey.iter().all(|c| !c.is_empty())
            }
            other => other.segments().is_some_and(|segments| segments >= 1),
        }
    }
}

fn check_segments(segments: usize) -> Result<()> {
    if segments < 1 {
        return Err(LocusError::InvalidLocus(
            "locus requires a positive segment count".to_string(),
        ));
    }
    Ok(())
}

impl Display for Locus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Locus::Null => write!(f, "Null"),
            Locus::Entry { segments } => write!(f, "Entry({segments})"),
            Locus::SingleQE { segments } => write!(f, "SingleQE({segments})"),
            Locus::General { segments } => write!(f, "General({segments})"),
            Locus::SegmentGeneral { segments } => write!(f, "SegmentGeneral({segments})"),
            Locus::Replicated { segments } => write!(f, "Replicated({segments})"),
            Locus::Hashed { partkey, segments } => {
                write!(f, "Hashed[{}]({segments})", partkey.len())
            }
            Locus::HashedOJ { partkey, segments } => {
                write!(f, "HashedOJ[{}]({segments})", partkey.len())
            }
            Locus::Strewn { segments } => write!(f, "Strewn({segments})"),
        }
    }
}
