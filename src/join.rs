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

use itertools::Itertools;

use crate::error::LocusError;
use crate::error::Result;
use crate::locus::Locus;
use crate::locus::OjPartitionKey;

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    LeftSemi,
    LeftAnti,
}

impl JoinType {
    /// True if unmatched rows of either side survive padded with NULLs.
    pub fn is_outer(&self) -> bool {
        matches!(self, JoinType::Left | JoinType::Right | JoinType::Full)
    }
}

impl Display for JoinType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
            JoinType::Left => write!(f, "LEFT OUTER"),
            JoinType::Right => write!(f, "RIGHT OUTER"),
            JoinType::Full => write!(f, "FULL OUTER"),
            JoinType::LeftSemi => write!(f, "LEFT SEMI"),
            JoinType::LeftAnti => write!(f, "LEFT ANTI"),
        }
    }
}

/// Locus of the result of joining two inputs with the given loci.
///
/// The decision never fails on an unresolvable combination: incompatible
/// keys or segment counts fall back to [`Locus::Strewn`], which forces a
/// redistribution downstream. The only error is a structurally invalid
/// input locus.
pub fn join(join_type: JoinType, a: &Locus, b: &Locus) -> Result<Locus> {
    if !a.is_valid() {
        return Err(LocusError::InvalidLocus(format!(
            "join input {a} fails structural check"
        )));
    }
    if !b.is_valid() {
        return Err(LocusError::InvalidLocus(format!(
            "join input {b} fails structural check"
        )));
    }

    // A placeholder input leaves nothing to say about the output.
    match (a.segments(), b.segments()) {
        (None, None) => return Ok(Locus::Null),
        (None, Some(segments)) | (Some(segments), None) => {
            return Locus::strewn(segments);
        }
        (Some(_), Some(_)) => {}
    }
    let common = common_segments(a, b);

    if a.is_strewn() || b.is_strewn() {
        return Locus::strewn(common);
    }

    // Both confined to a single process: entry-only data forces entry
    // execution.
    if a.is_bottleneck() && b.is_bottleneck() {
        return if a.is_entry() || b.is_entry() {
            Locus::entry(common)
        } else {
            Locus::single_qe(common)
        };
    }

    // General data is compatible with any locus.
    if a.is_general() {
        return Ok(b.clone());
    }
    if b.is_general() {
        return Ok(a.clone());
    }

    if a.is_replicated_like() && b.is_replicated_like() {
        return if a.is_replicated() && b.is_replicated() {
            Locus::replicated(common)
        } else {
            Locus::segment_general(common)
        };
    }

    if a.is_replicated_like() || b.is_replicated_like() {
        let (covering, other) = if a.is_replicated_like() {
            (a, b)
        } else {
            (b, a)
        };
        if other.is_bottleneck() {
            return match other {
                Locus::Entry { .. } => Locus::entry(common),
                _ => Locus::single_qe(common),
            };
        }
        // Joining against a full copy leaves an existing partitioning
        // untouched, as long as the copy spans every partitioned segment.
        if (other.is_hashed() || other.is_hashed_oj())
            && covering.segments() >= other.segments()
        {
            return Ok(other.clone());
        }
        log::debug!("join: {covering} does not cover {other}, degrading to strewn");
        return Locus::strewn(common);
    }

    if (a.is_hashed() || a.is_hashed_oj()) && (b.is_hashed() || b.is_hashed_oj()) {
        if a.segments() == b.segments() {
            if let Some(result) = join_hashed(join_type, a, b) {
                return Ok(result);
            }
        }
        log::debug!("join: {a} and {b} are not co-partitioned, degrading to strewn");
        return Locus::strewn(common);
    }

    // Partitioned against bottleneck, or any leftover pairing: unknown.
    Locus::strewn(common)
}

/// Combine two hashed loci with equal segment counts. `None` if the keys
/// are not pairwise compatible.
fn join_hashed(join_type: JoinType, a: &Locus, b: &Locus) -> Option<Locus> {
    if a.degree() != b.degree() {
        return None;
    }
    let segments = a.segments().expect("hashed locus has a segment count");

    match (a, b) {
        (
            Locus::Hashed { partkey: ka, .. },
            Locus::Hashed { partkey: kb, .. },
        ) => {
            if ka.iter().zip(kb.iter()).any(|(ca, cb)| ca != cb) {
                return None;
            }
            if join_type.is_outer() {
                // NULL-padded rows may now surface on any segment, so both
                // sides' keys downgrade together.
                Some(Locus::HashedOJ {
                    partkey: oj_union(
                        &ka.iter().map(|c| vec![*c]).collect::<OjPartitionKey>(),
                        &kb.iter().map(|c| vec![*c]).collect::<OjPartitionKey>(),
                    ),
                    segments,
                })
            } else {
                Some(Locus::Hashed {
                    partkey: ka.clone(),
                    segments,
                })
            }
        }
        (
            Locus::Hashed { partkey: kh, .. },
            Locus::HashedOJ { partkey: koj, .. },
        )
        | (
            Locus::HashedOJ { partkey: koj, .. },
            Locus::Hashed { partkey: kh, .. },
        ) => {
            if kh
                .iter()
                .zip(koj.iter())
                .any(|(ch, coj)| !coj.contains(ch))
            {
                return None;
            }
            let h_is_left = a.is_hashed();
            match join_type {
                // The inner equijoin on the key discards NULL-keyed rows,
                // so the strict side's placement claim holds for every
                // surviving row.
                JoinType::Inner => Some(Locus::Hashed {
                    partkey: kh.clone(),
                    segments,
                }),
                // Semi/anti output is a subset of left rows; the left
                // side's claim carries over unchanged.
                JoinType::LeftSemi | JoinType::LeftAnti => {
                    if h_is_left {
                        Some(Locus::Hashed {
                            partkey: kh.clone(),
                            segments,
                        })
                    } else {
                        Some(Locus::HashedOJ {
                            partkey: koj.clone(),
                            segments,
                        })
                    }
                }
                _ => Some(Locus::HashedOJ {
                    partkey: oj_union(
                        &kh.iter().map(|c| vec![*c]).collect::<OjPartitionKey>(),
                        koj,
                    ),
                    segments,
                }),
            }
        }
        (
            Locus::HashedOJ { partkey: ka, .. },
            Locus::HashedOJ { partkey: kb, .. },
        ) => {
            if ka
                .iter()
                .zip(kb.iter())
                .any(|(ca, cb)| !ca.iter().any(|id| cb.contains(id)))
            {
                return None;
            }
            match join_type {
                JoinType::LeftSemi | JoinType::LeftAnti => Some(Locus::HashedOJ {
                    partkey: ka.clone(),
                    segments,
                }),
                _ => Some(Locus::HashedOJ {
                    partkey: oj_union(ka, kb),
                    segments,
                }),
            }
        }
        _ => unreachable!("join_hashed called with non-hashed inputs"),
    }
}

/// Per-position union of two OJ keys of equal degree.
fn oj_union(a: &OjPartitionKey, b: &OjPartitionKey) -> OjPartitionKey {
    a.iter()
        .zip(b.iter())
        .map(|(ca, cb)| {
            ca.iter()
                .chain(cb.iter())
                .copied()
                .sorted()
                .dedup()
                .collect()
        })
        .collect()
}

fn common_segments(a: &Locus, b: &Locus) -> usize {
    match (a.segments(), b.segments()) {
        (Some(x), Some(y)) => x.min(y),
        (Some(x), None) | (None, Some(x)) => x,
        (None, None) => 1,
    }
}
