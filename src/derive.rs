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

use crate::context::PlannerContext;
use crate::error::LocusError;
use crate::error::Result;
use crate::locus::Locus;
use crate::metadata::IndexType;
use crate::metadata::TableDistribution;
use crate::projection::map_component_via_targetlist;
use crate::scalar_expr::ScalarExpr;

/// Locus of a scan over a base relation, from its declared distribution
/// policy.
///
/// A hash-distributed table yields a `Hashed` locus with one key component
/// per distribution column; a randomly distributed table yields `Strewn`; a
/// replicated table's scan output is available on every segment, which is
/// `SegmentGeneral`. A relation the context knows nothing about is treated
/// as a catalog-only table on the entry process.
pub fn from_relation(ctx: &PlannerContext, table_index: IndexType) -> Locus {
    let Some(dist) = ctx.table_distribution(table_index) else {
        return Locus::Entry { segments: 1 };
    };
    match dist {
        TableDistribution::Hashed { columns, segments } => {
            let mut partkey = Vec::with_capacity(columns.len());
            for column in columns {
                let expr = ScalarExpr::column(table_index, *column);
                match ctx.equiv_class_of(&expr) {
                    Some(id) => partkey.push(id),
                    None => {
                        // Distribution key column unknown to the session's
                        // equality reasoning; claim nothing.
                        log::debug!(
                            "no equivalence class for distribution key {expr}, \
                             scan locus degrades to strewn"
                        );
                        return Locus::Strewn {
                            segments: *segments,
                        };
                    }
                }
            }
            Locus::Hashed {
                partkey,
                segments: *segments,
            }
        }
        TableDistribution::Random { segments } => Locus::Strewn {
            segments: *segments,
        },
        TableDistribution::Replicated { segments } => Locus::SegmentGeneral {
            segments: *segments,
        },
        TableDistribution::SingleSegment { segments } => Locus::SingleQE {
            segments: *segments,
        },
        TableDistribution::General { segments } => Locus::General {
            segments: *segments,
        },
        TableDistribution::Entry { segments } => Locus::Entry {
            segments: *segments,
        },
    }
}

/// `Hashed` locus for data redistributed on the given expressions, one key
/// component per expression, order and count preserved.
///
/// Fails with `InvalidLocus` if any expression is unresolved by the
/// session's equivalence reasoning: a key the planner cannot reason about
/// must not be constructed.
pub fn from_exprs(
    ctx: &PlannerContext,
    exprs: &[ScalarExpr],
    segments: usize,
) -> Result<Locus> {
    let mut partkey = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let id = ctx.equiv_class_of(expr).ok_or_else(|| {
            LocusError::InvalidLocus(format!(
                "no equivalence class for partition key expression {expr}"
            ))
        })?;
        partkey.push(id);
    }
    Locus::hashed(partkey, segments)
}

/// Re-express a subplan's output locus as if it were a base relation with
/// id `subquery_relid`, substituting each key component with a reference to
/// the output column that computes it. A component with no matching output
/// column drops the whole key, and the result degrades to `Strewn` at the
/// same segment count.
pub fn from_subquery(
    ctx: &PlannerContext,
    subplan_locus: &Locus,
    subplan_targetlist: &[ScalarExpr],
    subquery_relid: IndexType,
) -> Locus {
    match subplan_locus {
        Locus::Hashed { partkey, segments } => {
            let mut mapped = Vec::with_capacity(partkey.len());
            for component in partkey {
                match map_component_via_targetlist(
                    ctx,
                    *component,
                    subplan_targetlist,
                    None,
                    subquery_relid,
                ) {
                    Some(id) => mapped.push(id),
                    None => {
                        log::debug!(
                            "subquery output hides partition key of {subplan_locus}, \
                             degrading to strewn"
                        );
                        return Locus::Strewn {
                            segments: *segments,
                        };
                    }
                }
            }
            Locus::Hashed {
                partkey: mapped,
                segments: *segments,
            }
        }
        Locus::HashedOJ { partkey, segments } => {
            let mut mapped = Vec::with_capacity(partkey.len());
            for component in partkey {
                let remapped = component.iter().find_map(|id| {
                    map_component_via_targetlist(
                        ctx,
                        *id,
                        subplan_targetlist,
                        None,
                        subquery_relid,
                    )
                });
                match remapped {
                    Some(id) => mapped.push(vec![id]),
                    None => {
                        log::debug!(
                            "subquery output hides partition key of {subplan_locus}, \
                             degrading to strewn"
                        );
                        return Locus::Strewn {
                            segments: *segments,
                        };
                    }
                }
            }
            Locus::HashedOJ {
                partkey: mapped,
                segments: *segments,
            }
        }
        other => other.clone(),
    }
}
