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

//! Predicates deciding whether a locus already satisfies a required
//! grouping or dedup key, so the step can run per-segment without a
//! redistribution.
//!
//! All three answer `false` for `HashedOJ`: its NULL rows may sit on any
//! segment, so a NULL group could surface on several segments at once.

use crate::context::PlannerContext;
use crate::eclass::EquivClassId;
use crate::locus::Locus;
use crate::metadata::RelSet;
use crate::scalar_expr::ScalarExpr;

/// True iff grouping on `exprs` can be done in place: the locus is `Hashed`
/// and every key component's class contains at least one of the given
/// expressions.
pub fn is_hashed_on_exprs(ctx: &PlannerContext, locus: &Locus, exprs: &[ScalarExpr]) -> bool {
    let Locus::Hashed { partkey, .. } = locus else {
        return false;
    };
    partkey.iter().all(|component| {
        exprs
            .iter()
            .any(|expr| ctx.equiv_class_of(expr) == Some(ctx.eclasses().resolve(*component)))
    })
}

/// Same shape as [`is_hashed_on_exprs`], comparing equivalence-class
/// identity directly. With `ignore_constants`, a constant-valued key
/// component is skipped: it contributes no real partitioning information.
pub fn is_hashed_on_eclasses(
    ctx: &PlannerContext,
    locus: &Locus,
    eclasses: &[EquivClassId],
    ignore_constants: bool,
) -> bool {
    let Locus::Hashed { partkey, .. } = locus else {
        return false;
    };
    let required: Vec<EquivClassId> = eclasses
        .iter()
        .map(|id| ctx.eclasses().resolve(*id))
        .collect();
    partkey.iter().all(|component| {
        let component = ctx.eclasses().resolve(*component);
        if ignore_constants && ctx.equiv_class_is_const(component) {
            return true;
        }
        required.contains(&component)
    })
}

/// True iff every key component's class contains an expression over
/// `relids` only. Decides whether rows duplicated by a flattened subquery
/// join can be deduped per-segment: the caller passes the relids of the
/// non-subquery side.
///
/// A member without any column reference is ignored; a constant carries no
/// placement information.
pub fn is_hashed_on_relids(ctx: &PlannerContext, locus: &Locus, relids: &RelSet) -> bool {
    let Locus::Hashed { partkey, .. } = locus else {
        return false;
    };
    partkey.iter().all(|component| {
        ctx.equiv_class_members(*component).iter().any(|member| {
            let used = member.used_relations();
            !used.is_empty() && used.is_subset(relids)
        })
    })
}
