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
use crate::eclass::EquivClassId;
use crate::locus::Locus;
use crate::metadata::IndexType;
use crate::metadata::RelSet;
use crate::scalar_expr::ScalarExpr;

/// Re-express `locus` in terms of a projection's output.
///
/// Each partition-key component is remapped to an expression reachable
/// after the projection: a targetlist item belonging to the component's
/// equivalence class (replaced by the matching `newvarlist` item when one is
/// supplied, else by a column reference into `new_relid`), or a class
/// member that does not reference the projected-away `input_rels` at all.
/// If any component fails to map, the result degrades to [`Locus::Strewn`]
/// at the same segment count: losing partitioning information is safe,
/// silently keeping a wrong key is not. Non-hashed loci pass through
/// unchanged.
pub fn pull_above_projection(
    ctx: &PlannerContext,
    locus: &Locus,
    input_rels: &RelSet,
    targetlist: &[ScalarExpr],
    newvarlist: Option<&[ScalarExpr]>,
    new_relid: IndexType,
) -> Locus {
    match locus {
        Locus::Hashed { partkey, segments } => {
            let mut mapped = Vec::with_capacity(partkey.len());
            for component in partkey {
                match map_component(ctx, *component, input_rels, targetlist, newvarlist, new_relid)
                {
                    Some(id) => mapped.push(id),
                    None => {
                        log::debug!(
                            "projection drops partition key of {locus}, degrading to strewn"
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
                    map_component(ctx, *id, input_rels, targetlist, newvarlist, new_relid)
                });
                match remapped {
                    Some(id) => mapped.push(vec![id]),
                    None => {
                        log::debug!(
                            "projection drops partition key of {locus}, degrading to strewn"
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

/// Map one key component through the targetlist. Returns the component's
/// class after the projection, or `None` if the projection makes it
/// unreachable.
fn map_component(
    ctx: &PlannerContext,
    component: EquivClassId,
    input_rels: &RelSet,
    targetlist: &[ScalarExpr],
    newvarlist: Option<&[ScalarExpr]>,
    new_relid: IndexType,
) -> Option<EquivClassId> {
    let component = ctx.eclasses().resolve(component);

    // A projected output item computes a member of this class.
    if let Some(id) = map_component_via_targetlist(ctx, component, targetlist, newvarlist, new_relid)
    {
        return Some(id);
    }

    // A member that does not touch the projected-away inputs survives as
    // is, class unchanged.
    ctx.equiv_class_members(component)
        .iter()
        .find(|member| member.used_relations().is_disjoint(input_rels))
        .map(|_| component)
}

/// Targetlist half of the component mapping: locate a projected item in the
/// component's class and re-express it over the projection's output. Also
/// used by [`crate::from_subquery`], which allows no verbatim fallback.
pub(crate) fn map_component_via_targetlist(
    ctx: &PlannerContext,
    component: EquivClassId,
    targetlist: &[ScalarExpr],
    newvarlist: Option<&[ScalarExpr]>,
    new_relid: IndexType,
) -> Option<EquivClassId> {
    let component = ctx.eclasses().resolve(component);
    let ordinal = targetlist
        .iter()
        .position(|item| ctx.equiv_class_of(item) == Some(component))?;
    let replacement = match newvarlist {
        Some(exprs) => exprs.get(ordinal)?.clone(),
        None => ScalarExpr::column(new_relid, ordinal),
    };
    ctx.equiv_class_of(&replacement)
}

/// One representative expression per partition-key component, each usable
/// after the given targetlist: the member is either itself a targetlist
/// item, or references only columns that the targetlist carries; and it
/// uses only relations in `relids`. `None` when the key cannot be expressed
/// this way, or the locus has no key.
///
/// The enclosing planner uses this to build the hash keys of an explicit
/// redistribution step.
pub fn partkey_exprs(
    ctx: &PlannerContext,
    locus: &Locus,
    relids: &RelSet,
    targetlist: &[ScalarExpr],
) -> Option<Vec<ScalarExpr>> {
    let components: Vec<Vec<EquivClassId>> = match locus {
        Locus::Hashed { partkey, .. } => partkey.iter().map(|id| vec![*id]).collect(),
        Locus::HashedOJ { partkey, .. } => partkey.clone(),
        _ => return None,
    };

    let mut exprs = Vec::with_capacity(components.len());
    for component in &components {
        let representative = component.iter().find_map(|id| {
            ctx.equiv_class_members(*id)
                .iter()
                .find(|member| {
                    member.used_relations().is_subset(relids)
                        && member_reachable(member, targetlist)
                })
                .cloned()
        });
        exprs.push(representative?);
    }
    Some(exprs)
}

/// The member is a targetlist item itself, or every column it references
/// appears in the targetlist.
fn member_reachable(member: &ScalarExpr, targetlist: &[ScalarExpr]) -> bool {
    if targetlist.contains(member) {
        return true;
    }
    column_refs(member)
        .iter()
        .all(|column| targetlist.contains(column))
}

fn column_refs(expr: &ScalarExpr) -> Vec<ScalarExpr> {
    let mut refs = Vec::new();
    collect_column_refs(expr, &mut refs);
    refs
}

fn collect_column_refs(expr: &ScalarExpr, refs: &mut Vec<ScalarExpr>) {
    match expr {
        ScalarExpr::BoundColumnRef(_) => refs.push(expr.clone()),
        ScalarExpr::ConstantExpr(_) => {}
        ScalarExpr::FunctionCall(func) => {
            for argument in &func.arguments {
                collect_column_refs(argument, refs);
            }
        }
    }
}
