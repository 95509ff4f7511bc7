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

use path_locus::partkey_exprs;
use path_locus::pull_above_projection;
use path_locus::Locus;
use path_locus::RelSet;
use pretty_assertions::assert_eq;

use crate::fixture::col;
use crate::fixture::hashed_oj_on;
use crate::fixture::hashed_on;
use crate::fixture::two_table_context;
use crate::fixture::SEGMENTS;

#[test]
fn test_pull_above_projection_maps_all_components() {
    let (mut ctx, class_a, _) = two_table_context();
    // Projection over t1 producing (c1, c0) as relation 10.
    let targetlist = [col(1, 1), col(1, 0)];
    ctx.eclasses_mut().add_member(class_a, col(10, 1));

    let locus = hashed_on(class_a, SEGMENTS);
    let input_rels = RelSet::from([1]);
    let result = pull_above_projection(&ctx, &locus, &input_rels, &targetlist, None, 10);
    assert_eq!(result, hashed_on(class_a, SEGMENTS));
    assert_eq!(result.degree(), locus.degree());
}

#[test]
fn test_pull_above_projection_uses_replacement_exprs() {
    let (mut ctx, class_a, _) = two_table_context();
    let targetlist = [col(1, 0)];
    // The caller supplies the expression to plug in for targetlist item 0.
    let replacement = col(30, 7);
    ctx.eclasses_mut().add_member(class_a, replacement.clone());

    let locus = hashed_on(class_a, SEGMENTS);
    let input_rels = RelSet::from([1]);
    let result = pull_above_projection(
        &ctx,
        &locus,
        &input_rels,
        &targetlist,
        Some(std::slice::from_ref(&replacement)),
        0,
    );
    assert_eq!(result, hashed_on(class_a, SEGMENTS));
}

#[test]
fn test_pull_above_projection_keeps_outside_member_verbatim() {
    let (mut ctx, _, _) = two_table_context();
    // The component's class has a member over relation 5 only, which the
    // projection over relation 1 does not touch.
    let outside = ctx.eclasses_mut().add_class(vec![col(5, 0)]);
    let locus = hashed_on(outside, SEGMENTS);
    let input_rels = RelSet::from([1]);
    let result = pull_above_projection(&ctx, &locus, &input_rels, &[col(1, 1)], None, 10);
    assert_eq!(result, hashed_on(outside, SEGMENTS));
}

#[test]
fn test_pull_above_projection_degrades_on_unmapped_component() {
    let (ctx, class_a, class_b) = two_table_context();
    // Two-component key, but the projection only carries the first column.
    let targetlist = [col(1, 0)];
    let locus = Locus::hashed(vec![class_a, class_b], SEGMENTS).unwrap();
    let input_rels = RelSet::from([1, 2]);
    let result = pull_above_projection(&ctx, &locus, &input_rels, &targetlist, None, 10);
    assert_eq!(result, Locus::strewn(SEGMENTS).unwrap());
}

#[test]
fn test_pull_above_projection_unregistered_output_degrades() {
    let (ctx, class_a, _) = two_table_context();
    // The projected output column has no registered class, so the mapped
    // component cannot be named.
    let targetlist = [col(1, 0)];
    let locus = hashed_on(class_a, SEGMENTS);
    let input_rels = RelSet::from([1]);
    let result = pull_above_projection(&ctx, &locus, &input_rels, &targetlist, None, 10);
    assert_eq!(result, Locus::strewn(SEGMENTS).unwrap());
}

#[test]
fn test_pull_above_projection_remaps_oj_key() {
    let (mut ctx, class_a, class_b) = two_table_context();
    let targetlist = [col(2, 0)];
    ctx.eclasses_mut().add_member(class_b, col(10, 0));

    let locus = hashed_oj_on(vec![class_a, class_b], SEGMENTS);
    let input_rels = RelSet::from([1, 2]);
    let result = pull_above_projection(&ctx, &locus, &input_rels, &targetlist, None, 10);
    assert_eq!(result, hashed_oj_on(vec![class_b], SEGMENTS));
}

#[test]
fn test_pull_above_projection_passes_non_hashed_through() {
    let (ctx, _, _) = two_table_context();
    let locus = Locus::replicated(SEGMENTS).unwrap();
    let result = pull_above_projection(&ctx, &locus, &RelSet::from([1]), &[], None, 10);
    assert_eq!(result, locus);
}

#[test]
fn test_partkey_exprs_picks_reachable_members() {
    let (ctx, class_a, _) = two_table_context();
    let locus = hashed_on(class_a, SEGMENTS);
    let targetlist = [col(1, 0), col(1, 1)];

    let exprs = partkey_exprs(&ctx, &locus, &RelSet::from([1]), &targetlist);
    assert_eq!(exprs, Some(vec![col(1, 0)]));

    // The key is not expressible over relation 2 alone.
    assert_eq!(partkey_exprs(&ctx, &locus, &RelSet::from([2]), &targetlist), None);
    // Nor over a targetlist that hides the key column.
    assert_eq!(
        partkey_exprs(&ctx, &locus, &RelSet::from([1]), &[col(1, 1)]),
        None
    );
}

#[test]
fn test_partkey_exprs_non_hashed_has_no_key() {
    let (ctx, _, _) = two_table_context();
    let locus = Locus::strewn(SEGMENTS).unwrap();
    assert_eq!(partkey_exprs(&ctx, &locus, &RelSet::from([1]), &[]), None);
}
