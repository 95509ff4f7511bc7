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

use path_locus::from_exprs;
use path_locus::from_relation;
use path_locus::from_subquery;
use path_locus::Locus;
use path_locus::PlannerContext;
use path_locus::TableDistribution;
use pretty_assertions::assert_eq;

use crate::fixture::col;
use crate::fixture::hashed_on;
use crate::fixture::two_table_context;
use crate::fixture::SEGMENTS;

#[test]
fn test_from_relation_hash_policy() {
    let (ctx, class_a, _) = two_table_context();
    let locus = from_relation(&ctx, 1);
    assert_eq!(locus, hashed_on(class_a, SEGMENTS));
    assert_eq!(locus.degree(), 1);
    assert_eq!(locus.segments(), Some(SEGMENTS));
    assert!(ctx.equiv_class_members(class_a).contains(&col(1, 0)));
}

#[test]
fn test_from_relation_other_policies() {
    let mut ctx = PlannerContext::new();
    ctx.register_table(3, TableDistribution::Random { segments: 4 });
    ctx.register_table(4, TableDistribution::Replicated { segments: 4 });
    ctx.register_table(5, TableDistribution::SingleSegment { segments: 4 });
    ctx.register_table(6, TableDistribution::General { segments: 4 });
    ctx.register_table(7, TableDistribution::Entry { segments: 1 });

    assert_eq!(from_relation(&ctx, 3), Locus::strewn(4).unwrap());
    assert_eq!(from_relation(&ctx, 4), Locus::segment_general(4).unwrap());
    assert_eq!(from_relation(&ctx, 5), Locus::single_qe(4).unwrap());
    assert_eq!(from_relation(&ctx, 6), Locus::general(4).unwrap());
    assert_eq!(from_relation(&ctx, 7), Locus::entry(1).unwrap());
    // Unknown relation: catalog-only data on the entry process.
    assert_eq!(from_relation(&ctx, 99), Locus::entry(1).unwrap());
}

#[test]
fn test_from_relation_unresolved_key_degrades() {
    let mut ctx = PlannerContext::new();
    ctx.register_table(1, TableDistribution::Hashed {
        columns: vec![0, 1],
        segments: 4,
    });
    // Only column 0 has a registered class.
    ctx.eclasses_mut().add_class(vec![col(1, 0)]);
    assert_eq!(from_relation(&ctx, 1), Locus::strewn(4).unwrap());
}

#[test]
fn test_from_exprs_preserves_order_and_count() {
    let (ctx, class_a, class_b) = two_table_context();
    let locus = from_exprs(&ctx, &[col(2, 0), col(1, 0)], SEGMENTS).unwrap();
    assert_eq!(
        locus,
        Locus::hashed(vec![class_b, class_a], SEGMENTS).unwrap()
    );
    assert_eq!(locus.degree(), 2);
}

#[test]
fn test_from_exprs_rejects_unresolved() {
    let (ctx, _, _) = two_table_context();
    assert!(from_exprs(&ctx, &[col(1, 5)], SEGMENTS).is_err());
    assert!(from_exprs(&ctx, &[], SEGMENTS).is_err());
}

#[test]
fn test_from_subquery_remaps_key_to_output_columns() {
    let (mut ctx, class_a, _) = two_table_context();
    // Subquery output: SELECT c1, c0 FROM t1; flattened as relation 20.
    let targetlist = [col(1, 1), col(1, 0)];
    ctx.eclasses_mut().add_member(class_a, col(20, 1));

    let locus = from_subquery(&ctx, &hashed_on(class_a, SEGMENTS), &targetlist, 20);
    assert_eq!(locus, hashed_on(class_a, SEGMENTS));
}

#[test]
fn test_from_subquery_drops_hidden_key() {
    let (ctx, class_a, _) = two_table_context();
    // The distribution column is not part of the subquery output.
    let targetlist = [col(1, 1)];
    let locus = from_subquery(&ctx, &hashed_on(class_a, SEGMENTS), &targetlist, 20);
    assert_eq!(locus, Locus::strewn(SEGMENTS).unwrap());
}

#[test]
fn test_from_subquery_passes_non_hashed_through() {
    let (ctx, _, _) = two_table_context();
    let locus = Locus::single_qe(SEGMENTS).unwrap();
    assert_eq!(from_subquery(&ctx, &locus, &[], 20), locus);
}
