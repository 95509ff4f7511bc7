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

use path_locus::EquivClassId;
use path_locus::IndexType;
use path_locus::Locus;
use path_locus::PlannerContext;
use path_locus::ScalarExpr;
use path_locus::TableDistribution;

pub const SEGMENTS: usize = 4;

/// Column `column` of relation `table`.
pub fn col(table: IndexType, column: IndexType) -> ScalarExpr {
    ScalarExpr::column(table, column)
}

/// A context with two relations: table 1 hash-distributed on its column 0
/// and table 2 hash-distributed on its column 0, both on [`SEGMENTS`]
/// segments, each distribution column in its own equivalence class.
pub fn two_table_context() -> (PlannerContext, EquivClassId, EquivClassId) {
    let mut ctx = PlannerContext::new();
    ctx.register_table(1, TableDistribution::Hashed {
        columns: vec![0],
        segments: SEGMENTS,
    });
    ctx.register_table(2, TableDistribution::Hashed {
        columns: vec![0],
        segments: SEGMENTS,
    });
    let class_a = ctx.eclasses_mut().add_class(vec![col(1, 0)]);
    let class_b = ctx.eclasses_mut().add_class(vec![col(2, 0)]);
    (ctx, class_a, class_b)
}

/// Like [`two_table_context`], but with the join predicate
/// `t1.c0 = t2.c0` already digested: both columns share one class.
pub fn joined_context() -> (PlannerContext, EquivClassId) {
    let (mut ctx, class_a, class_b) = two_table_context();
    let merged = ctx.eclasses_mut().merge(class_a, class_b);
    (ctx, merged)
}

pub fn hashed_on(class: EquivClassId, segments: usize) -> Locus {
    Locus::hashed(vec![class], segments).unwrap()
}

pub fn hashed_oj_on(classes: Vec<EquivClassId>, segments: usize) -> Locus {
    Locus::hashed_oj(vec![classes], segments).unwrap()
}
