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

//! Distribution locus algebra for a distributed query planner.
//!
//! A [`Locus`] describes how the tuples produced by one plan node are spread
//! across the worker segments of a parallel execution fleet. The planner
//! derives loci from base relations, combines them through joins, carries
//! them upward through projections, and queries them to decide whether a
//! grouping or dedup step can run in place or needs a redistribution first.
//!
//! Whenever the algebra cannot determine a precise distribution it answers
//! [`Locus::Strewn`] rather than failing: an unknown distribution forces a
//! redistribution downstream, which is always correct, if conservative.

mod compat;
mod context;
mod derive;
mod eclass;
mod error;
mod join;
mod locus;
mod metadata;
mod projection;
mod scalar_expr;

pub use compat::is_hashed_on_eclasses;
pub use compat::is_hashed_on_exprs;
pub use compat::is_hashed_on_relids;
pub use context::PlannerContext;
pub use derive::from_exprs;
pub use derive::from_relation;
pub use derive::from_subquery;
pub use eclass::EquivClassId;
pub use eclass::EquivalenceClasses;
pub use error::LocusError;
pub use error::Result;
pub use join::join;
pub use join::JoinType;
pub use locus::Locus;
pub use locus::OjPartitionKey;
pub use locus::PartitionKey;
pub use metadata::ColumnSet;
pub use metadata::IndexType;
pub use metadata::RelSet;
pub use metadata::TableDistribution;
pub use projection::partkey_exprs;
pub use projection::pull_above_projection;
pub use scalar_expr::BoundColumnRef;
pub use scalar_expr::ConstantExpr;
pub use scalar_expr::FunctionCall;
pub use scalar_expr::Scalar;
pub use scalar_expr::ScalarExpr;
