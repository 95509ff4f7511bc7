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

use std::collections::HashMap;

use crate::eclass::EquivClassId;
use crate::eclass::EquivalenceClasses;
use crate::metadata::IndexType;
use crate::metadata::TableDistribution;
use crate::scalar_expr::ScalarExpr;

/// Read-only planning context for one planning session.
///
/// Holds the expression equivalence registry and the declared distribution
/// policy of every relation in the query. The planner populates it while
/// binding and digesting predicates; the locus algebra only ever reads it.
/// One context belongs to one query, so there is no cross-session state.
#[derive(Clone, Debug, Default)]
pub struct PlannerContext {
    eclasses: EquivalenceClasses,
    table_dists: HashMap<IndexType, TableDistribution>,
}

impl PlannerContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the declared distribution policy of a base relation.
    pub fn register_table(&mut self, table_index: IndexType, dist: TableDistribution) {
        self.table_dists.insert(table_index, dist);
    }

    pub fn table_distribution(&self, table_index: IndexType) -> Option<&TableDistribution> {
        self.table_dists.get(&table_index)
    }

    pub fn eclasses(&self) -> &EquivalenceClasses {
        &self.eclasses
    }

    pub fn eclasses_mut(&mut self) -> &mut EquivalenceClasses {
        &mut self.eclasses
    }

    /// The canonical equivalence class containing `expr`, if the session
    /// has one registered.
    pub fn equiv_class_of(&self, expr: &ScalarExpr) -> Option<EquivClassId> {
        self.eclasses.class_of(expr)
    }

    pub fn equiv_class_members(&self, id: EquivClassId) -> &[ScalarExpr] {
        self.eclasses.members(id)
    }

    pub fn equiv_class_is_const(&self, id: EquivClassId) -> bool {
        self.eclasses.is_const(id)
    }
}
