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

use crate::metadata::IndexType;
use crate::scalar_expr::ScalarExpr;

/// Handle to one equivalence class in an [`EquivalenceClasses`] registry.
///
/// Partition keys store these handles instead of owned expression trees, so
/// a locus stays a small value detached from the planner's expression graph.
#[derive(
    Clone,
    Copy,
    Debug,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct EquivClassId(pub IndexType);

/// A registry of expression equivalence classes for one planning session.
///
/// A class is a set of expressions constrained to be equal by the query's
/// predicates. The planner interns classes while digesting predicates and
/// merges two classes when an equality predicate links them; loci are
/// derived afterwards, so the ids they carry are canonical and the algebra
/// can compare them directly.
#[derive(Clone, Debug, Default)]
pub struct EquivalenceClasses {
    classes: Vec<ClassEntry>,
    // member expression -> canonical class id
    index: HashMap<ScalarExpr, EquivClassId>,
}

#[derive(Clone, Debug)]
struct ClassEntry {
    members: Vec<ScalarExpr>,
    is_const: bool,
    merged_into: Option<EquivClassId>,
}

impl EquivalenceClasses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a new class with the given members. A class containing a
    /// constant expression is constant-valued: it contributes no real
    /// partitioning information.
    pub fn add_class(&mut self, members: Vec<ScalarExpr>) -> EquivClassId {
        let id = EquivClassId(self.classes.len());
        let is_const = members.iter().any(ScalarExpr::is_constant_valued);
        for member in &members {
            self.index.insert(member.clone(), id);
        }
        self.classes.push(ClassEntry {
            members,
            is_const,
            merged_into: None,
        });
        id
    }

    /// Add one more member to an existing class.
    pub fn add_member(&mut self, id: EquivClassId, member: ScalarExpr) {
        let id = self.resolve(id);
        let entry = &mut self.classes[id.0];
        entry.is_const |= member.is_constant_valued();
        self.index.insert(member.clone(), id);
        entry.members.push(member);
    }

    /// Merge class `b` into class `a`, as when an equality predicate proves
    /// the two classes equal. Returns the canonical id of the merged class.
    pub fn merge(&mut self, a: EquivClassId, b: EquivClassId) -> EquivClassId {
        let a = self.resolve(a);
        let b = self.resolve(b);
        if a == b {
            return a;
        }
        let absorbed = std::mem::take(&mut self.classes[b.0].members);
        self.classes[b.0].merged_into = Some(a);
        let absorbed_const = self.classes[b.0].is_const;
        for member in &absorbed {
            self.index.insert(member.clone(), a);
        }
        let entry = &mut self.classes[a.0];
        entry.members.extend(absorbed);
        entry.is_const |= absorbed_const;
        a
    }

    /// Follow merge links to the canonical id.
    pub fn resolve(&self, mut id: EquivClassId) -> EquivClassId {
        while let Some(target) = self.classes[id.0].merged_into {
            id = target;
        }
        id
    }

    /// The canonical class containing `expr`, if any.
    pub fn class_of(&self, expr: &ScalarExpr) -> Option<EquivClassId> {
        self.index.get(expr).copied()
    }

    pub fn members(&self, id: EquivClassId) -> &[ScalarExpr] {
        &self.classes[self.resolve(id).0].members
    }

    pub fn is_const(&self, id: EquivClassId) -> bool {
        self.classes[self.resolve(id).0].is_const
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
