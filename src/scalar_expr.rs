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

use enum_as_inner::EnumAsInner;

use crate::metadata::ColumnSet;
use crate::metadata::IndexType;
use crate::metadata::RelSet;

/// A scalar expression over bound columns.
///
/// The locus algebra only needs to tell column references, constants and
/// computed expressions apart; everything else about an expression (types,
/// function resolution) belongs to the enclosing planner.
#[derive(
    Clone, Debug, Hash, Eq, PartialEq, serde::Serialize, serde::Deserialize, EnumAsInner,
)]
pub enum ScalarExpr {
    BoundColumnRef(BoundColumnRef),
    ConstantExpr(ConstantExpr),
    FunctionCall(FunctionCall),
}

impl ScalarExpr {
    /// Ordinal column reference into a relation's output.
    pub fn column(table_index: IndexType, column_index: IndexType) -> Self {
        ScalarExpr::BoundColumnRef(BoundColumnRef {
            table_index,
            column_index,
        })
    }

    pub fn constant(value: Scalar) -> Self {
        ScalarExpr::ConstantExpr(ConstantExpr { value })
    }

    pub fn func(name: impl Into<String>, arguments: Vec<ScalarExpr>) -> Self {
        ScalarExpr::FunctionCall(FunctionCall {
            func_name: name.into(),
            arguments,
        })
    }

    /// The set of relations referenced by this expression.
    pub fn used_relations(&self) -> RelSet {
        let mut rels = RelSet::new();
        self.collect_relations(&mut rels);
        rels
    }

    fn collect_relations(&self, rels: &mut RelSet) {
        match self {
            ScalarExpr::BoundColumnRef(column) => {
                rels.insert(column.table_index);
            }
            ScalarExpr::ConstantExpr(_) => {}
            ScalarExpr::FunctionCall(func) => {
                for argument in &func.arguments {
                    argument.collect_relations(rels);
                }
            }
        }
    }

    /// The set of column ordinals referenced by this expression, across all
    /// relations.
    pub fn used_columns(&self) -> ColumnSet {
        let mut columns = ColumnSet::new();
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns(&self, columns: &mut ColumnSet) {
        match self {
            ScalarExpr::BoundColumnRef(column) => {
                columns.insert(column.column_index);
            }
            ScalarExpr::ConstantExpr(_) => {}
            ScalarExpr::FunctionCall(func) => {
                for argument in &func.arguments {
                    argument.collect_columns(columns);
                }
            }
        }
    }

    /// True if the expression references no columns at all.
    pub fn is_constant_valued(&self) -> bool {
        match self {
            ScalarExpr::BoundColumnRef(_) => false,
            ScalarExpr::ConstantExpr(_) => true,
            ScalarExpr::FunctionCall(func) => {
                func.arguments.iter().all(ScalarExpr::is_constant_valued)
            }
        }
    }
}

#[derive(Clone, Debug, Hash, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundColumnRef {
    pub table_index: IndexType,
    pub column_index: IndexType,
}

#[derive(Clone, Debug, Hash, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConstantExpr {
    pub value: Scalar,
}

#[derive(Clone, Debug, Hash, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FunctionCall {
    pub func_name: String,
    pub arguments: Vec<ScalarExpr>,
}

/// Constant values, reduced to what distribution reasoning needs.
#[derive(Clone, Debug, Hash, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Scalar {
    Null,
    Boolean(bool),
    Number(i64),
    String(String),
}

impl Display for ScalarExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScalarExpr::BoundColumnRef(column) => {
                write!(f, "#{}.{}", column.table_index, column.column_index)
            }
            ScalarExpr::ConstantExpr(constant) => match &constant.value {
                Scalar::Null => write!(f, "NULL"),
                Scalar::Boolean(v) => write!(f, "{v}"),
                Scalar::Number(v) => write!(f, "{v}"),
                Scalar::String(v) => write!(f, "'{v}'"),
            },
            ScalarExpr::FunctionCall(func) => {
                write!(f, "{}(", func.func_name)?;
                for (i, argument) in func.arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ")")
            }
        }
    }
}
