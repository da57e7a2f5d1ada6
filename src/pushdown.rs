//! SQL pushdown of the match rule
//!
//! Compiles "which stored grants authorize this request" into a parameterised
//! `WHERE` fragment, for stores that keep one column per attribute and one
//! `grant_<name>` column per declared attribute, with NULL for absent.
//!
//! Every column condition is rendered from [`Admits`], the same value the
//! in-memory matcher evaluates, so the two paths cannot disagree on wildcard
//! handling.

use crate::attributes::{names, AttributeSet, WILDCARD};
use crate::core::{GrantError, GrantResult};
use crate::permissions::{Admits, Pass};
use crate::records::{Requested, GRANT_PREFIX};

/// Attribute columns a grants table carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    resource: Vec<String>,
    declared: Vec<String>,
}

impl Columns {
    /// Every canonical attribute on both sides
    pub fn canonical() -> Self {
        let all: Vec<String> = names::CANONICAL.iter().map(|n| n.to_string()).collect();
        Self {
            resource: all.clone(),
            declared: all,
        }
    }

    /// Custom column sets; names must be `[a-z0-9_]+`
    pub fn new<R, D>(resource: R, declared: D) -> GrantResult<Self>
    where
        R: IntoIterator,
        R::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        let resource = validated(resource)?;
        let declared = validated(declared)?;
        Ok(Self { resource, declared })
    }

    pub fn resource(&self) -> &[String] {
        &self.resource
    }

    pub fn declared(&self) -> &[String] {
        &self.declared
    }
}

impl Default for Columns {
    fn default() -> Self {
        Self::canonical()
    }
}

/// A `WHERE` fragment with positional `?` parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlCondition {
    pub clause: String,
    pub params: Vec<String>,
}

/// Condition selecting the grants that authorize `requested`
pub fn grant_condition(requested: &Requested, columns: &Columns) -> SqlCondition {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    push_pass(&mut clauses, &mut params, &requested.resource, &columns.resource, Pass::Resource, "");
    push_pass(
        &mut clauses,
        &mut params,
        &requested.declared,
        &columns.declared,
        Pass::Relationship,
        GRANT_PREFIX,
    );

    let clause = if clauses.is_empty() {
        "1 = 1".to_string()
    } else {
        clauses.join(" AND ")
    };
    SqlCondition { clause, params }
}

fn push_pass(
    clauses: &mut Vec<String>,
    params: &mut Vec<String>,
    requested: &AttributeSet,
    columns: &[String],
    pass: Pass,
    prefix: &str,
) {
    for name in columns {
        let column = format!("{prefix}{name}");
        let admits = Admits::for_requested(requested.get(name), pass);
        if let Some(clause) = render(&column, admits, params) {
            clauses.push(clause);
        }
    }
}

fn render(column: &str, admits: Admits<'_>, params: &mut Vec<String>) -> Option<String> {
    match admits {
        Admits::Any => None,
        Admits::Nothing => Some(format!("{column} IS NULL")),
        Admits::Wildcard => {
            params.push(WILDCARD.to_string());
            Some(format!("({column} IS NULL OR {column} = ?)"))
        }
        Admits::Exact(value) => {
            params.push(value.to_string());
            Some(format!("({column} IS NULL OR {column} = ?)"))
        }
        Admits::ExactOrWildcard(value) => {
            params.push(value.to_string());
            params.push(WILDCARD.to_string());
            Some(format!("({column} IS NULL OR {column} IN (?, ?))"))
        }
    }
}

fn validated<I>(names: I) -> GrantResult<Vec<String>>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    names
        .into_iter()
        .map(Into::into)
        .map(|name: String| {
            let valid = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
            if valid {
                Ok(name)
            } else {
                Err(GrantError::invalid_config(format!("invalid column name {name:?}")))
            }
        })
        .collect()
}
