//! Compiles typed filters into SQL predicates with bound parameters

use rusqlite::types::Value;
use crate::query::{Filter, FilterValue};

/// A WHERE fragment plus the values for its `?` placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Predicate {
    pub fn compile(filter: &Filter) -> Self {
        let mut params = Vec::new();
        let sql = compile_into(filter, &mut params);
        Self { sql, params }
    }
}

fn compile_into(filter: &Filter, params: &mut Vec<Value>) -> String {
    match filter {
        Filter::Contains(field, text) => {
            params.push(Value::Text(format!("%{}%", escape_like(text))));
            format!("{} LIKE ? ESCAPE '\\'", field.column())
        }
        Filter::StartsWith(field, text) => {
            params.push(Value::Text(format!("{}%", escape_like(text))));
            format!("{} LIKE ? ESCAPE '\\'", field.column())
        }
        Filter::Equals(field, value) => {
            params.push(match value {
                FilterValue::Int(i) => Value::Integer(*i),
                FilterValue::Text(s) => Value::Text(s.clone()),
            });
            format!("{} = ?", field.column())
        }
        Filter::Range(field, lo, hi) => {
            let mut clauses = Vec::new();
            if let Some(lo) = lo {
                params.push(Value::Text(lo.clone()));
                clauses.push(format!("{} >= ?", field.column()));
            }
            if let Some(hi) = hi {
                params.push(Value::Text(hi.clone()));
                clauses.push(format!("{} < ?", field.column()));
            }
            if clauses.is_empty() {
                // Unbounded on both sides still requires a value
                format!("{} IS NOT NULL", field.column())
            } else {
                format!("({})", clauses.join(" AND "))
            }
        }
        Filter::And(parts) => join(parts, " AND ", "1", params),
        Filter::Or(parts) => join(parts, " OR ", "0", params),
    }
}

fn join(parts: &[Filter], sep: &str, empty: &str, params: &mut Vec<Value>) -> String {
    if parts.is_empty() {
        return empty.to_string();
    }
    let compiled: Vec<String> = parts.iter().map(|p| compile_into(p, params)).collect();
    format!("({})", compiled.join(sep))
}

/// Escape LIKE wildcards so user text matches literally
fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
