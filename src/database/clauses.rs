//! SQL fragment builders shared by the query macros.
//!
//! Each builder appends to the statement text and pushes the values that must
//! be bound, so placeholder numbering always follows `binds.len()`.

use time::OffsetDateTime;

use crate::database::values::DatabaseValue;

/// Appends `field = $n` conditions joined by `AND`. A `None` value renders
/// as `field IS NULL` and binds nothing.
pub fn push_conditions(
    query: &mut String,
    conditions: &[(&str, DatabaseValue)],
    binds: &mut Vec<DatabaseValue>,
) {
    for (i, (field, value)) in conditions.iter().enumerate() {
        if i > 0 {
            query.push_str(" AND ");
        }
        match value {
            DatabaseValue::None => query.push_str(&format!("{} IS NULL", field)),
            _ => {
                binds.push(value.clone());
                query.push_str(&format!("{} = {}", field, value.placeholder(binds.len())));
            }
        }
    }
}

/// Appends `(a ILIKE $n OR b ILIKE $n)` with a single bound pattern.
pub fn push_like_any(
    query: &mut String,
    fields: &[&str],
    pattern: String,
    binds: &mut Vec<DatabaseValue>,
) {
    binds.push(DatabaseValue::String(pattern));
    let index = binds.len();
    let matches = fields
        .iter()
        .map(|field| format!("{} ILIKE ${}", field, index))
        .collect::<Vec<String>>();
    query.push_str(&format!("({})", matches.join(" OR ")));
}

/// Appends `field = $n, ...` assignments for an `UPDATE ... SET`.
pub fn push_assignments(
    query: &mut String,
    assignments: &[(&str, DatabaseValue)],
    binds: &mut Vec<DatabaseValue>,
) {
    for (i, (field, value)) in assignments.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        binds.push(value.clone());
        query.push_str(&format!("{} = {}", field, value.placeholder(binds.len())));
    }
}

/// Appends `(a, b) VALUES ($1, $2)` for an `INSERT`.
pub fn push_values(
    query: &mut String,
    columns: &[(String, DatabaseValue)],
    binds: &mut Vec<DatabaseValue>,
) {
    let names = columns
        .iter()
        .map(|(field, _)| field.as_str())
        .collect::<Vec<&str>>();
    let mut placeholders = Vec::with_capacity(columns.len());
    for (_, value) in columns {
        binds.push(value.clone());
        placeholders.push(value.placeholder(binds.len()));
    }
    query.push_str(&format!(
        "({}) VALUES ({})",
        names.join(", "),
        placeholders.join(", ")
    ));
}

/// Sets `updated_at` to `now`, replacing a caller supplied value.
pub fn stamp_updated_at(params: &mut Vec<(&str, DatabaseValue)>, now: OffsetDateTime) {
    let updated_at: DatabaseValue = now.into();
    match params.iter().position(|(field, _)| *field == "updated_at") {
        Some(idx) => params[idx].1 = updated_at,
        None => params.push(("updated_at", updated_at)),
    }
}

/// Builds `UPDATE table SET ... WHERE ... RETURNING *` and its binds, in
/// placeholder order.
pub fn update_statement(
    table: &str,
    assignments: &[(&str, DatabaseValue)],
    conditions: &[(&str, DatabaseValue)],
) -> (String, Vec<DatabaseValue>) {
    let mut query = format!("UPDATE {} SET ", table);
    let mut binds = Vec::new();
    push_assignments(&mut query, assignments, &mut binds);
    if !conditions.is_empty() {
        query.push_str(" WHERE ");
        push_conditions(&mut query, conditions, &mut binds);
    }
    query.push_str(" RETURNING *");
    (query, binds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn conditions_number_placeholders_and_skip_nulls() {
        let mut query = String::from("SELECT * FROM resources WHERE ");
        let mut binds = Vec::new();
        push_conditions(
            &mut query,
            &[
                ("status", "Approved".into()),
                ("pincode", DatabaseValue::None),
                ("category", "Libraries".into()),
            ],
            &mut binds,
        );
        assert_eq!(
            query,
            "SELECT * FROM resources WHERE status = $1 AND pincode IS NULL AND category = $2"
        );
        assert_eq!(binds.len(), 2);
    }

    #[test]
    fn like_reuses_one_placeholder() {
        let mut query = String::new();
        let mut binds = vec![DatabaseValue::from("Approved")];
        push_like_any(&mut query, &["name", "address"], "%lib%".into(), &mut binds);
        assert_eq!(query, "(name ILIKE $2 OR address ILIKE $2)");
        assert_eq!(binds.len(), 2);
    }

    #[test]
    fn assignments_then_conditions_continue_numbering() {
        let mut query = String::from("UPDATE resources SET ");
        let mut binds = Vec::new();
        push_assignments(&mut query, &[("status", "Approved".into())], &mut binds);
        query.push_str(" WHERE ");
        push_conditions(
            &mut query,
            &[("id", "r-1".into()), ("status", "Pending".into())],
            &mut binds,
        );
        assert_eq!(
            query,
            "UPDATE resources SET status = $1 WHERE id = $2 AND status = $3"
        );
        assert_eq!(binds.len(), 3);
    }

    #[test]
    fn update_statement_stamps_once_and_returns_the_row() {
        let mut params = vec![("status", "Approved".into()), ("updated_at", "stale".into())];
        stamp_updated_at(&mut params, datetime!(2025-01-01 8:30 UTC));
        let (query, binds) = update_statement("users", &params, &[("id", "u-1".into())]);
        assert_eq!(
            query,
            "UPDATE users SET status = $1, updated_at = CAST($2 AS TIMESTAMPTZ) WHERE id = $3 RETURNING *"
        );
        assert_eq!(
            binds[1],
            DatabaseValue::DateTime("2025-01-01T08:30:00Z".into())
        );
    }

    #[test]
    fn values_render_casts() {
        let mut query = String::from("INSERT INTO resources ");
        let mut binds = Vec::new();
        push_values(
            &mut query,
            &[
                ("name".to_string(), "Central Library".into()),
                ("coordinates".to_string(), serde_json::json!([1.0, 2.0]).into()),
            ],
            &mut binds,
        );
        assert_eq!(
            query,
            "INSERT INTO resources (name, coordinates) VALUES ($1, CAST($2 AS JSONB))"
        );
    }
}
