//! The SQL translation stage
//!
//! Turns statement text into structured [`Command`] values and clause
//! text into the typed trees the engine consumes. Clause parsing happens
//! here, once; the engine never re-interprets strings.
//!
//! The grammar deliberately keeps the source engine's quirks:
//! `" AND "` / `" OR "` are literal, case-sensitive splits; a comparison
//! probes `=` before `>` before `<`; clause text matching none of these
//! parses to [`Condition::Always`] (fail-open); malformed join steps are
//! dropped rather than rejected.

mod statement;

pub use statement::Statement;

use crate::error::{Error, Result};
use crate::types::command::{ColumnSpec, Command};
use crate::types::expression::{
    AggregateArg, AggregateFunc, AggregateSpec, CompareOp, Condition, JoinStep, OrderBy,
    Projection, SortDirection,
};
use crate::types::value::Value;
use tracing::warn;

/// Parses one SQL statement.
///
/// Positional inserts come back as [`Statement::PositionalInsert`]; the
/// facade resolves them against the schema's column order.
pub fn parse_statement(sql: &str) -> Result<Statement> {
    let sql = normalize(sql);
    let upper = sql.to_ascii_uppercase();
    if upper.starts_with("CREATE TABLE") {
        parse_create_table(&sql)
    } else if upper.starts_with("INSERT INTO") {
        parse_insert(&sql)
    } else if upper.starts_with("SELECT") {
        parse_select(&sql)
    } else if upper.starts_with("UPDATE") {
        parse_update(&sql)
    } else if upper.starts_with("DELETE FROM") {
        parse_delete(&sql)
    } else if upper.starts_with("CREATE INDEX") {
        parse_create_index(&sql)
    } else {
        Err(Error::Parse(format!("unsupported SQL statement: {sql}")))
    }
}

/// Collapses whitespace runs and strips a trailing semicolon.
fn normalize(sql: &str) -> String {
    sql.trim()
        .trim_end_matches(';')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_create_table(sql: &str) -> Result<Statement> {
    let open = sql
        .find('(')
        .ok_or_else(|| Error::Parse(format!("invalid CREATE TABLE syntax: {sql}")))?;
    let close = sql
        .rfind(')')
        .filter(|close| *close > open)
        .ok_or_else(|| Error::Parse(format!("invalid CREATE TABLE syntax: {sql}")))?;
    let table = sql["CREATE TABLE".len()..open].trim();
    if table.is_empty() || table.contains(' ') {
        return Err(Error::Parse(format!("invalid CREATE TABLE syntax: {sql}")));
    }

    let mut columns = Vec::new();
    let mut primary_key: Option<String> = None;
    let mut unique_keys: Vec<String> = Vec::new();
    for token in split_top_level(&sql[open + 1..close], ',') {
        let upper = token.to_ascii_uppercase();
        if upper.starts_with("PRIMARY KEY") {
            let column = parenthesized(&token).ok_or_else(|| {
                Error::Parse(format!("invalid PRIMARY KEY constraint: {token}"))
            })?;
            set_primary_key(&mut primary_key, column)?;
        } else if upper.starts_with("UNIQUE") {
            let column = parenthesized(&token)
                .ok_or_else(|| Error::Parse(format!("invalid UNIQUE constraint: {token}")))?;
            unique_keys.push(column);
        } else {
            let mut parts = token.split_whitespace();
            let (Some(name), Some(type_token)) = (parts.next(), parts.next()) else {
                return Err(Error::Parse(format!("invalid column definition: {token}")));
            };
            let modifiers: Vec<String> = parts.map(str::to_ascii_uppercase).collect();
            let modifier_text = modifiers.join(" ");
            if modifier_text.contains("PRIMARY KEY") {
                set_primary_key(&mut primary_key, name.to_string())?;
            }
            if modifiers.iter().any(|m| m == "UNIQUE") {
                unique_keys.push(name.to_string());
            }
            columns.push(ColumnSpec {
                name: name.to_string(),
                type_token: type_token.to_string(),
                not_null: modifier_text.contains("NOT NULL"),
            });
        }
    }

    Ok(Statement::Command(Command::CreateTable {
        table: table.to_string(),
        columns,
        primary_key,
        unique_keys,
    }))
}

fn set_primary_key(primary_key: &mut Option<String>, column: String) -> Result<()> {
    if let Some(existing) = primary_key {
        return Err(Error::Parse(format!(
            "multiple primary keys defined: {existing} and {column}"
        )));
    }
    *primary_key = Some(column);
    Ok(())
}

/// The content of the first `(...)` group in a token.
fn parenthesized(token: &str) -> Option<String> {
    let open = token.find('(')?;
    let close = token[open..].find(')')? + open;
    Some(token[open + 1..close].trim().to_string())
}

fn parse_insert(sql: &str) -> Result<Statement> {
    let rest = sql["INSERT INTO".len()..].trim();
    let (table, rest) = split_first_word(rest);
    if table.is_empty() {
        return Err(Error::Parse(format!("invalid INSERT syntax: {sql}")));
    }
    let values_at = find_keyword(rest, "VALUES")
        .ok_or_else(|| Error::Parse(format!("invalid INSERT syntax: {sql}")))?;
    let columns_text = rest[..values_at].trim();
    let values_text = rest[values_at + "VALUES".len()..].trim();
    let values_text = values_text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(|| Error::Parse(format!("invalid INSERT syntax: {sql}")))?;
    let values: Vec<Value> = split_top_level(values_text, ',')
        .iter()
        .map(|token| parse_literal(token))
        .collect();

    if columns_text.is_empty() {
        return Ok(Statement::PositionalInsert {
            table: table.to_string(),
            values,
        });
    }
    let columns_text = columns_text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(|| Error::Parse(format!("invalid INSERT syntax: {sql}")))?;
    let columns: Vec<String> = split_top_level(columns_text, ',')
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    if columns.len() != values.len() {
        return Err(Error::Arity {
            table: table.to_string(),
            expected: columns.len(),
            found: values.len(),
        });
    }
    Ok(Statement::Command(Command::Insert {
        table: table.to_string(),
        values: columns.into_iter().zip(values).collect(),
    }))
}

fn parse_select(sql: &str) -> Result<Statement> {
    let rest = sql["SELECT".len()..].trim();
    let from_at = find_keyword(rest, "FROM")
        .ok_or_else(|| Error::Parse(format!("invalid SELECT syntax: {sql}")))?;
    let projection = parse_projection(rest[..from_at].trim());
    let from_part = rest[from_at + "FROM".len()..].trim();
    let (table, tail) = split_first_word(from_part);
    if table.is_empty() {
        return Err(Error::Parse(format!("invalid SELECT syntax: {sql}")));
    }

    let join_at = find_keyword(tail, "JOIN");
    let where_at = find_keyword(tail, "WHERE");
    let order_at = find_keyword(tail, "ORDER BY");
    let limit_at = find_keyword(tail, "LIMIT");
    let end = tail.len();
    let bound = |from: usize| -> usize {
        [where_at, order_at, limit_at]
            .iter()
            .flatten()
            .copied()
            .filter(|at| *at > from)
            .min()
            .unwrap_or(end)
    };

    let joins = match join_at {
        Some(at) => parse_join_chain(tail[at..bound(at)].trim()),
        None => Vec::new(),
    };
    let filter = where_at.map(|at| {
        let stop = [order_at, limit_at]
            .iter()
            .flatten()
            .copied()
            .filter(|other| *other > at)
            .min()
            .unwrap_or(end);
        parse_condition(tail[at + "WHERE".len()..stop].trim())
    });
    let order_by = order_at.and_then(|at| {
        let stop = limit_at.filter(|other| *other > at).unwrap_or(end);
        parse_order_by(tail[at + "ORDER BY".len()..stop].trim())
    });
    let limit = limit_at.map(|at| tail[at + "LIMIT".len()..].trim().to_string());

    Ok(Statement::Command(Command::Select {
        table: table.to_string(),
        projection,
        filter,
        joins,
        order_by,
        limit,
    }))
}

fn parse_update(sql: &str) -> Result<Statement> {
    let rest = sql["UPDATE".len()..].trim();
    let (table, rest) = split_first_word(rest);
    let set_at = find_keyword(rest, "SET")
        .filter(|at| *at == 0)
        .ok_or_else(|| Error::Parse(format!("invalid UPDATE syntax: {sql}")))?;
    let rest = rest[set_at + "SET".len()..].trim();
    let where_at = find_keyword(rest, "WHERE");
    let set_text = rest[..where_at.unwrap_or(rest.len())].trim();
    let filter = where_at.map(|at| parse_condition(rest[at + "WHERE".len()..].trim()));

    let mut set_values = Vec::new();
    for pair in split_top_level(set_text, ',') {
        let (column, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::Parse(format!("invalid SET clause: {pair}")))?;
        set_values.push((column.trim().to_string(), parse_literal(value.trim())));
    }
    if table.is_empty() || set_values.is_empty() {
        return Err(Error::Parse(format!("invalid UPDATE syntax: {sql}")));
    }
    Ok(Statement::Command(Command::Update {
        table: table.to_string(),
        set_values,
        filter,
    }))
}

fn parse_delete(sql: &str) -> Result<Statement> {
    let rest = sql["DELETE FROM".len()..].trim();
    let (table, tail) = split_first_word(rest);
    if table.is_empty() {
        return Err(Error::Parse(format!("invalid DELETE syntax: {sql}")));
    }
    let filter = find_keyword(tail, "WHERE")
        .map(|at| parse_condition(tail[at + "WHERE".len()..].trim()));
    Ok(Statement::Command(Command::Delete {
        table: table.to_string(),
        filter,
    }))
}

fn parse_create_index(sql: &str) -> Result<Statement> {
    // CREATE INDEX <name> ON <table>(<column>); the index name is only
    // syntax, indexes are addressed by (table, column)
    let rest = sql["CREATE INDEX".len()..].trim();
    let (name, rest) = split_first_word(rest);
    let on_at = find_keyword(rest, "ON").filter(|at| *at == 0);
    let (Some(on_at), false) = (on_at, name.is_empty()) else {
        return Err(Error::Parse(format!("invalid CREATE INDEX syntax: {sql}")));
    };
    let target = rest[on_at + "ON".len()..].trim();
    let open = target.find('(');
    let close = target.rfind(')');
    let (Some(open), Some(close)) = (open, close) else {
        return Err(Error::Parse(format!("invalid CREATE INDEX syntax: {sql}")));
    };
    if close < open {
        return Err(Error::Parse(format!("invalid CREATE INDEX syntax: {sql}")));
    }
    Ok(Statement::Command(Command::CreateIndex {
        table: target[..open].trim().to_string(),
        column: target[open + 1..close].trim().to_string(),
    }))
}

/// Parses WHERE clause text into a condition tree.
///
/// `" AND "` splits first (all parts must hold), then `" OR "` (any part
/// holds), both literal and case-sensitive, recursing into each part. A
/// single comparison probes `=`, then `>`, then `<`. Anything else is
/// [`Condition::Always`].
pub fn parse_condition(text: &str) -> Condition {
    let text = text.trim();
    if text.contains(" AND ") {
        return Condition::And(text.split(" AND ").map(parse_condition).collect());
    }
    if text.contains(" OR ") {
        return Condition::Or(text.split(" OR ").map(parse_condition).collect());
    }
    for (probe, op) in [('=', CompareOp::Eq), ('>', CompareOp::Gt), ('<', CompareOp::Lt)] {
        if let Some((column, literal)) = text.split_once(probe) {
            return Condition::Compare {
                column: column.trim().to_string(),
                op,
                literal: literal.trim().trim_matches('\'').to_string(),
            };
        }
    }
    Condition::Always
}

/// Parses a join clause into its steps. Malformed steps are dropped, not
/// rejected: a join the engine cannot interpret leaves the working row
/// set unchanged.
pub fn parse_join_chain(text: &str) -> Vec<JoinStep> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut steps = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if !tokens[i].eq_ignore_ascii_case("JOIN") {
            i += 1;
            continue;
        }
        let Some(table) = tokens.get(i + 1) else {
            break;
        };
        if !tokens.get(i + 2).is_some_and(|t| t.eq_ignore_ascii_case("ON")) {
            warn!(table = %table, "join step without ON clause, dropping");
            i += 2;
            continue;
        }
        let mut end = i + 3;
        while end < tokens.len()
            && !tokens[end].eq_ignore_ascii_case("JOIN")
            && !tokens[end].eq_ignore_ascii_case("INNER")
        {
            end += 1;
        }
        let on_text = tokens[i + 3..end].join(" ");
        match parse_on_clause(table, &on_text) {
            Some(step) => steps.push(step),
            None => warn!(table = %table, on = %on_text, "unparseable ON clause, dropping join step"),
        }
        i = end;
    }
    steps
}

fn parse_on_clause(table: &str, on_text: &str) -> Option<JoinStep> {
    let (left, right) = on_text.split_once('=')?;
    let (left_table, left_column) = left.trim().split_once('.')?;
    // the right side's table qualifier is accepted but not used: the
    // joined rows come from `table`
    let right = right.trim();
    let right_column = match right.split_once('.') {
        Some((_, column)) => column,
        None => right,
    };
    Some(JoinStep {
        table: table.to_string(),
        left_table: left_table.trim().to_string(),
        left_column: left_column.trim().to_string(),
        right_column: right_column.trim().to_string(),
    })
}

/// Parses ORDER BY text: one column, optional trailing ASC/DESC.
pub fn parse_order_by(text: &str) -> Option<OrderBy> {
    let mut tokens = text.split_whitespace();
    let column = tokens.next()?;
    let direction = match tokens.next() {
        Some(token) if token.eq_ignore_ascii_case("DESC") => SortDirection::Desc,
        _ => SortDirection::Asc,
    };
    Some(OrderBy {
        column: column.to_string(),
        direction,
    })
}

/// Parses the requested-columns expression. Any aggregate token switches
/// the whole projection to aggregate mode; tokens that are not aggregates
/// are dropped there.
pub fn parse_projection(text: &str) -> Projection {
    let text = text.trim();
    if text == "*" {
        return Projection::All;
    }
    let tokens = split_top_level(text, ',');
    if tokens.iter().any(|token| parse_aggregate(token).is_some()) {
        return Projection::Aggregates(
            tokens
                .iter()
                .filter_map(|token| parse_aggregate(token))
                .collect(),
        );
    }
    Projection::Columns(tokens.iter().map(|t| t.trim().to_string()).collect())
}

fn parse_aggregate(token: &str) -> Option<AggregateSpec> {
    let token = token.trim();
    let open = token.find('(')?;
    let close = token[open..].find(')')? + open;
    let func = match token[..open].trim().to_ascii_uppercase().as_str() {
        "COUNT" => AggregateFunc::Count,
        "SUM" => AggregateFunc::Sum,
        "AVG" => AggregateFunc::Avg,
        "MIN" => AggregateFunc::Min,
        "MAX" => AggregateFunc::Max,
        _ => return None,
    };
    let inner = token[open + 1..close].trim();
    let arg = if inner == "*" {
        AggregateArg::Star
    } else {
        AggregateArg::Column(inner.to_string())
    };
    let mut words = token[close + 1..].split_whitespace();
    let alias = match words.next() {
        None => None,
        Some(word) if word.eq_ignore_ascii_case("as") => words.next().map(str::to_string),
        Some(word) => Some(word.to_string()),
    };
    Some(AggregateSpec { func, arg, alias })
}

/// Parses one literal token: quoted text loses its quotes, a bare NULL is
/// null, anything else stays raw text for the engine to coerce.
fn parse_literal(token: &str) -> Value {
    let token = token.trim();
    for quote in ['\'', '"'] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return Value::Str(token[1..token.len() - 1].to_string());
        }
    }
    if token.eq_ignore_ascii_case("NULL") {
        return Value::Null;
    }
    Value::Str(token.to_string())
}

/// Splits on `separator` at depth zero, respecting quotes and
/// parentheses. Pieces come back trimmed; empties are dropped.
fn split_top_level(text: &str, separator: char) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_quote: Option<char> = None;
    for c in text.chars() {
        if let Some(quote) = in_quote {
            current.push(c);
            if c == quote {
                in_quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => {
                in_quote = Some(c);
                current.push(c);
            }
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c == separator && depth == 0 => {
                pieces.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        pieces.push(current.trim().to_string());
    }
    pieces.retain(|piece| !piece.is_empty());
    pieces
}

/// First case-insensitive word-boundary occurrence of `keyword` outside
/// quoted text, as a byte offset.
fn find_keyword(text: &str, keyword: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let upper = text.to_ascii_uppercase();
    let haystack = upper.as_bytes();
    let needle = keyword.to_ascii_uppercase();
    let needle = needle.as_bytes();
    let mut in_quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        if let Some(quote) = in_quote {
            if byte == quote {
                in_quote = None;
            }
            i += 1;
            continue;
        }
        if byte == b'\'' || byte == b'"' {
            in_quote = Some(byte);
            i += 1;
            continue;
        }
        if i + needle.len() <= haystack.len() && &haystack[i..i + needle.len()] == needle {
            let boundary_before = i == 0 || !is_word_byte(bytes[i - 1]);
            let end = i + needle.len();
            let boundary_after = end >= bytes.len() || !is_word_byte(bytes[end]);
            if boundary_before && boundary_after {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn split_first_word(text: &str) -> (&str, &str) {
    match text.split_once(' ') {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(sql: &str) -> Command {
        match parse_statement(sql).unwrap() {
            Statement::Command(command) => command,
            other => panic!("expected command, got {other:?}"),
        }
    }

    #[test]
    fn create_table_with_inline_and_trailing_constraints() {
        let Command::CreateTable {
            table,
            columns,
            primary_key,
            unique_keys,
        } = command(
            "CREATE TABLE students (id INT PRIMARY KEY, name VARCHAR(50) NOT NULL, \
             email VARCHAR(100) UNIQUE, born DATE, UNIQUE(name))",
        )
        else {
            panic!("wrong command")
        };
        assert_eq!(table, "students");
        assert_eq!(primary_key.as_deref(), Some("id"));
        assert_eq!(unique_keys, vec!["email".to_string(), "name".to_string()]);
        assert_eq!(columns.len(), 4);
        assert_eq!(columns[0].type_token, "INT");
        assert!(columns[1].not_null);
        assert_eq!(columns[1].type_token, "VARCHAR(50)");
        assert!(!columns[3].not_null);
    }

    #[test]
    fn create_table_trailing_primary_key_form() {
        let Command::CreateTable { primary_key, .. } =
            command("CREATE TABLE t (id INT, PRIMARY KEY(id))")
        else {
            panic!("wrong command")
        };
        assert_eq!(primary_key.as_deref(), Some("id"));
    }

    #[test]
    fn create_table_rejects_two_primary_keys() {
        let err = parse_statement("CREATE TABLE t (a INT PRIMARY KEY, PRIMARY KEY(b))").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn insert_with_column_names() {
        let Command::Insert { table, values } =
            command("INSERT INTO users (name, id) VALUES ('Charlie, Jr.', 3)")
        else {
            panic!("wrong command")
        };
        assert_eq!(table, "users");
        assert_eq!(
            values,
            vec![
                ("name".to_string(), Value::Str("Charlie, Jr.".into())),
                ("id".to_string(), Value::Str("3".into())),
            ]
        );
    }

    #[test]
    fn insert_without_column_names_is_positional() {
        let statement = parse_statement("INSERT INTO users VALUES (1, 'Ada', NULL)").unwrap();
        let Statement::PositionalInsert { table, values } = statement else {
            panic!("expected positional insert")
        };
        assert_eq!(table, "users");
        assert_eq!(
            values,
            vec![
                Value::Str("1".into()),
                Value::Str("Ada".into()),
                Value::Null,
            ]
        );
    }

    #[test]
    fn insert_arity_mismatch_fails_early() {
        let err = parse_statement("INSERT INTO users (a, b) VALUES (1)").unwrap_err();
        assert!(matches!(err, Error::Arity { expected: 2, found: 1, .. }));
    }

    #[test]
    fn select_with_every_clause() {
        let Command::Select {
            table,
            projection,
            filter,
            joins,
            order_by,
            limit,
        } = command(
            "SELECT name, grades.score FROM students \
             INNER JOIN grades ON students.id = grades.student_id \
             WHERE age > 18 ORDER BY name DESC LIMIT 10",
        )
        else {
            panic!("wrong command")
        };
        assert_eq!(table, "students");
        assert_eq!(
            projection,
            Projection::Columns(vec!["name".into(), "grades.score".into()])
        );
        assert_eq!(
            joins,
            vec![JoinStep {
                table: "grades".into(),
                left_table: "students".into(),
                left_column: "id".into(),
                right_column: "student_id".into(),
            }]
        );
        assert_eq!(
            filter,
            Some(Condition::Compare {
                column: "age".into(),
                op: CompareOp::Gt,
                literal: "18".into(),
            })
        );
        assert_eq!(
            order_by,
            Some(OrderBy {
                column: "name".into(),
                direction: SortDirection::Desc,
            })
        );
        assert_eq!(limit.as_deref(), Some("10"));
    }

    #[test]
    fn select_star_is_projection_all() {
        let Command::Select { projection, .. } = command("SELECT * FROM t") else {
            panic!("wrong command")
        };
        assert_eq!(projection, Projection::All);
    }

    #[test]
    fn keywords_inside_literals_are_not_clauses() {
        let Command::Select { filter, order_by, .. } =
            command("SELECT * FROM t WHERE name = 'ORDER BY LIMIT'")
        else {
            panic!("wrong command")
        };
        assert!(order_by.is_none());
        assert_eq!(
            filter,
            Some(Condition::Compare {
                column: "name".into(),
                op: CompareOp::Eq,
                literal: "ORDER BY LIMIT".into(),
            })
        );
    }

    #[test]
    fn condition_and_binds_before_or() {
        let condition = parse_condition("a = 1 AND b = 2 OR c = 3");
        let Condition::And(parts) = condition else {
            panic!("expected AND at the top")
        };
        assert_eq!(parts.len(), 2);
        assert!(matches!(parts[1], Condition::Or(_)));
    }

    #[test]
    fn condition_probes_equals_before_ordering() {
        // a quirk kept from the source: ">=" parses as equality with a
        // mangled column token
        let condition = parse_condition("age >= 5");
        assert_eq!(
            condition,
            Condition::Compare {
                column: "age >".into(),
                op: CompareOp::Eq,
                literal: "5".into(),
            }
        );
    }

    #[test]
    fn condition_strips_quotes_from_literals() {
        let condition = parse_condition("name = 'John Doe'");
        assert_eq!(
            condition,
            Condition::Compare {
                column: "name".into(),
                op: CompareOp::Eq,
                literal: "John Doe".into(),
            }
        );
    }

    #[test]
    fn unrecognized_clause_fails_open() {
        assert_eq!(parse_condition("just some words"), Condition::Always);
        assert_eq!(parse_condition(""), Condition::Always);
    }

    #[test]
    fn lowercase_connectives_do_not_split() {
        // literal, case-sensitive " AND " only
        let condition = parse_condition("a = 1 and b = 2");
        assert_eq!(
            condition,
            Condition::Compare {
                column: "a".into(),
                op: CompareOp::Eq,
                literal: "1 and b = 2".into(),
            }
        );
    }

    #[test]
    fn join_chain_parses_multiple_steps() {
        let steps = parse_join_chain(
            "JOIN students ON enrollments.student_id = students.student_id \
             INNER JOIN courses ON enrollments.course_id = courses.course_id",
        );
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].table, "students");
        assert_eq!(steps[1].table, "courses");
        assert_eq!(steps[1].left_column, "course_id");
    }

    #[test]
    fn malformed_join_steps_are_dropped() {
        assert!(parse_join_chain("JOIN students").is_empty());
        assert!(parse_join_chain("JOIN students ON nonsense").is_empty());
        // bare left side has no table qualifier, step is dropped
        assert!(parse_join_chain("JOIN s ON id = s.id").is_empty());
    }

    #[test]
    fn projection_aggregates_with_aliases() {
        let projection = parse_projection("COUNT(*) AS total, AVG(score), SUM(score) as s");
        let Projection::Aggregates(specs) = projection else {
            panic!("expected aggregates")
        };
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].alias.as_deref(), Some("total"));
        assert_eq!(specs[1].alias, None);
        assert_eq!(specs[1].label(), "AVG(score)");
        assert_eq!(specs[2].alias.as_deref(), Some("s"));
    }

    #[test]
    fn mixed_projection_drops_plain_tokens() {
        let projection = parse_projection("name, COUNT(*)");
        let Projection::Aggregates(specs) = projection else {
            panic!("expected aggregates")
        };
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].label(), "COUNT(*)");
    }

    #[test]
    fn update_and_delete_statements() {
        let Command::Update {
            table,
            set_values,
            filter,
        } = command("UPDATE users SET name = 'Bo', age = 9 WHERE id = 1")
        else {
            panic!("wrong command")
        };
        assert_eq!(table, "users");
        assert_eq!(
            set_values,
            vec![
                ("name".to_string(), Value::Str("Bo".into())),
                ("age".to_string(), Value::Str("9".into())),
            ]
        );
        assert!(filter.is_some());

        let Command::Delete { table, filter } = command("DELETE FROM users") else {
            panic!("wrong command")
        };
        assert_eq!(table, "users");
        assert!(filter.is_none());
    }

    #[test]
    fn create_index_statement() {
        let Command::CreateIndex { table, column } =
            command("CREATE INDEX idx_age ON users(age)")
        else {
            panic!("wrong command")
        };
        assert_eq!(table, "users");
        assert_eq!(column, "age");
    }

    #[test]
    fn unsupported_statements_are_parse_errors() {
        assert!(matches!(
            parse_statement("DROP TABLE users").unwrap_err(),
            Error::Parse(_)
        ));
        assert!(matches!(
            parse_statement("").unwrap_err(),
            Error::Parse(_)
        ));
    }

    #[test]
    fn trailing_semicolons_and_whitespace_normalize_away() {
        let Command::Delete { table, .. } = command("  DELETE   FROM\n users ;") else {
            panic!("wrong command")
        };
        assert_eq!(table, "users");
    }
}
