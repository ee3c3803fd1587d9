//! The aggregate engine
//!
//! Computes COUNT / SUM / AVG / MIN / MAX over a result set. Each spec in
//! the list is evaluated independently by its own accumulator and the
//! results are merged into one output row, labeled by the alias when
//! given, else the literal `FUNC(col)` spelling.

use super::ResultSet;
use crate::types::expression::{AggregateArg, AggregateFunc, AggregateSpec};
use crate::types::schema::Label;
use crate::types::value::Value;

/// Computes every aggregate over `input`, producing a single-row result.
pub fn compute(specs: &[AggregateSpec], input: &ResultSet) -> ResultSet {
    let mut columns = Vec::with_capacity(specs.len());
    let mut row = Vec::with_capacity(specs.len());
    for spec in specs {
        columns.push(Label::Unqualified(spec.label()));
        row.push(compute_one(spec, input));
    }
    ResultSet::new(columns, vec![row])
}

fn compute_one(spec: &AggregateSpec, input: &ResultSet) -> Value {
    let mut accumulator = make_accumulator(spec.func);
    let pos = match &spec.arg {
        AggregateArg::Star => None,
        AggregateArg::Column(token) => input.resolve(token),
    };
    for row in &input.rows {
        let value = match (&spec.arg, pos) {
            (AggregateArg::Star, _) => None,
            // an unresolvable column contributes nothing, like a null
            (AggregateArg::Column(_), None) => Some(&Value::Null),
            (AggregateArg::Column(_), Some(pos)) => Some(&row[pos]),
        };
        accumulator.add(value);
    }
    accumulator.finalize()
}

fn make_accumulator(func: AggregateFunc) -> Box<dyn Accumulator> {
    match func {
        AggregateFunc::Count => Box::new(Count { count: 0 }),
        AggregateFunc::Sum => Box::new(Sum { sum: 0.0 }),
        AggregateFunc::Avg => Box::new(Avg { sum: 0.0, count: 0 }),
        AggregateFunc::Min => Box::new(Extreme {
            values: Vec::new(),
            min: true,
        }),
        AggregateFunc::Max => Box::new(Extreme {
            values: Vec::new(),
            min: false,
        }),
    }
}

/// One aggregate function's running state. `add` is called once per input
/// row: `None` for `COUNT(*)` (every row counts), otherwise the row's
/// value in the argument column.
trait Accumulator {
    fn add(&mut self, value: Option<&Value>);
    fn finalize(self: Box<Self>) -> Value;
}

struct Count {
    count: i64,
}

impl Accumulator for Count {
    fn add(&mut self, value: Option<&Value>) {
        match value {
            None => self.count += 1,
            Some(v) if !v.is_null() => self.count += 1,
            Some(_) => {}
        }
    }

    fn finalize(self: Box<Self>) -> Value {
        Value::Int(self.count)
    }
}

struct Sum {
    sum: f64,
}

impl Accumulator for Sum {
    fn add(&mut self, value: Option<&Value>) {
        // non-coercible values are skipped, not errors
        if let Some(n) = value.and_then(Value::to_f64) {
            self.sum += n;
        }
    }

    fn finalize(self: Box<Self>) -> Value {
        Value::Float(self.sum)
    }
}

struct Avg {
    sum: f64,
    count: i64,
}

impl Accumulator for Avg {
    fn add(&mut self, value: Option<&Value>) {
        if let Some(n) = value.and_then(Value::to_f64) {
            self.sum += n;
            self.count += 1;
        }
    }

    fn finalize(self: Box<Self>) -> Value {
        if self.count > 0 {
            Value::Float(self.sum / self.count as f64)
        } else {
            Value::Float(0.0)
        }
    }
}

/// MIN/MAX collect their contributing values: the comparison mode can
/// only be chosen once it is known whether every value coerces
/// numerically.
struct Extreme {
    values: Vec<Value>,
    min: bool,
}

impl Accumulator for Extreme {
    fn add(&mut self, value: Option<&Value>) {
        if let Some(v) = value {
            if !v.is_null() {
                self.values.push(v.clone());
            }
        }
    }

    fn finalize(self: Box<Self>) -> Value {
        if self.values.is_empty() {
            return Value::Null;
        }
        let numeric: Option<Vec<f64>> = self.values.iter().map(Value::to_f64).collect();
        let winner = match numeric {
            Some(keys) => {
                let mut best = 0;
                for (i, key) in keys.iter().enumerate() {
                    let better = if self.min {
                        key < &keys[best]
                    } else {
                        key > &keys[best]
                    };
                    if better {
                        best = i;
                    }
                }
                best
            }
            // any non-numeric value falls the whole set back to
            // lexicographic comparison of text forms
            None => {
                let mut best = 0;
                for i in 1..self.values.len() {
                    let ordering = self.values[i].as_text().cmp(&self.values[best].as_text());
                    let better = if self.min {
                        ordering == std::cmp::Ordering::Less
                    } else {
                        ordering == std::cmp::Ordering::Greater
                    };
                    if better {
                        best = i;
                    }
                }
                best
            }
        };
        self.values[winner].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(func: AggregateFunc, arg: AggregateArg) -> AggregateSpec {
        AggregateSpec {
            func,
            arg,
            alias: None,
        }
    }

    fn input(values: Vec<Value>) -> ResultSet {
        ResultSet::new(
            vec![Label::Unqualified("v".into())],
            values.into_iter().map(|v| vec![v]).collect(),
        )
    }

    #[test]
    fn count_star_over_empty_set_is_zero() {
        let result = compute(
            &[spec(AggregateFunc::Count, AggregateArg::Star)],
            &input(vec![]),
        );
        assert_eq!(result.columns, vec![Label::Unqualified("COUNT(*)".into())]);
        assert_eq!(result.rows, vec![vec![Value::Int(0)]]);
    }

    #[test]
    fn count_column_skips_nulls() {
        let result = compute(
            &[spec(AggregateFunc::Count, AggregateArg::Column("v".into()))],
            &input(vec![Value::Int(1), Value::Null, Value::Int(3)]),
        );
        assert_eq!(result.rows[0][0], Value::Int(2));
    }

    #[test]
    fn avg_of_ten_twenty_thirty_is_twenty() {
        let result = compute(
            &[spec(AggregateFunc::Avg, AggregateArg::Column("v".into()))],
            &input(vec![Value::Int(10), Value::Int(20), Value::Int(30)]),
        );
        assert_eq!(result.rows[0][0], Value::Float(20.0));
    }

    #[test]
    fn avg_of_all_nulls_is_zero() {
        let result = compute(
            &[spec(AggregateFunc::Avg, AggregateArg::Column("v".into()))],
            &input(vec![Value::Null, Value::Null]),
        );
        assert_eq!(result.rows[0][0], Value::Float(0.0));
    }

    #[test]
    fn sum_skips_non_coercible_values() {
        let result = compute(
            &[spec(AggregateFunc::Sum, AggregateArg::Column("v".into()))],
            &input(vec![
                Value::Int(5),
                Value::Str("7".into()),
                Value::Str("seven".into()),
                Value::Null,
            ]),
        );
        assert_eq!(result.rows[0][0], Value::Float(12.0));
        // empty contributing set yields 0
        let result = compute(
            &[spec(AggregateFunc::Sum, AggregateArg::Column("v".into()))],
            &input(vec![]),
        );
        assert_eq!(result.rows[0][0], Value::Float(0.0));
    }

    #[test]
    fn min_max_numeric_mode() {
        let values = vec![Value::Int(5), Value::Int(2), Value::Int(8)];
        let result = compute(
            &[
                spec(AggregateFunc::Min, AggregateArg::Column("v".into())),
                spec(AggregateFunc::Max, AggregateArg::Column("v".into())),
            ],
            &input(values),
        );
        assert_eq!(result.rows[0], vec![Value::Int(2), Value::Int(8)]);
    }

    #[test]
    fn min_max_fall_back_to_lexicographic() {
        // "10" coerces but "banana" doesn't, so the whole set compares as text
        let values = vec![Value::Str("10".into()), Value::Str("banana".into())];
        let result = compute(
            &[
                spec(AggregateFunc::Min, AggregateArg::Column("v".into())),
                spec(AggregateFunc::Max, AggregateArg::Column("v".into())),
            ],
            &input(values),
        );
        assert_eq!(result.rows[0][0], Value::Str("10".into()));
        assert_eq!(result.rows[0][1], Value::Str("banana".into()));
    }

    #[test]
    fn min_max_of_empty_set_is_null() {
        let result = compute(
            &[spec(AggregateFunc::Min, AggregateArg::Column("v".into()))],
            &input(vec![Value::Null]),
        );
        assert_eq!(result.rows[0][0], Value::Null);
    }

    #[test]
    fn alias_names_the_output_column() {
        let result = compute(
            &[AggregateSpec {
                func: AggregateFunc::Count,
                arg: AggregateArg::Star,
                alias: Some("total".into()),
            }],
            &input(vec![Value::Int(1)]),
        );
        assert_eq!(result.columns, vec![Label::Unqualified("total".into())]);
        assert_eq!(result.rows[0][0], Value::Int(1));
    }
}
