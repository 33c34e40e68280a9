use sqlweave::{
    BindMap, BuildError, BuilderConfig, Conditions, Join, JoinSide, Limit, Operator, OrderBy,
    Predicate, QueryOption, SelectQuery, StatementBuilder, Union, Value,
};

fn quiet() -> BuilderConfig {
    BuilderConfig::new().without_trace()
}

/// Placeholder names (`:AAA0` -> `AAA0`) in order of appearance.
fn placeholders(sql: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = sql;
    while let Some(pos) = rest.find(':') {
        let tail = &rest[pos + 1..];
        let letters = tail.chars().take_while(|c| c.is_ascii_uppercase()).count();
        let digits = tail[letters..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .count();
        if letters > 0 && digits > 0 {
            out.push(tail[..letters + digits].to_string());
        }
        rest = tail;
    }
    out
}

fn assert_bijection(sql: &str, binds: &BindMap) {
    let mut found = placeholders(sql);
    found.sort();
    found.dedup();
    assert_eq!(found.len(), placeholders(sql).len(), "duplicate placeholder in {sql}");
    let keys: Vec<String> = binds.keys().cloned().collect();
    assert_eq!(found, keys);
}

#[test]
fn between_binds_two_values() {
    let stmt = SelectQuery::new("orders")
        .conditions(Conditions::new().and("created_at", Predicate::between("2018-12-01", "2018-12-06")))
        .config(quiet())
        .build()
        .unwrap();

    assert_eq!(
        stmt.query(),
        "SELECT o0.* FROM orders AS o0\n WHERE o0.created_at BETWEEN :AAA0 AND :AAA1;"
    );
    assert_eq!(stmt.binds()["AAA0"], Value::from("2018-12-01"));
    assert_eq!(stmt.binds()["AAA1"], Value::from("2018-12-06"));
}

#[test]
fn in_list_binds_each_element() {
    let stmt = SelectQuery::new("users")
        .conditions(Conditions::new().and("id", Predicate::in_list([1, 2, 3])))
        .config(quiet())
        .build()
        .unwrap();

    assert_eq!(
        stmt.query(),
        "SELECT u0.* FROM users AS u0\n WHERE u0.id IN (:AAA0,:AAA1,:AAA2);"
    );
    assert_eq!(stmt.binds().len(), 3);
    assert_eq!(stmt.binds()["AAA2"], Value::Int(3));
}

#[test]
fn in_with_scalar_is_invalid_operand() {
    let err = SelectQuery::new("users")
        .conditions(Conditions::new().and("id", Predicate::parse("IN", Value::Int(1)).unwrap()))
        .config(quiet())
        .build()
        .unwrap_err();
    assert!(matches!(err, BuildError::InvalidOperand { .. }));
}

#[test]
fn between_with_three_values_is_invalid_operand() {
    let predicate = Predicate::parse("BETWEEN", vec![Value::Int(1), Value::Int(2), Value::Int(3)]).unwrap();
    let err = SelectQuery::new("users")
        .conditions(Conditions::new().and("age", predicate))
        .config(quiet())
        .build()
        .unwrap_err();
    assert!(err.is_invalid_operand());
}

#[test]
fn unknown_operator_token() {
    let err = Predicate::parse("~=", Value::Int(1)).unwrap_err();
    assert!(matches!(err, BuildError::UnknownOperator(ref token) if token == "~="));
}

#[test]
fn every_comparison_operator_compiles() {
    let stmt = SelectQuery::new("items")
        .conditions(
            Conditions::new()
                .and("a", Predicate::eq(1))
                .and("b", Predicate::ne(2))
                .and("c", Predicate::gt(3))
                .and("d", Predicate::gte(4))
                .and("e", Predicate::lt(5))
                .and("f", Predicate::lte(6))
                .and("g", Predicate::not_in(["x"]))
                .and("h", Predicate::is_not_null()),
        )
        .config(quiet())
        .build()
        .unwrap();

    assert_eq!(
        stmt.query(),
        "SELECT i0.* FROM items AS i0\n WHERE i0.a = :AAA0 AND i0.b <> :AAB0 AND i0.c > :AAC0 AND i0.d >= :AAD0 AND i0.e < :AAE0 AND i0.f <= :AAF0 AND i0.g NOT IN (:AAG0) AND i0.h IS NOT NULL;"
    );
    assert_bijection(stmt.query(), stmt.binds());
}

#[test]
fn unprocessed_list_renders_literally() {
    let stmt = SelectQuery::new("users")
        .conditions(Conditions::new().and(
            "role",
            Predicate::in_list(["'admin'", "'owner'"]).process(false),
        ))
        .config(quiet())
        .build()
        .unwrap();

    assert_eq!(
        stmt.query(),
        "SELECT u0.* FROM users AS u0\n WHERE u0.role IN ('admin','owner');"
    );
    assert!(stmt.binds().is_empty());
}

#[test]
fn large_condition_sets_keep_unique_binds() {
    let conditions: Conditions = (0..800)
        .map(|i| (format!("c{i}"), Predicate::eq(i)))
        .collect();
    let stmt = SelectQuery::new("wide")
        .conditions(conditions)
        .config(quiet())
        .build()
        .unwrap();

    assert_eq!(stmt.binds().len(), 800);
    assert_bijection(stmt.query(), stmt.binds());
}

#[test]
fn join_chain_qualifies_against_latest_table() {
    let stmt = StatementBuilder::with_config(
        "users",
        ["id", "o.total", "p.amount"],
        vec![
            QueryOption::from(
                Join::new("orders")
                    .alias("o")
                    .side(JoinSide::Inner)
                    .on("user_id", Predicate::column(Operator::Eq, "u0.id")),
            ),
            QueryOption::from(
                Join::new("payments")
                    .alias("p")
                    .side_name("full outer")
                    .on("order_id", Predicate::column(Operator::Eq, "o.id")),
            ),
            QueryOption::from(Conditions::new().and("state", Predicate::eq("settled"))),
        ],
        Some(OrderBy::desc("p.amount")),
        Some(Limit::new(25)),
        quiet(),
    )
    .unwrap();

    assert_eq!(
        stmt.query(),
        "SELECT u0.id,o.total,p.amount FROM users AS u0\
         \nINNER JOIN orders AS o ON o.user_id = u0.id\
         \nFULL OUTER JOIN payments AS p ON p.order_id = o.id\
         \n WHERE p.state = :AAA0 ORDER BY p.amount DESC LIMIT 25;"
    );
}

#[test]
fn union_chain() {
    let stmt = SelectQuery::new("users")
        .columns(["id", "email"])
        .union(Union::new("admins").all().alias("a"))
        .union(Union::new("guests").distinct().alias("g"))
        .config(quiet())
        .build()
        .unwrap();

    assert_eq!(
        stmt.query(),
        "SELECT u0.id,u0.email FROM users AS u0\
         \nUNION ALL SELECT a.id,a.email FROM admins AS a\
         \nUNION DISTINCT SELECT g.id,g.email FROM guests AS g;"
    );
}

#[test]
fn generated_aliases_avoid_explicit_ones() {
    let stmt = SelectQuery::new("users")
        .join(Join::new("orders").alias("u0"))
        .config(quiet())
        .build()
        .unwrap();
    assert_eq!(stmt.alias(), "u1");
    assert_eq!(stmt.query(), "SELECT u1.* FROM users AS u1\nJOIN orders AS u0;");
}

#[test]
fn generated_aliases_avoid_explicit_ones_in_any_case() {
    let stmt = SelectQuery::new("users")
        .join(Join::new("orders").alias("U0"))
        .config(quiet())
        .build()
        .unwrap();
    assert_eq!(stmt.alias(), "u1");
    assert_eq!(stmt.query(), "SELECT u1.* FROM users AS u1\nJOIN orders AS U0;");
}

#[test]
fn typed_values_are_bound_unchanged() {
    let day = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let id = uuid::Uuid::nil();
    let stmt = SelectQuery::new("events")
        .conditions(
            Conditions::new()
                .and("day", Predicate::eq(day))
                .and("source", Predicate::eq(id))
                .and("score", Predicate::gt(0.5)),
        )
        .config(quiet())
        .build()
        .unwrap();

    assert_eq!(stmt.binds()["AAA0"], Value::Date(day));
    assert_eq!(stmt.binds()["AAB0"], Value::Uuid(id));
    assert_eq!(stmt.binds()["AAC0"], Value::Float(0.5));
}
