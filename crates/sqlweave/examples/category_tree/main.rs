//! Example: building statements for a category tree.
//!
//! Run with:
//!   cargo run --example category_tree -p sqlweave

use sqlweave::prelude::*;

fn print_statement(title: &str, stmt: &impl BuiltStatement) -> BuildResult<()> {
    println!("[{title}]");
    println!("  SQL:\n{}", stmt.sql());
    println!("  binds: {}", stmt.binds_json()?);
    println!();
    Ok(())
}

// ─── Plain SELECT ───────────────────────────────────────────────────────────

fn demo_filtered_select() -> BuildResult<()> {
    let stmt = SelectQuery::new("categories")
        .columns(["id", "name"])
        .conditions(
            Conditions::new()
                .and("visible", Predicate::eq(true))
                .and("depth", Predicate::between(1, 3)),
        )
        .order_by(OrderBy::asc("name"))
        .limit(Limit::new(20).offset(40))
        .build()?;

    print_statement("filtered select", &stmt)
}

fn demo_join() -> BuildResult<()> {
    let stmt = SelectQuery::new("categories")
        .columns(["id", "name", "p.name"])
        .join(
            Join::new("categories")
                .alias("p")
                .side(JoinSide::Left)
                .on("id", Predicate::column(Operator::Eq, "c0.parent_id")),
        )
        .conditions(Conditions::new().and("slug", Predicate::in_list(["books", "music"])))
        .build()?;

    print_statement("join", &stmt)
}

// ─── Recursive CTE ──────────────────────────────────────────────────────────

fn demo_subtree() -> BuildResult<()> {
    let stmt = SelectQuery::new("categories")
        .columns(["id", "parent_id", "name"])
        .conditions(Conditions::new().and("id", Predicate::eq(7)))
        .union(Union::new("categories").all().alias("c1"))
        .join(
            Join::new("subtree")
                .alias("s")
                .side(JoinSide::Inner)
                .on("s.id", Predicate::column(Operator::Eq, "c1.parent_id")),
        )
        .recursive("subtree")
        .order_by(OrderBy::asc("name"))
        .build()?;

    print_statement("recursive subtree", &stmt)
}

fn demo_from_json() -> BuildResult<()> {
    let stmt = RecursiveStatementBuilder::from_json_str(
        r#"{
            "table": "categories",
            "columns": ["id", "parent_id"],
            "recursion_name": "ancestors",
            "options": [
                {"CONDITIONS": {"id": {"=": 42}}},
                {"UNION": {"type": "ALL", "table": "categories", "alias": "c1"}},
                {"JOIN": {"table": "ancestors", "alias": "a", "side": "INNER",
                          "conditions": {"a.parent_id": {"=": "c1.id", "process": false}}}}
            ],
            "recursion_limit": {"limit": 50}
        }"#,
    )?;

    print_statement("recursive from JSON", &stmt)
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> BuildResult<()> {
    println!("=== Category Tree Statements ===\n");

    demo_filtered_select()?;
    demo_join()?;
    demo_subtree()?;
    demo_from_json()?;

    Ok(())
}
