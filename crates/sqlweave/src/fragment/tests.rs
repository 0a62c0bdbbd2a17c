use super::*;
use crate::dialect::{MySql, Postgres, Sqlite};

fn render(fmter: &Formatter, fragment: &Fragment) -> BuildResult<(String, Vec<Value>)> {
    fmter.format(fragment)
}

#[test]
fn ident_fragment_is_quoted() {
    let fragment = Fragment::ident("users").unwrap();
    let (sql, args) = render(&Formatter::new(Postgres), &fragment).unwrap();
    assert_eq!(sql, r#""users""#);
    assert!(args.is_empty());

    let (sql, _) = render(&Formatter::new(MySql), &fragment).unwrap();
    assert_eq!(sql, "`users`");
}

#[test]
fn ident_fragment_rejects_empty_name() {
    let err = Fragment::ident("").unwrap_err();
    assert!(matches!(err, BuildError::InvalidIdent { .. }));
    assert!(err.is_deferred());
}

#[test]
fn ident_variant_built_directly_is_validated_at_render() {
    let mut list = FragmentList::new();
    list.push(Fragment::ident("a").unwrap());
    list.push(Fragment::Ident(Ident::new("")));
    let mut out = SqlBuf::new();
    let err = list.append_query(&Formatter::new(Postgres), &mut out).unwrap_err();
    assert!(matches!(err, BuildError::InvalidIdent { .. }));
    assert!(out.is_empty());
}

#[test]
fn expression_without_placeholders_is_verbatim() {
    let fragment = Fragment::expr("age INT", ()).unwrap();
    let (sql, args) = render(&Formatter::new(Postgres), &fragment).unwrap();
    assert_eq!(sql, "age INT");
    assert!(args.is_empty());
}

#[test]
fn expression_binds_in_order() {
    let fragment = Fragment::expr("? INT DEFAULT ? CHECK (? > ?)", (ident("age"), 18, ident("age"), 0)).unwrap();
    let (sql, args) = render(&Formatter::new(Postgres), &fragment).unwrap();
    assert_eq!(sql, r#""age" INT DEFAULT $1 CHECK ("age" > $2)"#);
    assert_eq!(args, [Value::I32(18), Value::I32(0)]);
}

#[test]
fn indexed_placeholders_reuse_arguments() {
    let fragment = Fragment::expr("?0 TEXT DEFAULT ?1 CHECK (?0 <> ?1)", (ident("name"), "n/a")).unwrap();
    let (sql, args) = render(&Formatter::new(Sqlite), &fragment).unwrap();
    assert_eq!(sql, r#""name" TEXT DEFAULT ? CHECK ("name" <> ?)"#);
    assert_eq!(args, [Value::from("n/a"), Value::from("n/a")]);
}

#[test]
fn inline_mode_renders_literals() {
    let fragment = Fragment::expr("status TEXT DEFAULT ?", ("it's",)).unwrap();
    let (sql, args) = render(&Formatter::new(Postgres).inline(), &fragment).unwrap();
    assert_eq!(sql, "status TEXT DEFAULT 'it''s'");
    assert!(args.is_empty());
}

#[test]
fn safe_args_are_verbatim() {
    let fragment = Fragment::expr("? ?", (ident("created_at"), safe("TIMESTAMPTZ NOT NULL"))).unwrap();
    let (sql, _) = render(&Formatter::new(Postgres), &fragment).unwrap();
    assert_eq!(sql, r#""created_at" TIMESTAMPTZ NOT NULL"#);
}

#[test]
fn too_few_args_is_malformed() {
    let fragment = Fragment::expr("? INT", ()).unwrap();
    let err = render(&Formatter::new(Postgres), &fragment).unwrap_err();
    assert!(err.is_malformed(), "{err}");
}

#[test]
fn too_many_args_is_malformed() {
    let fragment = Fragment::expr("age INT", (1,)).unwrap();
    let err = render(&Formatter::new(Postgres), &fragment).unwrap_err();
    assert!(err.is_malformed(), "{err}");
}

#[test]
fn unknown_named_arg_is_malformed() {
    let fragment = Fragment::expr("?missing INT", ()).unwrap();
    let err = render(&Formatter::new(Postgres), &fragment).unwrap_err();
    assert!(err.is_malformed());
    assert!(err.to_string().contains("missing"));
}

#[test]
fn failed_render_leaves_buffer_untouched() {
    let fmter = Formatter::new(Postgres);
    let fragment = Fragment::expr("? = ?missing", (1,)).unwrap();
    let mut out = SqlBuf::new();
    out.push_str("ALTER TABLE ");
    assert!(fragment.append_query(&fmter, &mut out).is_err());
    assert_eq!(out.sql(), "ALTER TABLE ");
    assert!(out.args().is_empty());
}

#[test]
fn invalid_ident_arg_fails_at_construction() {
    let err = Fragment::expr("? INT", (ident("a..b"),)).unwrap_err();
    assert!(matches!(err, BuildError::InvalidIdent { .. }));
}

#[test]
fn unterminated_quote_fails_at_construction() {
    let err = Fragment::expr("note TEXT DEFAULT 'x", ()).unwrap_err();
    assert!(matches!(err, BuildError::InvalidTemplate { .. }));
}

#[test]
fn question_marks_in_literals_are_kept() {
    let fragment = Fragment::expr(r"note TEXT DEFAULT '?' CHECK (data \? 'k')", ()).unwrap();
    let (sql, args) = render(&Formatter::new(Postgres), &fragment).unwrap();
    assert_eq!(sql, "note TEXT DEFAULT '?' CHECK (data ? 'k')");
    assert!(args.is_empty());
}

#[test]
fn option_args_bind_null() {
    let fragment = Fragment::expr("x INT DEFAULT ?", (None::<i32>,)).unwrap();
    let (sql, args) = render(&Formatter::new(Postgres), &fragment).unwrap();
    assert_eq!(sql, "x INT DEFAULT $1");
    assert_eq!(args, [Value::Null]);

    let (sql, _) = render(&Formatter::new(Postgres).inline(), &fragment).unwrap();
    assert_eq!(sql, "x INT DEFAULT NULL");
}

#[test]
fn vec_and_array_args() {
    let fragment = Fragment::expr("CHECK (x IN (?, ?, ?))", vec![1i64, 2, 3]).unwrap();
    let (_, args) = render(&Formatter::new(Postgres), &fragment).unwrap();
    assert_eq!(args.len(), 3);

    let fragment = Fragment::expr("CHECK (x IN (?, ?))", ["a", "b"]).unwrap();
    let (sql, _) = render(&Formatter::new(MySql), &fragment).unwrap();
    assert_eq!(sql, "CHECK (x IN (?, ?))");
}

#[test]
fn list_joins_with_separator() {
    let list: FragmentList = [Fragment::ident("a"), Fragment::ident("b.c"), Fragment::expr("lower(?)", (ident("d"),))]
        .into_iter()
        .collect::<BuildResult<_>>()
        .unwrap();
    let (sql, _) = render_list(&Formatter::new(Postgres), &list);
    assert_eq!(sql, r#""a", "b"."c", lower("d")"#);

    let mut out = SqlBuf::new();
    list.append_joined(&Formatter::new(MySql), &mut out, " AND ").unwrap();
    assert_eq!(out.sql(), "`a` AND `b`.`c` AND lower(`d`)");
}

#[test]
fn empty_list_renders_nothing() {
    let list = FragmentList::new();
    assert!(list.is_empty());
    let mut out = SqlBuf::new();
    list.append_joined(&Formatter::new(Postgres), &mut out, ", ").unwrap();
    assert!(out.is_empty());
}

#[test]
fn list_rolls_back_on_failure() {
    let mut list = FragmentList::new();
    list.push(Fragment::ident("a").unwrap());
    list.push(Fragment::expr("?", ()).unwrap());
    let mut out = SqlBuf::new();
    assert!(list.append_query(&Formatter::new(Postgres), &mut out).is_err());
    assert!(out.is_empty());
}

fn render_list(fmter: &Formatter, list: &FragmentList) -> (String, Vec<Value>) {
    fmter.format(list).unwrap()
}
