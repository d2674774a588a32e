//! Behavioral properties of the editing API
//!
//! Every mutation must be idempotent, resolve names case-insensitively, create what is
//! missing, never remove more than it was asked to, and keep the order of everything
//! it did not touch.

use dotora::dotora::editing::{apply, EditRequest};
use dotora::dotora::formats::FormatOptions;
use dotora::dotora::{AttrPath, DotOraFile};
use rstest::rstest;

const TNSNAMES: &str = "\
ORCL =
  (DESCRIPTION =
    (ADDRESS = (PROTOCOL = TCP)(HOST = db01)(PORT = 1521))
    (CONNECT_DATA = (SERVICE_NAME = orcl))
  )
RMAN = (DESCRIPTION = (ADDRESS = (PROTOCOL = TCP)(HOST = rman01)(PORT = 1521)))
REPORTS = (DESCRIPTION = (ADDRESS = (PROTOCOL = TCP)(HOST = rep01)(PORT = 1521)))
";

fn path(p: &str) -> AttrPath {
    AttrPath::parse(p).unwrap()
}

fn names(file: &DotOraFile) -> Vec<&str> {
    file.params().iter().map(|p| p.name()).collect()
}

#[rstest]
#[case::set_host(EditRequest::present("ORCL").attribute_path("DESCRIPTION.ADDRESS.HOST").attribute_value("db02"))]
#[case::new_attribute(EditRequest::present("RMAN").attribute_path("DESCRIPTION.CONNECT_DATA.SID").attribute_value("RMAN"))]
#[case::new_alias(EditRequest::present("NEW").whole_value("(DESCRIPTION = (ADDRESS = (HOST = x)))"))]
#[case::top_level_name(EditRequest::present("REPORTS").attribute_name("SDU").attribute_value("8192"))]
#[case::delete_path(EditRequest::absent("ORCL").attribute_path("DESCRIPTION.CONNECT_DATA"))]
#[case::delete_name(EditRequest::absent("RMAN").attribute_name("DESCRIPTION"))]
#[case::remove_alias(EditRequest::absent("REPORTS"))]
#[case::replace_everywhere(EditRequest::present("@all").attribute_name("PORT").attribute_value("1522"))]
#[case::guarded_replace(EditRequest::present("@all").attribute_name("HOST").attribute_value("db09").old_value("db01"))]
fn test_edits_are_idempotent(#[case] request: EditRequest) {
    let options = FormatOptions::default();
    let first = apply(TNSNAMES, &request, &options).unwrap();
    assert!(first.changed, "first application should change the file");

    let second = apply(&first.content, &request, &options).unwrap();
    assert!(!second.changed, "second application should be a no-op");
    assert_eq!(second.content, first.content);
}

#[rstest]
#[case("orcl", "description.address.host")]
#[case("Orcl", "Description.Address.Host")]
#[case("ORCL", "DESCRIPTION/ADDRESS/HOST")]
fn test_names_resolve_case_insensitively(#[case] alias: &str, #[case] attr: &str) {
    let mut file = DotOraFile::parse(TNSNAMES).unwrap();
    assert!(file.upsert_alias_attribute(alias, &path(attr), "db05"));
    assert_eq!(file.params().len(), 3);
    assert_eq!(file.lookup("ORCL", &path("DESCRIPTION.ADDRESS.HOST")), Some("db05"));
    assert_eq!(file.params()[0].name(), "ORCL");
    assert_eq!(file.params()[0].root.children().map(|c| c[0].key.as_str()), Some("DESCRIPTION"));
}

#[test]
fn test_path_creation_on_empty_file() {
    let mut file = DotOraFile::parse("").unwrap();
    assert!(file.upsert_alias_attribute("NEW", &path("DESCRIPTION.ADDRESS.HOST"), "h"));
    assert_eq!(file.to_string(), "NEW=(DESCRIPTION=(ADDRESS=(HOST=h)))\n");
}

#[test]
fn test_delete_leaves_siblings_and_ancestors() {
    let mut file = DotOraFile::parse(TNSNAMES).unwrap();
    assert!(file.delete_param_path("ORCL", &path("DESCRIPTION.CONNECT_DATA.SERVICE_NAME")));
    assert_eq!(
        file.alias_value("ORCL"),
        "(DESCRIPTION=(ADDRESS=(PROTOCOL=TCP)(HOST=db01)(PORT=1521))(CONNECT_DATA=()))"
    );
    assert_eq!(
        file.alias_value("RMAN"),
        "(DESCRIPTION=(ADDRESS=(PROTOCOL=TCP)(HOST=rman01)(PORT=1521)))"
    );
}

#[test]
fn test_order_is_preserved_around_edits() {
    let mut file = DotOraFile::parse(TNSNAMES).unwrap();
    assert!(file.upsert_alias("RMAN", "(DESCRIPTION = (ADDRESS = (HOST = rman02)))").unwrap());
    assert!(file.upsert_alias_attribute("ORCL", &path("DESCRIPTION.ADDRESS.SEND_BUF_SIZE"), "65536"));
    assert!(file.set_param_value("ZZZ", "X", "1"));
    assert_eq!(names(&file), vec!["ORCL", "RMAN", "REPORTS", "ZZZ"]);

    let address = file.resolve("ORCL", &path("DESCRIPTION.ADDRESS")).unwrap();
    let keys: Vec<&str> = address
        .children()
        .unwrap()
        .iter()
        .map(|c| c.key.as_str())
        .collect();
    assert_eq!(keys, vec!["PROTOCOL", "HOST", "PORT", "SEND_BUF_SIZE"]);
}

#[test]
fn test_duplicates_survive_unrelated_edits() {
    let source = format!("{}orcl = (DESCRIPTION = (ADDRESS = (HOST = shadow)))\n", TNSNAMES);
    let mut file = DotOraFile::parse(&source).unwrap();
    assert!(file.upsert_alias_attribute("RMAN", &path("DESCRIPTION.ADDRESS.PORT"), "1600"));
    assert_eq!(names(&file), vec!["ORCL", "RMAN", "REPORTS", "orcl"]);
    assert_eq!(
        file.params()[3].root.children().map(|c| c.len()),
        Some(1)
    );

    assert!(file.remove_alias("ORCL"));
    assert_eq!(file.lookup("ORCL", &path("DESCRIPTION.ADDRESS.HOST")), Some("shadow"));
}

#[test]
fn test_edit_outcome_reports_alias_value() {
    let request = EditRequest::present("RMAN")
        .attribute_path("DESCRIPTION.ADDRESS.HOST")
        .attribute_value("rman02");
    let outcome = apply(TNSNAMES, &request, &FormatOptions::default()).unwrap();
    assert_eq!(
        outcome.message(),
        "RMAN=(DESCRIPTION=(ADDRESS=(PROTOCOL=TCP)(HOST=rman02)(PORT=1521)))"
    );
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_scalar_in_the_way_becomes_a_warning() {
    let request = EditRequest::present("ORCL")
        .attribute_path("DESCRIPTION.ADDRESS.HOST.NAME")
        .attribute_value("x");
    let outcome = apply(TNSNAMES, &request, &FormatOptions::default()).unwrap();
    assert!(!outcome.changed);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].starts_with("Alias: ORCL,"), "{}", outcome.warnings[0]);
}

#[test]
fn test_indexed_path_appends_next_sibling() {
    let mut file = DotOraFile::parse(TNSNAMES).unwrap();
    assert!(file.upsert_alias_attribute("ORCL", &path("DESCRIPTION.ADDRESS[1].HOST"), "db02"));
    assert_eq!(file.lookup("ORCL", &path("DESCRIPTION.ADDRESS[1].HOST")), Some("db02"));
    assert_eq!(file.lookup("ORCL", &path("DESCRIPTION.ADDRESS[0].HOST")), Some("db01"));

    assert!(!file.upsert_alias_attribute("ORCL", &path("DESCRIPTION.ADDRESS[5].HOST"), "db06"));
    assert_eq!(file.warnings().len(), 1);
}

#[test]
fn test_refused_edit_leaves_every_alias_untouched() {
    let source = "A=(NEW=(X=1))\nB=(D=(H=1))\n";
    let request = EditRequest::present("@all")
        .attribute_path("NEW.X[1]")
        .attribute_value("v");
    let outcome = apply(source, &request, &FormatOptions::default()).unwrap();
    assert!(outcome.changed);
    assert_eq!(outcome.content, "A=(NEW=(X=1)(X=v))\nB=(D=(H=1))\n");
    assert_eq!(outcome.warnings.len(), 1);
}

#[rstest]
#[case("b)")]
#[case("(b")]
#[case("x #y")]
#[case("a=b")]
fn test_unwritable_values_keep_file_parseable(#[case] value: &str) {
    let request = EditRequest::present("ORCL")
        .attribute_path("DESCRIPTION.ADDRESS.HOST")
        .attribute_value(value);
    let outcome = apply(TNSNAMES, &request, &FormatOptions::default()).unwrap();
    assert!(!outcome.changed);
    assert_eq!(outcome.warnings.len(), 1);

    let reparsed = DotOraFile::parse(&outcome.content).unwrap();
    assert_eq!(reparsed.lookup("ORCL", &path("DESCRIPTION.ADDRESS.HOST")), Some("db01"));
}

#[test]
fn test_empty_whole_value_survives_a_second_edit() {
    let options = FormatOptions::default();
    let emptied = apply(TNSNAMES, &EditRequest::present("ORCL").whole_value(""), &options).unwrap();
    assert!(emptied.changed);
    assert!(emptied.content.starts_with("ORCL=\nRMAN="));

    let request = EditRequest::present("REPORTS")
        .attribute_path("DESCRIPTION.ADDRESS.PORT")
        .attribute_value("1600");
    let next = apply(&emptied.content, &request, &options).unwrap();
    assert!(next.warnings.is_empty());
    let file = DotOraFile::parse(&next.content).unwrap();
    assert_eq!(names(&file), vec!["ORCL", "RMAN", "REPORTS"]);
}
