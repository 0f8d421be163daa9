//! Command chains run against a temporary library through a scripted console

mod common;

use std::fs;

use common::{Fixture, Launched, Script};
use imbib_bibtex::SessionError;
use imbib_library::{Library, LibraryError};
use rstest::rstest;

#[test]
fn test_read_appends_documents() {
    let mut fx = Fixture::new(Script::default());
    fx.run_on_refs(&[]).unwrap();
    assert_eq!(fx.refs(), ["Turing1950", "Einstein1905", "Knuth1984", "NoYear"]);

    let doc = &fx.session.documents[0];
    assert_eq!(doc.get("type").as_deref(), Some("article"));
    assert_eq!(doc.get("journal").as_deref(), Some("Mind"));

    // Reading twice appends
    let refs = fx.path_str("refs.bib");
    fx.run(&["read", &refs]).unwrap();
    assert_eq!(fx.session.documents.len(), 8);
}

#[test]
fn test_read_missing_file() {
    let mut fx = Fixture::new(Script::default());
    let missing = fx.path_str("missing.bib");
    let err = fx.run(&["read", &missing]).unwrap_err();
    assert!(matches!(err, SessionError::Codec(_)));
}

#[rstest]
#[case(&["sort", "-k", "year"], &["Einstein1905", "Turing1950", "Knuth1984", "NoYear"])]
#[case(&["sort", "-k", "year", "-r"], &["NoYear", "Knuth1984", "Turing1950", "Einstein1905"])]
#[case(&["sort", "--key", "ref"], &["Einstein1905", "Knuth1984", "NoYear", "Turing1950"])]
#[case(&["sort", "-k", "journal"], &["Turing1950", "Einstein1905", "Knuth1984", "NoYear"])]
fn test_sort(#[case] args: &[&str], #[case] expected: &[&str]) {
    let mut fx = Fixture::new(Script::default());
    fx.run_on_refs(args).unwrap();
    assert_eq!(fx.refs(), expected);
}

#[test]
fn test_sort_requires_key() {
    let mut fx = Fixture::new(Script::default());
    let err = fx.run_on_refs(&["sort", "-r"]).unwrap_err();
    assert!(matches!(err, SessionError::Cli(_)));
    // Nothing ran: the chain is parsed up front
    assert!(fx.session.documents.is_empty());
}

#[test]
fn test_save_refused_writes_nothing() {
    let mut fx = Fixture::new(Script::confirms(&[false]));
    let out = fx.path_str("out.bib");
    fx.run_on_refs(&["save", &out]).unwrap();

    assert!(!fx.path("out.bib").exists());
    assert_eq!(fx.printed(), ["Not saving.."]);
}

#[test]
fn test_save_confirmed() {
    let mut fx = Fixture::new(Script::confirms(&[true]));
    let out = fx.path_str("out.bib");
    fx.run_on_refs(&["save", &out]).unwrap();

    let saved = imbib_codec::read_bibtex(&fx.path("out.bib")).unwrap();
    assert!(saved.errors.is_empty());
    assert_eq!(saved.documents.len(), 4);
}

#[test]
fn test_save_force_skips_confirmation() {
    // An unexpected question would panic in the scripted console
    let mut fx = Fixture::new(Script::default());
    let out = fx.path_str("out.bib");
    fx.run_on_refs(&["sort", "-k", "year", "save", &out, "--force"]).unwrap();

    let text = fs::read_to_string(fx.path("out.bib")).unwrap();
    let einstein = text.find("@article{Einstein1905,").unwrap();
    let turing = text.find("@article{Turing1950,").unwrap();
    assert!(einstein < turing);
    assert!(text.contains("@book{Knuth1984,"));
    assert!(text.contains("@misc{NoYear,"));
}

#[test]
fn test_save_default_bibfile() {
    let mut fx = Fixture::with_config(Script::default(), |config, dir| {
        config.bibtex.default_save_bibfile = dir.join("default.bib").to_string_lossy().into_owned();
    });
    fx.run_on_refs(&["save", "-f"]).unwrap();
    assert!(fx.path("default.bib").exists());
}

#[test]
fn test_save_without_any_file() {
    let mut fx = Fixture::new(Script::default());
    let err = fx.run_on_refs(&["save", "-f"]).unwrap_err();
    assert!(matches!(err, SessionError::MissingSaveFile));
}

#[test]
fn test_add_all() {
    let mut fx = Fixture::new(Script::default());
    fx.run(&["add", ".", "--all"]).unwrap();
    assert_eq!(fx.refs(), ["Einstein1905", "Shannon1948", "Turing1950"]);

    let einstein = &fx.session.documents[0];
    assert!(einstein.folder().is_some());
}

#[test]
fn test_add_single_pick() {
    let mut fx = Fixture::new(Script::picks(&[Some(1)]));
    fx.run(&["add"]).unwrap();
    assert_eq!(fx.refs(), ["Shannon1948"]);
}

#[test]
fn test_add_single_match_does_not_prompt() {
    let mut fx = Fixture::new(Script::default());
    fx.run(&["add", "author:turing"]).unwrap();
    assert_eq!(fx.refs(), ["Turing1950"]);
}

#[test]
fn test_add_cancelled() {
    let mut fx = Fixture::new(Script::picks(&[None]));
    fx.run(&["add"]).unwrap();
    assert!(fx.session.documents.is_empty());
}

#[test]
fn test_add_missing_library() {
    let mut fx = Fixture::with_config(Script::default(), |config, dir| {
        config.library.dir = dir.join("nowhere").to_string_lossy().into_owned();
    });
    let err = fx.run(&["add", "-a"]).unwrap_err();
    assert!(matches!(err, SessionError::Library(LibraryError::Missing(_))));
}

#[test]
fn test_update_from_picked() {
    let mut fx = Fixture::new(Script::picks(&[Some(1)]));
    fx.run_on_refs(&["update", "--from"]).unwrap();

    let einstein = &fx.session.documents[1];
    assert_eq!(einstein.get("doi").as_deref(), Some("10.1002/andp.19053221004"));
    assert!(einstein.folder().is_some());
    // Others untouched
    assert!(fx.session.documents[0].folder().is_none());
}

#[test]
fn test_update_all_skips_documents_missing_from_library() {
    let mut fx = Fixture::new(Script::default());
    fx.run_on_refs(&["update", "-a", "-f"]).unwrap();

    let in_library: Vec<bool> = fx
        .session
        .documents
        .iter()
        .map(|doc| doc.folder().is_some())
        .collect();
    assert_eq!(in_library, [true, true, false, false]);
    assert_eq!(fx.refs(), ["Turing1950", "Einstein1905", "Knuth1984", "NoYear"]);
}

#[test]
fn test_update_to_writes_library() {
    let mut fx = Fixture::new(Script::default());
    fx.run_on_refs(&["update", "--all", "--to"]).unwrap();

    // Session documents stay as read
    assert!(fx.session.documents.iter().all(|doc| doc.folder().is_none()));

    let library = Library::open(fx.path("library")).unwrap();
    let turing = &library.documents()[2];
    assert_eq!(turing.get("journal").as_deref(), Some("Mind"));
    let einstein = &library.documents()[0];
    assert_eq!(einstein.get("files").as_deref(), Some("paper.pdf"));
}

#[test]
fn test_update_cancelled_pick() {
    let mut fx = Fixture::new(Script::picks(&[None]));
    fx.run_on_refs(&["update", "-f"]).unwrap();
    assert!(fx.session.documents.iter().all(|doc| doc.folder().is_none()));
}

#[test]
fn test_pick_number() {
    let mut fx = Fixture::new(Script::default());
    fx.run_on_refs(&["pick", "-n", "2"]).unwrap();
    assert_eq!(fx.refs(), ["Einstein1905"]);
}

#[test]
fn test_pick_number_out_of_range() {
    let mut fx = Fixture::new(Script::default());
    let err = fx.run_on_refs(&["pick", "-n", "9"]).unwrap_err();
    assert!(matches!(err, SessionError::Usage(_)));
}

#[test]
fn test_pick_interactive_and_cancel() {
    let mut fx = Fixture::new(Script::picks(&[None, Some(2)]));
    fx.run_on_refs(&["pick"]).unwrap();
    assert_eq!(fx.session.documents.len(), 4);

    fx.run(&["pick"]).unwrap();
    assert_eq!(fx.refs(), ["Knuth1984"]);
}

#[test]
fn test_rm() {
    let mut fx = Fixture::new(Script::picks(&[Some(0)]));
    fx.run_on_refs(&["rm"]).unwrap();
    assert_eq!(fx.refs(), ["Einstein1905", "Knuth1984", "NoYear"]);
}

#[test]
fn test_ref_prints_and_writes() {
    let mut fx = Fixture::new(Script::picks(&[Some(2), Some(1)]));
    let out = fx.path_str("ref.txt");
    fx.run_on_refs(&["ref", "ref", "-o", &out]).unwrap();

    assert_eq!(fx.printed(), ["Knuth1984"]);
    assert_eq!(fs::read_to_string(fx.path("ref.txt")).unwrap(), "Einstein1905");
}

#[test]
fn test_ref_missing() {
    let mut fx = Fixture::new(Script::default());
    fs::write(fx.path("notes.yaml"), "title: No reference here\n").unwrap();
    let notes = fx.path_str("notes.yaml");
    let err = fx.run(&["yaml", &notes, "ref"]).unwrap_err();
    assert!(matches!(err, SessionError::MissingRef(title) if title == "No reference here"));
}

#[test]
fn test_cmd_renders_each_document() {
    let mut fx = Fixture::new(Script::default());
    fx.run_on_refs(&["sort", "-k", "year", "cmd", "echo {doc[ref]} {doc[year]}"]).unwrap();

    assert_eq!(
        fx.launched(),
        [
            common::run(&["echo", "Einstein1905", "1905"]),
            common::run(&["echo", "Turing1950", "1950"]),
            common::run(&["echo", "Knuth1984", "1984"]),
            common::run(&["echo", "NoYear", ""]),
        ]
    );
}

#[test]
fn test_cmd_fields_stay_single_arguments() {
    let mut fx = Fixture::new(Script::default());
    fs::write(
        fx.path("odd.bib"),
        "@article{Odd2000,\n  title = {Paper; touch pwned $(id) `id`},\n}\n",
    )
    .unwrap();
    let odd = fx.path_str("odd.bib");
    fx.run(&["read", &odd, "cmd", "echo 'title:' {doc[title]}"]).unwrap();

    assert_eq!(
        fx.launched(),
        [common::run(&["echo", "title:", "Paper; touch pwned $(id) `id`"])]
    );
}

#[test]
fn test_cmd_rejects_unbalanced_quotes() {
    let mut fx = Fixture::new(Script::default());
    let err = fx.run_on_refs(&["cmd", "echo 'unclosed"]).unwrap_err();
    assert!(matches!(err, SessionError::Usage(_)));
    assert!(fx.launched().is_empty());
}

#[test]
fn test_export_json_to_file() {
    let mut fx = Fixture::new(Script::default());
    let out = fx.path_str("out.json");
    fx.run_on_refs(&["export", "-f", "json", "-o", &out]).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fx.path("out.json")).unwrap()).unwrap();
    let docs = value.as_array().unwrap();
    assert_eq!(docs.len(), 4);
    assert_eq!(docs[0]["ref"], "Turing1950");
    assert!(fx.printed().is_empty());
}

#[test]
fn test_export_defaults_to_bibtex_on_stdout() {
    let mut fx = Fixture::new(Script::default());
    fx.run_on_refs(&["pick", "-n", "1", "export"]).unwrap();

    let printed = fx.printed();
    assert_eq!(printed.len(), 1);
    assert!(printed[0].starts_with("@article{Turing1950,\n"));
}

#[test]
fn test_yaml_and_json_read() {
    let mut fx = Fixture::new(Script::default());
    fs::write(
        fx.path("docs.yaml"),
        "---\nref: A2000\ntitle: First\n---\nref: B2001\ntitle: Second\n",
    )
    .unwrap();
    fs::write(fx.path("docs.json"), r#"[{"ref": "C2002", "year": 2002}]"#).unwrap();

    let yaml = fx.path_str("docs.yaml");
    let json = fx.path_str("docs.json");
    fx.run(&["yaml", &yaml, "json", &json]).unwrap();
    assert_eq!(fx.refs(), ["A2000", "B2001", "C2002"]);
}

#[test]
fn test_yaml_export_round_trip() {
    let mut fx = Fixture::new(Script::default());
    let out = fx.path_str("out.yaml");
    fx.run_on_refs(&["export", "--format", "yaml", "--out", &out]).unwrap();

    let mut again = Fixture::new(Script::default());
    again.run(&["yaml", &out]).unwrap();
    assert_eq!(again.refs(), ["Turing1950", "Einstein1905", "Knuth1984", "NoYear"]);
}

#[test]
fn test_auto_read() {
    let configure = |config: &mut imbib_bibtex::Config, dir: &std::path::Path| {
        config.bibtex.auto_read = true;
        config.bibtex.default_read_bibfile = dir.join("refs.bib").to_string_lossy().into_owned();
    };

    let mut fx = Fixture::with_config(Script::default(), configure);
    fx.run(&["sort", "-k", "year"]).unwrap();
    assert_eq!(fx.session.documents.len(), 4);

    let mut fx = Fixture::with_config(Script::default(), configure);
    fx.run(&["--noar", "sort", "-k", "year"]).unwrap();
    assert!(fx.session.documents.is_empty());
}

#[test]
fn test_auto_read_ignores_missing_file() {
    let mut fx = Fixture::with_config(Script::default(), |config, dir| {
        config.bibtex.auto_read = true;
        config.bibtex.default_read_bibfile = dir.join("gone.bib").to_string_lossy().into_owned();
    });
    fx.run(&["sort", "-k", "year"]).unwrap();
    assert!(fx.session.documents.is_empty());
}

#[test]
fn test_open_library_file() {
    let mut fx = Fixture::new(Script::picks(&[Some(1), Some(0)]));
    fx.run_on_refs(&["open", "open"]).unwrap();

    assert_eq!(
        fx.launched(),
        [
            Launched::Open(fx.path("library").join("einstein-1905").join("paper.pdf")),
            Launched::Open(fx.path("library").join("turing-1950")),
        ]
    );
}

#[test]
fn test_open_not_in_library() {
    let mut fx = Fixture::new(Script::picks(&[Some(3)]));
    let err = fx.run_on_refs(&["open"]).unwrap_err();
    assert!(matches!(err, SessionError::Library(LibraryError::NotFound)));
    assert!(fx.launched().is_empty());
}

#[test]
fn test_edit_session_document() {
    let script = Script {
        picks: vec![Some(0)],
        edited: Some("ref: Turing1950\ntitle: Edited title\nyear: 1951\n".to_string()),
        ..Script::default()
    };
    let mut fx = Fixture::new(script);
    fx.run_on_refs(&["edit"]).unwrap();

    let turing = &fx.session.documents[0];
    assert_eq!(turing.title().as_deref(), Some("Edited title"));
    assert_eq!(turing.get("year").as_deref(), Some("1951"));
    assert!(turing.get("journal").is_none());
    assert!(matches!(&fx.launched()[..], [Launched::Edit(_)]));
}

#[test]
fn test_edit_library_document() {
    let mut fx = Fixture::new(Script::picks(&[Some(0)]));
    fx.run_on_refs(&["edit", "--lib"]).unwrap();

    assert_eq!(
        fx.launched(),
        [Launched::Edit(
            fx.path("library").join("turing-1950").join("info.yaml")
        )]
    );
}

#[test]
fn test_unknown_command() {
    let mut fx = Fixture::new(Script::default());
    let err = fx.run(&["frobnicate"]).unwrap_err();
    assert!(matches!(err, SessionError::Cli(_)));
}
