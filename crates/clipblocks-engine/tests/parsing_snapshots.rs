use clipblocks_engine::{
    parse,
    parsing::snapshot,
    print::{PrintOptions, print},
};

#[test]
fn fixture_headings_and_lists() {
    assert_fixture("headings_and_lists");
}

#[test]
fn fixture_quotes_and_callouts() {
    assert_fixture("quotes_and_callouts");
}

#[test]
fn fixture_code_tables_media() {
    assert_fixture("code_tables_media");
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

fn assert_fixture(name: &str) {
    let md = read_fixture(name);

    let nodes = parse(&md);
    snapshot::invariants(&nodes);

    let snap = snapshot::normalize(&nodes);
    insta::with_settings!({
        snapshot_path => concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"),
        prepend_module_to_snapshot => false,
    }, {
        insta::assert_yaml_snapshot!(name, snap);
    });
}

/// Printing a fixture and parsing the output gives the same node types.
#[test]
fn printed_fixtures_reparse_to_same_shape() {
    for name in ["headings_and_lists", "quotes_and_callouts", "code_tables_media"] {
        let nodes = parse(&read_fixture(name));
        let printed = print(&nodes, &PrintOptions::default()).unwrap();
        let reparsed = parse(&printed);
        snapshot::invariants(&reparsed);

        let kinds = |snap: snapshot::Snap| {
            snap.nodes
                .into_iter()
                .map(|n| (n.depth, n.kind))
                .collect::<Vec<_>>()
        };
        assert_eq!(
            kinds(snapshot::normalize(&nodes)),
            kinds(snapshot::normalize(&reparsed)),
            "{name} changed shape after printing:\n{printed}"
        );
    }
}

/// Any markup reduces to its text with the markers removed.
#[test]
fn span_text_reconstructs_content() {
    let nodes = parse("A **bold** and *soft* ~~old~~ `code` [link](https://example.com) line");
    snapshot::invariants(&nodes);
    assert_eq!(nodes[0].content, "A bold and soft old code link line");
}
