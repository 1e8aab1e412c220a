// tests/compiler_tests.rs

use sqldoc::ast::{Field, QueryDoc, Table, Token};
use sqldoc::compiler::{CompileError, CompileOptions, compile, compile_with};

fn open_doc() -> Token {
    Token::OpenDoc("/**".into())
}

fn close_doc() -> Token {
    Token::CloseDoc(";".into())
}

fn title() -> Token {
    Token::Title("title".into())
}

fn desc() -> Token {
    Token::Desc("description".into())
}

fn param() -> Token {
    Token::Param("param".into())
}

fn column() -> Token {
    Token::Column("column".into())
}

fn table() -> Token {
    Token::Table("table".into())
}

fn text(s: &str) -> Token {
    Token::Text(s.into())
}

fn word(s: &str) -> Token {
    Token::BareWord(s.into())
}

fn field(name: &str, blurb: &str, description: &str) -> Field {
    Field {
        proper_name: name.into(),
        blurb: blurb.into(),
        description: description.into(),
    }
}

// ============================================================================
// Documents
// ============================================================================

#[test]
fn test_empty_stream() {
    assert_eq!(compile(&[]).unwrap(), vec![]);
}

#[test]
fn test_title_and_description() {
    let tokens = vec![open_doc(), title(), text("T"), desc(), text("D"), close_doc()];
    let docs = compile(&tokens).unwrap();

    assert_eq!(
        docs,
        vec![QueryDoc {
            title: "T".into(),
            description: "D".into(),
            params: vec![],
            output: Table::default(),
        }]
    );
}

#[test]
fn test_params_keep_order() {
    let tokens = vec![
        open_doc(),
        param(),
        word("you"),
        text("the rockstar"),
        text("the person"),
        param(),
        word("lol"),
        text("bob"),
        text("alice"),
        close_doc(),
    ];
    let docs = compile(&tokens).unwrap();

    assert_eq!(
        docs[0].params,
        vec![
            field("you", "the rockstar", "the person"),
            field("lol", "bob", "alice")
        ]
    );
}

#[test]
fn test_block_tokens_are_ignored() {
    let tokens = vec![
        open_doc(),
        Token::OpenBlock("/**".into()),
        title(),
        text("T"),
        Token::CloseBlock("*/".into()),
        Token::OpenBlock("/**".into()),
        Token::CloseBlock("*/".into()),
        close_doc(),
    ];
    let docs = compile(&tokens).unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].title, "T");
}

#[test]
fn test_stray_argument_tokens_are_ignored() {
    let tokens = vec![open_doc(), text("loose"), word("word"), column(), close_doc()];
    let docs = compile(&tokens).unwrap();

    assert_eq!(docs, vec![QueryDoc::default()]);
}

#[test]
fn test_doc_without_close_is_accepted() {
    let tokens = vec![open_doc(), title(), text("T")];
    let docs = compile(&tokens).unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].title, "T");
}

#[test]
fn test_multiple_documents() {
    let tokens = vec![
        open_doc(),
        title(),
        text("A"),
        close_doc(),
        open_doc(),
        title(),
        text("B"),
        Token::CloseDoc("EOF".into()),
    ];
    let docs = compile(&tokens).unwrap();

    let titles: Vec<_> = docs.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B"]);
}

#[test]
fn test_later_title_wins() {
    let tokens = vec![open_doc(), title(), text("first"), title(), text("second")];
    assert_eq!(compile(&tokens).unwrap()[0].title, "second");
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn test_table() {
    let tokens = vec![
        open_doc(),
        table(),
        title(),
        text("TT"),
        desc(),
        text("Is gold"),
        column(),
        word("c"),
        text("B"),
        text("D"),
        close_doc(),
    ];
    let docs = compile(&tokens).unwrap();

    assert_eq!(
        docs[0].output,
        Table {
            title: "TT".into(),
            description: "Is gold".into(),
            columns: vec![field("c", "B", "D")],
        }
    );
    assert_eq!(docs[0].title, "");
}

#[test]
fn test_table_returns_terminator_to_document() {
    // The CloseDoc ending the table must still close the document, so the
    // second OpenDoc starts a new one.
    let tokens = vec![
        open_doc(),
        table(),
        column(),
        word("a"),
        text("A"),
        text("first"),
        close_doc(),
        open_doc(),
        title(),
        text("Second"),
        close_doc(),
    ];
    let docs = compile(&tokens).unwrap();

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].output.columns.len(), 1);
    assert_eq!(docs[1].title, "Second");
}

#[test]
fn test_param_after_table_belongs_to_document() {
    let tokens = vec![
        open_doc(),
        table(),
        title(),
        text("Rows"),
        param(),
        word("n"),
        text("N"),
        text("Count"),
        close_doc(),
    ];
    let docs = compile(&tokens).unwrap();

    assert_eq!(docs[0].output.title, "Rows");
    assert_eq!(docs[0].params, vec![field("n", "N", "Count")]);
}

#[test]
fn test_last_table_wins() {
    let tokens = vec![
        open_doc(),
        table(),
        title(),
        text("old"),
        table(),
        title(),
        text("new"),
        close_doc(),
    ];
    let docs = compile(&tokens).unwrap();

    assert_eq!(docs[0].output.title, "new");
}

#[test]
fn test_table_at_end_of_stream() {
    let tokens = vec![open_doc(), table(), title(), text("Rows")];
    let docs = compile(&tokens).unwrap();

    assert_eq!(docs[0].output.title, "Rows");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unexpected_top_level() {
    let tokens = vec![title(), text("T")];
    assert_eq!(
        compile(&tokens),
        Err(CompileError::UnexpectedTopLevel {
            found: "Title",
            position: 0
        })
    );

    let tokens = vec![open_doc(), close_doc(), close_doc()];
    assert_eq!(
        compile(&tokens),
        Err(CompileError::UnexpectedTopLevel {
            found: "CloseDoc",
            position: 2
        })
    );
}

#[test]
fn test_title_requires_text() {
    let tokens = vec![open_doc(), title(), word("T"), close_doc()];
    assert_eq!(
        compile(&tokens),
        Err(CompileError::MalformedField {
            annotation: "title",
            expected: "Text",
            found: "BareWord",
            position: 2
        })
    );
}

#[test]
fn test_table_description_requires_text() {
    let tokens = vec![open_doc(), table(), desc(), close_doc()];
    assert!(matches!(
        compile(&tokens),
        Err(CompileError::MalformedField {
            annotation: "description",
            found: "CloseDoc",
            ..
        })
    ));
}

#[test]
fn test_title_at_end_of_stream() {
    let tokens = vec![open_doc(), title()];
    assert_eq!(
        compile(&tokens),
        Err(CompileError::Exhausted { context: "title" })
    );
}

#[test]
fn test_param_exhausted() {
    let tokens = vec![open_doc(), param(), word("a"), text("A")];
    assert_eq!(
        compile(&tokens),
        Err(CompileError::Exhausted { context: "param" })
    );
}

#[test]
fn test_column_exhausted() {
    let tokens = vec![open_doc(), table(), column(), word("a")];
    assert_eq!(
        compile(&tokens),
        Err(CompileError::Exhausted { context: "column" })
    );
}

// ============================================================================
// Field Strictness
// ============================================================================

#[test]
fn test_lenient_fields_default_on_mismatch() {
    // A Param directly followed by CloseDoc swallows it as the name field,
    // then reads the next two tokens as blurb and description.
    let tokens = vec![
        open_doc(),
        param(),
        close_doc(),
        text("B"),
        text("D"),
    ];
    let docs = compile(&tokens).unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].params, vec![field("", "B", "D")]);
}

#[test]
fn test_lenient_fields_mismatch_everywhere() {
    let tokens = vec![open_doc(), param(), text("x"), word("y"), word("z"), close_doc()];
    let docs = compile(&tokens).unwrap();

    assert_eq!(docs[0].params, vec![Field::default()]);
}

#[test]
fn test_strict_fields_reject_mismatch() {
    let tokens = vec![open_doc(), param(), text("x"), text("B"), text("D"), close_doc()];
    let options = CompileOptions {
        strict_fields: true,
    };

    assert_eq!(
        compile_with(&tokens, options),
        Err(CompileError::MalformedField {
            annotation: "param",
            expected: "BareWord",
            found: "Text",
            position: 2
        })
    );
}

#[test]
fn test_strict_fields_accept_well_formed() {
    let tokens = vec![
        open_doc(),
        table(),
        column(),
        word("c"),
        text("B"),
        text("D"),
        close_doc(),
    ];
    let options = CompileOptions {
        strict_fields: true,
    };

    let docs = compile_with(&tokens, options).unwrap();
    assert_eq!(docs[0].output.columns, vec![field("c", "B", "D")]);
}

#[test]
fn test_compile_is_repeatable() {
    let tokens = vec![
        open_doc(),
        title(),
        text("T"),
        param(),
        word("a"),
        text("b"),
        text("c"),
        close_doc(),
    ];
    assert_eq!(compile(&tokens).unwrap(), compile(&tokens).unwrap());
}
