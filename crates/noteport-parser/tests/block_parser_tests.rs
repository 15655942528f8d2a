//! Block and inline parsing over whole note bodies

use noteport_parser::{parse_document_body, parse_header, parse_inline, Block, BlockKind, Segment};
use proptest::prelude::*;

fn text(s: &str) -> Segment {
    Segment::Text(s.to_string())
}

#[test]
fn test_title_and_bold_paragraph() {
    let blocks = parse_document_body("# Title\n\nSome **bold** text");
    assert_eq!(
        blocks,
        vec![
            Block::Heading {
                level: 1,
                segments: vec![text("Title")]
            },
            Block::Text {
                segments: vec![text("Some "), Segment::Bold("bold".into()), text(" text")]
            }
        ]
    );
}

#[test]
fn test_fenced_code_is_never_inline_parsed() {
    let body = "Intro with [[Link]]\n\n```python\n# not a heading\n- not a list\nx = `[[NotALink]]` **raw**\n```\n";
    let blocks = parse_document_body(body);

    assert_eq!(blocks.len(), 2);
    assert_eq!(
        blocks[1],
        Block::Code {
            language: Some("python".into()),
            lines: vec![
                "# not a heading".into(),
                "- not a list".into(),
                "x = `[[NotALink]]` **raw**".into(),
            ]
        }
    );
}

#[test]
fn test_full_note_pipeline() {
    let raw = r#"---
status: draft
---
# Project Alpha

> [!info] Context
> Started in ==March==. %%private note%%

## Tasks
- [x] Kickoff with [[Beta Team]]
- [ ] Write `outline.md`
1. First step
---
![[diagram.png]]
"#;
    let parsed = parse_header(raw);
    let blocks = parse_document_body(&parsed.body);
    let kinds: Vec<BlockKind> = blocks.iter().map(Block::kind).collect();

    assert_eq!(
        kinds,
        vec![
            BlockKind::Heading,
            BlockKind::Quote,
            BlockKind::Quote,
            BlockKind::Heading,
            BlockKind::Task,
            BlockKind::Task,
            BlockKind::Olist,
            BlockKind::Rule,
            BlockKind::Text,
        ]
    );

    assert_eq!(blocks[1].segments().unwrap(), &[Segment::Bold("info: Context".into())]);
    assert_eq!(
        blocks[2].segments().unwrap(),
        &[text("Started in "), Segment::Bold("March".into()), text(".")]
    );
    assert_eq!(
        blocks[4].segments().unwrap(),
        &[text("Kickoff with "), Segment::Wikilink("[[Beta Team]]".into())]
    );
    assert_eq!(
        blocks[5].segments().unwrap(),
        &[text("Write "), Segment::Code("outline.md".into())]
    );
    assert_eq!(blocks[8].plain_text(), "![Attachment: diagram.png]");
}

#[test]
fn test_outline_body_keeps_property_lines() {
    let blocks = parse_document_body("title:: Page\n- A block ((6571a8c2-1111))\n  id:: abc");
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].plain_text(), "title:: Page");
    assert_eq!(blocks[1].kind(), BlockKind::Ulist);
    assert_eq!(blocks[1].plain_text(), "A block ((6571a8c2-1111))");
}

#[test]
fn test_unresolved_wikilink_keeps_brackets() {
    let segments = parse_inline("See [[Alpha]] and [[Missing]]");
    assert_eq!(
        segments,
        vec![
            text("See "),
            Segment::Wikilink("[[Alpha]]".into()),
            text(" and "),
            Segment::Wikilink("[[Missing]]".into()),
        ]
    );
}

#[derive(Debug, Clone)]
enum Token {
    Plain(String),
    Bold(String),
    Italic(String),
    Code(String),
}

impl Token {
    fn source(&self) -> String {
        match self {
            Token::Plain(w) => w.clone(),
            Token::Bold(w) => format!("**{}**", w),
            Token::Italic(w) => format!("*{}*", w),
            Token::Code(w) => format!("`{}`", w),
        }
    }

    fn visible(&self) -> &str {
        match self {
            Token::Plain(w) | Token::Bold(w) | Token::Italic(w) | Token::Code(w) => w,
        }
    }
}

fn token() -> impl Strategy<Value = Token> {
    let word = "[a-zA-Z0-9]{1,8}";
    prop_oneof![
        word.prop_map(Token::Plain),
        word.prop_map(Token::Bold),
        word.prop_map(Token::Italic),
        word.prop_map(Token::Code),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn segments_reproduce_visible_text(tokens in prop::collection::vec(token(), 1..8)) {
        let source = tokens.iter().map(Token::source).collect::<Vec<_>>().join(" ");
        let visible = tokens.iter().map(Token::visible).collect::<Vec<_>>().join(" ");

        let joined: String = parse_inline(&source).iter().map(Segment::as_str).collect();
        prop_assert_eq!(joined, visible);
    }

    #[test]
    fn plain_lines_are_one_text_segment(line in "[a-zA-Z0-9 ,.]{0,60}") {
        prop_assert_eq!(parse_inline(&line), vec![Segment::Text(line.clone())]);
    }

    #[test]
    fn code_lines_survive_verbatim(lines in prop::collection::vec("[a-zA-Z0-9 *_#>=%\\[\\]-]{0,30}", 0..6)) {
        let body = format!("```\n{}\n```", lines.join("\n"));
        let blocks = parse_document_body(&body);
        let expected = if lines.is_empty() { vec![String::new()] } else { lines.clone() };
        prop_assert_eq!(blocks, vec![Block::Code { language: None, lines: expected }]);
    }
}
