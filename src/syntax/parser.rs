//! Reader: converts source text into a [`Program`] of spanned expression trees.
//!
//! Purely syntactic. Atoms are classified here (number, text, boolean,
//! symbol); nothing is resolved or evaluated.

use pest::{error::Error, iterators::Pair, Parser};
use pest_derive::Parser;

use crate::ast::atom::Atom;
use crate::ast::{AstNode, Expr, Program, Span, Spanned};
use crate::errors::{ErrorKind, SexprError};
use crate::runtime::source::SourceContext;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct SexprParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses source text into a program.
pub fn parse(source_text: &str, source: &SourceContext) -> Result<Program, SexprError> {
    if source_text.trim().is_empty() {
        return Ok(Program::default());
    }

    let mut pairs = SexprParser::parse(Rule::program, source_text)
        .map_err(|e| convert_parse_error(e, source))?;

    let Some(program) = pairs.next() else {
        return Ok(Program::default());
    };

    let forms = program
        .into_inner()
        .filter(|p| p.as_rule() != Rule::EOI)
        .map(|p| build_ast_node(p, source))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Program::new(forms))
}

/// Parses text that has no file behind it (REPL lines, tests).
pub fn parse_str(source_text: &str) -> Result<Program, SexprError> {
    parse(source_text, &SourceContext::from_file("<input>", source_text))
}

// ============================================================================
// AST BUILDERS
// ============================================================================

fn build_ast_node(pair: Pair<Rule>, source: &SourceContext) -> Result<AstNode, SexprError> {
    let span = get_span(&pair);

    match pair.as_rule() {
        Rule::form => {
            let children = pair
                .into_inner()
                .map(|p| build_ast_node(p, source))
                .collect::<Result<Vec<_>, _>>()?;
            // `()` is the empty list, never an empty form.
            if children.is_empty() {
                return Ok(make_leaf(Atom::List(Vec::new()), span));
            }
            Ok(Spanned {
                value: Expr::Form(children),
                span,
            })
        }

        Rule::number => {
            let text = pair.as_str();
            let value = text.parse::<f64>().map_err(|_| {
                make_error(
                    source,
                    ErrorKind::InvalidLiteral {
                        literal_type: "number".into(),
                        value: text.into(),
                    },
                    span,
                )
            })?;
            Ok(make_leaf(Atom::Number(value), span))
        }

        Rule::boolean => Ok(make_leaf(Atom::Boolean(pair.as_str() == "true"), span)),

        Rule::string => {
            let inner = pair.into_inner().next().map(|p| p.as_str()).unwrap_or_default();
            Ok(make_leaf(Atom::Text(unescape_string(inner)), span))
        }

        Rule::symbol => Ok(make_leaf(Atom::Symbol(pair.as_str().to_string()), span)),

        rule => Err(make_error(
            source,
            ErrorKind::Syntax {
                message: format!("unexpected {:?}", rule),
            },
            span,
        )),
    }
}

fn make_leaf(atom: Atom, span: Span) -> AstNode {
    Spanned {
        value: Expr::Leaf(atom),
        span,
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

fn get_span(pair: &Pair<Rule>) -> Span {
    Span {
        start: pair.as_span().start(),
        end: pair.as_span().end(),
    }
}

/// Resolves `\" \\ \n \t \r`; any other escape is kept as written.
fn unescape_string(inner: &str) -> String {
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

fn make_error(source: &SourceContext, kind: ErrorKind, span: Span) -> SexprError {
    SexprError::new(kind).located(source, span)
}

fn convert_parse_error(error: Error<Rule>, source: &SourceContext) -> SexprError {
    let span = match error.location {
        pest::error::InputLocation::Pos(pos) => Span { start: pos, end: pos },
        pest::error::InputLocation::Span((start, end)) => Span { start, end },
    };

    let error = error.renamed_rules(|rule| match rule {
        Rule::EOI => "end of input".to_string(),
        Rule::form => "a form".to_string(),
        Rule::boolean | Rule::number | Rule::string | Rule::symbol => "an atom".to_string(),
        other => format!("{:?}", other),
    });
    let message = error.variant.message().to_string();

    make_error(source, ErrorKind::Syntax { message }, span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_atom(node: &AstNode) -> &Atom {
        node.value.as_leaf().expect("leaf")
    }

    #[test]
    fn empty_input() {
        assert!(parse_str("").unwrap().is_empty());
        assert!(parse_str("  ; only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn classifies_atoms() {
        let program = parse_str(r#"42 -1.5 "hi" true false foo -"#).unwrap();
        let atoms: Vec<&Atom> = program.forms.iter().map(leaf_atom).collect();
        assert_eq!(
            atoms,
            vec![
                &Atom::Number(42.0),
                &Atom::Number(-1.5),
                &Atom::Text("hi".into()),
                &Atom::Boolean(true),
                &Atom::Boolean(false),
                &Atom::Symbol("foo".into()),
                &Atom::Symbol("-".into()),
            ]
        );
    }

    #[test]
    fn words_starting_like_literals_are_symbols() {
        let program = parse_str("truthy 1abc -x").unwrap();
        let atoms: Vec<&Atom> = program.forms.iter().map(leaf_atom).collect();
        assert_eq!(
            atoms,
            vec![
                &Atom::Symbol("truthy".into()),
                &Atom::Symbol("1abc".into()),
                &Atom::Symbol("-x".into()),
            ]
        );
    }

    #[test]
    fn empty_parens_are_the_empty_list() {
        let program = parse_str("()").unwrap();
        assert_eq!(leaf_atom(&program.forms[0]), &Atom::List(vec![]));
    }

    #[test]
    fn string_escapes() {
        let program = parse_str(r#""a\"b\\c\nd""#).unwrap();
        assert_eq!(leaf_atom(&program.forms[0]), &Atom::Text("a\"b\\c\nd".into()));
    }

    #[test]
    fn spans_cover_the_source_text() {
        let program = parse_str("(+ 1 22)").unwrap();
        let node = &program.forms[0];
        assert_eq!(node.span, Span::new(0, 8));
        let (_, operands) = node.value.as_form().unwrap();
        assert_eq!(operands[1].span, Span::new(5, 7));
    }

    #[test]
    fn unmatched_paren_is_a_syntax_error() {
        let err = parse_str("(a b").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Syntax { .. }));
        assert!(err.span().is_some());
        assert!(parse_str("(a))").is_err());
        assert!(parse_str("\"open").is_err());
    }
}
