//! The templating collaborator seam and a minimal default implementation.
//!
//! The pipeline treats expression evaluation as an external service: anything
//! that can turn a template string plus a key-value context into a rendered
//! string satisfies [`TemplateEngine`]. The built-in [`Interpolator`] covers
//! the constructs the pipeline itself depends on — `{{ path }}` substitution
//! and the `required(value, message)` filter — and nothing more. Hosts with a
//! full expression language plug it in through the trait.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::opt,
    multi::separated_list1,
    sequence::delimited,
};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Failure modes of a templating collaborator.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A `required(value, message)` construct fired on an undefined value.
    #[error("{message}")]
    Required {
        /// The template author's message.
        message: String,
    },

    /// An expression referenced a value the engine cannot resolve and the
    /// engine treats that as fatal.
    #[error("undefined value: {name}")]
    Undefined {
        /// The unresolved reference.
        name: String,
    },

    /// The template text is malformed.
    #[error("template syntax error: {message}")]
    Syntax {
        /// Description of the malformed construct.
        message: String,
    },
}

/// A templating collaborator: renders a template string against a context.
///
/// Implementations are expected to be side-effect-free and deterministic for
/// a given (template, context) pair; the pipeline invokes them synchronously
/// per value.
pub trait TemplateEngine {
    /// Renders `template` against `context`.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the template is malformed or a
    /// `required` value is absent.
    fn render_str(
        &self,
        template: &str,
        context: &Mapping,
    ) -> std::result::Result<String, EngineError>;
}

/// Minimal default engine: `{{ path }}` substitution with dotted lookups.
///
/// Undefined references render as empty text (which the renderer then prunes
/// to absent) unless the expression carries a `| required('message')` filter,
/// in which case the render fails with that message. Literal text outside
/// `{{ }}` passes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpolator;

impl TemplateEngine for Interpolator {
    fn render_str(
        &self,
        template: &str,
        context: &Mapping,
    ) -> std::result::Result<String, EngineError> {
        let mut out = String::new();
        let mut rest = template;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                return Err(EngineError::Syntax {
                    message: format!("unterminated expression in \"{template}\""),
                });
            };
            out.push_str(&eval_expression(&after[..end], context)?);
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// A parsed `{{ ... }}` expression body.
#[derive(Debug, PartialEq, Eq)]
struct Expression {
    /// Dotted lookup path into the context.
    path: Vec<String>,
    /// Message of a trailing `| required('...')` filter, if present.
    required: Option<String>,
}

fn eval_expression(body: &str, context: &Mapping) -> std::result::Result<String, EngineError> {
    let expr = parse_expression(body)?;
    match lookup(context, &expr.path) {
        Some(value) => Ok(stringify(value)),
        None => match expr.required {
            Some(message) => Err(EngineError::Required { message }),
            None => Ok(String::new()),
        },
    }
}

/// Resolves a dotted path against the context, descending through nested
/// mappings. `None` means undefined; a present null is defined.
fn lookup<'a>(context: &'a Mapping, path: &[String]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = context.get(first.as_str())?;
    for segment in rest {
        current = current.as_mapping()?.get(segment.as_str())?;
    }
    Some(current)
}

/// Renders a context value as substitution text.
///
/// Scalars stringify naturally; null renders empty (and is then pruned by the
/// caller); sequences and mappings render as inline JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Parses an identifier (path segment or filter name).
fn identifier(input: &str) -> IResult<&str, String> {
    let (input, first) = take_while1(is_ident_start).parse(input)?;
    let (input, rest) = take_while(is_ident_continue).parse(input)?;
    Ok((input, format!("{first}{rest}")))
}

/// Parses a single- or double-quoted string literal (no escapes).
fn quoted_literal(input: &str) -> IResult<&str, String> {
    let single = delimited(char('\''), take_while(|c: char| c != '\''), char('\''));
    let double = delimited(char('"'), take_while(|c: char| c != '"'), char('"'));
    let (input, text) = alt((single, double)).parse(input)?;
    Ok((input, text.to_string()))
}

/// Parses a trailing `| required('message')` filter.
fn required_filter(input: &str) -> IResult<&str, String> {
    let (input, _) = (
        multispace0,
        char('|'),
        multispace0,
        tag("required"),
        multispace0,
        char('('),
        multispace0,
    )
        .parse(input)?;
    let (input, message) = opt(quoted_literal).parse(input)?;
    let (input, _) = (multispace0, char(')')).parse(input)?;
    Ok((input, message.unwrap_or_default()))
}

/// Parses an expression body: a dotted path with an optional filter.
fn expression_body(input: &str) -> IResult<&str, Expression> {
    let (input, _) = multispace0.parse(input)?;
    let (input, path) = separated_list1(char('.'), identifier).parse(input)?;
    let (input, required) = opt(required_filter).parse(input)?;
    let (input, _) = multispace0.parse(input)?;
    Ok((input, Expression { path, required }))
}

/// Parses a full expression body, requiring all input to be consumed.
fn parse_expression(body: &str) -> std::result::Result<Expression, EngineError> {
    match expression_body(body) {
        Ok(("", expression)) => Ok(expression),
        Ok((trailing, _)) => Err(EngineError::Syntax {
            message: format!("unexpected trailing input \"{trailing}\" in expression \"{body}\""),
        }),
        Err(nom::Err::Error(_) | nom::Err::Failure(_) | nom::Err::Incomplete(_)) => {
            Err(EngineError::Syntax {
                message: format!("cannot parse expression \"{body}\""),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(input: &str) -> Mapping {
        serde_yaml::from_str(input).expect("should parse test context")
    }

    fn render(template: &str, ctx: &str) -> std::result::Result<String, EngineError> {
        Interpolator.render_str(template, &context(ctx))
    }

    #[test]
    fn literal_text_passes_through() {
        let out = render("nginx:latest", "{}").expect("should render");
        assert_eq!(out, "nginx:latest");
    }

    #[test]
    fn substitutes_defined_variable() {
        let out = render("{{ TAG }}", "{TAG: '1.9'}").expect("should render");
        assert_eq!(out, "1.9");
    }

    #[test]
    fn mixes_literals_and_expressions() {
        let out = render("registry/{{ NAME }}:{{ TAG }}", "{NAME: app, TAG: v2}")
            .expect("should render");
        assert_eq!(out, "registry/app:v2");
    }

    #[test]
    fn undefined_variable_renders_empty() {
        let out = render("{{ MISSING }}", "{}").expect("should render");
        assert_eq!(out, "");
    }

    #[test]
    fn dotted_path_descends_into_mappings() {
        let out = render("{{ db.host }}", "{db: {host: pg}}").expect("should render");
        assert_eq!(out, "pg");
    }

    #[test]
    fn required_fails_with_author_message() {
        let err = render("{{ DOMAIN | required('domain must be set') }}", "{}")
            .expect_err("should fail");
        assert!(matches!(err, EngineError::Required { ref message } if message == "domain must be set"));
    }

    #[test]
    fn required_passes_defined_value_through() {
        let out = render("{{ DOMAIN | required('unused') }}", "{DOMAIN: example.org}")
            .expect("should render");
        assert_eq!(out, "example.org");
    }

    #[test]
    fn required_with_double_quotes_and_no_message() {
        let err = render("{{ A | required(\"gone\") }}", "{}").expect_err("should fail");
        assert!(matches!(err, EngineError::Required { ref message } if message == "gone"));
        let err = render("{{ A | required() }}", "{}").expect_err("should fail");
        assert!(matches!(err, EngineError::Required { ref message } if message.is_empty()));
    }

    #[test]
    fn numbers_and_booleans_stringify() {
        let out = render("{{ PORT }}-{{ ON }}", "{PORT: 8080, ON: true}").expect("should render");
        assert_eq!(out, "8080-true");
    }

    #[test]
    fn null_value_renders_empty() {
        let out = render("{{ GONE }}", "{GONE: null}").expect("should render");
        assert_eq!(out, "");
    }

    #[test]
    fn unterminated_expression_is_a_syntax_error() {
        let err = render("{{ TAG", "{TAG: x}").expect_err("should fail");
        assert!(matches!(err, EngineError::Syntax { .. }));
    }

    #[test]
    fn garbage_expression_is_a_syntax_error() {
        let err = render("{{ 1 + 2 }}", "{}").expect_err("should fail");
        assert!(matches!(err, EngineError::Syntax { .. }));
    }
}
