//! Element-level syntax of nut-graph markup.
//!
//! Turns source text into a tree of [`Content`]: elements with their
//! attributes and children, and decoded text runs. Token-sized pieces are
//! winnow parsers; element nesting is driven by [`content`], which knows the
//! innermost open tag and can therefore report mismatched closing tags with
//! both locations.

use winnow::{
    Parser as _,
    ascii::multispace0,
    combinator::delimited,
    error::ModalResult,
    stream::{LocatingSlice, Location, Stream},
    token::{literal, take_till, take_until, take_while},
};

use crate::{
    entity,
    error::{Diagnostic, ErrorCode},
    span::{Span, Spanned},
};

type Input<'a> = LocatingSlice<&'a str>;

/// An attribute as written. Names are lower-cased, values entity-decoded.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Attribute {
    pub name: Spanned<String>,
    pub value: Option<Spanned<String>>,
}

impl Attribute {
    /// The value, or the empty string for a bare attribute.
    pub fn value_str(&self) -> &str {
        self.value.as_ref().map(|v| v.inner().as_str()).unwrap_or("")
    }

    /// The span of the value if present, else of the name.
    pub fn value_span(&self) -> Span {
        self.value
            .as_ref()
            .map(|v| v.span())
            .unwrap_or_else(|| self.name.span())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Element {
    pub name: Spanned<String>,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Content>,
}

impl Element {
    /// Last occurrence wins, as with repeated attributes in a host page.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .rev()
            .find(|attr| attr.name.inner() == name)
    }

    /// Concatenated text of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(children: &[Content], out: &mut String) {
    for child in children {
        match child {
            Content::Text(text) => out.push_str(text),
            Content::Element(element) => collect_text(&element.children, out),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Content {
    Element(Element),
    Text(String),
}

/// The start tag whose closing tag we are looking for.
struct OpenTag<'a> {
    name: &'a str,
    span: Span,
}

/// Parse a whole markup document.
pub(crate) fn document(source: &str) -> Result<Vec<Content>, Diagnostic> {
    let mut input = LocatingSlice::new(source);
    content(&mut input, None)
}

fn content<'a>(input: &mut Input<'a>, open: Option<&OpenTag<'a>>) -> Result<Vec<Content>, Diagnostic> {
    let mut children = Vec::new();

    loop {
        if input.is_empty() {
            return match open {
                Some(tag) => Err(Diagnostic::error(format!("unclosed element `<{}>`", tag.name))
                    .with_code(ErrorCode::E100)
                    .with_label(tag.span, "opened here")
                    .with_help(format!("add `</{}>`", tag.name))),
                None => Ok(children),
            };
        }

        if input.starts_with("<!--") {
            comment(input)?;
        } else if input.starts_with("</") {
            let closing = closing_tag(input)?;
            return match open {
                Some(tag) if tag.name.eq_ignore_ascii_case(closing.inner()) => Ok(children),
                Some(tag) => Err(Diagnostic::error(format!(
                    "mismatched closing tag `</{}>`",
                    closing.inner()
                ))
                .with_code(ErrorCode::E101)
                .with_label(closing.span(), format!("expected `</{}>`", tag.name))
                .with_secondary_label(tag.span, "element opened here")),
                None => Err(Diagnostic::error(format!(
                    "unexpected closing tag `</{}>`",
                    closing.inner()
                ))
                .with_code(ErrorCode::E102)
                .with_label(closing.span(), "no element is open here")),
            };
        } else if input.starts_with("<!") || input.starts_with("<?") {
            declaration(input)?;
        } else if input.starts_with('<') {
            children.push(Content::Element(element(input)?));
        } else {
            let raw: ModalResult<&str> = take_till(1.., '<').parse_next(input);
            if let Ok(raw) = raw {
                children.push(Content::Text(entity::decode(raw).into_owned()));
            }
        }
    }
}

fn skip_ws(input: &mut Input<'_>) {
    let _: ModalResult<&str> = multispace0.parse_next(input);
}

fn tag_name<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
    })
    .verify(|name: &str| name.starts_with(|c: char| c.is_ascii_alphabetic()))
    .parse_next(input)
}

fn attribute_name<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<')
    })
    .parse_next(input)
}

fn bare_value<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && !matches!(c, '>' | '"' | '\'' | '=' | '<' | '`')
    })
    .parse_next(input)
}

fn comment(input: &mut Input<'_>) -> Result<(), Diagnostic> {
    let start = input.current_token_start();
    let parsed: ModalResult<&str> =
        delimited(literal("<!--"), take_until(0.., "-->"), literal("-->")).parse_next(input);

    parsed.map(|_| ()).map_err(|_| {
        Diagnostic::error("unterminated comment")
            .with_code(ErrorCode::E001)
            .with_label(Span::new(start..start + 4), "comment starts here")
            .with_help("close the comment with `-->`")
    })
}

/// `<!DOCTYPE ...>` and `<?xml ...?>` carry nothing for the diagram.
fn declaration(input: &mut Input<'_>) -> Result<(), Diagnostic> {
    let start = input.current_token_start();
    let parsed: ModalResult<(&str, char)> = (take_till(0.., '>'), '>').parse_next(input);

    parsed.map(|_| ()).map_err(|_| {
        Diagnostic::error("unterminated declaration")
            .with_code(ErrorCode::E103)
            .with_label(Span::new(start..start + 2), "declaration starts here")
            .with_help("add `>`")
    })
}

fn closing_tag<'a>(input: &mut Input<'a>) -> Result<Spanned<&'a str>, Diagnostic> {
    let start = input.current_token_start();
    let parsed: ModalResult<&str> = delimited(
        (literal("</"), multispace0),
        tag_name,
        (multispace0, '>'),
    )
    .parse_next(input);
    let end = input.current_token_start();

    parsed
        .map(|name| Spanned::new(name, Span::new(start..end)))
        .map_err(|_| {
            Diagnostic::error("malformed closing tag")
                .with_code(ErrorCode::E103)
                .with_label(Span::new(start..end.max(start + 2)), "expected `</name>`")
        })
}

fn element(input: &mut Input<'_>) -> Result<Element, Diagnostic> {
    let start = input.current_token_start();
    let _: ModalResult<char> = '<'.parse_next(input);

    let name_start = input.current_token_start();
    let name: ModalResult<&str> = tag_name.parse_next(input);
    let name = name.map_err(|_| {
        Diagnostic::error("unexpected `<`")
            .with_code(ErrorCode::E002)
            .with_label(Span::new(start..start + 1), "expected an element name after `<`")
            .with_help("write `&lt;` for a literal `<`")
    })?;
    let name_span = Span::new(name_start..input.current_token_start());

    let mut attributes = Vec::new();
    let self_closing = loop {
        skip_ws(input);

        if input.is_empty() {
            return Err(Diagnostic::error(format!("unterminated tag `<{name}`"))
                .with_code(ErrorCode::E103)
                .with_label(Span::new(start..input.current_token_start()), "tag starts here")
                .with_help("close the tag with `>`"));
        }
        if input.starts_with("/>") {
            let _: ModalResult<&str> = literal("/>").parse_next(input);
            break true;
        }
        if input.starts_with('>') {
            let _: ModalResult<char> = '>'.parse_next(input);
            break false;
        }
        attributes.push(attribute(input)?);
    };

    let children = if self_closing {
        Vec::new()
    } else {
        let open = OpenTag {
            name,
            span: Span::new(start..input.current_token_start()),
        };
        content(input, Some(&open))?
    };

    Ok(Element {
        name: Spanned::new(name.to_string(), name_span),
        attributes,
        children,
    })
}

fn attribute(input: &mut Input<'_>) -> Result<Attribute, Diagnostic> {
    let start = input.current_token_start();
    let name: ModalResult<&str> = attribute_name.parse_next(input);
    let name = name.map_err(|_| {
        Diagnostic::error("malformed attribute")
            .with_code(ErrorCode::E003)
            .with_label(Span::new(start..start + 1), "expected an attribute name")
    })?;
    let name = Spanned::new(
        name.to_ascii_lowercase(),
        Span::new(start..input.current_token_start()),
    );

    let checkpoint = input.checkpoint();
    skip_ws(input);
    if !input.starts_with('=') {
        input.reset(&checkpoint);
        return Ok(Attribute { name, value: None });
    }
    let _: ModalResult<char> = '='.parse_next(input);
    skip_ws(input);

    let value_start = input.current_token_start();
    let quote = input.chars().next().filter(|c| matches!(c, '"' | '\''));

    let raw = match quote {
        Some(quote) => {
            let parsed: ModalResult<&str> =
                delimited(quote, take_till(0.., quote), quote).parse_next(input);
            parsed.map_err(|_| {
                Diagnostic::error(format!(
                    "unterminated value for attribute `{}`",
                    name.inner()
                ))
                .with_code(ErrorCode::E004)
                .with_label(Span::new(value_start..value_start + 1), "value starts here")
                .with_help(format!("close the value with `{quote}`"))
            })?
        }
        None => {
            let parsed: ModalResult<&str> = bare_value.parse_next(input);
            parsed.map_err(|_| {
                Diagnostic::error(format!("missing value for attribute `{}`", name.inner()))
                    .with_code(ErrorCode::E003)
                    .with_label(name.span(), "attribute has `=` but no value")
            })?
        }
    };

    let value = Spanned::new(
        entity::decode(raw).into_owned(),
        Span::new(value_start..input.current_token_start()),
    );
    Ok(Attribute {
        name,
        value: Some(value),
    })
}
