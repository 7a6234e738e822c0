use std::{collections::BTreeMap, ops::Range, path::Path, str::FromStr};

use anyhow::{anyhow, Context as _};
use combine::{
    between,
    parser::{
        char::{spaces, string as Str},
        range::take_while,
    },
    sep_by, EasyParser, Parser, Stream,
};
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Tag};
use tera::Tera;
use url::Url;

use crate::{components::ComponentMap, highlighter::Highlighter, page::PartialPage};

const CALL_OPEN: &str = "{{";
const CALL_CLOSE: &str = "}}";

/// A `{{ name(key="value") }}` reference to a component template inside page content.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentCall {
    name: String,
    props: BTreeMap<String, String>,
}

fn lit<I>(l: &'static str) -> impl Parser<I, Output = String>
where
    I: Stream<Token = char>,
{
    Str(l).map(|s| s.to_string()).skip(spaces())
}

impl ComponentCall {
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        let ident = || {
            take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '-').skip(spaces())
        };
        let literal_str =
            between(lit("\""), lit("\""), take_while(|c: char| c != '"')).skip(spaces());
        let prop = (ident(), lit("="), literal_str)
            .map(|(name, _, value): (&str, String, &str)| (name.to_string(), value.to_string()));
        let props = between(lit("("), lit(")"), sep_by(prop, lit(",")));

        let mut call = between(
            lit(CALL_OPEN),
            lit(CALL_CLOSE),
            (ident(), props).map(|(name, props): (&str, BTreeMap<String, String>)| ComponentCall {
                name: name.to_string(),
                props,
            }),
        );

        let (call, _) = call
            .easy_parse(input)
            .map_err(|e| e.map_range(|r| format!("{:?}", r)))
            .map_err(|e| e.map_position(|p| p.translate_position(input)))?;

        if call.name.is_empty() {
            return Err(anyhow!("component call without a name: {input}"));
        }

        Ok(call)
    }

    /// The template under `components/` named after the call, whatever its extension.
    fn template<'t>(&self, tera: &'t Tera) -> Option<&'t str> {
        tera.get_template_names().find(|template| {
            template
                .strip_prefix("components/")
                .and_then(|file| Path::new(file).file_stem())
                .is_some_and(|stem| stem == self.name.as_str())
        })
    }

    pub fn render(&self, page: &PartialPage, tera: &Tera) -> anyhow::Result<String> {
        let template = self
            .template(tera)
            .ok_or_else(|| anyhow!("unknown component '{}'", self.name))?;

        let mut ctx = tera::Context::new();
        for (name, value) in &self.props {
            ctx.insert(name.as_str(), value);
        }
        ctx.insert("page", page);

        tera.render(template, &ctx)
            .with_context(|| format!("rendering component '{}'", self.name))
    }
}

pub fn render_markdown(
    input: &str,
    page: &PartialPage,
    highlighter: &Highlighter,
    components: &ComponentMap,
) -> anyhow::Result<String> {
    let mut events = vec![];

    let mut in_code_block = false;
    let mut lang = String::new();
    let mut code = String::new();

    for event in pulldown_cmark::Parser::new(input) {
        match event {
            Event::Start(Tag::Image(link_type, mut dest_url, title)) => {
                // relative image paths would break once the content is
                // rendered anywhere but the page itself
                if Url::from_str(&dest_url).is_err() {
                    let result = page.permalink.join(&dest_url)?;
                    dest_url = result.to_string().into();
                }
                events.push(Event::Start(Tag::Image(link_type, dest_url, title)));
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                lang = if let CodeBlockKind::Fenced(name) = kind {
                    name.to_string()
                } else {
                    "".to_string()
                };
            }
            Event::Text(t) if in_code_block => {
                code.push_str(&t);
            }
            Event::End(Tag::CodeBlock(_)) if in_code_block => {
                let result = highlighter.highlight(&lang, &code)?;

                events.push(Event::Html(CowStr::from(result)));

                in_code_block = false;
                code = String::new();
            }
            _ => events.push(components.substitute(event)),
        }
    }

    let mut contents = String::new();
    html::push_html(&mut contents, events.into_iter());

    Ok(contents)
}

enum Segment<'a> {
    Markdown(&'a str),
    Component(ComponentCall),
}

/// Byte ranges of code spans and code blocks. Braces in there are content, not calls.
fn code_ranges(input: &str) -> Vec<Range<usize>> {
    pulldown_cmark::Parser::new(input)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Code(_) | Event::Start(Tag::CodeBlock(_)) => Some(range),
            _ => None,
        })
        .collect()
}

fn split_content(input: &str) -> anyhow::Result<Vec<Segment<'_>>> {
    let code = code_ranges(input);

    let mut segments = vec![];
    let mut last = 0;
    let mut cursor = 0;

    while let Some(offset) = input[cursor..].find(CALL_OPEN) {
        let start = cursor + offset;

        if code.iter().any(|range| range.contains(&start)) {
            cursor = start + CALL_OPEN.len();
            continue;
        }

        let end = input[start..]
            .find(CALL_CLOSE)
            .map(|end| start + end + CALL_CLOSE.len())
            .ok_or_else(|| anyhow!("unterminated component call at byte {start}"))?;

        if start > last {
            segments.push(Segment::Markdown(&input[last..start]));
        }
        segments.push(Segment::Component(ComponentCall::parse(&input[start..end])?));

        last = end;
        cursor = end;
    }

    if last < input.len() {
        segments.push(Segment::Markdown(&input[last..]));
    }

    Ok(segments)
}

/// Renders a page body: markdown through the component map, component calls through their templates.
pub fn render_content(
    input: &str,
    page: &PartialPage,
    tera: &Tera,
    highlighter: &Highlighter,
    components: &ComponentMap,
) -> anyhow::Result<String> {
    let mut contents = String::new();

    for segment in split_content(input)? {
        match segment {
            Segment::Markdown(markdown) => {
                contents.push_str(&render_markdown(markdown, page, highlighter, components)?)
            }
            Segment::Component(call) => contents.push_str(&call.render(page, tera)?),
        }
    }

    Ok(contents)
}
