//! Invocation templates
//!
//! A template is a command line such as `"{program}" "{file}"`. It is split
//! into arguments once, at load time, honouring single and double quotes, so
//! that substituted values (paths with spaces) always stay one argument and
//! are never re-interpreted by a shell.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named slot inside a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    /// Path of the primary program
    Program,
    /// Path of the media file
    File,
    /// Path of the secondary runner program
    Runner,
    /// Path of the runner's artifact (plugin/core)
    Artifact,
}

impl Placeholder {
    pub const ALL: [Placeholder; 4] = [
        Placeholder::Program,
        Placeholder::File,
        Placeholder::Runner,
        Placeholder::Artifact,
    ];

    /// Name as written between braces
    pub fn name(self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::File => "file",
            Self::Runner => "runner",
            Self::Artifact => "artifact",
        }
    }

    /// Braced form, e.g. `{file}`
    pub fn token(self) -> &'static str {
        match self {
            Self::Program => "{program}",
            Self::File => "{file}",
            Self::Runner => "{runner}",
            Self::Artifact => "{artifact}",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Why a template string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,

    #[error("unterminated {quote} quote")]
    UnterminatedQuote { quote: char },

    #[error("unclosed '{{' in argument {argument:?}")]
    UnclosedBrace { argument: String },

    #[error("unknown placeholder {{{name}}}")]
    UnknownPlaceholder { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Placeholder),
}

/// A parsed invocation template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Template {
    source: String,
    arguments: Vec<Vec<Segment>>,
}

impl Template {
    /// Parse a template string.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let arguments = split_arguments(source)?
            .iter()
            .map(|argument| parse_segments(argument))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source: source.to_string(),
            arguments,
        })
    }

    /// The template as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of arguments, including the command itself
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Check whether the template references a placeholder.
    pub fn uses(&self, placeholder: Placeholder) -> bool {
        self.arguments
            .iter()
            .flatten()
            .any(|segment| *segment == Segment::Slot(placeholder))
    }

    /// All placeholders referenced, in first-use order without repeats.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        let mut found = Vec::new();
        for segment in self.arguments.iter().flatten() {
            if let Segment::Slot(p) = segment {
                if !found.contains(p) {
                    found.push(*p);
                }
            }
        }
        found
    }

    /// Substitute placeholder values and return the argument vector.
    ///
    /// Placeholders without a value render as empty text; validation makes
    /// sure a template only references placeholders its context provides.
    pub fn render(&self, values: &[(Placeholder, &str)]) -> Vec<String> {
        self.arguments
            .iter()
            .map(|segments| {
                let mut argument = String::new();
                for segment in segments {
                    match segment {
                        Segment::Literal(text) => argument.push_str(text),
                        Segment::Slot(p) => {
                            if let Some((_, value)) = values.iter().find(|(slot, _)| slot == p) {
                                argument.push_str(value);
                            }
                        }
                    }
                }
                argument
            })
            .collect()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl TryFrom<String> for Template {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Template::parse(&value)
    }
}

impl From<Template> for String {
    fn from(template: Template) -> Self {
        template.source
    }
}

/// Split a command line into arguments. Quotes group, and are removed.
fn split_arguments(source: &str) -> Result<Vec<String>, TemplateError> {
    let mut arguments = Vec::new();
    let mut current = String::new();
    let mut in_argument = false;
    let mut quote: Option<char> = None;

    for c in source.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_argument = true;
            }
            None if c.is_whitespace() => {
                if in_argument {
                    arguments.push(std::mem::take(&mut current));
                    in_argument = false;
                }
            }
            None => {
                current.push(c);
                in_argument = true;
            }
        }
    }

    if let Some(quote) = quote {
        return Err(TemplateError::UnterminatedQuote { quote });
    }
    if in_argument {
        arguments.push(current);
    }
    if arguments.is_empty() {
        return Err(TemplateError::Empty);
    }
    Ok(arguments)
}

fn parse_segments(argument: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut rest = argument;

    while let Some(open) = rest.find('{') {
        if open > 0 {
            segments.push(Segment::Literal(rest[..open].to_string()));
        }
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| TemplateError::UnclosedBrace {
            argument: argument.to_string(),
        })?;
        let name = &after[..close];
        let placeholder =
            Placeholder::from_name(name).ok_or_else(|| TemplateError::UnknownPlaceholder {
                name: name.to_string(),
            })?;
        segments.push(Segment::Slot(placeholder));
        rest = &after[close + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_quoted_paths_stay_single_arguments() {
        let template = Template::parse(r#""{program}" "{file}""#).unwrap();
        let argv = template.render(&[
            (Placeholder::Program, "/opt/emu/fceux"),
            (Placeholder::File, "/games/Super Mario Bros.nes"),
        ]);
        assert_eq!(argv, vec!["/opt/emu/fceux", "/games/Super Mario Bros.nes"]);
    }

    #[test]
    fn test_runner_template() {
        let template = Template::parse(r#""{runner}" -L "{artifact}" "{file}""#).unwrap();
        assert_eq!(
            template.placeholders(),
            vec![Placeholder::Runner, Placeholder::Artifact, Placeholder::File]
        );
        let argv = template.render(&[
            (Placeholder::Runner, "retroarch"),
            (Placeholder::Artifact, "cores/fceumm_libretro.so"),
            (Placeholder::File, "a.nes"),
        ]);
        assert_eq!(argv, vec!["retroarch", "-L", "cores/fceumm_libretro.so", "a.nes"]);
    }

    #[test]
    fn test_placeholder_inside_literal() {
        let template = Template::parse("emu --rom={file} --fullscreen").unwrap();
        let argv = template.render(&[(Placeholder::File, "x y.gba")]);
        assert_eq!(argv, vec!["emu", "--rom=x y.gba", "--fullscreen"]);
    }

    #[test]
    fn test_values_are_not_reexpanded() {
        let template = Template::parse("{program} {file}").unwrap();
        let argv = template.render(&[
            (Placeholder::Program, "{file}"),
            (Placeholder::File, "game.nes"),
        ]);
        assert_eq!(argv, vec!["{file}", "game.nes"]);
    }

    #[test]
    fn test_empty_quotes_produce_empty_argument() {
        let template = Template::parse(r#"emu "" {file}"#).unwrap();
        assert_eq!(template.len(), 3);
    }

    #[rstest]
    #[case("", TemplateError::Empty)]
    #[case("   ", TemplateError::Empty)]
    #[case(r#""{program} {file}"#, TemplateError::UnterminatedQuote { quote: '"' })]
    #[case("{program} {file", TemplateError::UnclosedBrace { argument: "{file".into() })]
    #[case("{emulator_path} {file}", TemplateError::UnknownPlaceholder { name: "emulator_path".into() })]
    fn test_parse_errors(#[case] source: &str, #[case] expected: TemplateError) {
        assert_eq!(Template::parse(source).unwrap_err(), expected);
    }

    #[test]
    fn test_serde_uses_source_string() {
        let template = Template::parse(r#""{program}" "{file}""#).unwrap();
        let text: String = template.clone().into();
        assert_eq!(text, r#""{program}" "{file}""#);
        assert_eq!(Template::try_from(text).unwrap(), template);
    }
}
