//! Validation of raw rules-file entries

use crate::error::ConfigError;
use crate::schema::{RawRule, RawRunner, RuleEntry, RunnerLink, SecondaryRunner};
use crate::table::normalize_extension;
use crate::template::{Placeholder, Template};

/// Human readable label for the `index`-th rule of a file.
pub fn rule_label(index: usize, raw: &RawRule) -> String {
    match raw.extension.as_deref().map(normalize_extension) {
        Some(ext) if !ext.is_empty() => format!("rules[{index}] (.{ext})"),
        _ => format!("rules[{index}]"),
    }
}

/// Human readable label for the `index`-th runner of a file.
pub fn runner_label(index: usize, raw: &RawRunner) -> String {
    match raw.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => format!("runners[{index}] ({id})"),
        _ => format!("runners[{index}]"),
    }
}

/// Validate a raw rule into a [`RuleEntry`].
pub fn validate_rule(entry: &str, raw: &RawRule) -> Result<RuleEntry, ConfigError> {
    let extension = non_empty(&raw.extension).ok_or_else(|| missing(entry, "extension"))?;
    let extension_normalized = normalize_extension(extension);
    if !is_valid_extension(&extension_normalized) {
        return Err(ConfigError::InvalidExtension {
            entry: entry.to_string(),
            extension: extension.to_string(),
        });
    }

    let template = parse_template(entry, &raw.template)?;
    let program = non_empty(&raw.program).map(str::to_string);
    let runner = non_empty(&raw.runner);
    let artifact = non_empty(&raw.artifact);

    if program.is_none() && runner.is_none() && !raw.self_executing {
        return Err(ConfigError::NoLauncher {
            entry: entry.to_string(),
        });
    }
    let runner = match (runner, artifact) {
        (Some(runner), Some(artifact)) => Some(RunnerLink {
            runner: runner.to_string(),
            artifact: artifact.to_string(),
        }),
        (Some(_), None) => return Err(missing(entry, "artifact")),
        (None, Some(_)) => return Err(missing(entry, "runner")),
        (None, None) => None,
    };

    require(entry, &template, Placeholder::File)?;
    if program.is_some() {
        require(entry, &template, Placeholder::Program)?;
    } else {
        forbid(entry, &template, Placeholder::Program)?;
    }
    forbid(entry, &template, Placeholder::Runner)?;
    forbid(entry, &template, Placeholder::Artifact)?;

    let system = non_empty(&raw.system)
        .map(str::to_string)
        .unwrap_or_else(|| extension_normalized.to_uppercase());
    let label = non_empty(&raw.label)
        .map(str::to_string)
        .or_else(|| program.clone())
        .unwrap_or_else(|| system.clone());

    Ok(RuleEntry {
        extension: extension_normalized,
        system,
        program,
        label,
        template,
        runner,
        self_executing: raw.self_executing,
        platforms: raw.platforms.clone(),
        notes: non_empty(&raw.notes).map(str::to_string),
    })
}

/// Validate a raw runner into a [`SecondaryRunner`].
pub fn validate_runner(entry: &str, raw: &RawRunner) -> Result<SecondaryRunner, ConfigError> {
    let id = non_empty(&raw.id).ok_or_else(|| missing(entry, "id"))?;
    let program = non_empty(&raw.program).ok_or_else(|| missing(entry, "program"))?;
    let template = parse_template(entry, &raw.template)?;

    require(entry, &template, Placeholder::Runner)?;
    require(entry, &template, Placeholder::File)?;
    forbid(entry, &template, Placeholder::Program)?;

    Ok(SecondaryRunner {
        id: id.to_string(),
        program: program.to_string(),
        label: non_empty(&raw.label).unwrap_or(id).to_string(),
        template,
    })
}

fn is_valid_extension(extension: &str) -> bool {
    !extension.is_empty()
        && !extension
            .chars()
            .any(|c| c == '.' || c == '/' || c == '\\' || c.is_whitespace())
}

fn parse_template(entry: &str, source: &Option<String>) -> Result<Template, ConfigError> {
    let source = source.as_deref().ok_or_else(|| missing(entry, "template"))?;
    Template::parse(source).map_err(|source| ConfigError::InvalidTemplate {
        entry: entry.to_string(),
        source,
    })
}

fn require(entry: &str, template: &Template, placeholder: Placeholder) -> Result<(), ConfigError> {
    if template.uses(placeholder) {
        Ok(())
    } else {
        Err(ConfigError::MissingPlaceholder {
            entry: entry.to_string(),
            placeholder,
        })
    }
}

fn forbid(entry: &str, template: &Template, placeholder: Placeholder) -> Result<(), ConfigError> {
    if template.uses(placeholder) {
        Err(ConfigError::MisplacedPlaceholder {
            entry: entry.to_string(),
            placeholder,
        })
    } else {
        Ok(())
    }
}

fn missing(entry: &str, field: &'static str) -> ConfigError {
    ConfigError::MissingField {
        entry: entry.to_string(),
        field,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
