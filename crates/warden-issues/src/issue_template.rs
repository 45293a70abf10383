use thiserror::Error;

const FRONTMATTER_DELIMITER: &str = "---";
const MARKDOWN_EXTENSIONS: [&str; 2] = [".md", ".markdown"];

/// An issue template hosted in the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTemplate {
    pub name: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateFormatError {
    #[error("could not locate paired `---` frontmatter delimiters")]
    MissingFrontmatter,
    #[error("frontmatter is not valid yaml: {0}")]
    InvalidYaml(String),
    #[error("expected frontmatter to be a mapping")]
    NotAMapping,
    #[error("frontmatter has no scalar `name` key")]
    MissingName,
    #[error("listing entry has no download url")]
    MissingDownloadUrl,
}

pub fn is_markdown_template_path(path: &str) -> bool {
    MARKDOWN_EXTENSIONS
        .iter()
        .any(|extension| path.ends_with(extension))
}

fn is_frontmatter_delimiter(line: &str) -> bool {
    line.strip_suffix('\r').unwrap_or(line) == FRONTMATTER_DELIMITER
}

fn scalar_to_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(text) => Some(text.clone()),
        serde_yaml::Value::Number(number) => Some(number.to_string()),
        serde_yaml::Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Drop leading and trailing blank lines, keeping indentation of the first line.
fn trim_blank_lines(text: &str) -> &str {
    let mut rest = text.trim_end();
    while let Some((line, tail)) = rest.split_once('\n') {
        if !line.trim().is_empty() {
            break;
        }
        rest = tail;
    }
    rest
}

/// Split a template file into its frontmatter `name` and Markdown body.
///
/// The first two lines that are exactly `---` open and close the
/// frontmatter; every other line is body.
pub fn parse_issue_template(raw: &str) -> Result<IssueTemplate, TemplateFormatError> {
    let lines = raw.split('\n').collect::<Vec<_>>();
    let mut delimiters = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_frontmatter_delimiter(line))
        .map(|(index, _)| index);
    let (Some(open), Some(close)) = (delimiters.next(), delimiters.next()) else {
        return Err(TemplateFormatError::MissingFrontmatter);
    };

    let frontmatter = lines[open + 1..close].join("\n");
    if frontmatter.trim().is_empty() {
        return Err(TemplateFormatError::NotAMapping);
    }
    let parsed = serde_yaml::from_str::<serde_yaml::Value>(&frontmatter)
        .map_err(|error| TemplateFormatError::InvalidYaml(error.to_string()))?;
    let mapping = parsed
        .as_mapping()
        .ok_or(TemplateFormatError::NotAMapping)?;
    let name = mapping
        .get("name")
        .and_then(scalar_to_text)
        .ok_or(TemplateFormatError::MissingName)?;

    let body = lines[..open]
        .iter()
        .chain(lines[close + 1..].iter())
        .copied()
        .collect::<Vec<_>>()
        .join("\n");
    Ok(IssueTemplate {
        name,
        body: trim_blank_lines(&body).to_string(),
    })
}

/// Collapsible block listing one template, body fenced as code.
pub fn render_template_details(template: &IssueTemplate) -> String {
    format!(
        "<details><summary>{}</summary>\n\n```\n{}\n```\n</details>\n\n",
        template.name, template.body
    )
}
