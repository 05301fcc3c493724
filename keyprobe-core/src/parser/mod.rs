use crate::error::ParseError;
use crate::types::SecretTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, Clone)]
pub struct ParsedTemplate {
    pub template: SecretTemplate,
    pub format: DocumentFormat,
}

/// Parses the wire shape only. Defaults and validation are applied by the loader.
pub fn parse_template_str(input: &str, format: DocumentFormat) -> Result<ParsedTemplate, ParseError> {
    match format {
        DocumentFormat::Json => Ok(ParsedTemplate {
            template: serde_json::from_str::<SecretTemplate>(input)?,
            format,
        }),
        DocumentFormat::Yaml => Ok(ParsedTemplate {
            template: serde_yaml::from_str::<SecretTemplate>(input)?,
            format,
        }),
        DocumentFormat::Auto => parse_template_auto(input),
    }
}

fn parse_template_auto(input: &str) -> Result<ParsedTemplate, ParseError> {
    // JSON always starts with `{` after trimming; YAML is a superset, so fall back to it.
    if input.trim_start().starts_with('{') {
        return match serde_json::from_str::<SecretTemplate>(input) {
            Ok(template) => Ok(ParsedTemplate {
                template,
                format: DocumentFormat::Json,
            }),
            Err(e) => match serde_yaml::from_str::<SecretTemplate>(input) {
                Ok(template) => Ok(ParsedTemplate {
                    template,
                    format: DocumentFormat::Yaml,
                }),
                Err(_) => Err(ParseError::Json(e)),
            },
        };
    }

    let template = serde_yaml::from_str::<SecretTemplate>(input)?;
    Ok(ParsedTemplate {
        template,
        format: DocumentFormat::Yaml,
    })
}
