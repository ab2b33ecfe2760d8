//! `twapi://` resource URI templates.
//!
//! A template such as `twapi://tasks/{id}` compiles once into an anchored
//! regular expression whose placeholders only match base-10 digits.

use regex::Regex;

use super::registry::RegistryError;

#[derive(Debug, Clone)]
pub struct UriTemplate {
    template: String,
    pattern: Regex,
}

impl UriTemplate {
    pub fn compile(template: &str) -> Result<Self, RegistryError> {
        let mut pattern = String::from("^");
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            let close = rest[open..]
                .find('}')
                .map(|offset| open + offset)
                .ok_or_else(|| RegistryError::InvalidTemplate {
                    template: template.to_string(),
                    reason: "unclosed placeholder".to_string(),
                })?;
            let name = &rest[open + 1..close];
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(RegistryError::InvalidTemplate {
                    template: template.to_string(),
                    reason: format!("invalid placeholder name \"{name}\""),
                });
            }
            pattern.push_str(&regex::escape(&rest[..open]));
            pattern.push_str(&format!("(?P<{name}>\\d+)"));
            rest = &rest[close + 1..];
        }
        pattern.push_str(&regex::escape(rest));
        pattern.push('$');

        let pattern = Regex::new(&pattern).map_err(|e| RegistryError::InvalidTemplate {
            template: template.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            template: template.to_string(),
            pattern,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// The value of placeholder `name` if `uri` matches.
    pub fn capture(&self, uri: &str, name: &str) -> Option<i64> {
        self.pattern
            .captures(uri)?
            .name(name)?
            .as_str()
            .parse()
            .ok()
    }

    /// Substitute `value` for placeholder `name`.
    pub fn expand(&self, name: &str, value: i64) -> String {
        self.template
            .replace(&format!("{{{name}}}"), &value.to_string())
    }
}
