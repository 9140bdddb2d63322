use serde::{Deserialize, Serialize};

/// Where and how the bracket page is fetched.
///
/// `url_template` must contain a `{year}` placeholder, replaced with the
/// requested tax year.
///
/// | field          | default                                          |
/// |----------------|--------------------------------------------------|
/// | `url_template` | `https://taxfoundation.org/{year}-tax-brackets/` |
/// | `timeout_secs` | `30`                                             |
/// | `user_agent`   | `taxhunt/<crate version>`                        |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url_template: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl SourceConfig {
    pub const YEAR_PLACEHOLDER: &'static str = "{year}";

    pub fn url_for(&self, year: i32) -> String {
        self.url_template
            .replace(Self::YEAR_PLACEHOLDER, &year.to_string())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url_template: "https://taxfoundation.org/{year}-tax-brackets/".to_string(),
            timeout_secs: 30,
            user_agent: concat!("taxhunt/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_url_targets_the_yearly_bracket_page() {
        let config = SourceConfig::default();

        assert_eq!(
            config.url_for(2017),
            "https://taxfoundation.org/2017-tax-brackets/"
        );
    }

    #[test]
    fn custom_template_substitutes_every_placeholder() {
        let config = SourceConfig {
            url_template: "http://localhost/{year}/brackets-{year}.html".to_string(),
            ..SourceConfig::default()
        };

        assert_eq!(config.url_for(2018), "http://localhost/2018/brackets-2018.html");
    }
}
