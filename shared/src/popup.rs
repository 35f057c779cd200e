//! Popup templates attached to map layers and the HTML they render to.

use serde::{Deserialize, Serialize};

use crate::template::{
    interpolate_with, placeholder_names, MissingPropertyPolicy, PropertyBag, TemplateError,
};

/// Separator between entries of [`PopupTemplate::properties`].
pub const PROPERTY_SEPARATOR: char = ';';

/// Title, subtitle and property lines shown when a feature is clicked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopupTemplate {
    /// Heading template.
    pub title: String,
    /// Line shown under the heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Semicolon separated property line templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
}

/// Interpolated popup text, ready to be turned into HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupContent {
    /// Filled title.
    pub title: String,
    /// Filled subtitle, if the template has one.
    pub subtitle: Option<String>,
    /// Filled property lines, in template order.
    pub properties: Vec<String>,
}

impl PopupTemplate {
    /// Property line templates with empty entries dropped.
    pub fn property_templates(&self) -> impl Iterator<Item = &str> {
        self.properties
            .as_deref()
            .unwrap_or_default()
            .split(PROPERTY_SEPARATOR)
            .filter(|entry| !entry.trim().is_empty())
    }

    /// Every template string this popup interpolates.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.title.as_str())
            .chain(self.subtitle.as_deref())
            .chain(self.property_templates())
    }

    /// Identifiers referenced by the title, subtitle and property lines.
    pub fn placeholders(&self) -> Vec<&str> {
        self.fields()
            .flat_map(|field| placeholder_names(field).into_iter().take(1))
            .collect()
    }

    /// Placeholders whose property is absent from `properties`, in field
    /// order and without repeats.
    pub fn missing_properties<B>(&self, properties: &B) -> Vec<&str>
    where
        B: PropertyBag + ?Sized,
    {
        let mut missing = Vec::new();
        for name in self.placeholders() {
            if properties.lookup(name).is_none() && !missing.contains(&name) {
                missing.push(name);
            }
        }
        missing
    }

    /// Fills every field from `properties`.
    pub fn render<B>(
        &self,
        properties: &B,
        policy: MissingPropertyPolicy,
    ) -> Result<PopupContent, TemplateError>
    where
        B: PropertyBag + ?Sized,
    {
        let title = interpolate_with(&self.title, properties, policy)?;
        let subtitle = self
            .subtitle
            .as_deref()
            .map(|subtitle| interpolate_with(subtitle, properties, policy))
            .transpose()?;
        let properties = self
            .property_templates()
            .map(|line| interpolate_with(line, properties, policy))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PopupContent {
            title,
            subtitle,
            properties,
        })
    }
}

impl PopupContent {
    /// Builds the popup body handed to `mapboxgl.Popup#setHTML`.
    ///
    /// Each line goes through the HTML sanitizer, so feature data cannot
    /// inject scripts or event handlers.
    pub fn to_html(&self) -> String {
        let mut html = format!("<h5 class='popup-title'>{}</h5>", ammonia::clean(&self.title));
        if let Some(subtitle) = &self.subtitle {
            html.push_str(&format!(
                "<p class='popup-subtitle' style='margin: 0 0 5px 0;'>{}</p>",
                ammonia::clean(subtitle)
            ));
        }
        for line in &self.properties {
            html.push_str(&format!(
                "<p class='popup-property' style='margin: 0;'>{}</p>",
                ammonia::clean(line)
            ));
        }
        html
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn feature_properties() -> serde_json::Map<String, Value> {
        match json!({
            "NAME": "Riverside Park",
            "ACRES": 12.5,
            "WARD": 3,
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn park_popup() -> PopupTemplate {
        PopupTemplate {
            title: "{NAME}".to_string(),
            subtitle: Some("Ward {WARD}".to_string()),
            properties: Some("Area: {ACRES} acres;Open daily".to_string()),
        }
    }

    #[test]
    fn renders_every_field() {
        let content = park_popup()
            .render(&feature_properties(), MissingPropertyPolicy::Error)
            .expect("render popup");

        assert_eq!(content.title, "Riverside Park");
        assert_eq!(content.subtitle.as_deref(), Some("Ward 3"));
        assert_eq!(content.properties, vec!["Area: 12.5 acres", "Open daily"]);
    }

    #[test]
    fn empty_property_entries_are_skipped() {
        let popup = PopupTemplate {
            title: "t".to_string(),
            subtitle: None,
            properties: Some(";{WARD};; ;".to_string()),
        };
        let content = popup
            .render(&feature_properties(), MissingPropertyPolicy::Error)
            .expect("render popup");
        assert_eq!(content.properties, vec!["3"]);
    }

    #[test]
    fn missing_property_propagates_with_error_policy() {
        let popup = PopupTemplate {
            title: "{NAME}".to_string(),
            subtitle: None,
            properties: Some("{OWNER}".to_string()),
        };
        let err = popup
            .render(&feature_properties(), MissingPropertyPolicy::Error)
            .expect_err("missing OWNER");
        assert!(err.to_string().contains("OWNER"));

        let content = popup
            .render(&feature_properties(), MissingPropertyPolicy::Blank)
            .expect("blank policy");
        assert_eq!(content.properties, vec![String::new()]);
    }

    #[test]
    fn html_matches_popup_layout() {
        let html = park_popup()
            .render(&feature_properties(), MissingPropertyPolicy::Error)
            .expect("render popup")
            .to_html();

        assert_eq!(
            html,
            "<h5 class='popup-title'>Riverside Park</h5>\
             <p class='popup-subtitle' style='margin: 0 0 5px 0;'>Ward 3</p>\
             <p class='popup-property' style='margin: 0;'>Area: 12.5 acres</p>\
             <p class='popup-property' style='margin: 0;'>Open daily</p>"
        );
    }

    #[test]
    fn html_omits_absent_subtitle() {
        let content = PopupContent {
            title: "Only title".to_string(),
            subtitle: None,
            properties: Vec::new(),
        };
        assert_eq!(content.to_html(), "<h5 class='popup-title'>Only title</h5>");
    }

    #[test]
    fn html_strips_injected_script() {
        let content = PopupContent {
            title: "<script>alert(1)</script>Safe".to_string(),
            subtitle: None,
            properties: vec!["<img src=x onerror=alert(1)>".to_string()],
        };
        let html = content.to_html();
        assert!(!html.contains("<script"));
        assert!(!html.contains("onerror"));
        assert!(html.contains("Safe"));
    }

    #[test]
    fn lists_first_placeholder_of_each_field() {
        assert_eq!(park_popup().placeholders(), vec!["NAME", "WARD", "ACRES"]);
    }

    #[test]
    fn reports_each_missing_property_once() {
        let popup = PopupTemplate {
            title: "{OWNER}".to_string(),
            subtitle: Some("{NAME}".to_string()),
            properties: Some("{OWNER};{ZONE};plain".to_string()),
        };
        assert_eq!(popup.missing_properties(&feature_properties()), vec!["OWNER", "ZONE"]);
        assert!(park_popup().missing_properties(&feature_properties()).is_empty());
    }

    #[test]
    fn deserializes_with_optional_fields() {
        let popup: PopupTemplate =
            serde_json::from_value(json!({ "title": "{NAME}" })).expect("parse popup");
        assert_eq!(popup.subtitle, None);
        assert_eq!(popup.property_templates().count(), 0);
    }
}
