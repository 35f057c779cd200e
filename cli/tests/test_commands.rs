#[cfg(test)]
mod tests {
    use std::io::Write;

    use cbmap_cli::{
        commands::{check, popup},
        utils,
    };
    use cbmap_shared::MissingPropertyPolicy;
    use serde_json::json;
    use tempfile::NamedTempFile;

    const CONFIG: &str = r#"{
        "center": [-84.51, 39.10],
        "zoom": 11,
        "sources": [
            { "name": "parks", "data": { "type": "geojson", "file": "/static/data/1/parks.geojson" } }
        ],
        "layers": [
            {
                "id": "parks-fill",
                "type": "fill",
                "source": "parks",
                "popup": {
                    "title": "{NAME}",
                    "subtitle": "Managed by {AGENCY}",
                    "properties": "Area: {ACRES} acres;Trails: {TRAILS}"
                }
            },
            { "id": "parks-line", "type": "line", "source": "parks" }
        ]
    }"#;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file.flush().expect("flush temp file");
        file
    }

    #[test]
    fn check_accepts_valid_config() {
        let file = write_temp(CONFIG);
        check::run(file.path()).expect("valid config");
    }

    #[test]
    fn check_reports_problems() {
        let file = write_temp(
            r#"{ "zoom": 99, "layers": [ { "id": "a", "type": "fill", "source": "missing" } ] }"#,
        );
        let err = check::run(file.path()).expect_err("invalid config");
        assert!(err.to_string().ends_with("has 2 problem(s)"), "{err}");
    }

    #[test]
    fn check_reports_unreadable_json() {
        let file = write_temp("{ not json");
        let err = check::run(file.path()).expect_err("bad json");
        assert!(format!("{err:#}").contains("is not valid JSON"));
    }

    #[test]
    fn popup_renders_plain_lines_from_feature() {
        let config = utils::load_config(write_temp(CONFIG).path()).expect("load config");
        let feature = json!({
            "type": "Feature",
            "geometry": null,
            "properties": { "NAME": "Eden Park", "AGENCY": "Parks Board", "ACRES": 186, "TRAILS": 4 }
        });

        let output = popup::render(&config, "parks-fill", &feature, None, false).expect("render");
        assert_eq!(
            output,
            "Eden Park\nManaged by Parks Board\nArea: 186 acres\nTrails: 4"
        );
    }

    #[test]
    fn popup_uses_config_policy_unless_overridden() {
        let config = utils::load_config(write_temp(CONFIG).path()).expect("load config");
        let properties = json!({ "NAME": "Eden Park" });

        let blank = popup::render(&config, "parks-fill", &properties, None, false)
            .expect("blank policy from config");
        assert_eq!(blank, "Eden Park\nManaged by \nArea:  acres\nTrails: ");

        let err = popup::render(
            &config,
            "parks-fill",
            &properties,
            Some(MissingPropertyPolicy::Error),
            false,
        )
        .expect_err("strict policy");
        assert!(format!("{err:#}").contains("missing property `AGENCY`"));
    }

    #[test]
    fn popup_html_output() {
        let config = utils::load_config(write_temp(CONFIG).path()).expect("load config");
        let properties =
            json!({ "NAME": "Eden Park", "AGENCY": "Parks Board", "ACRES": 186, "TRAILS": 4 });
        let html = popup::render(&config, "parks-fill", &properties, None, true).expect("render");
        assert!(html.starts_with("<h5 class='popup-title'>Eden Park</h5>"));
        assert_eq!(html.matches("class='popup-property'").count(), 2);
    }

    #[test]
    fn popup_rejects_unknown_or_plain_layers() {
        let config = utils::load_config(write_temp(CONFIG).path()).expect("load config");
        let properties = json!({});

        let err = popup::render(&config, "roads", &properties, None, false).expect_err("unknown");
        assert_eq!(err.to_string(), "no layer named `roads`");

        let err =
            popup::render(&config, "parks-line", &properties, None, false).expect_err("no popup");
        assert_eq!(err.to_string(), "layer `parks-line` has no popup");
    }
}
