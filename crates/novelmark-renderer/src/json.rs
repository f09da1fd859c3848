use chrono::Local;
use novelmark_core::ProjectMeta;
use serde::{Deserialize, Serialize};

const BUILD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The JSON build payload: metadata plus stylesheet and chapter HTML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HtmlJson {
    pub meta: BuildMeta,
    pub text: HtmlText,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMeta {
    pub project_name: String,
    pub novel_author: String,
    /// Unix timestamp in seconds.
    pub build_time: i64,
    pub build_time_str: String,
}

impl BuildMeta {
    pub fn now(project: &ProjectMeta) -> Self {
        let now = Local::now();
        Self {
            project_name: project.name.clone(),
            novel_author: project.author.clone(),
            build_time: now.timestamp(),
            build_time_str: now.format(BUILD_TIME_FORMAT).to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HtmlText {
    pub css: Vec<String>,
    pub html: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::BuildMeta;
    use novelmark_core::ProjectMeta;

    #[test]
    fn build_meta_uses_project_fields() {
        let meta = BuildMeta::now(&ProjectMeta::new("Novel", "Jane Doh"));
        assert_eq!(meta.project_name, "Novel");
        assert_eq!(meta.novel_author, "Jane Doh");
        assert!(meta.build_time > 0);
        assert_eq!(meta.build_time_str.len(), "2024-01-01 00:00:00".len());
    }

    #[test]
    fn field_names_are_camel_case() {
        let meta = BuildMeta {
            project_name: "P".to_string(),
            novel_author: "A".to_string(),
            build_time: 1,
            build_time_str: "t".to_string(),
        };
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["projectName"], "P");
        assert_eq!(value["novelAuthor"], "A");
        assert_eq!(value["buildTime"], 1);
        assert_eq!(value["buildTimeStr"], "t");
    }
}
