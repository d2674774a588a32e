//! JSON and YAML views of a parsed file, built on the serde derives of the model

use super::registry::{FormatError, Formatter};
use crate::dotora::editing::DotOraFile;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, file: &DotOraFile) -> Result<String, FormatError> {
        serde_json::to_string_pretty(file.params()).map_err(|e| FormatError::Encode {
            format: "json",
            message: e.to_string(),
        })
    }

    fn description(&self) -> &str {
        "Params and their trees as pretty-printed JSON"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, file: &DotOraFile) -> Result<String, FormatError> {
        serde_yaml::to_string(file.params()).map_err(|e| FormatError::Encode {
            format: "yaml",
            message: e.to_string(),
        })
    }

    fn description(&self) -> &str {
        "Params and their trees as YAML"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let file = DotOraFile::parse("ORCL = (HOST = db01)\nX = 1\n").unwrap();
        let json = JsonFormatter.serialize(&file).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["root"]["key"], "ORCL");
        assert_eq!(value[0]["root"]["value"]["group"][0]["value"]["scalar"], "db01");
        assert_eq!(value[1]["root"]["value"]["scalar"], "1");
        assert_eq!(value[1]["index"], 1);
    }

    #[test]
    fn test_yaml_mentions_keys() {
        let file = DotOraFile::parse("ORCL = (HOST = db01)\n").unwrap();
        let yaml = YamlFormatter.serialize(&file).unwrap();
        assert!(yaml.contains("key: ORCL"));
        assert!(yaml.contains("scalar: db01"));
    }
}
