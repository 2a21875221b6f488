use serde::{Deserialize, Serialize};

pub trait ConfigSerializer<TConfig> {
    fn serialize(&self, config: &TConfig) -> Result<String, String>;
    fn deserialize(&self, content: &str) -> Result<TConfig, String>;
}

#[derive(Default)]
pub struct YamlConfigSerializer;

impl YamlConfigSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl<TConfig> ConfigSerializer<TConfig> for YamlConfigSerializer
where
    TConfig: for<'de> Deserialize<'de> + Serialize,
{
    fn serialize(&self, config: &TConfig) -> Result<String, String> {
        serde_yaml_ng::to_string(config).map_err(|e| {
            format!("Failed to serialize {}: {}", std::any::type_name::<TConfig>(), e)
        })
    }

    fn deserialize(&self, content: &str) -> Result<TConfig, String> {
        serde_yaml_ng::from_str(content).map_err(|e| {
            format!("Failed to deserialize {}: {}", std::any::type_name::<TConfig>(), e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Limits {
        timeout_ms: u64,
        label: Option<String>,
    }

    #[test]
    fn test_yaml_fields_are_read() {
        let limits: Limits = YamlConfigSerializer::new()
            .deserialize("timeout_ms: 250\nlabel: arena\n")
            .unwrap();
        assert_eq!(limits, Limits { timeout_ms: 250, label: Some("arena".to_string()) });
    }

    #[test]
    fn test_bad_yaml_names_the_type() {
        let result: Result<Limits, String> = YamlConfigSerializer::new().deserialize("timeout_ms: soon");
        assert!(result.unwrap_err().contains("Limits"));
    }
}
