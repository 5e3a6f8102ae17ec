use crate::types::*;
use anyhow::{bail, Result};

pub const OUTPUT_FORMATS: [&str; 3] = ["records", "table", "flat"];

impl RuleTable {
    pub fn to_tabular_format(&self) -> TabularRules {
        TabularRules {
            format: "table".to_string(),
            columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: self
                .records
                .iter()
                .map(|record| record.to_row().iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    pub fn to_flat_format(&self) -> FlatRules {
        FlatRules {
            format: "flat".to_string(),
            rules: self
                .records
                .iter()
                .map(|record| record.logical_form.clone())
                .collect(),
        }
    }

    pub fn to_json_with_format(&self, format: &str) -> Result<String> {
        let json = match format {
            "records" => serde_json::to_string_pretty(self)?,
            "table" => serde_json::to_string_pretty(&self.to_tabular_format())?,
            "flat" => serde_json::to_string_pretty(&self.to_flat_format())?,
            other => bail!(
                "unknown output format '{other}' (expected one of: {})",
                OUTPUT_FORMATS.join(", ")
            ),
        };
        Ok(json)
    }

    pub fn save_with_format(&self, path: &str, format: &str) -> Result<()> {
        let json = self.to_json_with_format(format)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_json(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
