use crate::core::ConfigProvider;
use crate::domain::model::{MosaicLayout, PathType, SheetColumns, DEFAULT_SHEETS_PER_ROW};
use crate::utils::error::{FrameGridError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub operator: OperatorConfig,
    pub sheet: SheetConfig,
    pub paths: PathsConfig,
    pub mosaic: Option<MosaicConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorConfig {
    pub name: String,
    /// 空白表示不限制操作員
    #[serde(default)]
    pub allowed: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// CSV export of the progress spreadsheet
    pub export_path: String,
    #[serde(default)]
    pub columns: SheetColumns,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub search_path: String,
    pub destination_path: String,
    pub path_type: Option<PathType>,
    /// Directory holding the batch store
    pub store_path: Option<String>,
    pub store_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MosaicConfig {
    pub sheets_per_row: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FrameGridError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${LIDAR_ROOT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FrameGridError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("operator.name", &self.operator.name)?;
        validation::validate_one_of("operator.name", &self.operator.name, &self.operator.allowed)?;

        validation::validate_path("sheet.export_path", &self.sheet.export_path)?;
        validation::validate_file_extension("sheet.export_path", &self.sheet.export_path, &["csv"])?;

        validation::validate_path("paths.search_path", &self.paths.search_path)?;
        validation::validate_path("paths.destination_path", &self.paths.destination_path)?;
        if let Some(store_path) = &self.paths.store_path {
            validation::validate_path("paths.store_path", store_path)?;
        }

        validation::validate_range("mosaic.sheets_per_row", self.sheets_per_row(), 1, 144)?;

        Ok(())
    }

    pub fn sheets_per_row(&self) -> u16 {
        self.mosaic
            .as_ref()
            .and_then(|m| m.sheets_per_row)
            .unwrap_or(DEFAULT_SHEETS_PER_ROW)
    }

    pub fn store_path(&self) -> &str {
        self.paths.store_path.as_deref().unwrap_or(".")
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn operator_name(&self) -> &str {
        &self.operator.name
    }

    fn sheet_export_path(&self) -> &str {
        &self.sheet.export_path
    }

    fn sheet_columns(&self) -> SheetColumns {
        self.sheet.columns
    }

    fn search_path(&self) -> &str {
        &self.paths.search_path
    }

    fn destination_path(&self) -> &str {
        &self.paths.destination_path
    }

    fn path_type(&self) -> PathType {
        self.paths.path_type.unwrap_or_default()
    }

    fn store_file(&self) -> &str {
        self.paths.store_file.as_deref().unwrap_or("frames.json")
    }

    fn mosaic_layout(&self) -> MosaicLayout {
        MosaicLayout::new(self.sheets_per_row())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
