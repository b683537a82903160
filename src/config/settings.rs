// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Render 平台上的持久化数据目录
const RENDER_DATA_DIR: &str = "/opt/render/project/src/data";

/// 应用程序配置设置
///
/// 包含服务器、数据库、远程视频接口、上传限制和指标导出等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 远程视频生成接口配置
    pub remote: RemoteApiSettings,
    /// 上传配置
    pub upload: UploadSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 完整的数据库连接URL，设置后忽略 data_dir/file_name
    pub url: Option<String>,
    /// SQLite 数据文件所在目录
    pub data_dir: String,
    /// SQLite 数据文件名
    pub file_name: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

impl DatabaseSettings {
    /// 计算实际使用的连接URL
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => {
                let path = Path::new(&self.data_dir).join(&self.file_name);
                format!("sqlite://{}?mode=rwc", path.display())
            }
        }
    }
}

/// 远程视频生成接口配置
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteApiSettings {
    /// 接口基础地址
    pub base_url: String,
    /// Bearer 令牌，未配置时所有视频操作返回配置错误
    pub api_token: Option<String>,
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
}

/// 上传配置
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// 请求体最大字节数
    pub max_body_bytes: usize,
}

/// 指标导出配置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启动 Prometheus 导出器
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

/// 兼容旧部署方式的环境变量
///
/// 这些变量没有前缀，优先级高于 `VEO_RELAY__*`
#[derive(Debug, Default, Clone)]
pub struct LegacyOverrides {
    /// `PORT`
    pub port: Option<u16>,
    /// `VECTOR_API_TOKEN`
    pub api_token: Option<String>,
    /// `DATA_DIR`，或在设置了 `RENDER` 时使用 Render 的数据目录
    pub data_dir: Option<String>,
}

impl LegacyOverrides {
    /// 从进程环境变量读取
    pub fn from_env() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        let data_dir = non_empty("DATA_DIR").or_else(|| {
            std::env::var_os("RENDER").map(|_| RENDER_DATA_DIR.to_string())
        });

        Self {
            port: non_empty("PORT").and_then(|p| p.trim().parse().ok()),
            api_token: non_empty("VECTOR_API_TOKEN"),
            data_dir,
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_overrides(LegacyOverrides::from_env())
    }

    /// 使用给定的兼容变量构建配置
    pub fn with_overrides(legacy: LegacyOverrides) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            // Default DB settings
            .set_default("database.data_dir", "data")?
            .set_default("database.file_name", "veo_tasks.db")?
            .set_default("database.max_connections", 5)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default remote API settings
            .set_default("remote.base_url", "https://api.vectorengine.ai/v1/")?
            .set_default("remote.timeout_secs", 60)?
            // Default upload settings
            .set_default("upload.max_body_bytes", 50 * 1024 * 1024)?
            // Default metrics settings
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("VEO_RELAY").separator("__"))
            .set_override_option("server.port", legacy.port.map(i64::from))?
            .set_override_option("remote.api_token", legacy.api_token)?
            .set_override_option("database.data_dir", legacy.data_dir)?;

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
