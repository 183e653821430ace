use anyhow::{anyhow, Result};
use std::env;

/// 运行配置：数据库位置、连接池参数与当前 schema 版本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowdraftConfig {
    pub db_path: String,
    /// Schema marker of the running release; terminal node of the migration chain.
    pub schema_version: String,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
}

impl Default for FlowdraftConfig {
    fn default() -> Self {
        Self {
            db_path: "data/flowdraft.db".into(),
            schema_version: "4.0".into(),
            max_connections: 5,
            busy_timeout_secs: 5,
            acquire_timeout_secs: 10,
        }
    }
}

impl FlowdraftConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 通过任意 key 查找函数构建配置（测试时可以不依赖进程环境变量）
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let db_path = lookup("FLOWDRAFT_DB_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.db_path);

        let schema_version = lookup("FLOWDRAFT_SCHEMA_VERSION")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.schema_version);

        let max_connections = match lookup("FLOWDRAFT_DB_MAX_CONNECTIONS") {
            Some(raw) => {
                let n = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| anyhow!("Invalid FLOWDRAFT_DB_MAX_CONNECTIONS '{}': {}", raw, e))?;
                if n == 0 {
                    return Err(anyhow!("FLOWDRAFT_DB_MAX_CONNECTIONS must be greater than 0"));
                }
                n
            }
            None => defaults.max_connections,
        };

        let busy_timeout_secs = parse_secs(&lookup, "FLOWDRAFT_DB_BUSY_TIMEOUT_SECS", defaults.busy_timeout_secs)?;
        let acquire_timeout_secs =
            parse_secs(&lookup, "FLOWDRAFT_DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout_secs)?;

        Ok(Self {
            db_path,
            schema_version,
            max_connections,
            busy_timeout_secs,
            acquire_timeout_secs,
        })
    }

    pub fn database_url(&self) -> String {
        if self.db_path.starts_with("sqlite:") {
            self.db_path.clone()
        } else {
            format!("sqlite://{}", self.db_path)
        }
    }

    /// 日志摘要
    pub fn summary(&self) -> String {
        format!(
            "db_path={}, schema_version={}, max_connections={}, busy_timeout={}s, acquire_timeout={}s",
            self.db_path,
            self.schema_version,
            self.max_connections,
            self.busy_timeout_secs,
            self.acquire_timeout_secs
        )
    }
}

fn parse_secs<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| anyhow!("Invalid {} '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let cfg = FlowdraftConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg, FlowdraftConfig::default());
        assert_eq!(cfg.database_url(), "sqlite://data/flowdraft.db");
    }

    #[test]
    fn test_overrides_are_trimmed() {
        let cfg = FlowdraftConfig::from_lookup(lookup_from(&[
            ("FLOWDRAFT_DB_PATH", " /tmp/t.db "),
            ("FLOWDRAFT_SCHEMA_VERSION", " 5.1 "),
            ("FLOWDRAFT_DB_MAX_CONNECTIONS", "8"),
            ("FLOWDRAFT_DB_BUSY_TIMEOUT_SECS", "2"),
        ]))
        .unwrap();
        assert_eq!(cfg.db_path, "/tmp/t.db");
        assert_eq!(cfg.schema_version, "5.1");
        assert_eq!(cfg.max_connections, 8);
        assert_eq!(cfg.busy_timeout_secs, 2);
        assert_eq!(cfg.acquire_timeout_secs, 10);
        assert!(cfg.summary().contains("schema_version=5.1"));
    }

    #[test]
    fn test_sqlite_url_passthrough() {
        let cfg = FlowdraftConfig::from_lookup(lookup_from(&[("FLOWDRAFT_DB_PATH", "sqlite::memory:")])).unwrap();
        assert_eq!(cfg.database_url(), "sqlite::memory:");
    }

    #[test]
    fn test_rejects_zero_connections() {
        let err = FlowdraftConfig::from_lookup(lookup_from(&[("FLOWDRAFT_DB_MAX_CONNECTIONS", "0")])).unwrap_err();
        assert!(err.to_string().contains("greater than 0"));
    }

    #[test]
    fn test_rejects_garbage_timeout() {
        let err = FlowdraftConfig::from_lookup(lookup_from(&[("FLOWDRAFT_DB_BUSY_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("FLOWDRAFT_DB_BUSY_TIMEOUT_SECS"));
    }
}
