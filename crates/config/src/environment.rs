use std::collections::HashMap;

use config::Environment;

use crate::defaults::ENV_KEYS;

/// 配置覆盖值的来源
///
/// 每次解析都会重新读取，不做缓存。键名区分大小写，只识别 [`ENV_KEYS`]。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnvSource {
    /// 读取当前进程环境变量
    #[default]
    Process,
    /// 只读取显式给定的键值对，键名与环境变量一致（如 `UPLOAD_DIR`）
    Overrides(HashMap<String, String>),
    /// 读取进程环境变量，再用给定键值对覆盖
    Layered(HashMap<String, String>),
}

impl EnvSource {
    pub fn overrides<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Overrides(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// 追加一个覆盖值。进程环境来源变为 [`EnvSource::Layered`]，其余键仍按调用时的进程环境读取
    pub fn with_override<K: Into<String>, V: Into<String>>(self, key: K, value: V) -> Self {
        match self {
            EnvSource::Process => EnvSource::Layered(HashMap::from([(key.into(), value.into())])),
            EnvSource::Overrides(mut map) => {
                map.insert(key.into(), value.into());
                EnvSource::Overrides(map)
            }
            EnvSource::Layered(mut map) => {
                map.insert(key.into(), value.into());
                EnvSource::Layered(map)
            }
        }
    }

    pub fn is_process(&self) -> bool {
        matches!(self, EnvSource::Process)
    }

    /// 当前来源下各键的取值
    pub fn values(&self) -> HashMap<String, String> {
        let mut values = match self {
            EnvSource::Process | EnvSource::Layered(_) => process_values(),
            EnvSource::Overrides(_) => HashMap::new(),
        };
        if let EnvSource::Overrides(map) | EnvSource::Layered(map) = self {
            values.extend(
                map.iter()
                    .filter(|(key, _)| ENV_KEYS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone())),
            );
        }
        values
    }

    /// `config` 会把键名转为小写，因此先按原始大小写筛选
    pub(crate) fn to_environment(&self) -> Environment {
        Environment::default().source(Some(self.values().into_iter().collect()))
    }
}

fn process_values() -> HashMap<String, String> {
    ENV_KEYS
        .iter()
        .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_string(), value)))
        .collect()
}
