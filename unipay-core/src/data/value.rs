use chrono::{DateTime, NaiveDateTime};
use std::fmt;

/// 网关数据值，带显式类型标签
///
/// XML 输出时按标签区分：`String`/`Raw` 包在 CDATA 里，其余按文本输出。
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// 未经解析的原始负载（defaultResult 使用）
    Raw(String),
}

impl Value {
    /// 序列化形式（拼接 url、xml 文本节点等都使用该形式）
    pub fn as_text(&self) -> String {
        match self {
            Value::String(s) | Value::Raw(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// 值是否为空（空值不允许入库，缺失用省略表示）
    pub fn is_empty(&self) -> bool {
        match self {
            Value::String(s) | Value::Raw(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 尽力而为的类型转换，失败返回零值
    pub fn as_i64(&self) -> i64 {
        match self {
            Value::Int(n) => *n,
            Value::Float(f) => *f as i64,
            Value::Bool(b) => *b as i64,
            _ => self.as_text().parse().unwrap_or(0),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Int(n) => *n as f64,
            Value::Float(f) => *f,
            _ => self.as_text().parse().unwrap_or(0.0),
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            _ => self.as_text().parse().unwrap_or(false),
        }
    }

    /// 支持 RFC3339、`2006-01-02 15:04:05` 以及微信的 `20060102150405` 三种格式
    pub fn as_datetime(&self) -> NaiveDateTime {
        if let Value::DateTime(dt) = self {
            return *dt;
        }
        let text = self.as_text();
        NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(&text, "%Y%m%d%H%M%S"))
            .or_else(|_| DateTime::parse_from_rfc3339(&text).map(|dt| dt.naive_utc()))
            .unwrap_or_default()
    }

    pub(crate) fn to_json_value(&self) -> serde_json::Value {
        match self {
            Value::String(s) | Value::Raw(s) => serde_json::Value::String(s.clone()),
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::String(f.to_string())),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::DateTime(_) => serde_json::Value::String(self.as_text()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}
