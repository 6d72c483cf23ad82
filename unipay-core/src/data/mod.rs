//! 网关数据容器
//!
//! `GatewayData` 是内部对象与四种线格式（XML、url 查询串、JSON、自动提交表单）
//! 之间搬运数据的有序键值容器。键按字典序迭代，这一点是确定性序列化的前提，
//! 各渠道的签名原串都依赖排序后的键序。

mod params;
mod value;

pub use params::{to_snake_case, GatewayParams, ParamField};
pub use value::Value;

use crate::error::{GatewayError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;

/// 保留键：解析失败时存放原始负载，不会是真实渠道字段
pub const DEFAULT_RESULT: &str = "defaultResult";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatewayData {
    values: BTreeMap<String, Value>,
}

impl GatewayData {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加参数，键重复时覆盖旧值
    ///
    /// 空键与空值都会报 `InvalidParameter`：缺失用省略表示，不用空值占位。
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        if key.is_empty() {
            return Err(GatewayError::InvalidParameter("参数名不能为空".to_string()));
        }
        let value = value.into();
        if value.is_empty() {
            return Err(GatewayError::InvalidParameter(format!(
                "参数 {key} 的值不能为空"
            )));
        }
        self.values.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// 不存在或无法转换时返回空串
    pub fn get_string(&self, key: &str) -> String {
        self.get(key).map(Value::as_text).unwrap_or_default()
    }

    pub fn get_int(&self, key: &str) -> i64 {
        self.get(key).map(Value::as_i64).unwrap_or_default()
    }

    pub fn get_float(&self, key: &str) -> f64 {
        self.get(key).map(Value::as_f64).unwrap_or_default()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).map(Value::as_bool).unwrap_or_default()
    }

    pub fn get_datetime(&self, key: &str) -> chrono::NaiveDateTime {
        self.get(key).map(Value::as_datetime).unwrap_or_default()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// 按键的字典序迭代
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// 解析失败时捕获的原始负载，仅在 from_* 无法解析时存在
    pub fn default_result(&self) -> Option<String> {
        self.get(DEFAULT_RESULT).map(Value::as_text)
    }

    // ---- XML ----

    /// 转成 `<xml>` 包裹的扁平 XML；空容器返回空串而不是 `<xml></xml>`
    pub fn to_xml(&self) -> String {
        if self.values.is_empty() {
            return String::new();
        }
        let mut xml = String::from("<xml>");
        for (key, value) in &self.values {
            match value {
                Value::String(s) | Value::Raw(s) => {
                    xml.push_str(&format!("<{key}><![CDATA[{s}]]></{key}>"));
                }
                other => {
                    xml.push_str(&format!("<{key}>{}</{key}>", other.as_text()));
                }
            }
        }
        xml.push_str("</xml>");
        xml
    }

    /// 从 XML 重建容器：清空现有内容，取根节点的直接子节点做键值对
    ///
    /// 解析失败不向上抛：清空后把原始输入放到 `defaultResult` 下，
    /// 调用方通过 `default_result()` 检查。
    pub fn from_xml(&mut self, xml: &str) {
        self.clear();
        if xml.is_empty() {
            return;
        }
        if self.parse_xml(xml).is_err() {
            self.clear();
            self.values
                .insert(DEFAULT_RESULT.to_string(), Value::Raw(xml.to_string()));
        }
    }

    fn parse_xml(&mut self, xml: &str) -> Result<()> {
        let mut reader = Reader::from_str(xml);
        let mut depth = 0usize;
        let mut key: Option<String> = None;
        let mut text = String::new();
        let mut seen_root = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| GatewayError::ResponseParse(e.to_string()))?;
            match event {
                Event::Start(ref e) => {
                    depth += 1;
                    if depth == 1 {
                        seen_root = true;
                    }
                    if depth == 2 {
                        key = Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                        text.clear();
                    }
                }
                Event::Text(e) => {
                    if depth >= 2 {
                        let unescaped = e
                            .unescape()
                            .map_err(|e| GatewayError::ResponseParse(e.to_string()))?;
                        text.push_str(&unescaped);
                    }
                }
                Event::CData(e) => {
                    if depth >= 2 {
                        text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::End(_) => {
                    if depth == 2 {
                        if let Some(k) = key.take() {
                            let v = text.trim();
                            // 空子节点按缺失处理
                            if !v.is_empty() {
                                self.values.insert(k, Value::String(v.to_string()));
                            }
                        }
                        text.clear();
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(GatewayError::ResponseParse(
                "文档缺少根节点".to_string(),
            ));
        }
        Ok(())
    }

    // ---- URL ----

    /// 拼成 `k=v&k=v`，不做百分号编码；`exclude` 中的键被跳过
    pub fn to_url(&self, exclude: &[&str]) -> String {
        self.values
            .iter()
            .filter(|(key, _)| !exclude.contains(&key.as_str()))
            .map(|(key, value)| format!("{}={}", key, value.as_text()))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// 同 `to_url`，但对值做百分号编码（键不编码）
    pub fn to_url_encode(&self, exclude: &[&str]) -> String {
        self.values
            .iter()
            .filter(|(key, _)| !exclude.contains(&key.as_str()))
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value.as_text())))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// 从 url 查询串重建容器，开头的 `?` 会被去掉，值做百分号解码
    ///
    /// 空键或空值的片段直接跳过；解码失败走 `defaultResult` 兜底。
    pub fn from_url(&mut self, url: &str) {
        self.clear();
        if url.is_empty() {
            return;
        }
        match Self::parse_query(url) {
            Ok(pairs) => {
                for (key, value) in pairs {
                    self.values.insert(key, Value::String(value));
                }
            }
            Err(_) => {
                self.clear();
                self.values
                    .insert(DEFAULT_RESULT.to_string(), Value::Raw(url.to_string()));
            }
        }
    }

    fn parse_query(url: &str) -> Result<Vec<(String, String)>> {
        let query = url.strip_prefix('?').unwrap_or(url);
        let mut pairs = Vec::new();
        for piece in query.split('&') {
            let Some((key, value)) = piece.split_once('=') else {
                continue;
            };
            if key.is_empty() || value.is_empty() {
                continue;
            }
            let decoded = urlencoding::decode(value)
                .map_err(|e| GatewayError::ResponseParse(e.to_string()))?;
            pairs.push((key.to_string(), decoded.into_owned()));
        }
        Ok(pairs)
    }

    // ---- 表单 ----

    /// 从已解析的表单字段重建容器，值做百分号解码
    ///
    /// 单条失败静默丢弃，也不设置 `defaultResult`。这是沿用下来的弱契约，
    /// 与 XML/URL/JSON 的兜底行为不一致，改动前先看 DESIGN.md。
    pub fn from_form(&mut self, form: &[(String, String)]) {
        self.clear();
        for (key, value) in form {
            if let Ok(decoded) = urlencoding::decode(value) {
                let _ = self.add(key.clone(), decoded.into_owned());
            }
        }
    }

    /// 生成自动提交的 HTML 表单文档，用于跳转支付场景
    pub fn to_form(&self, action_url: &str) -> String {
        let mut html = String::new();
        html.push_str("<body>\n");
        html.push_str(&format!(
            "<form name='gateway' method='post' action='{action_url}'>\n"
        ));
        for (key, value) in &self.values {
            html.push_str(&format!(
                "<input type='hidden' name='{}' value='{}'>\n",
                key,
                value.as_text()
            ));
        }
        html.push_str("</form>\n");
        html.push_str("<script type='text/javascript'>\n");
        html.push_str("document.gateway.submit();\n");
        html.push_str("</script>\n");
        html.push_str("</body>\n");
        html
    }

    // ---- JSON ----

    pub fn to_json(&self) -> String {
        let mut map = serde_json::Map::new();
        for (key, value) in &self.values {
            map.insert(key.clone(), value.to_json_value());
        }
        serde_json::Value::Object(map).to_string()
    }

    /// 只平铺顶层属性，值一律转为字符串；非对象或解析失败走 `defaultResult` 兜底
    pub fn from_json(&mut self, json: &str) {
        self.clear();
        if json.is_empty() {
            return;
        }
        match serde_json::from_str::<serde_json::Value>(json) {
            Ok(serde_json::Value::Object(map)) => {
                for (key, value) in map {
                    let text = match value {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    let _ = self.add(key, text);
                }
            }
            _ => {
                self.clear();
                self.values
                    .insert(DEFAULT_RESULT.to_string(), Value::Raw(json.to_string()));
            }
        }
    }
}
