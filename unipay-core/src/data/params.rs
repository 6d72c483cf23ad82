//! 编译期声明的字段映射表
//!
//! 取代运行时反射：每个参数结构体显式声明 (序列化键, 取值, 赋值) 三元组。
//! 改名就是换 key，排除就是不写进表里，键名默认用 `to_snake_case` 推导。

use super::{GatewayData, Value};

/// 单个字段的访问器三元组
pub struct ParamField<T> {
    /// 序列化后的键名
    pub key: &'static str,
    /// 读取字段值，返回 `None` 表示缺失
    pub get: fn(&T) -> Option<Value>,
    /// 把容器里的值写回字段，类型转换由实现自行决定
    pub set: fn(&mut T, &Value),
}

/// 可与 `GatewayData` 互转的参数结构体
pub trait GatewayParams: Default {
    fn fields() -> Vec<ParamField<Self>>
    where
        Self: Sized;
}

impl GatewayData {
    /// 把参数结构体平铺进容器
    ///
    /// 与 `add` 同规则：空值跳过，重复键覆盖。
    pub fn add_params<T: GatewayParams>(&mut self, params: &T) {
        for field in T::fields() {
            if let Some(value) = (field.get)(params) {
                if !value.is_empty() {
                    let _ = self.add(field.key, value);
                }
            }
        }
    }

    /// 按映射表构造参数结构体，缺失的键保持字段默认值
    pub fn to_params<T: GatewayParams>(&self) -> T {
        let mut out = T::default();
        for field in T::fields() {
            if let Some(value) = self.get(field.key) {
                (field.set)(&mut out, value);
            }
        }
        out
    }

    /// `to_params` 的异步包装：单次阻塞调用由调用方 await，
    /// 没有独立的后台任务生命周期。
    pub async fn to_params_async<T: GatewayParams>(&self) -> T {
        self.to_params()
    }
}

/// `OutTradeNo` -> `out_trade_no`
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
