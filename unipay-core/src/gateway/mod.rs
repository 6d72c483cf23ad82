//! 网关契约与注册表
//!
//! 每个支付渠道实现一个 [`Gateway`]；渠道自身的签名算法、证书处理都在
//! 实现方，核心只依赖这里声明的能力。

mod null;
mod registry;

pub use null::NullGateway;
pub use registry::GatewayRegistry;

use crate::data::GatewayData;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 支付渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentChannel {
    Alipay,
    Wechat,
    /// 未识别来源（NullGateway 专用）
    Unknown,
}

impl PaymentChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alipay => "alipay",
            Self::Wechat => "wechat",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PaymentChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentChannel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "alipay" => Ok(Self::Alipay),
            "wechat" => Ok(Self::Wechat),
            other => Err(format!("未知支付渠道: {other}")),
        }
    }
}

/// 主动查询订单的辅助参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryOrder {
    /// 商户订单号
    pub out_trade_no: String,
    /// 渠道交易号，可选
    #[serde(default)]
    pub trade_no: Option<String>,
}

/// 支付网关公共接口
#[async_trait]
pub trait Gateway: Send + Sync {
    /// 网关所属渠道
    fn channel(&self) -> PaymentChannel;

    /// 识别通知来源的最小参数名集合，按声明顺序
    ///
    /// 探测器用它对入站通知做结构指纹匹配，集合必须能唯一区分该渠道的
    /// 通知格式（与其他已注册渠道相比）。
    fn notify_verify_params(&self) -> &[&'static str];

    /// 校验异步通知是否可信
    async fn verify_notify(&self, data: &GatewayData) -> Result<bool>;

    /// 主动向渠道查询订单状态，返回渠道应答的网关数据
    async fn query(&self, order: &QueryOrder) -> Result<GatewayData>;
}
