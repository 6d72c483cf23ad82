//! 网关通知识别
//!
//! 入站通知不带路由信息，只能靠结构嗅探：先把请求体读成 `GatewayData`，
//! 再拿各网关声明的必备参数名集合做包含匹配。两个渠道的参数集合理论上
//! 可能重叠，按注册顺序首个匹配即胜是既定的决胜规则。

use crate::data::GatewayData;
use crate::error::Result;
use crate::gateway::{Gateway, GatewayRegistry, NullGateway, PaymentChannel};
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP 请求方法，通知场景只区分 GET 与其他
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// 入站通知的显式描述
///
/// 探测器是纯函数，不依赖任何隐式的 HTTP 上下文；由 Web 层把请求
/// 摘成这个结构传进来，每个字段每次请求只读一遍。
#[derive(Debug, Clone)]
pub struct NotifyRequest {
    pub method: Method,
    /// 原始 Content-Type，与 `text/xml` / `application/xml` 做精确比较
    pub content_type: Option<String>,
    /// 原始查询串，GET 通知从这里解析
    pub query_string: String,
    /// 原始请求体，XML 通知从这里解析
    pub body: String,
    /// 已解析的表单字段
    pub form: Vec<(String, String)>,
}

impl NotifyRequest {
    fn is_xml(&self) -> bool {
        matches!(
            self.content_type.as_deref(),
            Some("text/xml") | Some("application/xml")
        )
    }
}

/// 读取通知数据：GET 走查询串，XML 走请求体，其余按表单处理
///
/// 表单路径沿用弱契约：出错得到空的或不完整的容器，不设 `defaultResult`。
pub fn read_notify_data(request: &NotifyRequest) -> GatewayData {
    let mut data = GatewayData::new();
    match request.method {
        Method::Get => data.from_url(&request.query_string),
        Method::Post => {
            if request.is_xml() {
                data.from_xml(&request.body);
            } else {
                data.from_form(&request.form);
            }
        }
    }
    data
}

/// 识别通知来源并把解析出的数据挂到选中的网关上
///
/// 按注册顺序找第一个必备参数全部在场的网关（多余的键忽略）；
/// 都不匹配时返回 [`NullGateway`]，后续操作统一失败而不是空引用。
pub fn resolve_gateway(registry: &GatewayRegistry, request: &NotifyRequest) -> ResolvedNotify {
    let data = read_notify_data(request);

    for gateway in registry.all() {
        if contains_params(gateway.notify_verify_params(), &data) {
            debug!(channel = %gateway.channel(), "notification source identified");
            return ResolvedNotify {
                gateway: gateway.clone(),
                data,
            };
        }
    }

    warn!("no registered gateway matches the notification, falling back to NullGateway");
    ResolvedNotify {
        gateway: Arc::new(NullGateway),
        data,
    }
}

/// 必备参数名是否全部存在于数据中
fn contains_params(names: &[&str], data: &GatewayData) -> bool {
    names.iter().all(|name| data.exists(name))
}

/// 探测结果：选中的网关与当次通知的数据
///
/// 数据归当次操作独占，不跨请求共享。
pub struct ResolvedNotify {
    gateway: Arc<dyn Gateway>,
    data: GatewayData,
}

impl ResolvedNotify {
    pub fn channel(&self) -> PaymentChannel {
        self.gateway.channel()
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    pub fn data(&self) -> &GatewayData {
        &self.data
    }

    pub fn into_data(self) -> GatewayData {
        self.data
    }

    /// 用选中网关校验通知；兜底网关在这里返回 `UnsupportedGateway`
    pub async fn verify(&self) -> Result<bool> {
        self.gateway.verify_notify(&self.data).await
    }
}
