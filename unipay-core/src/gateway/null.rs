use super::{Gateway, PaymentChannel, QueryOrder};
use crate::data::GatewayData;
use crate::error::{GatewayError, Result};
use async_trait::async_trait;

/// 兜底网关
///
/// 通知无法匹配任何已注册网关时由探测器返回，保证调用方拿到的句柄
/// 永远非空；后续的校验、查询统一失败在 `UnsupportedGateway` 上，
/// 而不是在空引用上炸掉。
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGateway;

#[async_trait]
impl Gateway for NullGateway {
    fn channel(&self) -> PaymentChannel {
        PaymentChannel::Unknown
    }

    fn notify_verify_params(&self) -> &[&'static str] {
        &[]
    }

    async fn verify_notify(&self, _data: &GatewayData) -> Result<bool> {
        Err(GatewayError::UnsupportedGateway)
    }

    async fn query(&self, _order: &QueryOrder) -> Result<GatewayData> {
        Err(GatewayError::UnsupportedGateway)
    }
}
