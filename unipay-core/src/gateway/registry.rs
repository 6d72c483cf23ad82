use super::{Gateway, PaymentChannel};
use std::sync::Arc;

/// 网关注册表
///
/// 启动时构建完成后只读，注册顺序会被保留——通知探测按这个顺序做
/// 首个匹配即胜的指纹比对。
#[derive(Default, Clone)]
pub struct GatewayRegistry {
    gateways: Vec<Arc<dyn Gateway>>,
}

impl GatewayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册网关，追加到列表末尾
    ///
    /// NullGateway 是探测兜底，不要注册进来。
    pub fn register(&mut self, gateway: Arc<dyn Gateway>) {
        self.gateways.push(gateway);
    }

    /// 按渠道精确查找，同渠道多次注册时返回先注册的
    pub fn get(&self, channel: PaymentChannel) -> Option<Arc<dyn Gateway>> {
        self.gateways
            .iter()
            .find(|g| g.channel() == channel)
            .cloned()
    }

    /// 按注册顺序枚举全部网关
    pub fn all(&self) -> &[Arc<dyn Gateway>] {
        &self.gateways
    }

    pub fn len(&self) -> usize {
        self.gateways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GatewayData;
    use crate::error::Result;
    use crate::gateway::QueryOrder;
    use async_trait::async_trait;

    struct FakeGateway(PaymentChannel);

    #[async_trait]
    impl Gateway for FakeGateway {
        fn channel(&self) -> PaymentChannel {
            self.0
        }

        fn notify_verify_params(&self) -> &[&'static str] {
            &["sign"]
        }

        async fn verify_notify(&self, _data: &GatewayData) -> Result<bool> {
            Ok(true)
        }

        async fn query(&self, _order: &QueryOrder) -> Result<GatewayData> {
            Ok(GatewayData::new())
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = GatewayRegistry::new();
        registry.register(Arc::new(FakeGateway(PaymentChannel::Alipay)));
        registry.register(Arc::new(FakeGateway(PaymentChannel::Wechat)));

        assert_eq!(registry.len(), 2);
        assert!(registry.get(PaymentChannel::Alipay).is_some());
        assert!(registry.get(PaymentChannel::Wechat).is_some());
        assert!(registry.get(PaymentChannel::Unknown).is_none());

        // 枚举顺序 = 注册顺序
        let channels: Vec<_> = registry.all().iter().map(|g| g.channel()).collect();
        assert_eq!(channels, vec![PaymentChannel::Alipay, PaymentChannel::Wechat]);
    }
}
