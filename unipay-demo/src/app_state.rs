use crate::config::AppConfig;
use std::sync::Arc;
use tracing::info;
use unipay_core::gateways::{
    AcceptAllVerifier, AlipayConfig, AlipayGateway, NotifySignVerifier, WechatConfig,
    WechatGateway,
};
use unipay_core::{GatewayError, GatewayRegistry};

pub struct AppState {
    pub config: AppConfig,
    pub registry: GatewayRegistry,
}

impl AppState {
    /// 渠道配置不完整（缺 app_id/mch_id）在启动时报错，而不是等到第一笔通知
    pub fn new(config: AppConfig) -> Result<Self, GatewayError> {
        let registry = build_registry(&config)?;
        Ok(Self { config, registry })
    }
}

/// 按配置组装注册表，注册顺序即通知识别的优先顺序
fn build_registry(config: &AppConfig) -> Result<GatewayRegistry, GatewayError> {
    // 演示环境放行所有签名，接入生产前必须换成真实校验器
    let verifier: Arc<dyn NotifySignVerifier> = Arc::new(AcceptAllVerifier);

    let mut registry = GatewayRegistry::new();

    if let Some(alipay) = &config.alipay {
        let mut channel_config = AlipayConfig {
            app_id: alipay.app_id.clone(),
            ..Default::default()
        };
        if let Some(url) = &alipay.gateway_url {
            channel_config.gateway_url = url.clone();
        }
        registry.register(Arc::new(AlipayGateway::new(channel_config, verifier.clone())?));
        info!("Registered alipay gateway");
    }

    if let Some(wechat) = &config.wechat {
        let mut channel_config = WechatConfig {
            app_id: wechat.app_id.clone(),
            mch_id: wechat.mch_id.clone(),
            ..Default::default()
        };
        if let Some(url) = &wechat.api_url {
            channel_config.api_url = url.clone();
        }
        registry.register(Arc::new(WechatGateway::new(channel_config, verifier.clone())?));
        info!("Registered wechat gateway");
    }

    Ok(registry)
}
