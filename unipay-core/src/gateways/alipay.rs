use super::NotifySignVerifier;
use crate::data::GatewayData;
use crate::error::{GatewayError, Result};
use crate::gateway::{Gateway, PaymentChannel, QueryOrder};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

/// 支付宝通知的结构指纹
const NOTIFY_VERIFY_PARAMS: &[&str] = &["notify_time", "notify_type", "notify_id", "sign", "sign_type"];

#[derive(Debug, Clone)]
pub struct AlipayConfig {
    pub app_id: String,
    pub gateway_url: String,
}

impl Default for AlipayConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            gateway_url: "https://openapi.alipay.com/gateway.do".to_string(),
        }
    }
}

pub struct AlipayGateway {
    config: AlipayConfig,
    client: Client,
    verifier: Arc<dyn NotifySignVerifier>,
}

impl AlipayGateway {
    pub fn new(config: AlipayConfig, verifier: Arc<dyn NotifySignVerifier>) -> Result<Self> {
        if config.app_id.is_empty() {
            return Err(GatewayError::Configuration(
                "支付宝网关缺少 app_id".to_string(),
            ));
        }
        Ok(Self {
            config,
            client: Client::new(),
            verifier,
        })
    }

    // 构建公共请求参数
    fn build_common_params(&self, method: &str) -> Result<GatewayData> {
        let mut params = GatewayData::new();
        params.add("app_id", self.config.app_id.as_str())?;
        params.add("method", method)?;
        params.add("format", "JSON")?;
        params.add("charset", "utf-8")?;
        params.add("sign_type", "RSA2")?;
        params.add("timestamp", Utc::now().format("%Y-%m-%d %H:%M:%S").to_string())?;
        params.add("version", "1.0")?;
        Ok(params)
    }
}

#[async_trait]
impl Gateway for AlipayGateway {
    fn channel(&self) -> PaymentChannel {
        PaymentChannel::Alipay
    }

    fn notify_verify_params(&self) -> &[&'static str] {
        NOTIFY_VERIFY_PARAMS
    }

    async fn verify_notify(&self, data: &GatewayData) -> Result<bool> {
        info!("verifying alipay notification");

        let app_id = data.get_string("app_id");
        if !app_id.is_empty() && app_id != self.config.app_id {
            return Err(GatewayError::ChannelError("app_id mismatch".to_string()));
        }

        let sign = data.get_string("sign");
        if sign.is_empty() {
            return Err(GatewayError::SignatureInvalid("missing sign".to_string()));
        }

        let trade_status = data.get_string("trade_status");
        if trade_status != "TRADE_SUCCESS" && trade_status != "TRADE_FINISHED" {
            return Ok(false);
        }

        // 具体签名算法由接入方注入的校验器完成
        self.verifier.verify(data, &sign)
    }

    async fn query(&self, order: &QueryOrder) -> Result<GatewayData> {
        info!("querying alipay order: {}", order.out_trade_no);

        let mut params = self.build_common_params("alipay.trade.query")?;

        let mut biz_content = serde_json::json!({
            "out_trade_no": order.out_trade_no,
        });
        if let Some(trade_no) = &order.trade_no {
            biz_content["trade_no"] = serde_json::Value::String(trade_no.clone());
        }
        params.add("biz_content", biz_content.to_string())?;

        let response = self
            .client
            .post(&self.config.gateway_url)
            .header("Content-Type", "application/x-www-form-urlencoded;charset=utf-8")
            .body(params.to_url_encode(&[]))
            .send()
            .await?;
        let response_text = response.text().await?;

        // 响应是嵌套 JSON，取业务节点再平铺
        let response_json: serde_json::Value = serde_json::from_str(&response_text)
            .map_err(|e| GatewayError::ResponseParse(e.to_string()))?;
        let node = response_json
            .get("alipay_trade_query_response")
            .ok_or_else(|| {
                GatewayError::ResponseParse(
                    "response does not contain alipay_trade_query_response".to_string(),
                )
            })?;

        let mut data = GatewayData::new();
        data.from_json(&node.to_string());

        let code = data.get_string("code");
        if code != "10000" {
            let sub_msg = data.get_string("sub_msg");
            return Err(GatewayError::ChannelError(format!(
                "alipay query failed: {}",
                if sub_msg.is_empty() { code } else { sub_msg }
            )));
        }

        Ok(data)
    }
}
