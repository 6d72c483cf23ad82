use super::NotifySignVerifier;
use crate::data::GatewayData;
use crate::error::{GatewayError, Result};
use crate::gateway::{Gateway, PaymentChannel, QueryOrder};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 微信通知的结构指纹
const NOTIFY_VERIFY_PARAMS: &[&str] = &["return_code", "appid", "mch_id", "nonce_str", "sign"];

#[derive(Debug, Clone)]
pub struct WechatConfig {
    pub app_id: String,
    pub mch_id: String,
    pub api_url: String,
}

impl Default for WechatConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            mch_id: String::new(),
            api_url: "https://api.mch.weixin.qq.com".to_string(),
        }
    }
}

pub struct WechatGateway {
    config: WechatConfig,
    client: Client,
    verifier: Arc<dyn NotifySignVerifier>,
}

impl WechatGateway {
    pub fn new(config: WechatConfig, verifier: Arc<dyn NotifySignVerifier>) -> Result<Self> {
        if config.app_id.is_empty() || config.mch_id.is_empty() {
            return Err(GatewayError::Configuration(
                "微信网关缺少 app_id 或 mch_id".to_string(),
            ));
        }
        Ok(Self {
            config,
            client: Client::new(),
            verifier,
        })
    }
}

#[async_trait]
impl Gateway for WechatGateway {
    fn channel(&self) -> PaymentChannel {
        PaymentChannel::Wechat
    }

    fn notify_verify_params(&self) -> &[&'static str] {
        NOTIFY_VERIFY_PARAMS
    }

    async fn verify_notify(&self, data: &GatewayData) -> Result<bool> {
        info!("verifying wechat notification");

        let appid = data.get_string("appid");
        if !appid.is_empty() && appid != self.config.app_id {
            return Err(GatewayError::ChannelError("appid mismatch".to_string()));
        }
        let mch_id = data.get_string("mch_id");
        if !mch_id.is_empty() && mch_id != self.config.mch_id {
            return Err(GatewayError::ChannelError("mch_id mismatch".to_string()));
        }

        let sign = data.get_string("sign");
        if sign.is_empty() {
            return Err(GatewayError::SignatureInvalid("missing sign".to_string()));
        }

        if data.get_string("return_code") != "SUCCESS" || data.get_string("result_code") != "SUCCESS" {
            return Ok(false);
        }

        self.verifier.verify(data, &sign)
    }

    async fn query(&self, order: &QueryOrder) -> Result<GatewayData> {
        info!("querying wechat order: {}", order.out_trade_no);

        let mut params = GatewayData::new();
        params.add("appid", self.config.app_id.as_str())?;
        params.add("mch_id", self.config.mch_id.as_str())?;
        params.add("nonce_str", Uuid::new_v4().simple().to_string())?;
        params.add("out_trade_no", order.out_trade_no.as_str())?;
        if let Some(trade_no) = &order.trade_no {
            params.add("transaction_id", trade_no.as_str())?;
        }
        // TODO: 接入签名器后在这里补 sign 字段，当前请求未签名

        let url = format!("{}/pay/orderquery", self.config.api_url);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "text/xml")
            .body(params.to_xml())
            .send()
            .await?;
        let response_text = response.text().await?;

        let mut data = GatewayData::new();
        data.from_xml(&response_text);
        if let Some(raw) = data.default_result() {
            return Err(GatewayError::ResponseParse(format!(
                "invalid wechat response: {raw}"
            )));
        }

        if data.get_string("return_code") != "SUCCESS" {
            return Err(GatewayError::ChannelError(format!(
                "wechat query failed: {}",
                data.get_string("return_msg")
            )));
        }
        if data.get_string("result_code") != "SUCCESS" {
            return Err(GatewayError::ChannelError(format!(
                "wechat query failed: {}",
                data.get_string("err_code_des")
            )));
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateways::AcceptAllVerifier;
    use httpmock::prelude::*;

    fn test_gateway(api_url: String) -> WechatGateway {
        WechatGateway::new(
            WechatConfig {
                app_id: "wx0000000000000001".to_string(),
                mch_id: "1900000001".to_string(),
                api_url,
            },
            Arc::new(AcceptAllVerifier),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_missing_merchant_config() {
        let result = WechatGateway::new(WechatConfig::default(), Arc::new(AcceptAllVerifier));
        assert!(matches!(result, Err(GatewayError::Configuration(_))));
    }

    fn notify_data() -> GatewayData {
        let mut data = GatewayData::new();
        data.add("appid", "wx0000000000000001").unwrap();
        data.add("mch_id", "1900000001").unwrap();
        data.add("return_code", "SUCCESS").unwrap();
        data.add("result_code", "SUCCESS").unwrap();
        data.add("sign", "fake-sign").unwrap();
        data
    }

    #[tokio::test]
    async fn test_verify_notify_success() {
        let gateway = test_gateway(String::new());
        assert!(gateway.verify_notify(&notify_data()).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_notify_fail_result_code() {
        let gateway = test_gateway(String::new());
        let mut data = notify_data();
        data.add("result_code", "FAIL").unwrap();
        assert!(!gateway.verify_notify(&data).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_notify_mch_id_mismatch() {
        let gateway = test_gateway(String::new());
        let mut data = notify_data();
        data.add("mch_id", "1900009999").unwrap();

        assert!(matches!(
            gateway.verify_notify(&data).await,
            Err(GatewayError::ChannelError(_))
        ));
    }

    #[tokio::test]
    async fn test_query_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/pay/orderquery");
            then.status(200).header("Content-Type", "text/xml").body(
                "<xml><return_code><![CDATA[SUCCESS]]></return_code>\
                 <result_code><![CDATA[SUCCESS]]></result_code>\
                 <trade_state><![CDATA[SUCCESS]]></trade_state>\
                 <out_trade_no><![CDATA[123]]></out_trade_no>\
                 <transaction_id><![CDATA[4200001234]]></transaction_id></xml>",
            );
        });

        let gateway = test_gateway(server.base_url());
        let data = gateway
            .query(&QueryOrder {
                out_trade_no: "123".to_string(),
                trade_no: None,
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(data.get_string("trade_state"), "SUCCESS");
        assert_eq!(data.get_string("transaction_id"), "4200001234");
    }

    #[tokio::test]
    async fn test_query_return_code_fail() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/pay/orderquery");
            then.status(200).header("Content-Type", "text/xml").body(
                "<xml><return_code><![CDATA[FAIL]]></return_code>\
                 <return_msg><![CDATA[appid不存在]]></return_msg></xml>",
            );
        });

        let gateway = test_gateway(server.base_url());
        let result = gateway
            .query(&QueryOrder {
                out_trade_no: "123".to_string(),
                trade_no: None,
            })
            .await;

        assert!(matches!(result, Err(GatewayError::ChannelError(_))));
    }

    #[tokio::test]
    async fn test_query_invalid_xml_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/pay/orderquery");
            then.status(200).body("502 Bad Gateway");
        });

        let gateway = test_gateway(server.base_url());
        let result = gateway
            .query(&QueryOrder {
                out_trade_no: "123".to_string(),
                trade_no: None,
            })
            .await;

        assert!(matches!(result, Err(GatewayError::ResponseParse(_))));
    }
}
