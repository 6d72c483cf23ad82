//! 通知识别的端到端测试：构造显式请求描述，走完整的读取 + 指纹匹配流程

use async_trait::async_trait;
use std::sync::Arc;
use unipay_core::{
    resolve_gateway, Gateway, GatewayData, GatewayError, GatewayRegistry, Method, NotifyRequest,
    PaymentChannel, QueryOrder,
};

struct StubGateway {
    channel: PaymentChannel,
    params: &'static [&'static str],
}

#[async_trait]
impl Gateway for StubGateway {
    fn channel(&self) -> PaymentChannel {
        self.channel
    }

    fn notify_verify_params(&self) -> &[&'static str] {
        self.params
    }

    async fn verify_notify(&self, _data: &GatewayData) -> unipay_core::Result<bool> {
        Ok(true)
    }

    async fn query(&self, _order: &QueryOrder) -> unipay_core::Result<GatewayData> {
        Ok(GatewayData::new())
    }
}

fn form_request(form: &[(&str, &str)]) -> NotifyRequest {
    NotifyRequest {
        method: Method::Post,
        content_type: Some("application/x-www-form-urlencoded".to_string()),
        query_string: String::new(),
        body: String::new(),
        form: form
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

#[tokio::test]
async fn first_registered_match_wins() {
    // 两个网关的参数集合有包含关系，负载同时满足两者
    let mut registry = GatewayRegistry::new();
    registry.register(Arc::new(StubGateway {
        channel: PaymentChannel::Alipay,
        params: &["notify_id", "sign"],
    }));
    registry.register(Arc::new(StubGateway {
        channel: PaymentChannel::Wechat,
        params: &["notify_id", "sign", "mch_id"],
    }));

    let request = form_request(&[
        ("notify_id", "n-1"),
        ("sign", "s"),
        ("mch_id", "m"),
        ("extra", "ignored"),
    ]);
    let resolved = resolve_gateway(&registry, &request);

    // 先注册者胜出，即使后者匹配得更具体
    assert_eq!(resolved.channel(), PaymentChannel::Alipay);
    assert!(resolved.verify().await.unwrap());
}

#[tokio::test]
async fn no_match_falls_back_to_null_gateway() {
    let mut registry = GatewayRegistry::new();
    registry.register(Arc::new(StubGateway {
        channel: PaymentChannel::Alipay,
        params: &["notify_id", "sign"],
    }));

    let request = form_request(&[("unrelated", "1")]);
    let resolved = resolve_gateway(&registry, &request);

    assert_eq!(resolved.channel(), PaymentChannel::Unknown);
    // 数据仍然保留，便于记录与排障
    assert_eq!(resolved.data().get_string("unrelated"), "1");
    assert!(matches!(
        resolved.verify().await,
        Err(GatewayError::UnsupportedGateway)
    ));
}

#[tokio::test]
async fn get_request_reads_query_string() {
    let mut registry = GatewayRegistry::new();
    registry.register(Arc::new(StubGateway {
        channel: PaymentChannel::Alipay,
        params: &["out_trade_no", "sign"],
    }));

    let request = NotifyRequest {
        method: Method::Get,
        content_type: None,
        query_string: "?out_trade_no=123&sign=abc&subject=%E5%95%86%E5%93%81".to_string(),
        body: String::new(),
        form: Vec::new(),
    };
    let resolved = resolve_gateway(&registry, &request);

    assert_eq!(resolved.channel(), PaymentChannel::Alipay);
    assert_eq!(resolved.data().get_string("subject"), "商品");
}

#[tokio::test]
async fn xml_content_type_reads_body() {
    let mut registry = GatewayRegistry::new();
    registry.register(Arc::new(StubGateway {
        channel: PaymentChannel::Wechat,
        params: &["out_trade_no"],
    }));

    let request = NotifyRequest {
        method: Method::Post,
        content_type: Some("application/xml".to_string()),
        query_string: String::new(),
        body: "<xml><out_trade_no>123</out_trade_no><result><![CDATA[ok]]></result></xml>"
            .to_string(),
        form: Vec::new(),
    };
    let resolved = resolve_gateway(&registry, &request);

    assert_eq!(resolved.channel(), PaymentChannel::Wechat);
    assert_eq!(resolved.data().get_string("result"), "ok");
}

#[tokio::test]
async fn xml_with_charset_is_treated_as_form() {
    // Content-Type 做精确比较，带 charset 参数的不算 XML
    let mut registry = GatewayRegistry::new();
    registry.register(Arc::new(StubGateway {
        channel: PaymentChannel::Wechat,
        params: &["out_trade_no"],
    }));

    let request = NotifyRequest {
        method: Method::Post,
        content_type: Some("text/xml; charset=utf-8".to_string()),
        query_string: String::new(),
        body: "<xml><out_trade_no>123</out_trade_no></xml>".to_string(),
        form: Vec::new(),
    };
    let resolved = resolve_gateway(&registry, &request);

    // 表单为空，读不出任何参数，匹配不上
    assert_eq!(resolved.channel(), PaymentChannel::Unknown);
    assert!(resolved.data().is_empty());
}

#[tokio::test]
async fn empty_param_set_matches_anything() {
    // 空指纹对任何负载都是真命题，注册这种网关会拦截一切通知
    let mut registry = GatewayRegistry::new();
    registry.register(Arc::new(StubGateway {
        channel: PaymentChannel::Wechat,
        params: &[],
    }));

    let resolved = resolve_gateway(&registry, &form_request(&[]));
    assert_eq!(resolved.channel(), PaymentChannel::Wechat);
}
