use crate::app_state::AppState;
use crate::error::ApiError;
use axum::body::to_bytes;
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::{info, warn};
use unipay_core::{
    resolve_gateway, Method, NotifyRequest, PaymentChannel, QueryOrder,
};

/// 通知体上限，渠道通知都是小报文
const MAX_NOTIFY_BODY: usize = 64 * 1024;

/// 统一通知入口：所有渠道回调同一个地址，由识别器分流
pub async fn handle_notification(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ApiError> {
    info!("Received payment notification");

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_NOTIFY_BODY)
        .await
        .map_err(|_| ApiError::bad_request("Failed to read notification body".to_string()))?;
    let body_text = String::from_utf8(bytes.to_vec())
        .map_err(|_| ApiError::bad_request("Invalid notification data encoding".to_string()))?;

    let method = if parts.method == axum::http::Method::GET {
        Method::Get
    } else {
        Method::Post
    };
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let query_string = parts.uri.query().unwrap_or_default().to_string();
    // 非表单内容解析失败也没关系，识别器只在表单路径用它
    let form: Vec<(String, String)> = serde_urlencoded::from_str(&body_text).unwrap_or_default();

    let notify = NotifyRequest {
        method,
        content_type,
        query_string,
        body: body_text,
        form,
    };

    let resolved = resolve_gateway(&state.registry, &notify);
    if resolved.channel() == PaymentChannel::Unknown {
        warn!("unrecognized notification source");
        return Err(ApiError::bad_request("Unrecognized notification source".to_string()));
    }

    if !resolved.verify().await? {
        warn!(channel = %resolved.channel(), "notification verification failed");
        return Err(ApiError::bad_request("Notification verification failed".to_string()));
    }

    info!(channel = %resolved.channel(), "notification verified");
    Ok(ack_response(resolved.channel()))
}

// 各渠道要求的应答格式不同
fn ack_response(channel: PaymentChannel) -> Response {
    match channel {
        PaymentChannel::Wechat => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/xml")],
            "<xml><return_code><![CDATA[SUCCESS]]></return_code><return_msg><![CDATA[OK]]></return_msg></xml>",
        )
            .into_response(),
        _ => (StatusCode::OK, "success").into_response(),
    }
}

/// 主动查询订单状态
pub async fn handle_query(
    State(state): State<Arc<AppState>>,
    Path(channel): Path<String>,
    Query(order): Query<QueryOrder>,
) -> Result<Response, ApiError> {
    let channel: PaymentChannel = channel
        .parse()
        .map_err(|e: String| ApiError::bad_request(e))?;
    let gateway = state
        .registry
        .get(channel)
        .ok_or_else(|| ApiError::not_found(format!("渠道 {channel} 未注册")))?;

    info!(%channel, out_trade_no = %order.out_trade_no, "querying order");
    let data = gateway.query(&order).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        data.to_json(),
    )
        .into_response())
}
