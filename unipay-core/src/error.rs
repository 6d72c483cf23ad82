use thiserror::Error;

/// 网关层统一错误类型
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("无效参数: {0}")]
    InvalidParameter(String),

    /// 通知无法匹配任何已注册网关时，后续操作统一返回该错误
    #[error("未识别的支付网关，无法执行该操作")]
    UnsupportedGateway,

    #[error("签名校验失败: {0}")]
    SignatureInvalid(String),

    #[error("渠道返回错误: {0}")]
    ChannelError(String),

    #[error("响应解析失败: {0}")]
    ResponseParse(String),

    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),

    #[error("配置错误: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GatewayError::InvalidParameter("参数名不能为空".to_string());
        assert_eq!(err.to_string(), "无效参数: 参数名不能为空");

        let err = GatewayError::UnsupportedGateway;
        assert!(err.to_string().contains("未识别的支付网关"));
    }
}
