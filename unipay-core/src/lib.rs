pub mod data;
pub mod error;
pub mod gateway;
pub mod gateways;
pub mod notify;

// 重新导出关键组件，便于外部调用
pub use data::{GatewayData, GatewayParams, ParamField, Value};
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, GatewayRegistry, NullGateway, PaymentChannel, QueryOrder};
pub use notify::{read_notify_data, resolve_gateway, Method, NotifyRequest, ResolvedNotify};
