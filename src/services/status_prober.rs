//! 状态查询服务 - 业务能力层
//!
//! 只负责"查询扫描仪状态"能力，结果仅供参考，不做缓存

use crate::error::{ScanError, ScanResult};
use crate::infrastructure::{read_text, Transport};
use crate::models::DeviceStatus;
use tracing::debug;

/// 查询扫描仪状态
///
/// # 参数
/// - `transport`: HTTP 传输
/// - `base_url`: 扫描仪根地址
///
/// # 返回
/// 非 200 响应或无法解析的文档均返回 `BadResponse`
pub async fn probe(transport: &dyn Transport, base_url: &str) -> ScanResult<DeviceStatus> {
    let url = DeviceStatus::url(base_url);

    let mut response = transport.get(&url).await?;
    let status = response.status();
    if status != 200 {
        return Err(ScanError::bad_response(
            &url,
            format!("状态接口返回非 200 状态码: {}", status),
        ));
    }

    let body = read_text(response.as_mut()).await?;
    let device_status = DeviceStatus::parse(&body).map_err(|reason| {
        debug!("无法解析的状态文档: {}", crate::utils::logging::truncate_text(&body, 200));
        ScanError::bad_response(&url, reason)
    })?;

    debug!("扫描仪状态: {}", device_status);
    Ok(device_status)
}
