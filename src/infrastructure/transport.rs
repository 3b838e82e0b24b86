//! HTTP 传输 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端，只暴露 GET / POST 能力

use crate::error::{ScanError, ScanResult};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// HTTP 响应
///
/// 响应体按块读取，调用方可以边读边写入文件。
#[async_trait]
pub trait HttpResponse: Send {
    /// 状态码
    fn status(&self) -> u16;

    /// 读取响应头（大小写不敏感）
    fn header(&self, name: &str) -> Option<String>;

    /// 读取下一块响应体，读完返回 `None`
    async fn chunk(&mut self) -> ScanResult<Option<Vec<u8>>>;
}

/// HTTP 传输能力
///
/// 职责：
/// - 发送请求并返回状态码、响应头和响应体
/// - 不认识 eSCL 协议
/// - 不做重试
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET，超时覆盖整个请求（包括读取响应体）
    async fn get(&self, url: &str) -> ScanResult<Box<dyn HttpResponse>>;

    /// GET 大文件，超时只覆盖收到响应头之前，响应体可以慢慢读取
    async fn get_stream(&self, url: &str) -> ScanResult<Box<dyn HttpResponse>> {
        self.get(url).await
    }

    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> ScanResult<Box<dyn HttpResponse>>;
}

/// 读取完整响应体为文本
pub async fn read_text(response: &mut dyn HttpResponse) -> ScanResult<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        buf.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// 基于 reqwest 的传输实现
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// 创建新的传输
    ///
    /// `timeout` 作用于连接和普通请求；`get_stream` 只在等待响应头时使用它。
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    fn wrap(url: &str, response: reqwest::Response) -> Box<dyn HttpResponse> {
        Box::new(ReqwestResponse {
            url: url.to_string(),
            inner: response,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> ScanResult<Box<dyn HttpResponse>> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ScanError::unreachable(url, e))?;
        debug!("GET {} -> {}", url, response.status());
        Ok(Self::wrap(url, response))
    }

    async fn get_stream(&self, url: &str) -> ScanResult<Box<dyn HttpResponse>> {
        debug!("GET {} (流式)", url);
        let response = timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|e| ScanError::unreachable(url, e))?
            .map_err(|e| ScanError::unreachable(url, e))?;
        debug!("GET {} -> {}", url, response.status());
        Ok(Self::wrap(url, response))
    }

    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> ScanResult<Box<dyn HttpResponse>> {
        debug!("POST {} ({} 字节)", url, body.len());
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ScanError::unreachable(url, e))?;
        debug!("POST {} -> {}", url, response.status());
        Ok(Self::wrap(url, response))
    }
}

struct ReqwestResponse {
    url: String,
    inner: reqwest::Response,
}

#[async_trait]
impl HttpResponse for ReqwestResponse {
    fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.inner
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    }

    async fn chunk(&mut self) -> ScanResult<Option<Vec<u8>>> {
        let chunk = self
            .inner
            .chunk()
            .await
            .map_err(|e| ScanError::unreachable(&self.url, e))?;
        Ok(chunk.map(|bytes| bytes.to_vec()))
    }
}
