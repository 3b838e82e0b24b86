//! 测试用的脚本化传输和确认实现

#![allow(dead_code)]

use async_trait::async_trait;
use escl_scan::services::{Confirmer, Decision};
use escl_scan::{HttpResponse, ScanError, ScanResult, ScanTiming, Transport};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const BASE_URL: &str = "http://scanner.test";

/// 请求类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Status,
    Submit,
    Document,
}

/// 预设响应
#[derive(Debug, Clone)]
pub struct Scripted {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    broken_body: bool,
}

impl Scripted {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
            broken_body: false,
        }
    }

    pub fn created(location: &str) -> Self {
        Self::status(201).header("Location", location)
    }

    pub fn document(body: &[u8]) -> Self {
        Self::status(200).body(body)
    }

    pub fn device_state(state: &str) -> Self {
        Self::status(200).body(status_xml(state).as_bytes())
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: &[u8]) -> Self {
        self.body = body.to_vec();
        self
    }

    /// 第一块之后读取响应体失败
    pub fn broken(mut self) -> Self {
        self.broken_body = true;
        self
    }
}

enum Step {
    Respond(Scripted),
    Fail,
}

struct Queue {
    route: Route,
    steps: VecDeque<Step>,
    fallback: Option<Scripted>,
}

/// 按请求类型依次返回预设响应的传输
///
/// 队列耗尽后返回 fallback，没有 fallback 时返回 404。
pub struct ScriptedTransport {
    queues: Mutex<Vec<Queue>>,
    requests: Mutex<Vec<(Route, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        let queues = [Route::Status, Route::Submit, Route::Document]
            .into_iter()
            .map(|route| Queue {
                route,
                steps: VecDeque::new(),
                fallback: None,
            })
            .collect();
        Self {
            queues: Mutex::new(queues),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(self, route: Route, response: Scripted) -> Self {
        self.push(route, Step::Respond(response));
        self
    }

    pub fn respond_n(self, route: Route, response: Scripted, times: usize) -> Self {
        for _ in 0..times {
            self.push(route, Step::Respond(response.clone()));
        }
        self
    }

    /// 下一次请求在传输层失败
    pub fn fail(self, route: Route) -> Self {
        self.push(route, Step::Fail);
        self
    }

    pub fn otherwise(self, route: Route, response: Scripted) -> Self {
        self.queues
            .lock()
            .unwrap()
            .iter_mut()
            .find(|q| q.route == route)
            .unwrap()
            .fallback = Some(response);
        self
    }

    /// 某类请求的次数
    pub fn count(&self, route: Route) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == route)
            .count()
    }

    pub fn urls(&self, route: Route) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == route)
            .map(|(_, url)| url.clone())
            .collect()
    }

    fn push(&self, route: Route, step: Step) {
        self.queues
            .lock()
            .unwrap()
            .iter_mut()
            .find(|q| q.route == route)
            .unwrap()
            .steps
            .push_back(step);
    }

    fn next(&self, route: Route, url: &str) -> ScanResult<Box<dyn HttpResponse>> {
        self.requests.lock().unwrap().push((route, url.to_string()));

        let mut queues = self.queues.lock().unwrap();
        let queue = queues.iter_mut().find(|q| q.route == route).unwrap();
        let step = queue.steps.pop_front().unwrap_or_else(|| {
            Step::Respond(queue.fallback.clone().unwrap_or_else(|| Scripted::status(404)))
        });

        match step {
            Step::Respond(scripted) => Ok(Box::new(ScriptedResponse::new(url, scripted))),
            Step::Fail => Err(ScanError::unreachable(
                url,
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            )),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> ScanResult<Box<dyn HttpResponse>> {
        let route = if url.ends_with("/eSCL/ScannerStatus") {
            Route::Status
        } else if url.ends_with("/NextDocument") {
            Route::Document
        } else {
            panic!("unexpected GET {}", url);
        };
        self.next(route, url)
    }

    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> ScanResult<Box<dyn HttpResponse>> {
        assert!(url.ends_with("/eSCL/ScanJobs"), "unexpected POST {}", url);
        assert_eq!(content_type, "text/xml");
        assert!(body.contains("<scan:ScanSettings"));
        self.next(Route::Submit, url)
    }
}

struct ScriptedResponse {
    url: String,
    status: u16,
    headers: Vec<(String, String)>,
    chunks: VecDeque<Vec<u8>>,
    broken_body: bool,
}

impl ScriptedResponse {
    fn new(url: &str, scripted: Scripted) -> Self {
        // 分块返回，模拟流式响应体
        let chunks = scripted.body.chunks(4).map(|c| c.to_vec()).collect();
        Self {
            url: url.to_string(),
            status: scripted.status,
            headers: scripted.headers,
            chunks,
            broken_body: scripted.broken_body,
        }
    }
}

#[async_trait]
impl HttpResponse for ScriptedResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }

    async fn chunk(&mut self) -> ScanResult<Option<Vec<u8>>> {
        match self.chunks.pop_front() {
            Some(chunk) => Ok(Some(chunk)),
            None if self.broken_body => Err(ScanError::unreachable(
                &self.url,
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset"),
            )),
            None => Ok(None),
        }
    }
}

/// 按脚本回答的确认实现，脚本用完后放弃
pub struct ScriptedConfirmer {
    answers: Mutex<VecDeque<Decision>>,
    calls: AtomicUsize,
}

impl ScriptedConfirmer {
    pub fn new(answers: &[Decision]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self) -> Decision {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Decision::Abort)
    }
}

pub fn status_xml(state: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<scan:ScannerStatus xmlns:scan="http://schemas.hp.com/imaging/escl/2011/05/03" xmlns:pwg="http://www.pwg.org/schemas/2010/12/sm">
  <pwg:Version>2.63</pwg:Version>
  <pwg:State>{}</pwg:State>
  <scan:AdfState>ScannerAdfEmpty</scan:AdfState>
</scan:ScannerStatus>"#,
        state
    )
}

pub fn timing() -> ScanTiming {
    ScanTiming {
        request_timeout: Duration::from_secs(30),
        submit_attempts: 5,
        submit_backoff: Duration::from_secs(2),
        poll_attempts: 30,
        poll_interval: Duration::from_secs(1),
        start_grace: Duration::from_secs(2),
    }
}
