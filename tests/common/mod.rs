#![allow(dead_code)]

pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    /// Parsed HTTP/1.1 response
    #[derive(Debug)]
    pub struct TestResponse {
        pub status: u16,
        /// Lowercase header names
        pub headers: Vec<(String, String)>,
        pub body: Vec<u8>,
    }

    impl TestResponse {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k == &name.to_ascii_lowercase())
                .map(|(_, v)| v.as_str())
        }

        pub fn text(&self) -> String {
            String::from_utf8_lossy(&self.body).into_owned()
        }

        pub fn json(&self) -> serde_json::Value {
            serde_json::from_slice(&self.body)
                .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", self.text()))
        }
    }

    /// Send one `GET` over a fresh connection and read the full response
    pub fn get(addr: SocketAddr, path_and_query: &str) -> TestResponse {
        send_request(
            addr,
            &format!("GET {path_and_query} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"),
        )
    }

    pub fn send_request(addr: SocketAddr, raw: &str) -> TestResponse {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        stream.write_all(raw.as_bytes()).unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if buf.is_empty() => panic!("read failed: {e}"),
                Err(_) => break,
            };
            buf.extend_from_slice(&chunk[..n]);
            if let Some(resp) = try_parse(&buf) {
                return resp;
            }
        }
        try_parse(&buf).unwrap_or_else(|| panic!("incomplete response: {:?}", String::from_utf8_lossy(&buf)))
    }

    fn try_parse(buf: &[u8]) -> Option<TestResponse> {
        let head_end = buf.windows(4).position(|w| w == b"\r\n\r\n")?;
        let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
        let mut lines = head.split("\r\n");
        let status = lines.next()?.split_whitespace().nth(1)?.parse().ok()?;
        let headers: Vec<(String, String)> = lines
            .filter_map(|l| l.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();
        let length: usize = headers
            .iter()
            .find(|(k, _)| k == "content-length")
            .and_then(|(_, v)| v.parse().ok())?;
        let body_start = head_end + 4;
        if buf.len() < body_start + length {
            return None;
        }
        Some(TestResponse {
            status,
            headers,
            body: buf[body_start..body_start + length].to_vec(),
        })
    }
}

pub mod test_server {
    use faker_api::app::build_service;
    use faker_api::handlers::AppState;
    use faker_api::runtime_config::RuntimeConfig;
    use faker_api::server::{HttpServer, ServerHandle};
    use std::net::{SocketAddr, TcpListener};
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Once};

    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }

    /// The service from `doc/openapi.yaml` on an ephemeral port, stopped on drop
    pub struct TestServer {
        handle: Option<ServerHandle>,
        addr: SocketAddr,
    }

    impl TestServer {
        pub fn start() -> Self {
            Self::start_with(AppState::default())
        }

        pub fn start_with(state: AppState) -> Self {
            Self::start_spec(Path::new("doc/openapi.yaml"), Some(PathBuf::from("doc")), state)
        }

        pub fn start_spec(spec: &Path, doc_dir: Option<PathBuf>, state: AppState) -> Self {
            setup_may_runtime();
            let config = RuntimeConfig::default();
            let service = build_service(spec, doc_dir, &config, Arc::new(state)).unwrap();

            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);
            let handle = HttpServer(service).start(addr).unwrap();
            handle.wait_ready().unwrap();
            Self {
                handle: Some(handle),
                addr,
            }
        }

        pub fn addr(&self) -> SocketAddr {
            self.addr
        }
    }

    impl Drop for TestServer {
        fn drop(&mut self) {
            if let Some(handle) = self.handle.take() {
                handle.stop();
            }
        }
    }
}
