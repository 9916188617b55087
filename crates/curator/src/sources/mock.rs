//! Mock transport for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::transport::{HttpResponse, Transport};

/// A canned reply for URLs containing a pattern.
#[derive(Debug, Clone)]
struct Route {
    pattern: String,
    reply: Result<HttpResponse, String>,
}

/// Transport that serves canned responses and records every request.
///
/// Routes are matched by substring in registration order; unmatched URLs
/// get a 404.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Vec<Route>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MockTransport {
    /// Create a mock with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply 200 with `body` to URLs containing `pattern`.
    pub fn respond(self, pattern: impl Into<String>, body: impl Into<String>) -> Self {
        self.respond_with(pattern, 200, body)
    }

    /// Reply with an explicit status.
    pub fn respond_with(
        mut self,
        pattern: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        self.routes.push(Route {
            pattern: pattern.into(),
            reply: Ok(HttpResponse {
                status,
                body: body.into(),
            }),
        });
        self
    }

    /// Fail with a network error for URLs containing `pattern`.
    pub fn fail(mut self, pattern: impl Into<String>, cause: impl Into<String>) -> Self {
        self.routes.push(Route {
            pattern: pattern.into(),
            reply: Err(cause.into()),
        });
        self
    }

    /// Total requests served.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests served whose URL contains `pattern`.
    pub fn calls_matching(&self, pattern: &str) -> usize {
        self.requested()
            .iter()
            .filter(|url| url.contains(pattern))
            .count()
    }

    /// Every URL requested so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut urls) = self.requested.lock() {
            urls.push(url.to_string());
        }

        self.routes
            .iter()
            .find(|route| url.contains(&route.pattern))
            .map(|route| route.reply.clone())
            .unwrap_or_else(|| {
                Ok(HttpResponse {
                    status: 404,
                    body: format!("no mock route for {}", url),
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_in_order_and_counts() {
        let mock = MockTransport::new()
            .respond("/indicator/NY.GDP", "gdp")
            .respond("/indicator/", "fallback");

        assert_eq!(mock.get("https://x/indicator/NY.GDP.PCAP").unwrap().body, "gdp");
        assert_eq!(mock.get("https://x/indicator/SP.POP").unwrap().body, "fallback");
        assert_eq!(mock.get("https://x/other").unwrap().status, 404);
        assert_eq!(mock.calls(), 3);
        assert_eq!(mock.calls_matching("/indicator/"), 2);
    }
}
