//! Headline collection for the summarizer.

use crate::config::HarvestConfig;
use crate::error::FetchError;
use crate::parsers::headlines::{Headline, parse_headlines};
use reqwest::StatusCode;
use std::collections::HashSet;
use std::time::Duration;

/// Headlines in first-seen order, deduplicated on the exact `(time, text)` pair
#[derive(Debug, Default)]
pub struct HeadlineSet {
    seen: HashSet<Headline>,
    ordered: Vec<Headline>,
}

impl HeadlineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a headline unless an identical one is already present
    pub fn insert(&mut self, headline: Headline) -> bool {
        if self.seen.contains(&headline) {
            return false;
        }
        self.seen.insert(headline.clone());
        self.ordered.push(headline);
        true
    }

    pub fn extend<I: IntoIterator<Item = Headline>>(&mut self, headlines: I) -> usize {
        headlines
            .into_iter()
            .map(|h| self.insert(h))
            .filter(|&added| added)
            .count()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn as_slice(&self) -> &[Headline] {
        &self.ordered
    }

    pub fn into_vec(self) -> Vec<Headline> {
        self.ordered
    }
}

/// Joins headlines into the summarizer prompt, one `"{time} {headline}"` per line
pub fn build_prompt(headlines: &[Headline]) -> String {
    headlines
        .iter()
        .map(|h| format!("{} {}", h.time, h.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fetches news pages over plain HTTP
pub struct HeadlineFetcher {
    client: reqwest::Client,
}

impl HeadlineFetcher {
    pub fn new(config: &HarvestConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Fetches one page and parses its headlines
    pub async fn fetch(&self, url: &str) -> Result<Vec<Headline>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        ::log::info!("Fetched page content from {}", url);

        let table = parse_headlines(&body).map_err(|e| FetchError::Structure {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        ::log::info!(
            "Parsed {} headlines from {} rows at {}",
            table.headlines.len(),
            table.rows_seen,
            url
        );
        Ok(table.headlines)
    }

    /// Fetches every URL in order; a failing URL is reported and skipped
    pub async fn collect(&self, urls: &[String]) -> HeadlineSet {
        let mut set = HeadlineSet::new();
        for url in urls {
            match self.fetch(url).await {
                Ok(headlines) => {
                    let added = set.extend(headlines);
                    ::log::debug!("{} new headlines from {}", added, url);
                }
                Err(e) => report_fetch_error(&e),
            }
        }
        set
    }
}

fn report_fetch_error(error: &FetchError) {
    ::log::error!("{}", error);
    if let FetchError::Status { status, .. } = error {
        if let Some(hint) = status_hint(*status) {
            ::log::error!("{}", hint);
        }
    }
}

/// Operator hint for status codes news sites commonly return to scrapers
pub fn status_hint(status: StatusCode) -> Option<&'static str> {
    match status {
        StatusCode::FORBIDDEN => Some(
            "Access Forbidden (403). The site may be blocking requests due to the User-Agent or IP.",
        ),
        StatusCode::SERVICE_UNAVAILABLE => {
            Some("Service Unavailable (503). The site may be down or overloaded.")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn news_page(rows: &[(&str, &str)]) -> String {
        let rows: String = rows
            .iter()
            .map(|(time, text)| {
                format!(
                    r#"<tr class="news_table-row"><td class="news_date-cell">{time}</td><td><a class="nn-tab-link" href="/n">{text}</a></td></tr>"#
                )
            })
            .collect();
        format!(
            r#"<html><body><table class="news_time-table"><tr><td><table class="styled-table-new">{rows}</table></td></tr></table></body></html>"#
        )
    }

    /// Serves `pages` by path on a local port; other paths answer 404
    async fn serve_pages(pages: Vec<(&'static str, String)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/");
                let (status, body) = match pages.iter().find(|(p, _)| *p == path) {
                    Some((_, body)) => ("200 OK", body.clone()),
                    None => ("404 Not Found", String::new()),
                };
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_collect_dedups_across_pages() {
        let base = serve_pages(vec![
            (
                "/first",
                news_page(&[("09:15AM", "Stocks rally"), ("09:02AM", "Oil slips")]),
            ),
            (
                "/second",
                news_page(&[
                    ("09:30AM", "Gold steady"),
                    ("09:15AM", "Stocks rally"),
                    ("09:02AM", "Oil slips again"),
                ]),
            ),
        ])
        .await;
        let fetcher = HeadlineFetcher::new(&HarvestConfig {
            http_timeout_secs: 5,
            ..HarvestConfig::default()
        })
        .unwrap();

        let set = fetcher
            .collect(&[
                format!("{base}/first"),
                format!("{base}/gone"),
                format!("{base}/second"),
            ])
            .await;

        let pairs: Vec<_> = set
            .as_slice()
            .iter()
            .map(|h| (h.time.as_str(), h.text.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("09:15AM", "Stocks rally"),
                ("09:02AM", "Oil slips"),
                ("09:30AM", "Gold steady"),
                ("09:02AM", "Oil slips again"),
            ]
        );
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let first_page = vec![
            Headline::new("09:15AM", "Stocks rally"),
            Headline::new("09:02AM", "Oil slips"),
        ];
        let second_page = vec![
            Headline::new("09:30AM", "Gold steady"),
            Headline::new("09:15AM", "Stocks rally"),
            Headline::new("09:02AM", "Oil slips again"),
        ];

        let mut set = HeadlineSet::new();
        assert_eq!(set.extend(first_page), 2);
        assert_eq!(set.extend(second_page), 2);

        let texts: Vec<_> = set.as_slice().iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Stocks rally", "Oil slips", "Gold steady", "Oil slips again"]);
    }

    #[test]
    fn test_dedup_uses_full_tuple_without_normalization() {
        let mut set = HeadlineSet::new();
        assert!(set.insert(Headline::new("10:00AM", "Fed holds")));
        assert!(set.insert(Headline::new("10:01AM", "Fed holds")));
        assert!(set.insert(Headline::new("10:00AM", "fed holds")));
        assert!(!set.insert(Headline::new("10:00AM", "Fed holds")));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_build_prompt() {
        let prompt = build_prompt(&[
            Headline::new("09:15AM", "Stocks rally"),
            Headline::new("09:02AM", "Oil slips"),
        ]);
        assert_eq!(prompt, "09:15AM Stocks rally\n09:02AM Oil slips");
        assert_eq!(build_prompt(&[]), "");
    }

    #[test]
    fn test_status_hints() {
        assert!(status_hint(StatusCode::FORBIDDEN).unwrap().contains("403"));
        assert!(status_hint(StatusCode::SERVICE_UNAVAILABLE).unwrap().contains("503"));
        assert!(status_hint(StatusCode::NOT_FOUND).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_url_is_skipped() {
        let fetcher = HeadlineFetcher::new(&HarvestConfig {
            http_timeout_secs: 2,
            ..HarvestConfig::default()
        })
        .unwrap();

        let set = fetcher
            .collect(&["http://127.0.0.1:9/news.ashx".to_string()])
            .await;

        assert!(set.is_empty());
    }
}
