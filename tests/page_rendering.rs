//! End-to-end rendering through the real server and a mock upstream.

use std::time::Duration;

use linkpage_edge::config::LinkSource;
use linkpage_edge::links::Link;

mod common;
use common::{MockResponse, LINKS_JSON, SHELL_HTML};

#[tokio::test]
async fn test_page_is_rewritten() {
    let upstream = common::start_mock_upstream(vec![
        ("/shell", MockResponse::html(SHELL_HTML)),
        ("/links.json", MockResponse::json(LINKS_JSON)),
    ])
    .await;
    let (addr, shutdown) = common::start_edge(common::config_for(upstream)).await;

    let res = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "text/html;charset=UTF-8");
    assert!(res.headers().contains_key("x-request-id"));

    let body = res.text().await.unwrap();
    assert!(body.contains("<title>Alexander Whan</title>"), "{}", body);
    assert!(body.contains("<body class=\"bg-indigo-800\">"), "{}", body);
    assert!(body.contains("<div id=\"profile\">"), "{}", body);
    assert!(body.contains("<h1 id=\"name\">alex-whan</h1>"), "{}", body);
    assert!(
        body.contains(
            "<div id=\"links\"><a href='https://blog.test'>Blog</a><a href='https://talks.test'>Talks</a></div>"
        ),
        "{}",
        body
    );
    assert_eq!(body.matches("<svg").count(), 3);
    assert!(!body.contains("display: none"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_links_endpoint_serves_json() {
    let upstream =
        common::start_mock_upstream(vec![("/links.json", MockResponse::json(LINKS_JSON))]).await;
    let (addr, shutdown) = common::start_edge(common::config_for(upstream)).await;

    for path in ["/links", "/nested/path/links"] {
        let res = reqwest::get(format!("http://{}{}", addr, path)).await.unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(res.headers()["content-type"], "application/json");
        let value: serde_json::Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
        assert_eq!(value["links"][0]["name"], "Blog");
        assert_eq!(value["links"][1]["url"], "https://talks.test");
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_shell_streamed_in_pieces() {
    let upstream = common::start_mock_upstream(vec![
        (
            "/shell",
            MockResponse::html("").chunked(
                vec!["<html><body><div id=\"li", "nks\"></div>", "<p>tail</p></body></html>"],
                Duration::from_millis(20),
            ),
        ),
        ("/links.json", MockResponse::json(LINKS_JSON)),
    ])
    .await;
    let (addr, shutdown) = common::start_edge(common::config_for(upstream)).await;

    let body = reqwest::get(format!("http://{}/anything", addr))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(
        body,
        "<html><body class=\"bg-indigo-800\"><div id=\"links\"><a href='https://blog.test'>Blog</a>\
         <a href='https://talks.test'>Talks</a></div><p>tail</p></body></html>"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_static_links_need_no_link_upstream() {
    let upstream =
        common::start_mock_upstream(vec![("/shell", MockResponse::html("<div id=\"links\"></div>"))])
            .await;
    let mut config = common::config_for(upstream);
    config.links = LinkSource::Static {
        links: vec![Link::new("Home", "https://home.test")],
    };
    let (addr, shutdown) = common::start_edge(config).await;

    let body = reqwest::get(format!("http://{}/", addr))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "<div id=\"links\"><a href='https://home.test'>Home</a></div>");

    shutdown.trigger();
}

#[tokio::test]
async fn test_non_html_shell_still_rewritten() {
    let upstream = common::start_mock_upstream(vec![
        ("/shell", MockResponse::ok("text/plain", "<h1 id=\"name\">x</h1>")),
        ("/links.json", MockResponse::json(r#"{"links":[]}"#)),
    ])
    .await;
    let (addr, shutdown) = common::start_edge(common::config_for(upstream)).await;

    let res = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "<h1 id=\"name\">alex-whan</h1>");

    shutdown.trigger();
}
