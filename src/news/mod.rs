// src/news/mod.rs
//! Spaceflight news: decoding, tagging and the merged chronological feed.

pub mod pipeline;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::Result;
use crate::fetch::{decode, JsonFetcher};

pub use pipeline::{NewsPipeline, NewsStage, PipelineOutcome, StageFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewsKind {
    Article,
    Report,
    Blog,
}

impl NewsKind {
    pub const ALL: [NewsKind; 3] = [NewsKind::Article, NewsKind::Report, NewsKind::Blog];

    pub fn as_str(self) -> &'static str {
        match self {
            NewsKind::Article => "Article",
            NewsKind::Report => "Report",
            NewsKind::Blog => "Blog",
        }
    }
}

/// One item as the news API returns it (untagged).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    #[serde(alias = "published_at")]
    pub published_date: String,
    #[serde(default, alias = "image_url")]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub news_site: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Either a bare list or a paginated `{ "results": [...] }` page.
#[derive(Deserialize)]
#[serde(untagged)]
enum NewsList {
    Bare(Vec<NewsItem>),
    Page { results: Vec<NewsItem> },
}

pub async fn fetch_list(fetcher: &dyn JsonFetcher, kind: NewsKind, url: &str) -> Result<Vec<NewsItem>> {
    let value = fetcher.fetch_json(url).await?;
    let list: NewsList = decode(kind.as_str(), value)?;
    Ok(match list {
        NewsList::Bare(v) => v,
        NewsList::Page { results } => results,
    })
}

/// A tagged, display-ready feed entry. Built fresh from a `NewsItem`;
/// the fetched lists are never mutated.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewsEvent {
    #[serde(rename = "type")]
    pub kind: NewsKind,
    pub title: String,
    pub url: String,
    pub published_date: String,
    #[serde(skip)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl NewsEvent {
    pub fn tagged(kind: NewsKind, item: &NewsItem) -> Self {
        Self {
            kind,
            title: normalize_title(&item.title),
            url: item.url.clone(),
            published_date: item.published_date.clone(),
            published_at: parse_published(&item.published_date),
            image_url: match kind {
                NewsKind::Article => item.featured_image.clone(),
                _ => None,
            },
            news_site: item.news_site.clone(),
            summary: item
                .summary
                .as_deref()
                .map(normalize_title)
                .filter(|s| !s.is_empty()),
        }
    }
}

pub fn parse_published(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Older feeds omit the offset: "2021-05-04T12:00:00.000"
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|n| n.and_utc())
}

/// Newest first; undated items after all dated ones. Stable on ties.
fn by_published_desc(a: &NewsEvent, b: &NewsEvent) -> Ordering {
    match (a.published_at, b.published_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Tag A as Article, B as Report, C as Blog, concatenate A·B·C and sort
/// newest first. Empty inputs contribute nothing.
pub fn merge_feed(articles: &[NewsItem], reports: &[NewsItem], blogs: &[NewsItem]) -> Vec<NewsEvent> {
    let mut events = Vec::with_capacity(articles.len() + reports.len() + blogs.len());
    for (kind, list) in [
        (NewsKind::Article, articles),
        (NewsKind::Report, reports),
        (NewsKind::Blog, blogs),
    ] {
        events.extend(list.iter().map(|it| NewsEvent::tagged(kind, it)));
    }
    events.sort_by(by_published_desc);
    events
}

/// Stored lists of the updates screen; filled stage by stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsBoard {
    pub articles: Vec<NewsItem>,
    pub reports: Vec<NewsItem>,
    pub blogs: Vec<NewsItem>,
}

impl NewsBoard {
    pub fn store(&mut self, kind: NewsKind, items: Vec<NewsItem>) {
        match kind {
            NewsKind::Article => self.articles = items,
            NewsKind::Report => self.reports = items,
            NewsKind::Blog => self.blogs = items,
        }
    }

    pub fn feed(&self) -> Vec<NewsEvent> {
        merge_feed(&self.articles, &self.reports, &self.blogs)
    }
}

impl Serialize for NewsBoard {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct View<'a> {
            articles: usize,
            reports: usize,
            blogs: usize,
            feed: &'a [NewsEvent],
        }
        let feed = self.feed();
        View {
            articles: self.articles.len(),
            reports: self.reports.len(),
            blogs: self.blogs.len(),
            feed: &feed,
        }
        .serialize(s)
    }
}

/// Decode HTML entities, strip tags, collapse whitespace.
pub fn normalize_title(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").expect("static regex"));
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("static regex"));
    let collapsed = re_ws.replace_all(&out, " ").into_owned();
    out = collapsed.trim().to_string();

    if out.chars().count() > 500 {
        out = out.chars().take(500).collect();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, date: &str) -> NewsItem {
        NewsItem {
            title: title.into(),
            url: format!("https://example.org/{}", title.replace(' ', "-")),
            published_date: date.into(),
            featured_image: Some("https://example.org/img.jpg".into()),
            news_site: None,
            summary: None,
        }
    }

    #[test]
    fn summary_is_carried_into_the_feed() {
        let mut it = item("s", "2024-01-01T00:00:00Z");
        it.summary = Some("  Crew &amp; cargo\n docked ".into());
        let feed = merge_feed(&[], &[it], &[]);
        assert_eq!(feed[0].summary.as_deref(), Some("Crew & cargo docked"));
        let v = serde_json::to_value(&feed[0]).unwrap();
        assert_eq!(v["summary"], "Crew & cargo docked");

        let bare = merge_feed(&[item("t", "2024-01-01T00:00:00Z")], &[], &[]);
        assert!(serde_json::to_value(&bare[0]).unwrap().get("summary").is_none());
    }

    #[test]
    fn tags_by_source_list_and_sorts_newest_first() {
        let a = vec![item("a1", "2024-03-01T10:00:00Z"), item("a2", "2024-01-01T10:00:00Z")];
        let r = vec![item("r1", "2024-02-01T10:00:00Z")];
        let b = vec![item("b1", "2024-04-01T10:00:00+02:00")];
        let feed = merge_feed(&a, &r, &b);

        assert_eq!(feed.len(), 4);
        let titles: Vec<&str> = feed.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["b1", "a1", "r1", "a2"]);
        assert_eq!(feed[0].kind, NewsKind::Blog);
        assert_eq!(feed[2].kind, NewsKind::Report);
        // only articles carry an image
        assert!(feed[0].image_url.is_none());
        assert!(feed[1].image_url.is_some());
    }

    #[test]
    fn equal_dates_keep_article_report_blog_order() {
        let d = "2024-05-05T05:05:05Z";
        let feed = merge_feed(&[item("a", d)], &[item("r", d)], &[item("b", d)]);
        let kinds: Vec<NewsKind> = feed.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, NewsKind::ALL.to_vec());
    }

    #[test]
    fn empty_lists_give_empty_feed() {
        assert!(merge_feed(&[], &[], &[]).is_empty());
    }

    #[test]
    fn undated_items_sink_to_the_end() {
        let feed = merge_feed(
            &[item("bad", "yesterday"), item("good", "2020-01-01T00:00:00Z")],
            &[],
            &[],
        );
        assert_eq!(feed[0].title, "good");
        assert_eq!(feed[1].title, "bad");
        assert!(feed[1].published_at.is_none());
    }

    #[test]
    fn merging_does_not_touch_inputs() {
        let a = vec![item("x", "2024-01-01T00:00:00Z")];
        let before = a.clone();
        let _ = merge_feed(&a, &[], &[]);
        assert_eq!(a, before);
    }

    #[test]
    fn title_entities_and_whitespace() {
        assert_eq!(
            normalize_title("  NASA&#8217;s   <b>Artemis</b>\n launch &amp; more "),
            "NASA\u{2019}s Artemis launch & more"
        );
    }

    #[test]
    fn offsetless_dates_parse_as_utc() {
        let dt = parse_published("2021-05-04T12:00:00.000").unwrap();
        assert_eq!(dt.to_rfc3339(), "2021-05-04T12:00:00+00:00");
    }

    #[test]
    fn board_serializes_feed_with_type_tags() {
        let mut board = NewsBoard::default();
        board.store(NewsKind::Report, vec![item("r", "2024-01-01T00:00:00Z")]);
        let v = serde_json::to_value(&board).unwrap();
        assert_eq!(v["reports"], 1);
        assert_eq!(v["articles"], 0);
        assert_eq!(v["feed"][0]["type"], "Report");
    }
}
