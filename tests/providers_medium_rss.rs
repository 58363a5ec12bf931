use medium_sync::ingest::types::FeedSource;
use medium_sync::ingest::MediumRssFeed;

const MEDIUM_XML: &str = include_str!("fixtures/medium_rss.xml");

#[tokio::test]
async fn medium_fixture_parses_and_yields_entries() {
    let provider = MediumRssFeed::from_fixture(MEDIUM_XML);

    let items = provider.fetch_entries().await.expect("medium parse ok");
    assert_eq!(items.len(), 3, "three <item>s in the fixture");
    assert!(
        items.iter().all(|e| !e.title.is_empty() && e.link.is_some()),
        "every item should carry a title and a link"
    );

    let first = &items[0];
    // The fixture splits these two with a <dc:creator>.
    assert_eq!(first.categories, vec!["gap-year", "Life"]);
    assert_eq!(first.guid.as_deref(), Some("https://medium.com/p/aaa111"));
    assert!(first
        .content_encoded
        .as_deref()
        .is_some_and(|c| c.contains("<figure>")));
    assert!(first.description.is_none());
    assert!(items[1]
        .content_encoded
        .as_deref()
        .is_some_and(|c| c.starts_with("<p>Technical notes")));

    let last = &items[2];
    assert!(last.guid.is_none());
    assert!(last.content_encoded.is_none());
    assert_eq!(last.description.as_deref(), Some("<p>Summer notes.</p>"));
}

#[tokio::test]
async fn truncated_feed_is_an_error() {
    let cut = &MEDIUM_XML[..MEDIUM_XML.find("</item>").unwrap()];
    let provider = MediumRssFeed::from_fixture(cut);
    assert!(provider.fetch_entries().await.is_err());
}
