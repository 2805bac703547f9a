//! Integration tests for the site extractors.
//!
//! Each extractor runs against a wiremock server serving minimal copies of
//! the site's page layout.

use bible_extractor_core::extractor::{
    BibleHubExtractor, DrboExtractor, EbibleExtractor, ExtractContext, ExtractError, Extractor,
    JesusIsLordExtractor, build_default_extractor_registry,
};
use bible_extractor_core::{Location, Testament, category};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

async fn serve(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

#[test]
fn test_default_registry_lookup_by_index_name_and_url() {
    let registry = build_default_extractor_registry();
    assert_eq!(registry.len(), 4);

    assert_eq!(registry.lookup("0").unwrap().name(), "drbo");
    assert_eq!(registry.lookup("EBIBLE").unwrap().name(), "ebible");
    assert_eq!(
        registry.lookup("http://biblehub.com/kj2000").unwrap().name(),
        "biblehub"
    );
    assert_eq!(
        registry
            .lookup("http://www.jesus-is-lord.com/thebible.htm")
            .unwrap()
            .bible_name(),
        "King James Version"
    );

    let err = registry.lookup("4").err().unwrap();
    assert!(matches!(err, ExtractError::UnknownSource { .. }));
}

#[tokio::test]
async fn test_drbo_extracts_books_chapters_and_warnings() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    serve(
        &server,
        "/",
        r#"<html><body><table><tr>
            <td class="OT1"><a class="b" href="chapter/01001.htm">Genesis</a></td>
            <td class="NT"><a class="b" href="chapter/72001.htm">Jude</a></td>
        </tr></table></body></html>"#,
    )
    .await;
    serve(
        &server,
        "/chapter/01001.htm",
        r##"<table class="chapnumtable"><tr><td><a href="01002.htm">2</a></td></tr></table>
           <table class="texttable"><tr><td class="textarea">
             <p class="desc">God createth heaven and earth.</p>
             <p><a href="#1">[1]</a> In the beginning God created heaven, and earth.
                <a href="#2">[2]</a> And the earth was void and empty.</p>
           </td></tr></table>"##,
    )
    .await;
    serve(
        &server,
        "/chapter/01002.htm",
        r#"<table class="texttable"><tr><td class="textarea">
             <p><a>[1]</a> So the heavens and the earth were finished.</p>
             <p>Illegible</p>
           </td></tr></table>"#,
    )
    .await;
    serve(
        &server,
        "/chapter/72001.htm",
        r#"<table class="texttable"><tr><td class="textarea">
             <p><a>[1]</a> Jude, the servant of Jesus Christ.</p>
           </td></tr></table>"#,
    )
    .await;

    let extractor = DrboExtractor::with_base_url(server.uri()).unwrap();
    let bible = extractor.extract(&ExtractContext::default()).await.unwrap();

    assert_eq!(bible.name(), "Douay-Rheims Bible");
    assert_eq!(bible.len(), 4);
    assert_eq!(
        bible.text(&Location::new("Genesis", 1, 2)),
        Some("And the earth was void and empty.")
    );
    assert_eq!(
        bible.text(&Location::new("Genesis", 2, 1)),
        Some("So the heavens and the earth were finished.")
    );
    assert_eq!(bible.testament_of("Genesis"), Some(Testament::Old));
    assert_eq!(bible.testament_of("Jude"), Some(Testament::New));

    let warnings: Vec<_> = bible.warnings().iter().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].category(), category::EMPTY_VERSE);
}

#[tokio::test]
async fn test_drbo_http_failure_aborts() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let extractor = DrboExtractor::with_base_url(server.uri()).unwrap();
    let err = extractor
        .extract(&ExtractContext::default())
        .await
        .unwrap_err();
    match err {
        ExtractError::Http { reason, .. } => assert_eq!(reason, "HTTP 503"),
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_biblehub_orders_old_testament_first() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    serve(
        &server,
        "/menus/versemenus/genesisbookmenu.htm",
        "<select><option>Jude</option><option>Genesis</option></select>",
    )
    .await;
    serve(
        &server,
        "/kj2000/cmenus/genesis/1.htm",
        r#"<select name="select2"><option>1</option><option>2</option></select>"#,
    )
    .await;
    serve(
        &server,
        "/kj2000/cmenus/jude/1.htm",
        r#"<select name="select2"><option>1</option></select>"#,
    )
    .await;
    serve(
        &server,
        "/kj2000/genesis/1.htm",
        r#"<div class="chap"><p class="regular"><span class="reftext">1</span><span>In the beginning God created the heaven and the earth.</span></p></div>"#,
    )
    .await;
    serve(
        &server,
        "/kj2000/genesis/2.htm",
        r#"<div class="chap"><p class="regular"><span class="reftext">1</span><span>Thus the heavens and the earth were finished.</span></p></div>"#,
    )
    .await;
    serve(
        &server,
        "/kj2000/jude/1.htm",
        r#"<div class="chap"><p class="regular"><span class="reftext">1</span><span>Jude, the servant of Jesus Christ.</span></p></div>"#,
    )
    .await;

    let extractor = BibleHubExtractor::with_base_url(server.uri()).unwrap();
    let bible = extractor.extract(&ExtractContext::default()).await.unwrap();

    assert_eq!(bible.len(), 3);
    let order: Vec<String> = bible
        .iter(None)
        .map(|verse| verse.location().to_string())
        .collect();
    assert_eq!(order, vec!["Genesis 1:1", "Genesis 2:1", "Jude 1:1"]);
    assert_eq!(bible.testament_of("Jude"), Some(Testament::New));
    assert!(bible.warnings().is_empty());
}

#[tokio::test]
async fn test_ebible_records_verse_ranges() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/info.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "divisionNames": ["Genesis"],
            "divisions": ["GN"],
            "sections": ["GN1"]
        })))
        .mount(&server)
        .await;
    serve(
        &server,
        "/GN1.html",
        r#"<div class="section">
             <span class="v"><span class="v-num v-1">1&nbsp;</span>In the beginning God made the heaven and the earth.</span>
             <span class="v"><span class="v-num v-2-3">2&nbsp;</span>But the earth was unsightly and unfurnished.</span>
           </div>"#,
    )
    .await;

    let extractor = EbibleExtractor::with_base_url(server.uri()).unwrap();
    let bible = extractor.extract(&ExtractContext::default()).await.unwrap();

    assert_eq!(bible.name(), "Septuagint in American English");
    assert_eq!(bible.len(), 2);
    assert_eq!(
        bible.text(&Location::new("Genesis", 1, 2)),
        Some("But the earth was unsightly and unfurnished.")
    );
    let warnings: Vec<_> = bible.warnings().iter().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].category(), category::VERSE_RANGE);
    assert_eq!(warnings[0].locations().len(), 2);
}

#[tokio::test]
async fn test_jesus_splits_chapters_by_marker() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    serve(
        &server,
        "/thebible.htm",
        r#"<table><tr><td>Banner</td></tr></table>
           <table>
             <tr><td><b>Old Testament</b><br><a href="genesis.htm">Genesis</a></td></tr>
             <tr><td><b>New Testament</b><br><a href="jude.htm">Jude</a></td></tr>
           </table>"#,
    )
    .await;
    serve(
        &server,
        "/genesis.htm",
        r#"<p class="MsoNormal">The First Book of Moses</p>
           <p class="MsoNormal">CHAPTER 1</p>
           <p class="MsoNormal">The creation</p>
           <p class="MsoNormal">1 In the beginning God created the heaven and the earth.</p>
           <p class="MsoNormal">2 And the earth was without form, and void.</p>
           <p class="MsoNormal">CHAPTER 2</p>
           <p class="MsoNormal">The sabbath</p>
           <p class="MsoNormal">1 Thus the heavens and the earth were finished.</p>"#,
    )
    .await;
    serve(
        &server,
        "/jude.htm",
        r#"<p class="MsoNormal">CHAPTER 1</p>
           <p class="MsoNormal">Greeting</p>
           <p class="MsoNormal">1 Jude, the servant of Jesus Christ.</p>"#,
    )
    .await;

    let extractor =
        JesusIsLordExtractor::with_index_url(format!("{}/thebible.htm", server.uri())).unwrap();
    let bible = extractor.extract(&ExtractContext::default()).await.unwrap();

    assert_eq!(bible.len(), 4);
    assert_eq!(
        bible.text(&Location::new("Genesis", 2, 1)),
        Some("Thus the heavens and the earth were finished.")
    );
    assert_eq!(bible.testament_of("Genesis"), Some(Testament::Old));
    assert_eq!(bible.testament_of("Jude"), Some(Testament::New));
}
