#![allow(clippy::unwrap_used)]
//! End-to-end contract tests for the content pipeline with scripted
//! providers.

use std::sync::Arc;
use std::time::Duration;

use simplify_cli::document::{Document, ExtractOptions};
use simplify_cli::pipeline::{FragmentOutcome, Pipeline, PipelineOptions};
use simplify_cli::script::Hans;
use simplify_cli::translation::mock::MockProvider;
use simplify_cli::translation::{BackendChain, Provider};

fn run_with(
    providers: Vec<Arc<dyn Provider>>,
    options: PipelineOptions,
) -> Pipeline {
    Pipeline::new(
        BackendChain::new(providers).with_deadline(Some(Duration::from_millis(200))),
        Arc::new(Hans),
        options,
    )
}

#[tokio::test]
async fn test_resource_file_example() {
    let offline: Arc<dyn Provider> = Arc::new(MockProvider::dictionary(
        "offline",
        &[("Hello", "你好"), ("%s items", "%s 个项目")],
    ));
    let input = Document::xml_strings(
        r#"<resources><string name="a">Hello</string><string name="b">%s items</string></resources>"#,
    );

    let output = run_with(vec![offline], PipelineOptions::default())
        .run(&input)
        .await;

    assert_eq!(
        output.document.content,
        r#"<resources><string name="a">你好</string><string name="b">%s items</string></resources>"#
    );
}

#[tokio::test]
async fn test_protected_tokens_are_byte_identical() {
    let offline = Arc::new(MockProvider::dictionary("offline", &[]));
    let values = [
        "Open %1$s now",
        "Hi {user}",
        "@string/app_name",
        "?attr/colorPrimary",
        "Line one\\nLine two",
        "See https://example.com/docs",
        "Press <b>OK</b>",
        "Tom &amp; Jerry",
        "12345",
    ];
    let content: String = values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("<string name=\"k{i}\">{v}</string>\n"))
        .collect();

    let output = run_with(
        vec![offline.clone() as Arc<dyn Provider>],
        PipelineOptions::default(),
    )
    .run(&Document::xml_strings(content.clone()))
    .await;

    assert_eq!(output.document.content, content);
    assert_eq!(offline.calls(), 0);
    assert_eq!(output.report.protected(), values.len());
}

#[tokio::test]
async fn test_both_providers_unavailable_passes_text_through() {
    let offline: Arc<dyn Provider> = Arc::new(MockProvider::failing("offline"));
    let online: Arc<dyn Provider> = Arc::new(MockProvider::failing("online"));

    let output = run_with(vec![offline, online], PipelineOptions::default())
        .run(&Document::plain("Hello"))
        .await;

    assert_eq!(output.document.content, "Hello");
    assert_eq!(output.report.fragments[0].outcome, FragmentOutcome::Untranslated);
}

#[tokio::test]
async fn test_echoing_offline_falls_back_to_online() {
    let offline = Arc::new(MockProvider::echo("offline"));
    let online = Arc::new(MockProvider::dictionary("online", &[("Save", "保存")]));

    let output = run_with(
        vec![
            offline.clone() as Arc<dyn Provider>,
            online.clone() as Arc<dyn Provider>,
        ],
        PipelineOptions::default(),
    )
    .run(&Document::xml_strings(r#"<string name="save">Save</string>"#))
    .await;

    assert_eq!(
        output.document.content,
        r#"<string name="save">保存</string>"#
    );
    assert_eq!(offline.calls(), 1);
    assert_eq!(online.calls(), 1);
    assert_eq!(
        output.report.fragments[0].outcome,
        FragmentOutcome::Translated {
            provider: "online".to_string()
        }
    );
}

#[tokio::test]
async fn test_slow_provider_hits_deadline_and_falls_back() {
    let slow: Arc<dyn Provider> = Arc::new(MockProvider::slow(
        "offline",
        Duration::from_secs(5),
        "太慢",
    ));
    let online: Arc<dyn Provider> = Arc::new(MockProvider::dictionary("online", &[("Hi", "嗨")]));

    let output = run_with(vec![slow, online], PipelineOptions::default())
        .run(&Document::plain("Hi"))
        .await;

    assert_eq!(output.document.content, "嗨");
}

#[tokio::test]
async fn test_structure_is_preserved_around_translated_values() {
    let offline: Arc<dyn Provider> = Arc::new(MockProvider::dictionary(
        "offline",
        &[("Cancel", "取消"), ("Done", "完成")],
    ));
    let input = Document::xml_strings(concat!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
        "<resources>\n",
        "    <!-- 按鈕 -->\n",
        "    <string name=\"cancel\" translatable=\"true\">Cancel</string>\n",
        "    <string name=\"empty\"/>\n",
        "    <STRING NAME='done'>Done</STRING>\n",
        "</resources>\n",
    ));

    let output = run_with(vec![offline], PipelineOptions::default())
        .run(&input)
        .await;

    assert_eq!(
        output.document.content,
        concat!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
            "<resources>\n",
            "    <!-- 按钮 -->\n",
            "    <string name=\"cancel\" translatable=\"true\">取消</string>\n",
            "    <string name=\"empty\"/>\n",
            "    <STRING NAME='done'>完成</STRING>\n",
            "</resources>\n",
        )
    );
}

#[tokio::test]
async fn test_legacy_markup_picks_up_untagged_values() {
    let offline: Arc<dyn Provider> =
        Arc::new(MockProvider::dictionary("offline", &[("Hello", "你好")]));
    let input = Document::xml_strings("<item>Hello</string>");
    let legacy = PipelineOptions {
        extract: ExtractOptions {
            legacy_markup: true,
        },
        ..PipelineOptions::default()
    };

    let without = run_with(vec![offline.clone()], PipelineOptions::default())
        .run(&input)
        .await;
    let with = run_with(vec![offline], legacy).run(&input).await;

    assert_eq!(without.document.content, "<item>Hello</string>");
    assert_eq!(with.document.content, "<item>你好</string>");
}

#[tokio::test]
async fn test_output_is_idempotent_under_conversion() {
    let input = Document::plain("這是一個測試，%s 個項目。");
    let pipeline = run_with(Vec::new(), PipelineOptions::default());

    let once = pipeline.run(&input).await.document;
    let twice = pipeline.run(&once).await.document;

    assert_eq!(once, twice);
}
