//! Property tests for progress tracking, navigation and rendering

use std::collections::{BTreeMap, BTreeSet, HashMap};

use proptest::prelude::*;
use tutorial_kit::domain::{DocTitleRegistry, DocTree, DocType, DocumentId, Step, Tool, Tutorial, TutorialConfig};
use tutorial_kit::render::{MarkdownRenderer, Node, RenderOptions};
use tutorial_kit::storage::{MemoryBackend, ProgressStore};
use tutorial_kit::tutorial::{route, TutorialOrchestrator};

fn id_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9_.-]{0,16}"
}

fn doc_id(s: &str) -> DocumentId {
    s.parse().unwrap()
}

/// A one-step, one-tool tree listing the given documents
fn config_with(ids: &[String]) -> TutorialConfig {
    let tool = Tool {
        id: "stripe".parse().unwrap(),
        title: "Stripe".to_string(),
    };
    let step = Step {
        title: "Only".to_string(),
        tool: [(tool.id.clone(), ids.iter().map(|s| doc_id(s)).collect())]
            .into_iter()
            .collect(),
    };
    let tutorial = Tutorial {
        title: "Payments".to_string(),
        description: String::new(),
        scenes: vec![],
        video_url: None,
        steps: vec![step],
    };
    let tutorials: BTreeMap<DocType, Tutorial> = [(DocType::new("payments"), tutorial)].into_iter().collect();
    TutorialConfig::new(
        DocTree::new(vec![tool], tutorials).unwrap(),
        DocTitleRegistry::new(HashMap::new()),
    )
}

proptest! {
    #[test]
    fn mark_complete_is_idempotent(ids in prop::collection::vec(id_strategy(), 1..10)) {
        let store = ProgressStore::new(MemoryBackend::new());
        for id in &ids {
            store.mark_complete(doc_id(id));
        }
        let once = store.backend().value();

        for id in &ids {
            store.mark_complete(doc_id(id));
        }
        prop_assert_eq!(store.backend().value(), once);
    }

    #[test]
    fn completion_set_round_trips(ids in prop::collection::btree_set(id_strategy(), 0..10)) {
        let store = ProgressStore::new(MemoryBackend::new());
        let set = ids.iter().map(|s| doc_id(s)).collect();
        store.save(&set).unwrap();

        prop_assert_eq!(store.load().unwrap(), set);
    }

    #[test]
    fn corrupt_storage_reads_empty(raw in "[^\\[\\s].*") {
        let store = ProgressStore::new(MemoryBackend::with_value(raw));
        prop_assert!(store.get_complete_docs().is_empty());
    }

    #[test]
    fn checkmarks_match_completion(
        ids in prop::collection::btree_set(id_strategy(), 1..12),
        picks in prop::collection::vec(any::<bool>(), 12),
    ) {
        let ids: Vec<String> = ids.into_iter().collect();
        let done: BTreeSet<&String> = ids.iter().zip(&picks).filter(|(_, p)| **p).map(|(id, _)| id).collect();

        let raw = serde_json::to_string(&done).unwrap();
        let orchestrator = TutorialOrchestrator::new(
            config_with(&ids),
            DocType::new("payments"),
            ProgressStore::new(MemoryBackend::with_value(raw)),
            HashMap::<DocumentId, String>::new(),
            MarkdownRenderer::default(),
        );

        let grid = orchestrator.grid();
        prop_assert_eq!(grid.links().count(), ids.len());
        for link in grid.links() {
            prop_assert_eq!(link.complete, done.contains(&link.id.as_str().to_string()));
        }
        prop_assert_eq!(orchestrator.progress().completed, done.len());
    }

    #[test]
    fn query_round_trips(id in id_strategy()) {
        let id = doc_id(&id);
        prop_assert_eq!(route::parse_query(&route::to_query(Some(&id))), Some(id));
    }

    #[test]
    fn rendering_never_panics(source in any::<String>()) {
        let renderer = MarkdownRenderer::new(RenderOptions::with_asset_prefix("/stripe-doc"));
        let _ = renderer.render(&source);
    }

    #[test]
    fn code_fences_keep_their_source(lines in prop::collection::vec("[a-z =;]{0,20}", 1..6)) {
        let body = lines.join("\n");
        let source = format!("```ts:app.ts\n{}\n```\n", body);
        let nodes = MarkdownRenderer::default().render(&source);

        let Some(Node::Code(code)) = nodes.first() else {
            return Err(TestCaseError::fail("expected a code block"));
        };
        let header = code.header.as_ref().unwrap();
        prop_assert_eq!(&header.filename, "app.ts");
        prop_assert_eq!(&header.copy.text, &body);
    }
}
