//! End-to-end pipeline over in-memory sources, mirroring the bootstrap
//! RBAC manifests the processor exists to handle.

use capstan_processor::{
    MemorySource, Options, ProcessError, StringSource, TemplateProcessor, DEFAULT_DELIMITER,
};
use capstan_renderer::RenderError;

const ASSETS: &str = "\
---
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRoleBinding
metadata:
  name: system:agent:{{ cluster }}
roleRef:
  apiGroup: rbac.authorization.k8s.io
  kind: ClusterRole
  name: system:agent:{{ cluster }}
subjects:
- kind: ServiceAccount
  name: {{ account }}
  namespace: {{ namespace }}
---
apiVersion: v1
kind: ServiceAccount
metadata:
  name: {{ account }}
  namespace: {{ namespace }}
---
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: system:agent:{{ cluster }}
rules:
- apiGroups: ['certificates.k8s.io']
  resources: ['certificatesigningrequests']
  verbs: ['create', 'get', 'list', 'watch']
";

#[derive(serde::Serialize, Clone)]
struct Values {
    cluster: String,
    namespace: String,
    account: String,
}

fn values() -> Values {
    Values {
        cluster: "edge-01".to_string(),
        namespace: "edge-01-ns".to_string(),
        account: "edge-01".to_string(),
    }
}

fn string_processor(options: Options) -> TemplateProcessor {
    TemplateProcessor::new(
        Box::new(StringSource::new(ASSETS, DEFAULT_DELIMITER)),
        options,
    )
}

#[test]
fn string_source_sorts_into_default_apply_order() {
    let processor = string_processor(Options::default());
    let resources = processor.structured_ordered(".", &[], false, &values()).unwrap();
    assert_eq!(resources.len(), 3, "three documents in, three resources out");
    let kinds: Vec<&str> = resources.iter().map(|r| r.kind().unwrap()).collect();
    assert_eq!(kinds, ["ServiceAccount", "ClusterRole", "ClusterRoleBinding"]);
}

#[test]
fn configured_kinds_order_wins_over_the_default() {
    let kinds_order = vec![
        "ClusterRole".to_string(),
        "ClusterRoleBinding".to_string(),
        "ServiceAccount".to_string(),
    ];
    let processor = string_processor(Options::with_kinds_order(kinds_order));
    let resources = processor.structured_ordered(".", &[], false, &values()).unwrap();
    let kinds: Vec<&str> = resources.iter().map(|r| r.kind().unwrap()).collect();
    assert_eq!(kinds, ["ClusterRole", "ClusterRoleBinding", "ServiceAccount"]);
}

#[test]
fn changing_kinds_order_never_changes_membership_or_content() {
    let default_run = string_processor(Options::default())
        .structured_ordered(".", &[], false, &values())
        .unwrap();
    let reordered_run = string_processor(Options::with_kinds_order(vec![
        "ClusterRoleBinding".to_string(),
    ]))
    .structured_ordered(".", &[], false, &values())
    .unwrap();

    assert_eq!(default_run.len(), reordered_run.len());
    for resource in &default_run {
        assert!(
            reordered_run.contains(resource),
            "resource {}/{} lost under reordering",
            resource.kind().unwrap(),
            resource.name().unwrap()
        );
    }
}

#[test]
fn unranked_kinds_group_after_ranked_ones_by_name() {
    let blob = "\
kind: Widget
metadata: {name: zeta}
---
kind: ServiceAccount
metadata: {name: agent}
---
kind: Widget
metadata: {name: alpha}
";
    let processor = string_processor(Options::default());
    let resources = processor.render_blob(blob, &values(), "---").unwrap();
    let pairs: Vec<(&str, &str)> = resources
        .iter()
        .map(|r| (r.kind().unwrap(), r.name().unwrap()))
        .collect();
    assert_eq!(
        pairs,
        [
            ("ServiceAccount", "agent"),
            ("Widget", "alpha"),
            ("Widget", "zeta"),
        ]
    );
}

#[test]
fn asset_names_are_positional_for_string_sources() {
    let processor = string_processor(Options::default());
    assert_eq!(processor.asset_names(".", &[], false).unwrap(), ["0", "1", "2"]);
    assert_eq!(processor.asset_names("", &[], true).unwrap(), ["0", "1", "2"]);
}

#[test]
fn rendered_documents_count_matches_document_count() {
    let processor = string_processor(Options::default());
    let documents = processor.rendered_documents(".", &[], false, &values()).unwrap();
    assert_eq!(documents.len(), 3);
    for document in &documents {
        assert!(!document.contains("{{"), "placeholder survived rendering:\n{document}");
    }
}

#[test]
fn missing_values_fail_the_whole_call() {
    #[derive(serde::Serialize)]
    struct Partial {
        cluster: String,
        namespace: String,
    }
    let processor = string_processor(Options::default());
    let err = processor
        .rendered_documents(
            ".",
            &[],
            false,
            &Partial {
                cluster: "edge-01".to_string(),
                namespace: "edge-01-ns".to_string(),
            },
        )
        .unwrap_err();
    match err {
        ProcessError::Render(RenderError::MissingValue { path, .. }) => {
            assert_eq!(path, "account");
        }
        other => panic!("expected MissingValue, got {other:?}"),
    }
}

#[test]
fn memory_source_pipeline_respects_recursion() {
    let source = MemorySource::from_pairs([
        (
            "bootstrap/sa.yaml",
            "apiVersion: v1\nkind: ServiceAccount\nmetadata:\n  name: {{ account }}\n  namespace: {{ namespace }}\n",
        ),
        (
            "bootstrap/rbac/role.yaml",
            "apiVersion: rbac.authorization.k8s.io/v1\nkind: ClusterRole\nmetadata:\n  name: system:agent:{{ cluster }}\n",
        ),
    ]);
    let processor = TemplateProcessor::new(Box::new(source), Options::default());

    let direct = processor.structured_ordered("bootstrap", &[], false, &values()).unwrap();
    assert_eq!(direct.len(), 1);
    assert_eq!(direct[0].kind().unwrap(), "ServiceAccount");

    let full = processor.structured_ordered("bootstrap", &[], true, &values()).unwrap();
    assert_eq!(full.len(), 2);
    let kinds: Vec<&str> = full.iter().map(|r| r.kind().unwrap()).collect();
    assert_eq!(kinds, ["ServiceAccount", "ClusterRole"]);
}

#[test]
fn decoded_content_reflects_the_value_set() {
    let processor = string_processor(Options::default());
    let resources = processor.structured_ordered(".", &[], false, &values()).unwrap();
    let binding = resources
        .iter()
        .find(|r| r.kind().unwrap() == "ClusterRoleBinding")
        .expect("binding present");
    assert_eq!(binding.name().unwrap(), "system:agent:edge-01");
    let subjects = binding.get("subjects").expect("subjects field");
    let first = &subjects.as_sequence().expect("sequence")[0];
    assert_eq!(first.get("namespace").and_then(|v| v.as_str()), Some("edge-01-ns"));
}
