//! Conversion, validation and documentation over hand-written schema tables.

use roundtable_schema::field::{empty_seq, empty_str, falsy, null};
use roundtable_schema::*;
use std::collections::BTreeSet;
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq)]
struct Tag {
    name: String,
    note: String,
}

static TAG: LazyLock<SchemaTable> = LazyLock::new(|| {
    SchemaTable::new(
        "Tag",
        "A label.",
        vec![
            FieldSpec::new("name", "tag name").validate(Validator::NON_EMPTY),
            FieldSpec::new("note", "free text").default_to(empty_str),
        ],
    )
});

impl Schema for Tag {
    fn schema() -> &'static SchemaTable {
        &TAG
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "name" => Some(self.name.to_value()),
            "note" => Some(self.note.to_value()),
            _ => None,
        }
    }

    fn construct(fields: &Fields<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            name: fields.read("name")?,
            note: fields.read("note")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Bundle {
    size: i64,
    tags: Vec<Tag>,
    labels: BTreeSet<String>,
    span: Option<(i64, i64)>,
    sealed: bool,
}

static BUNDLE: LazyLock<SchemaTable> = LazyLock::new(|| {
    SchemaTable::new(
        "Bundle",
        "A group of tags.",
        vec![
            FieldSpec::new("size", "bundle size").validate(Validator::at_least(0)),
            FieldSpec::new("tags", "tags in order").default_to(empty_seq),
            FieldSpec::new("labels", "label set").default_to(empty_seq),
            FieldSpec::new("span", "optional range").default_to(null),
            FieldSpec::new("sealed", "runtime flag")
                .default_to(falsy)
                .skip_wire()
                .skip_doc(),
        ],
    )
});

impl Schema for Bundle {
    fn schema() -> &'static SchemaTable {
        &BUNDLE
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "size" => Some(self.size.to_value()),
            "tags" => Some(self.tags.to_value()),
            "labels" => Some(self.labels.to_value()),
            "span" => Some(self.span.to_value()),
            "sealed" => Some(self.sealed.to_value()),
            _ => None,
        }
    }

    fn construct(fields: &Fields<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            size: fields.read("size")?,
            tags: fields.read("tags")?,
            labels: fields.read("labels")?,
            span: fields.read("span")?,
            sealed: fields.read("sealed")?,
        })
    }
}

schema_value!(Tag, Bundle);

fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).unwrap()
}

// --- from_mapping ---

#[test]
fn reads_nested_document() {
    let b: Bundle = from_mapping(&yaml(
        "size: 2\ntags:\n- name: a\n- name: b\n  note: second\nlabels: [y, x]\nspan: [1, 3]\n",
    ))
    .unwrap();
    assert_eq!(b.size, 2);
    assert_eq!(b.tags[0].note, "");
    assert_eq!(b.tags[1].note, "second");
    assert_eq!(b.labels.iter().collect::<Vec<_>>(), vec!["x", "y"]);
    assert_eq!(b.span, Some((1, 3)));
}

#[test]
fn absent_and_null_take_defaults() {
    let b: Bundle = from_mapping(&yaml("size: 0\ntags: ~\n")).unwrap();
    assert!(b.tags.is_empty());
    assert!(b.labels.is_empty());
    assert_eq!(b.span, None);
}

#[test]
fn missing_required_value() {
    let err = from_mapping::<Bundle>(&yaml("tags: []\n")).unwrap_err();
    assert_eq!(err.kind(), &SchemaErrorKind::Missing);
    assert_eq!(err.path(), "size");
}

#[test]
fn wire_excluded_field_is_never_read() {
    let b: Bundle = from_mapping(&yaml("size: 1\nsealed: true\n")).unwrap();
    assert!(!b.sealed);
}

#[test]
fn requires_a_mapping() {
    let err = from_mapping::<Tag>(&Value::from("tag")).unwrap_err();
    assert!(matches!(
        err.kind(),
        SchemaErrorKind::TypeMismatch {
            expected: "mapping",
            ..
        }
    ));
}

#[test]
fn nested_error_trail_is_innermost_first() {
    let err = from_mapping::<Bundle>(&yaml("size: 1\ntags:\n- name: a\n- note: x\n")).unwrap_err();
    assert_eq!(err.kind(), &SchemaErrorKind::Missing);
    assert_eq!(
        err.trail(),
        &[
            Segment::Field {
                entity: "Tag",
                field: "name"
            },
            Segment::Index(1),
            Segment::Field {
                entity: "Bundle",
                field: "tags"
            },
        ]
    );
    assert_eq!(err.path(), "tags[1].name");
}

#[test]
fn type_mismatch_names_the_field() {
    let err = from_mapping::<Bundle>(&yaml("size: big\n")).unwrap_err();
    assert!(matches!(err.kind(), SchemaErrorKind::TypeMismatch { .. }));
    assert!(err.to_string().contains("field size of Bundle"));
}

// --- validate ---

#[test]
fn validators_run_after_construction() {
    let err = from_mapping::<Bundle>(&yaml("size: -1\n")).unwrap_err();
    assert!(matches!(err.kind(), SchemaErrorKind::Invalid(_)));
    assert_eq!(err.path(), "size");

    let err = from_mapping::<Tag>(&yaml("name: ''\n")).unwrap_err();
    assert!(matches!(err.kind(), SchemaErrorKind::Invalid(_)));
}

#[test]
fn validate_checks_in_memory_entities() {
    let ok = Tag {
        name: "a".into(),
        note: String::new(),
    };
    assert!(validate(&ok).is_ok());
    let bad = Tag {
        name: String::new(),
        note: String::new(),
    };
    assert!(validate(&bad).is_err());
}

// --- to_mapping ---

#[test]
fn to_mapping_skips_wire_excluded_fields() {
    let b = Bundle {
        size: 3,
        tags: vec![],
        labels: BTreeSet::new(),
        span: None,
        sealed: true,
    };
    let m = to_mapping(&b);
    assert!(m.get("sealed").is_none());
    assert_eq!(m.get("size"), Some(&Value::from(3)));
    assert_eq!(m.get("span"), Some(&Value::Null));
}

#[test]
fn round_trips_through_yaml() {
    let b = Bundle {
        size: 5,
        tags: vec![
            Tag {
                name: "a".into(),
                note: "line one\nline two".into(),
            },
            Tag {
                name: "b".into(),
                note: String::new(),
            },
        ],
        labels: ["p".to_string(), "q".to_string()].into_iter().collect(),
        span: Some((-1, 4)),
        sealed: false,
    };
    let text = serde_yaml::to_string(&to_mapping(&b)).unwrap();
    let back: Bundle = from_mapping(&yaml(&text)).unwrap();
    assert_eq!(back, b);
}

// --- describe ---

#[test]
fn describe_lists_doc_fields() {
    let doc = describe::<Bundle>();
    assert_eq!(doc.heading, "Bundle");
    assert_eq!(doc.body, "A group of tags.");
    let headings: Vec<_> = doc.children.iter().map(|c| c.heading.as_str()).collect();
    assert_eq!(headings, vec!["size", "tags", "labels", "span"]);
    assert!(doc.render().starts_with("# Bundle\nA group of tags.\n## size\nbundle size"));
}
